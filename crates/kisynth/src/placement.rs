//! Placed occurrences of component definitions.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::definition::ComponentDefinition;
use crate::error::{Error, Result, ensure_finite};
use crate::geometry::{Point, transform_point};
use crate::net::NetId;
use crate::terminal::Terminal;

/// Board side a footprint sits on. Schematic symbols are always `Front`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
}

/// Where and how an instance is placed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub position: Point,
    pub rotation: f64,
    pub mirrored: bool,
    pub side: Side,
}

impl Placement {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            ..Default::default()
        }
    }

    /// Counter-clockwise rotation in degrees.
    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn mirrored(mut self) -> Self {
        self.mirrored = true;
        self
    }

    /// Flip onto the back of the board. Back-side footprints are mirrored.
    pub fn on_back(mut self) -> Self {
        self.side = Side::Back;
        self.mirrored = true;
        self
    }
}

/// One occurrence of a definition in a document.
#[derive(Debug, Clone)]
pub struct PlacedInstance<T> {
    reference: String,
    value: String,
    definition: Arc<ComponentDefinition<T>>,
    placement: Placement,
    /// Net assigned to each connected terminal, by terminal number.
    nets: BTreeMap<String, NetId>,
}

impl<T: Terminal> PlacedInstance<T> {
    pub fn new(
        reference: impl Into<String>,
        value: impl Into<String>,
        definition: Arc<ComponentDefinition<T>>,
        placement: Placement,
    ) -> Self {
        Self {
            reference: reference.into(),
            value: value.into(),
            definition,
            placement,
            nets: BTreeMap::new(),
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn definition(&self) -> &Arc<ComponentDefinition<T>> {
        &self.definition
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn position(&self) -> Point {
        self.placement.position
    }

    pub fn rotation(&self) -> f64 {
        self.placement.rotation
    }

    pub fn is_mirrored(&self) -> bool {
        self.placement.mirrored
    }

    pub fn side(&self) -> Side {
        self.placement.side
    }

    /// Map a local offset of this instance into the document frame.
    pub fn to_absolute(&self, local: Point) -> Point {
        transform_point(
            local,
            self.placement.position,
            self.placement.rotation,
            self.placement.mirrored,
        )
    }

    /// Absolute position of terminal `number`, if the definition has it.
    pub fn terminal_position(&self, number: &str) -> Option<Point> {
        self.definition
            .terminal(number)
            .map(|t| self.to_absolute(t.offset()))
    }

    /// Net on terminal `number`; [`NetId::NONE`] until connected.
    pub fn net_of(&self, number: &str) -> NetId {
        self.nets.get(number).copied().unwrap_or(NetId::NONE)
    }

    /// Connected terminals and their nets, ordered by terminal number.
    pub fn nets(&self) -> impl Iterator<Item = (&str, NetId)> {
        self.nets.iter().map(|(pin, id)| (pin.as_str(), *id))
    }

    pub(crate) fn assign_net(&mut self, number: &str, net: NetId) {
        self.nets.insert(number.to_string(), net);
    }
}

/// Instances of a document in placement order, indexed by reference.
#[derive(Debug, Clone)]
pub struct Placements<T> {
    items: Vec<PlacedInstance<T>>,
    by_reference: HashMap<String, usize>,
}

impl<T> Default for Placements<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            by_reference: HashMap::new(),
        }
    }
}

impl<T: Terminal> Placements<T> {
    pub fn insert(&mut self, instance: PlacedInstance<T>) -> Result<()> {
        if self.by_reference.contains_key(instance.reference()) {
            return Err(Error::DuplicateReference {
                reference: instance.reference.clone(),
            });
        }
        instance.placement.position.ensure_finite("placement position")?;
        ensure_finite("placement rotation", instance.placement.rotation)?;
        log::debug!(
            "placed {} ({}) at {} rot {}",
            instance.reference,
            instance.definition.name(),
            instance.placement.position,
            instance.placement.rotation
        );
        self.by_reference
            .insert(instance.reference.clone(), self.items.len());
        self.items.push(instance);
        Ok(())
    }

    pub fn get(&self, reference: &str) -> Option<&PlacedInstance<T>> {
        self.by_reference.get(reference).map(|&idx| &self.items[idx])
    }

    pub(crate) fn get_mut(&mut self, reference: &str) -> Option<&mut PlacedInstance<T>> {
        self.by_reference
            .get(reference)
            .map(|&idx| &mut self.items[idx])
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.by_reference.contains_key(reference)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlacedInstance<T>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a Placements<T> {
    type Item = &'a PlacedInstance<T>;
    type IntoIter = std::slice::Iter<'a, PlacedInstance<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::FootprintDef;
    use crate::terminal::{Pad, PadShape};

    fn two_pad() -> Arc<FootprintDef> {
        FootprintDef::builder("TEST")
            .terminal(Pad::smd("1", (-1.0, 0.0), (1.0, 1.0), PadShape::Rect))
            .terminal(Pad::smd("2", (1.0, 0.0), (1.0, 1.0), PadShape::Rect))
            .build()
            .unwrap()
    }

    #[test]
    fn duplicate_reference_is_rejected() {
        let fp = two_pad();
        let mut placements = Placements::default();
        placements
            .insert(PlacedInstance::new("R1", "1k", fp.clone(), Placement::at(0.0, 0.0)))
            .unwrap();
        let err = placements
            .insert(PlacedInstance::new("R1", "2k", fp, Placement::at(5.0, 0.0)))
            .unwrap_err();

        assert!(matches!(err, Error::DuplicateReference { ref reference } if reference == "R1"));
        assert_eq!(placements.len(), 1);
        assert_eq!(placements.get("R1").unwrap().value(), "1k");
    }

    #[test]
    fn non_finite_placement_is_rejected() {
        let fp = two_pad();
        let mut placements = Placements::default();
        let err = placements
            .insert(PlacedInstance::new("R1", "1k", fp.clone(), Placement::at(0.0, f64::NAN)))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { what: "placement position", .. }));

        let spun = Placement::at(0.0, 0.0).rotated(f64::INFINITY);
        let err = placements
            .insert(PlacedInstance::new("R1", "1k", fp, spun))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { what: "placement rotation", .. }));
        assert!(placements.is_empty());
    }

    #[test]
    fn terminal_positions_follow_placement() {
        let inst = PlacedInstance::new(
            "R1",
            "1k",
            two_pad(),
            Placement::at(10.0, 5.0).rotated(90.0),
        );
        let p = inst.terminal_position("2").unwrap();
        assert!(p.approx_eq(Point::new(10.0, 6.0), 1e-9));
        assert!(inst.terminal_position("3").is_none());
    }

    #[test]
    fn back_side_placement_is_mirrored() {
        let placement = Placement::at(0.0, 0.0).on_back();
        assert_eq!(placement.side, Side::Back);
        assert!(placement.mirrored);
    }

    #[test]
    fn nets_default_to_sentinel() {
        let mut inst = PlacedInstance::new("R1", "1k", two_pad(), Placement::default());
        assert_eq!(inst.net_of("1"), NetId::NONE);
        let mut nets = crate::net::NetRegistry::new();
        inst.assign_net("1", nets.get_or_create("VCC"));
        assert_eq!(inst.net_of("1").get(), 1);
        assert_eq!(inst.nets().count(), 1);
    }
}
