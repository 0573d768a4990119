//! Schematic sheet document.

mod render;

use std::path::Path;
use std::sync::Arc;

use crate::config::GeneratorConfig;
use crate::connect::{Endpoint, resolve_connection};
use crate::definition::SymbolDef;
use crate::error::Result;
use crate::geometry::Point;
use crate::ids::{IdGenerator, NamespacedIds};
use crate::metadata::{Paper, TitleBlock};
use crate::net::{NetId, NetRegistry};
use crate::output::write_atomic;
use crate::placement::{PlacedInstance, Placement, Placements};
use crate::terminal::Pin;

/// A straight wire segment. Wires drawn by hand carry [`NetId::NONE`].
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    pub start: Point,
    pub end: Point,
    pub net: NetId,
}

/// Connection dot where wires meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Junction {
    pub position: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LabelKind {
    /// Visible on this sheet only.
    #[default]
    Local,
    /// Shared across the hierarchy.
    Global,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: Point,
    pub rotation: f64,
    pub kind: LabelKind,
}

impl Label {
    pub fn local(text: impl Into<String>, position: impl Into<Point>) -> Self {
        Self {
            text: text.into(),
            position: position.into(),
            rotation: 0.0,
            kind: LabelKind::Local,
        }
    }

    pub fn global(text: impl Into<String>, position: impl Into<Point>) -> Self {
        Self {
            kind: LabelKind::Global,
            ..Self::local(text, position)
        }
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }
}

/// A single schematic sheet: symbols, power markers, wires and annotations.
#[derive(Debug)]
pub struct Schematic {
    name: String,
    paper: Paper,
    title: TitleBlock,
    nets: NetRegistry,
    /// Parts and power markers together, in placement order.
    symbols: Placements<Pin>,
    next_power: u32,
    wires: Vec<Wire>,
    junctions: Vec<Junction>,
    labels: Vec<Label>,
    ids: Box<dyn IdGenerator>,
    config: GeneratorConfig,
}

impl Schematic {
    pub fn new(name: impl Into<String>) -> Self {
        Self::build(name.into(), GeneratorConfig::default())
    }

    /// Sheet using `config` for defaults; the config is validated first.
    pub fn with_config(name: impl Into<String>, config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(name.into(), config))
    }

    fn build(name: String, config: GeneratorConfig) -> Self {
        let mut title = TitleBlock::new(&name);
        title.company = config.title.company.clone();
        title.revision = config.title.revision.clone();
        Self {
            ids: Box::new(NamespacedIds::new(&name)),
            paper: config.paper,
            name,
            title,
            nets: NetRegistry::new(),
            symbols: Placements::default(),
            next_power: 1,
            wires: Vec::new(),
            junctions: Vec::new(),
            labels: Vec::new(),
            config,
        }
    }

    /// Replace the uuid source used by rendering.
    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn paper(&self) -> Paper {
        self.paper
    }

    pub fn set_paper(&mut self, paper: Paper) {
        self.paper = paper;
    }

    pub fn title(&self) -> &TitleBlock {
        &self.title
    }

    pub fn title_mut(&mut self) -> &mut TitleBlock {
        &mut self.title
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn nets(&self) -> &NetRegistry {
        &self.nets
    }

    pub fn net(&mut self, name: &str) -> NetId {
        self.nets.get_or_create(name)
    }

    /// All placed symbols, power markers included.
    pub fn symbols(&self) -> &Placements<Pin> {
        &self.symbols
    }

    pub fn symbol(&self, reference: &str) -> Option<&PlacedInstance<Pin>> {
        self.symbols.get(reference)
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn place(
        &mut self,
        reference: impl Into<String>,
        value: impl Into<String>,
        symbol: Arc<SymbolDef>,
        placement: Placement,
    ) -> Result<()> {
        self.symbols
            .insert(PlacedInstance::new(reference, value, symbol, placement))
    }

    /// Place a power marker under the next free `#PWRnn` reference.
    ///
    /// The marker's value is the symbol name (`GND`, `+5V`). Returns the
    /// assigned reference so it can be passed to [`Schematic::connect`].
    pub fn place_power(&mut self, symbol: Arc<SymbolDef>, position: impl Into<Point>) -> Result<String> {
        let mut n = self.next_power;
        let mut reference = format!("#PWR{n:02}");
        while self.symbols.contains(&reference) {
            n += 1;
            reference = format!("#PWR{n:02}");
        }
        let value = symbol.name().to_string();
        let position = position.into();
        self.symbols.insert(PlacedInstance::new(
            reference.clone(),
            value,
            symbol,
            Placement::at(position.x, position.y),
        ))?;
        self.next_power = n + 1;
        Ok(reference)
    }

    /// Draw a wire with no electrical meaning of its own.
    pub fn add_wire(&mut self, start: impl Into<Point>, end: impl Into<Point>) {
        self.wires.push(Wire {
            start: start.into(),
            end: end.into(),
            net: NetId::NONE,
        });
    }

    pub fn add_junction(&mut self, position: impl Into<Point>) {
        self.junctions.push(Junction {
            position: position.into(),
        });
    }

    pub fn add_label(&mut self, label: Label) {
        self.labels.push(label);
    }

    /// Wire two pins together, straight from one to the other.
    ///
    /// Without a name (or with an empty one) the net is called
    /// `Net-(<ref1>-<pin1>)-(<ref2>-<pin2>)`.
    pub fn connect(
        &mut self,
        ref1: &str,
        pin1: &str,
        ref2: &str,
        pin2: &str,
        net: Option<&str>,
    ) -> Result<NetId> {
        let resolved = resolve_connection(
            &mut self.symbols,
            &mut self.nets,
            Endpoint::new(ref1, pin1),
            Endpoint::new(ref2, pin2),
            net,
        )?;
        self.wires.push(Wire {
            start: resolved.start,
            end: resolved.end,
            net: resolved.net,
        });
        Ok(resolved.net)
    }

    /// Render the sheet as `.kicad_sch` text.
    pub fn render(&self) -> String {
        render::render_schematic(self)
    }

    /// Render and write atomically to `path`, consuming the schematic.
    pub fn save(self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        write_atomic(path, &self.render())?;
        log::info!(
            "saved schematic `{}`: {} symbols, {} wires, {} nets",
            self.name,
            self.symbols.len(),
            self.wires.len(),
            self.nets.len()
        );
        Ok(())
    }
}
