//! Immutable component templates shared between placed instances.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::primitive::Graphic;
use crate::terminal::{Pad, Pin, Terminal};

/// A reusable component template: artwork plus terminals.
///
/// Built once through [`DefinitionBuilder`] and shared by `Arc`; nothing
/// mutates it after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDefinition<T> {
    name: String,
    description: String,
    library: Option<String>,
    reference_prefix: String,
    keywords: Vec<String>,
    power: bool,
    graphics: Vec<Graphic>,
    terminals: Vec<T>,
}

/// Schematic symbol template.
pub type SymbolDef = ComponentDefinition<Pin>;
/// Board footprint template.
pub type FootprintDef = ComponentDefinition<Pad>;

impl<T: Terminal> ComponentDefinition<T> {
    pub fn builder(name: impl Into<String>) -> DefinitionBuilder<T> {
        DefinitionBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn library(&self) -> Option<&str> {
        self.library.as_deref()
    }

    /// KiCad library id, `library:name` or the bare name.
    pub fn lib_id(&self) -> String {
        match &self.library {
            Some(lib) => format!("{lib}:{}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn reference_prefix(&self) -> &str {
        &self.reference_prefix
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Whether this is a power marker (GND, +5V) rather than a part.
    pub fn is_power(&self) -> bool {
        self.power
    }

    pub fn graphics(&self) -> &[Graphic] {
        &self.graphics
    }

    pub fn terminals(&self) -> &[T] {
        &self.terminals
    }

    pub fn terminal(&self, number: &str) -> Option<&T> {
        self.terminals.iter().find(|t| t.number() == number)
    }
}

impl FootprintDef {
    pub fn pads(&self) -> &[Pad] {
        &self.terminals
    }

    pub fn is_through_hole(&self) -> bool {
        self.terminals.iter().any(Pad::is_through_hole)
    }
}

impl SymbolDef {
    pub fn pins(&self) -> &[Pin] {
        &self.terminals
    }
}

/// Accumulates the parts of a definition and checks them on `build`.
#[derive(Debug, Clone)]
pub struct DefinitionBuilder<T> {
    inner: ComponentDefinition<T>,
}

impl<T: Terminal> DefinitionBuilder<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: ComponentDefinition {
                name: name.into(),
                description: String::new(),
                library: None,
                reference_prefix: "U".to_string(),
                keywords: Vec::new(),
                power: false,
                graphics: Vec::new(),
                terminals: Vec::new(),
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.inner.description = description.into();
        self
    }

    pub fn library(mut self, library: impl Into<String>) -> Self {
        self.inner.library = Some(library.into());
        self
    }

    pub fn reference_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.inner.reference_prefix = prefix.into();
        self
    }

    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn power(mut self) -> Self {
        self.inner.power = true;
        self
    }

    pub fn graphic(mut self, graphic: Graphic) -> Self {
        self.inner.graphics.push(graphic);
        self
    }

    pub fn graphics(mut self, graphics: impl IntoIterator<Item = Graphic>) -> Self {
        self.inner.graphics.extend(graphics);
        self
    }

    pub fn terminal(mut self, terminal: T) -> Self {
        self.inner.terminals.push(terminal);
        self
    }

    pub fn terminals(mut self, terminals: impl IntoIterator<Item = T>) -> Self {
        self.inner.terminals.extend(terminals);
        self
    }

    /// Finish the definition, rejecting duplicate terminal numbers.
    pub fn build(self) -> Result<Arc<ComponentDefinition<T>>> {
        let mut seen = HashSet::new();
        for terminal in &self.inner.terminals {
            if !seen.insert(terminal.number()) {
                return Err(Error::DuplicatePin {
                    definition: self.inner.name.clone(),
                    pin: terminal.number().to_string(),
                });
            }
        }
        Ok(Arc::new(self.inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::GraphicPrimitive;
    use crate::terminal::{PadShape, PinDirection};

    #[test]
    fn builds_footprint() {
        let fp = FootprintDef::builder("R_0805_2012Metric")
            .description("Resistor SMD 0805 (2012 Metric)")
            .terminal(Pad::smd("1", (-1.025, 0.0), (1.15, 1.05), PadShape::RoundRect))
            .terminal(Pad::smd("2", (1.025, 0.0), (1.15, 1.05), PadShape::RoundRect))
            .graphic(Graphic::fabrication(GraphicPrimitive::rect(
                (-1.0, -0.625),
                (1.0, 0.625),
            )))
            .build()
            .unwrap();

        assert_eq!(fp.pads().len(), 2);
        assert!(!fp.is_through_hole());
        assert_eq!(fp.terminal("2").map(|p| p.offset.x), Some(1.025));
        assert!(fp.terminal("3").is_none());
        assert_eq!(fp.lib_id(), "R_0805_2012Metric");
    }

    #[test]
    fn rejects_duplicate_pins() {
        let err = SymbolDef::builder("R")
            .terminal(Pin::new("1", "~", (-2.54, 0.0), PinDirection::Left))
            .terminal(Pin::new("1", "~", (2.54, 0.0), PinDirection::Right))
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            Error::DuplicatePin { ref definition, ref pin } if definition == "R" && pin == "1"
        ));
    }

    #[test]
    fn lib_id_includes_library() {
        let sym = SymbolDef::builder("GND")
            .library("power")
            .power()
            .build()
            .unwrap();
        assert_eq!(sym.lib_id(), "power:GND");
        assert!(sym.is_power());
    }
}
