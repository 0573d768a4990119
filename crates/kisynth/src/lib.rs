//! Synthesis of KiCad board (`.kicad_pcb`) and schematic (`.kicad_sch`) files
//! from an in-memory design model.
//!
//! A design is built in three steps:
//!
//! * obtain [`FootprintDef`]s and [`SymbolDef`]s, usually from a [`Catalog`];
//! * place instances of them on a [`Board`] or [`Schematic`];
//! * call `connect` for each pin-to-pin link, then `render` or `save`.
//!
//! `connect` resolves both pins to absolute coordinates, registers the net,
//! draws a straight track or wire and annotates both pins with the net id.
//! No routing happens here; an external router may append tracks through
//! [`Board::add_track`] using the registered net ids.
//!
//! Output is deterministic for a given document: uuids come from the
//! document's [`IdGenerator`] (name-derived v5 ids by default) and numbers are
//! written with at most six decimals.

mod connect;
mod emit;
mod output;

pub mod board;
pub mod catalog;
pub mod config;
pub mod definition;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod metadata;
pub mod net;
pub mod placement;
pub mod primitive;
pub mod schematic;
pub mod terminal;

pub use board::{Board, ConnectOptions, CopperLayer, Track, Via};
pub use catalog::Catalog;
pub use config::GeneratorConfig;
pub use definition::{ComponentDefinition, DefinitionBuilder, FootprintDef, SymbolDef};
pub use error::{Error, Result};
pub use geometry::{Point, transform_point};
pub use ids::{IdGenerator, NamespacedIds, RandomIds, SequentialIds};
pub use metadata::{DateStamp, Paper, TitleBlock};
pub use net::{NetId, NetRegistry};
pub use placement::{PlacedInstance, Placement, Side};
pub use primitive::{ArtLayer, Graphic, GraphicPrimitive};
pub use schematic::{Junction, Label, LabelKind, Schematic, Wire};
pub use terminal::{ElectricalRole, Pad, PadShape, Pin, PinDirection, Terminal};
