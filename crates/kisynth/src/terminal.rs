//! Connection points of a component: schematic pins and board pads.

use std::fmt;

use crate::geometry::Point;

/// Behaviour shared by pins and pads, used by the connection resolver.
pub trait Terminal: fmt::Debug + Send + Sync {
    /// Identifier unique within one definition ("1", "A", "K").
    fn number(&self) -> &str;

    /// Offset from the component origin, in the component's local frame.
    fn offset(&self) -> Point;
}

/// Electrical type written into schematic pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElectricalRole {
    #[default]
    Passive,
    PowerIn,
    PowerOut,
    Input,
    Output,
}

impl ElectricalRole {
    pub fn as_kicad(self) -> &'static str {
        match self {
            ElectricalRole::Passive => "passive",
            ElectricalRole::PowerIn => "power_in",
            ElectricalRole::PowerOut => "power_out",
            ElectricalRole::Input => "input",
            ElectricalRole::Output => "output",
        }
    }
}

/// Side of the symbol body a pin sticks out from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinDirection {
    Right,
    Up,
    Left,
    Down,
}

impl PinDirection {
    /// Angle KiCad stores in the pin's `at`.
    pub fn degrees(self) -> f64 {
        match self {
            PinDirection::Right => 0.0,
            PinDirection::Up => 90.0,
            PinDirection::Left => 180.0,
            PinDirection::Down => 270.0,
        }
    }
}

/// A schematic symbol pin.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub number: String,
    pub name: String,
    pub offset: Point,
    pub direction: PinDirection,
    pub length: f64,
    pub role: ElectricalRole,
}

impl Pin {
    /// Standard 2.54 mm passive pin; `name` of `~` hides the name in KiCad.
    pub fn new(
        number: impl Into<String>,
        name: impl Into<String>,
        offset: impl Into<Point>,
        direction: PinDirection,
    ) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            offset: offset.into(),
            direction,
            length: 2.54,
            role: ElectricalRole::Passive,
        }
    }

    pub fn with_role(mut self, role: ElectricalRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length.max(0.0);
        self
    }
}

impl Terminal for Pin {
    fn number(&self) -> &str {
        &self.number
    }

    fn offset(&self) -> Point {
        self.offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadShape {
    Rect,
    RoundRect,
    Circle,
    Oval,
}

impl PadShape {
    pub fn as_kicad(self) -> &'static str {
        match self {
            PadShape::Rect => "rect",
            PadShape::RoundRect => "roundrect",
            PadShape::Circle => "circle",
            PadShape::Oval => "oval",
        }
    }
}

/// A footprint pad. A drill of zero makes it a surface-mount pad.
#[derive(Debug, Clone, PartialEq)]
pub struct Pad {
    pub number: String,
    pub offset: Point,
    pub size: (f64, f64),
    pub shape: PadShape,
    pub drill: f64,
}

impl Pad {
    pub fn smd(
        number: impl Into<String>,
        offset: impl Into<Point>,
        size: (f64, f64),
        shape: PadShape,
    ) -> Self {
        Self {
            number: number.into(),
            offset: offset.into(),
            size,
            shape,
            drill: 0.0,
        }
    }

    pub fn through_hole(
        number: impl Into<String>,
        offset: impl Into<Point>,
        size: (f64, f64),
        shape: PadShape,
        drill: f64,
    ) -> Self {
        Self {
            number: number.into(),
            offset: offset.into(),
            size,
            shape,
            drill: drill.max(0.0),
        }
    }

    pub fn is_through_hole(&self) -> bool {
        self.drill > 0.0
    }
}

impl Terminal for Pad {
    fn number(&self) -> &str {
        &self.number
    }

    fn offset(&self) -> Point {
        self.offset
    }
}
