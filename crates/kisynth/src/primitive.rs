//! Drawable artwork carried by component definitions.

use crate::geometry::Point;

/// Closed set of shapes a definition can draw, in local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphicPrimitive {
    Line {
        start: Point,
        end: Point,
    },
    /// Axis-aligned rectangle between two corners.
    Rect {
        start: Point,
        end: Point,
    },
    /// Arc swept counter-clockwise from `start_angle` to `end_angle`.
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Circle {
        center: Point,
        radius: f64,
    },
    Text {
        content: String,
        position: Point,
    },
    /// Open point chain; repeat the first point to close it.
    Polyline {
        points: Vec<Point>,
    },
}

impl GraphicPrimitive {
    pub fn line(start: impl Into<Point>, end: impl Into<Point>) -> Self {
        Self::Line {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn rect(start: impl Into<Point>, end: impl Into<Point>) -> Self {
        Self::Rect {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn arc(center: impl Into<Point>, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self::Arc {
            center: center.into(),
            radius,
            start_angle,
            end_angle,
        }
    }

    pub fn circle(center: impl Into<Point>, radius: f64) -> Self {
        Self::Circle {
            center: center.into(),
            radius,
        }
    }

    pub fn text(content: impl Into<String>, position: impl Into<Point>) -> Self {
        Self::Text {
            content: content.into(),
            position: position.into(),
        }
    }

    pub fn polyline<I, P>(points: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        Self::Polyline {
            points: points.into_iter().map(Into::into).collect(),
        }
    }

    /// Closed polyline through `points`, returning to the first point.
    pub fn polygon<I, P>(points: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        let mut points: Vec<Point> = points.into_iter().map(Into::into).collect();
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if first != last {
                points.push(first);
            }
        }
        Self::Polyline { points }
    }
}

/// Artwork layer a primitive belongs to.
///
/// Board footprints use the first three; schematic symbols draw on `Body`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtLayer {
    Silkscreen,
    Fabrication,
    Courtyard,
    Body,
}

impl ArtLayer {
    /// KiCad layer name on the given board side.
    pub fn board_layer(self, front: bool) -> &'static str {
        match (self, front) {
            (ArtLayer::Silkscreen, true) => "F.SilkS",
            (ArtLayer::Silkscreen, false) => "B.SilkS",
            (ArtLayer::Fabrication | ArtLayer::Body, true) => "F.Fab",
            (ArtLayer::Fabrication | ArtLayer::Body, false) => "B.Fab",
            (ArtLayer::Courtyard, true) => "F.CrtYd",
            (ArtLayer::Courtyard, false) => "B.CrtYd",
        }
    }

    /// Stroke width KiCad's library conventions use on this layer.
    pub fn stroke_width(self) -> f64 {
        match self {
            ArtLayer::Silkscreen => 0.12,
            ArtLayer::Fabrication => 0.1,
            ArtLayer::Courtyard => 0.05,
            ArtLayer::Body => 0.254,
        }
    }
}

/// A primitive tagged with the layer it is drawn on.
#[derive(Debug, Clone, PartialEq)]
pub struct Graphic {
    pub primitive: GraphicPrimitive,
    pub layer: ArtLayer,
}

impl Graphic {
    pub fn new(primitive: GraphicPrimitive, layer: ArtLayer) -> Self {
        Self { primitive, layer }
    }

    pub fn silkscreen(primitive: GraphicPrimitive) -> Self {
        Self::new(primitive, ArtLayer::Silkscreen)
    }

    pub fn fabrication(primitive: GraphicPrimitive) -> Self {
        Self::new(primitive, ArtLayer::Fabrication)
    }

    pub fn courtyard(primitive: GraphicPrimitive) -> Self {
        Self::new(primitive, ArtLayer::Courtyard)
    }

    pub fn body(primitive: GraphicPrimitive) -> Self {
        Self::new(primitive, ArtLayer::Body)
    }
}
