//! Plane geometry in millimetres.
//!
//! Local coordinates (pin and pad offsets, artwork) are relative to a
//! component's origin. [`transform_point`] maps them into the board or sheet
//! frame of a placed instance.

use std::fmt;
use std::ops::{Add, Sub};

use crate::error::{Result, ensure_finite};

/// A point in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotate counter-clockwise about the origin.
    pub fn rotated(self, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Mirror about the local Y axis.
    pub fn mirrored(self) -> Self {
        Self {
            x: -self.x,
            y: self.y,
        }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Fails with [`crate::Error::InvalidDimension`] when either coordinate is NaN or infinite.
    pub(crate) fn ensure_finite(self, what: &'static str) -> Result<Self> {
        ensure_finite(what, self.x)?;
        ensure_finite(what, self.y)?;
        Ok(self)
    }

    /// Component-wise comparison with an absolute tolerance.
    pub fn approx_eq(self, other: Point, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Map a local offset to absolute coordinates.
///
/// Mirroring negates the local x first, then the point is rotated
/// counter-clockwise by `rotation_degrees` and translated to `origin`.
pub fn transform_point(local: Point, origin: Point, rotation_degrees: f64, mirrored: bool) -> Point {
    let local = if mirrored { local.mirrored() } else { local };
    local.rotated(rotation_degrees) + origin
}

/// Fold an angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let folded = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if folded >= 360.0 { 0.0 } else { folded }
}

/// Point at `angle_degrees` on a circle, measured counter-clockwise from +X.
pub fn point_on_circle(center: Point, radius: f64, angle_degrees: f64) -> Point {
    center + Point::new(radius, 0.0).rotated(angle_degrees)
}

/// Start, midpoint and end of an arc swept counter-clockwise from
/// `start_angle` to `end_angle`. Equal angles describe a full turn.
pub fn arc_points(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> [Point; 3] {
    let mut sweep = normalize_degrees(end_angle - start_angle);
    if sweep == 0.0 {
        sweep = 360.0;
    }
    [
        point_on_circle(center, radius, start_angle),
        point_on_circle(center, radius, start_angle + sweep / 2.0),
        point_on_circle(center, radius, start_angle + sweep),
    ]
}
