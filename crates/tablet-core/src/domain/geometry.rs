//! Geometric primitives shared by the absolute output mode and the settings
//! record: a point and an axis-aligned rectangle.
//!
//! Both display regions (pixels) and tablet-surface regions (millimetres)
//! are described by the same [`Area`] type; the unit is a convention of the
//! caller, never encoded in the type.

use serde::{Deserialize, Serialize};

/// A 2-D position. Units are whatever the surrounding [`Area`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle described by its size and the position of its top-left corner.
///
/// Used both for the mapped display region of an absolute output mode and
/// for the active region of the physical tablet surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Area {
    pub width: f32,
    pub height: f32,
    pub position: Point,
}

impl Area {
    pub fn new(width: f32, height: f32, x: f32, y: f32) -> Self {
        Self {
            width,
            height,
            position: Point::new(x, y),
        }
    }

    /// Returns `true` when the area has no extent on either axis.
    ///
    /// A degenerate area cannot be used as the source of a coordinate
    /// transform (the mapping would divide by zero).
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Returns `true` when `point` lies within the area (edges inclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.position.x
            && point.x <= self.position.x + self.width
            && point.y >= self.position.y
            && point.y <= self.position.y + self.height
    }

    /// Clamps `point` onto the area, returning the nearest contained point.
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(self.position.x, self.position.x + self.width),
            point.y.clamp(self.position.y, self.position.y + self.height),
        )
    }
}

impl std::fmt::Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{}@({},{})",
            self.width, self.height, self.position.x, self.position.y
        )
    }
}
