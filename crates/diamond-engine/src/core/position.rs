use serde::{Deserialize, Serialize};

/// A point in playing-field coordinates.
///
/// `x` runs toward the first-base side, `y` is height above the ground and
/// `z` runs from the plate toward the mound.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn translated(self, dx: f32, dy: f32, dz: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Size of an axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Extent {
    #[must_use]
    pub const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    #[must_use]
    pub const fn cube(side: f32) -> Self {
        Self::new(side, side, side)
    }
}

/// Axis-aligned box with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min: Position,
    max: Position,
}

impl BoundingBox {
    #[must_use]
    pub fn from_center(center: Position, extent: Extent) -> Self {
        let (hw, hh, hd) = (extent.width / 2.0, extent.height / 2.0, extent.depth / 2.0);
        Self {
            min: center.translated(-hw, -hh, -hd),
            max: center.translated(hw, hh, hd),
        }
    }

    #[must_use]
    pub fn min(&self) -> Position {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> Position {
        self.max
    }

    #[must_use]
    pub fn contains(&self, p: Position) -> bool {
        (self.min.x..=self.max.x).contains(&p.x)
            && (self.min.y..=self.max.y).contains(&p.y)
            && (self.min.z..=self.max.z).contains(&p.z)
    }
}
