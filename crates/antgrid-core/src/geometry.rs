#![forbid(unsafe_code)]

//! Geometric primitives for the three coordinate spaces.
//!
//! - **Screen space**: canvas pixels, origin at the top-left corner.
//! - **Grid space**: continuous cell units, origin at the grid's top-left
//!   corner. `GridPoint { x: 2.5, y: 0.5 }` is the center of cell `(2, 0)`.
//! - **Cell space**: integer cell coordinates, possibly out of bounds.

use serde::{Deserialize, Serialize};

/// A point in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    /// Create a new screen point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point halfway between `self` and `other`.
    #[inline]
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    /// Create a new canvas size.
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether the canvas has no drawable area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Pixel at the center of the canvas.
    #[inline]
    #[must_use]
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, self.height / 2.0)
    }

    /// The shorter of the two dimensions.
    #[inline]
    #[must_use]
    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Clamp each dimension up to the given minimum.
    #[must_use]
    pub fn at_least(self, min: CanvasSize) -> Self {
        Self::new(self.width.max(min.width), self.height.max(min.height))
    }
}

/// A point in continuous grid units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridPoint {
    pub x: f64,
    pub y: f64,
}

impl GridPoint {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The cell containing this point (floor of both axes).
    #[inline]
    #[must_use]
    pub fn cell(self) -> CellCoord {
        CellCoord::new(self.x.floor() as i64, self.y.floor() as i64)
    }
}

/// Integer cell coordinate. Signed so that out-of-bounds hits can be
/// represented and rejected explicitly.
///
/// This is also the wire form of a position (`{"x": 3, "y": 7}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i64,
    pub y: i64,
}

impl CellCoord {
    #[inline]
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Continuous grid point at the center of this cell.
    ///
    /// The only integer-to-float conversion for cell coordinates. Exact for
    /// any coordinate with magnitude below 2^53.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn center(self) -> GridPoint {
        GridPoint::new(self.x as f64 + 0.5, self.y as f64 + 0.5)
    }
}

/// Grid dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether the grid has no cells.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The longer of the two dimensions.
    #[inline]
    #[must_use]
    pub fn max_side(&self) -> u32 {
        self.width.max(self.height)
    }

    /// Check if a cell lies inside the grid.
    #[inline]
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && cell.x < i64::from(self.width)
            && cell.y < i64::from(self.height)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(100, 100)
    }
}
