#![forbid(unsafe_code)]

//! Coordinate spaces and the pure transform math.
//!
//! Three spaces are involved:
//!
//! - **screen**: canvas pixels, origin top-left;
//! - **world**: pixels at scale 1, origin at the canvas center, with the grid
//!   centered on the origin;
//! - **grid**: continuous cell units, origin at the grid's top-left corner.
//!
//! ```text
//! world = (screen − canvas/2) / scale − translate
//! grid  = (world − origin) / cellSize        origin = −(gridSize·cellSize)/2
//! ```
//!
//! The render stack applies the same chain in reverse: translate to the canvas
//! center, scale, then translate by the viewport offset. Every function here
//! is pure so it can be tested without a surface.

use antgrid_core::{CanvasSize, CellCoord, GridPoint, GridSize, ScreenPoint};

use crate::config::ViewportConfig;

/// Pan and zoom state. Translation is in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Transform {
    /// Scale 1, no translation.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0);

    #[inline]
    #[must_use]
    pub const fn new(scale: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    /// Same translation, different scale.
    #[inline]
    #[must_use]
    pub const fn with_scale(self, scale: f64) -> Self {
        Self { scale, ..self }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Allowed scale range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleLimits {
    pub min: f64,
    pub max: f64,
}

impl ScaleLimits {
    /// Limits that pin the scale to 1, used while the layout is degenerate.
    pub const FIXED: Self = Self { min: 1.0, max: 1.0 };

    /// Clamp `scale` into `[min, max]`.
    #[inline]
    #[must_use]
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.max(self.min).min(self.max)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, scale: f64) -> bool {
        scale >= self.min && scale <= self.max
    }
}

/// Layout of the grid inside a canvas at scale 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    canvas: CanvasSize,
    grid: GridSize,
    cell_size: f64,
}

impl Projection {
    /// Compute the cell size for `grid` inside `canvas`:
    /// `max(min_cell, (min(w, h) − margin) / max(gw, gh))`, or 0 when either
    /// the canvas or the grid is empty.
    #[must_use]
    pub fn new(canvas: CanvasSize, grid: GridSize, config: &ViewportConfig) -> Self {
        let cell_size = if canvas.is_empty() || grid.is_empty() {
            0.0
        } else {
            let available = canvas.min_side() - config.spacing_margin;
            (available / f64::from(grid.max_side())).max(config.min_cell_size)
        };
        Self {
            canvas,
            grid,
            cell_size,
        }
    }

    #[inline]
    #[must_use]
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    #[inline]
    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Cell edge in world pixels.
    #[inline]
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Whether nothing can be drawn or hit.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.cell_size <= 0.0
    }

    /// Grid width and height in world pixels.
    #[must_use]
    pub fn grid_extent(&self) -> (f64, f64) {
        (
            f64::from(self.grid.width) * self.cell_size,
            f64::from(self.grid.height) * self.cell_size,
        )
    }

    /// World position of the grid's top-left corner.
    #[must_use]
    pub fn origin(&self) -> (f64, f64) {
        let (w, h) = self.grid_extent();
        (-w / 2.0, -h / 2.0)
    }

    /// Scale range for this layout.
    ///
    /// At minimum zoom the whole grid still covers `min_grid_coverage` of the
    /// shorter-fitting canvas side. The maximum is `max_side / divisor`, never
    /// below the minimum.
    #[must_use]
    pub fn scale_limits(&self, config: &ViewportConfig) -> ScaleLimits {
        if self.is_degenerate() {
            return ScaleLimits::FIXED;
        }
        let (w, h) = self.grid_extent();
        let min = (self.canvas.width * config.min_grid_coverage / w)
            .min(self.canvas.height * config.min_grid_coverage / h);
        let max = (f64::from(self.grid.max_side()) / config.max_scale_divisor).max(min);
        ScaleLimits { min, max }
    }

    /// Screen pixel to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, p: ScreenPoint, t: &Transform) -> (f64, f64) {
        let c = self.canvas.center();
        (
            (p.x - c.x) / t.scale - t.translate_x,
            (p.y - c.y) / t.scale - t.translate_y,
        )
    }

    /// World coordinates to screen pixel.
    #[must_use]
    pub fn world_to_screen(&self, x: f64, y: f64, t: &Transform) -> ScreenPoint {
        let c = self.canvas.center();
        ScreenPoint::new(
            (x + t.translate_x) * t.scale + c.x,
            (y + t.translate_y) * t.scale + c.y,
        )
    }

    /// Screen pixel to continuous grid coordinates. Non-finite when the
    /// layout is degenerate.
    #[must_use]
    pub fn screen_to_grid(&self, p: ScreenPoint, t: &Transform) -> GridPoint {
        let (wx, wy) = self.screen_to_world(p, t);
        let (ox, oy) = self.origin();
        GridPoint::new((wx - ox) / self.cell_size, (wy - oy) / self.cell_size)
    }

    /// Exact inverse of [`screen_to_grid`](Self::screen_to_grid).
    #[must_use]
    pub fn grid_to_screen(&self, g: GridPoint, t: &Transform) -> ScreenPoint {
        let (ox, oy) = self.origin();
        self.world_to_screen(g.x * self.cell_size + ox, g.y * self.cell_size + oy, t)
    }

    /// The cell under a screen pixel, possibly outside the grid.
    #[must_use]
    pub fn cell_at(&self, p: ScreenPoint, t: &Transform) -> Option<CellCoord> {
        if self.is_degenerate() {
            return None;
        }
        Some(self.screen_to_grid(p, t).cell())
    }

    /// The in-bounds cell under a screen pixel.
    #[must_use]
    pub fn hit_test(&self, p: ScreenPoint, t: &Transform) -> Option<CellCoord> {
        self.cell_at(p, t).filter(|cell| self.grid.contains(*cell))
    }
}

/// Change scale to `new_scale` while keeping the world point under `anchor`
/// on the same pixel.
#[must_use]
pub fn zoom_about(
    projection: &Projection,
    t: &Transform,
    anchor: ScreenPoint,
    new_scale: f64,
) -> Transform {
    let (wx, wy) = projection.screen_to_world(anchor, t);
    let c = projection.canvas().center();
    Transform::new(
        new_scale,
        (anchor.x - c.x) / new_scale - wx,
        (anchor.y - c.y) / new_scale - wy,
    )
}

/// Transform that centers grid point `target` at `scale`.
#[must_use]
pub fn centered_on(projection: &Projection, target: GridPoint, scale: f64) -> Transform {
    let (ox, oy) = projection.origin();
    let cs = projection.cell_size();
    Transform::new(scale, -(ox + target.x * cs), -(oy + target.y * cs))
}
