#![forbid(unsafe_code)]

//! The stateful viewport: layout, current transform, and repaint hints.

use antgrid_core::{CanvasSize, CellCoord, GridPoint, GridSize, ScreenPoint};
use web_time::Instant;

use crate::config::ViewportConfig;
use crate::input::Gesture;
use crate::settle::SettleTimer;
use crate::transform::{Projection, ScaleLimits, Transform, centered_on, zoom_about};

/// Owns scale and translation for one canvas showing one grid.
///
/// Every transform change goes through [`apply`](Self::apply), which clamps
/// the scale and bumps [`revision`](Self::revision) when something actually
/// moved.
#[derive(Debug)]
pub struct Viewport {
    pub(crate) config: ViewportConfig,
    projection: Projection,
    limits: ScaleLimits,
    pub(crate) transform: Transform,
    revision: u64,
    pub(crate) full_repaint: bool,
    pub(crate) settle: SettleTimer,
    pub(crate) gesture: Gesture,
    pub(crate) suppress_click: bool,
}

impl Viewport {
    /// A viewport that has not been laid out yet (zero-sized canvas).
    #[must_use]
    pub fn new(grid: GridSize, config: ViewportConfig) -> Self {
        let projection = Projection::new(CanvasSize::default(), grid, &config);
        let limits = projection.scale_limits(&config);
        Self {
            config,
            projection,
            limits,
            transform: Transform::IDENTITY,
            revision: 0,
            full_repaint: false,
            settle: SettleTimer::new(),
            gesture: Gesture::Idle,
            suppress_click: false,
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    #[inline]
    #[must_use]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    #[inline]
    #[must_use]
    pub fn canvas(&self) -> CanvasSize {
        self.projection.canvas()
    }

    #[inline]
    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.projection.grid()
    }

    #[inline]
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.projection.cell_size()
    }

    #[inline]
    #[must_use]
    pub fn limits(&self) -> ScaleLimits {
        self.limits
    }

    /// Bumped on every effective transform or layout change.
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Zoom readout, `round(scale × 100)`.
    #[must_use]
    pub fn zoom_percent(&self) -> u32 {
        (self.transform.scale * 100.0).round().max(0.0) as u32
    }

    /// Whether a gesture is in flight (or just ended) and the cell layer
    /// should be fully repainted instead of patched.
    #[inline]
    #[must_use]
    pub fn needs_full_repaint(&self) -> bool {
        self.full_repaint
    }

    #[must_use]
    pub fn screen_to_grid(&self, p: ScreenPoint) -> GridPoint {
        self.projection.screen_to_grid(p, &self.transform)
    }

    #[must_use]
    pub fn grid_to_screen(&self, g: GridPoint) -> ScreenPoint {
        self.projection.grid_to_screen(g, &self.transform)
    }

    /// The cell under a pixel, in or out of bounds. `None` before layout.
    #[must_use]
    pub fn cell_at(&self, p: ScreenPoint) -> Option<CellCoord> {
        self.projection.cell_at(p, &self.transform)
    }

    /// The in-bounds cell under a pixel.
    #[must_use]
    pub fn hit_test(&self, p: ScreenPoint) -> Option<CellCoord> {
        self.projection.hit_test(p, &self.transform)
    }

    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    /// Apply a container size, clamped up to the configured minimum. Returns
    /// whether the canvas changed.
    pub fn resize(&mut self, observed: CanvasSize) -> bool {
        let canvas = observed.at_least(self.config.min_canvas);
        if canvas == self.projection.canvas() {
            return false;
        }
        tracing::debug!(
            target: "antgrid.viewport",
            width = canvas.width,
            height = canvas.height,
            "canvas resized"
        );
        self.relayout(canvas, self.projection.grid());
        true
    }

    /// Switch to a grid of different dimensions.
    pub fn set_grid(&mut self, grid: GridSize) -> bool {
        if grid == self.projection.grid() {
            return false;
        }
        self.relayout(self.projection.canvas(), grid);
        true
    }

    fn relayout(&mut self, canvas: CanvasSize, grid: GridSize) {
        self.projection = Projection::new(canvas, grid, &self.config);
        self.limits = self.projection.scale_limits(&self.config);
        self.transform.scale = self.limits.clamp(self.transform.scale);
        self.revision += 1;
    }

    // -------------------------------------------------------------------------
    // Transform changes
    // -------------------------------------------------------------------------

    /// Install `next` with its scale clamped. Returns whether it changed.
    pub fn apply(&mut self, next: Transform) -> bool {
        let next = next.with_scale(self.limits.clamp(next.scale));
        if next == self.transform {
            return false;
        }
        self.transform = next;
        self.revision += 1;
        true
    }

    /// Multiply the scale by `1 + delta`, keeping the point under `anchor`
    /// fixed on screen.
    pub fn zoom_at(&mut self, anchor: ScreenPoint, delta: f64) -> bool {
        let scale = self.limits.clamp(self.transform.scale * (1.0 + delta));
        let next = zoom_about(&self.projection, &self.transform, anchor, scale);
        self.apply(next)
    }

    /// Zoom in one step without an anchor.
    pub fn zoom_in(&mut self) -> bool {
        let scale = self.transform.scale * (1.0 + self.config.zoom_step);
        self.apply(self.transform.with_scale(scale))
    }

    /// Zoom out one step without an anchor.
    pub fn zoom_out(&mut self) -> bool {
        let scale = self.transform.scale * (1.0 - self.config.zoom_step);
        self.apply(self.transform.with_scale(scale))
    }

    /// Back to scale 1 with no translation (scale still clamped).
    pub fn center_view(&mut self) -> bool {
        self.apply(Transform::IDENTITY)
    }

    /// Jump so that `target` sits at the canvas center at the focus scale.
    /// No animation: the next transform change simply replaces it.
    pub fn focus_on(&mut self, target: GridPoint) -> bool {
        if self.projection.is_degenerate() {
            tracing::debug!(target: "antgrid.viewport", "focus ignored before layout");
            return false;
        }
        let scale = self.limits.clamp(self.config.focus_scale);
        let next = centered_on(&self.projection, target, scale);
        tracing::debug!(
            target: "antgrid.viewport",
            x = target.x,
            y = target.y,
            scale,
            "focus jump"
        );
        self.gesture = Gesture::Idle;
        self.apply(next)
    }

    /// [`focus_on`](Self::focus_on) the center of a cell.
    pub fn focus_on_cell(&mut self, cell: CellCoord) -> bool {
        self.focus_on(cell.center())
    }

    // -------------------------------------------------------------------------
    // Settle
    // -------------------------------------------------------------------------

    /// Mark a gesture as touching the transform: repaint fully until settled.
    pub(crate) fn begin_heavy_repaint(&mut self) {
        self.full_repaint = true;
    }

    /// Advance the settle timer. Returns `true` on the poll that settles.
    pub fn poll_settle(&mut self, now: Instant) -> bool {
        if !self.settle.poll(now) {
            return false;
        }
        let was_heavy = std::mem::replace(&mut self.full_repaint, false);
        tracing::trace!(target: "antgrid.viewport", was_heavy, "input settled");
        true
    }
}
