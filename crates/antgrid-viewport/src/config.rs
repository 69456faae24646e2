#![forbid(unsafe_code)]

//! Tunables for the viewport.

use std::time::Duration;

use antgrid_core::CanvasSize;

/// Thresholds, timeouts, and layout constants for the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportConfig {
    /// Relative scale change per wheel notch or zoom button (default: 0.1).
    pub zoom_step: f64,
    /// Damping applied to the pinch distance ratio (default: 0.5).
    pub pinch_sensitivity: f64,
    /// Per-axis pixel movement before a touch becomes a pan (default: 10).
    pub tap_threshold: f64,
    /// Quiet time after the last wheel event before settling (default: 150ms).
    pub wheel_settle: Duration,
    /// Quiet time after the last touch ends before settling (default: 100ms).
    pub touch_settle: Duration,
    /// Quiet time after a mouse drag ends before settling (default: 100ms).
    pub pointer_settle: Duration,
    /// Scale used by focus jumps, before clamping (default: 3).
    pub focus_scale: f64,
    /// Fraction of the canvas the whole grid must still cover at minimum
    /// zoom (default: 0.5).
    pub min_grid_coverage: f64,
    /// Maximum scale is the longer grid side divided by this (default: 10).
    pub max_scale_divisor: f64,
    /// Smallest cell edge in pixels at scale 1 (default: 5).
    pub min_cell_size: f64,
    /// Pixels reserved around the grid when sizing cells (default: 100).
    pub spacing_margin: f64,
    /// Canvas sizes below this are clamped up on resize (default: 400x300).
    pub min_canvas: CanvasSize,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            zoom_step: 0.1,
            pinch_sensitivity: 0.5,
            tap_threshold: 10.0,
            wheel_settle: Duration::from_millis(150),
            touch_settle: Duration::from_millis(100),
            pointer_settle: Duration::from_millis(100),
            focus_scale: 3.0,
            min_grid_coverage: 0.5,
            max_scale_divisor: 10.0,
            min_cell_size: 5.0,
            spacing_margin: 100.0,
            min_canvas: CanvasSize::new(400.0, 300.0),
        }
    }
}
