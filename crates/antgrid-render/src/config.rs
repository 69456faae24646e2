#![forbid(unsafe_code)]

//! Colors and stroke widths for the three layers.

use antgrid_core::Color;

/// Drawing constants. Geometry (cell size, transform) comes from the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Grid-layer background fill (default: `#ffffff`).
    pub background: Color,
    /// Grid line color (default: `#e5e7eb`).
    pub grid_line: Color,
    /// Grid line width; cells are inset by this on every side (default: 1).
    pub line_width: f64,
    /// Ant outline color (default: `#000000`).
    pub ant_outline: Color,
    /// Ant outline width (default: 1).
    pub outline_width: f64,
    /// Heading stroke width (default: 2).
    pub heading_width: f64,
    /// Heading stroke length as a fraction of the ant radius (default: 0.6).
    pub heading_ratio: f64,
    /// Ant radius as a fraction of the cell size (default: 0.25).
    pub ant_radius_ratio: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: Color::from("#ffffff"),
            grid_line: Color::from("#e5e7eb"),
            line_width: 1.0,
            ant_outline: Color::from("#000000"),
            outline_width: 1.0,
            heading_width: 2.0,
            heading_ratio: 0.6,
            ant_radius_ratio: 0.25,
        }
    }
}
