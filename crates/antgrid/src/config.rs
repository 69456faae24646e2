#![forbid(unsafe_code)]

//! Client configuration as data.
//!
//! [`ClientConfig`] groups every tunable of the viewport, renderer, and session
//! into one struct that loads from TOML or JSON. Every field defaults to the
//! value the components use on their own, so an empty file is a valid config.
//!
//! ```toml
//! [viewport]
//! zoom_step = 0.2
//! wheel_settle_ms = 200
//!
//! [render]
//! grid_line = "#d1d5db"
//!
//! [session]
//! grid_width = 64
//! grid_height = 64
//! ```
//!
//! ```rust,ignore
//! let config = ClientConfig::from_toml_file("antgrid.toml")?;
//! let config = ClientConfig::from_json_str(json)?;
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use antgrid_core::{CanvasSize, Color, GridSize};
use antgrid_render::RenderConfig;
use antgrid_store::DEFAULT_TICK_INTERVAL_MS;
use antgrid_viewport::ViewportConfig;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level ClientConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub viewport: ViewportSection,
    pub render: RenderSection,
    pub session: SessionSection,
}

impl ClientConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check every value is in range. An empty list means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let v = &self.viewport;

        if v.zoom_step <= 0.0 || v.zoom_step >= 1.0 {
            errors.push(format!("viewport.zoom_step must be in (0, 1), got {}", v.zoom_step));
        }
        if v.pinch_sensitivity <= 0.0 {
            errors.push(format!(
                "viewport.pinch_sensitivity must be > 0, got {}",
                v.pinch_sensitivity
            ));
        }
        if v.tap_threshold < 0.0 {
            errors.push(format!("viewport.tap_threshold must be >= 0, got {}", v.tap_threshold));
        }
        if v.focus_scale <= 0.0 {
            errors.push(format!("viewport.focus_scale must be > 0, got {}", v.focus_scale));
        }
        if v.min_grid_coverage <= 0.0 || v.min_grid_coverage > 1.0 {
            errors.push(format!(
                "viewport.min_grid_coverage must be in (0, 1], got {}",
                v.min_grid_coverage
            ));
        }
        if v.max_scale_divisor <= 0.0 {
            errors.push(format!(
                "viewport.max_scale_divisor must be > 0, got {}",
                v.max_scale_divisor
            ));
        }
        if v.min_cell_size <= 0.0 {
            errors.push(format!("viewport.min_cell_size must be > 0, got {}", v.min_cell_size));
        }
        if v.min_canvas_width <= 0.0 || v.min_canvas_height <= 0.0 {
            errors.push("viewport.min_canvas_width and min_canvas_height must be > 0".into());
        }

        let r = &self.render;
        for (name, color) in [
            ("render.background", &r.background),
            ("render.grid_line", &r.grid_line),
            ("render.ant_outline", &r.ant_outline),
        ] {
            if !Color::from(color.as_str()).is_valid() {
                errors.push(format!("{name} must be a hex color, got {color:?}"));
            }
        }
        if r.line_width < 0.0 {
            errors.push(format!("render.line_width must be >= 0, got {}", r.line_width));
        }

        let s = &self.session;
        if s.grid_width == 0 || s.grid_height == 0 {
            errors.push("session.grid_width and grid_height must be > 0".into());
        }
        if s.tick_interval_ms < antgrid_store::MIN_TICK_INTERVAL_MS {
            errors.push(format!(
                "session.tick_interval_ms must be >= {}, got {}",
                antgrid_store::MIN_TICK_INTERVAL_MS,
                s.tick_interval_ms
            ));
        }

        errors
    }

    /// Parse-then-validate in one step.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Build a [`ViewportConfig`] from this config.
    #[must_use]
    pub fn to_viewport_config(&self) -> ViewportConfig {
        let v = &self.viewport;
        ViewportConfig {
            zoom_step: v.zoom_step,
            pinch_sensitivity: v.pinch_sensitivity,
            tap_threshold: v.tap_threshold,
            wheel_settle: Duration::from_millis(v.wheel_settle_ms),
            touch_settle: Duration::from_millis(v.touch_settle_ms),
            pointer_settle: Duration::from_millis(v.pointer_settle_ms),
            focus_scale: v.focus_scale,
            min_grid_coverage: v.min_grid_coverage,
            max_scale_divisor: v.max_scale_divisor,
            min_cell_size: v.min_cell_size,
            spacing_margin: v.spacing_margin,
            min_canvas: CanvasSize::new(v.min_canvas_width, v.min_canvas_height),
        }
    }

    /// Build a [`RenderConfig`] from this config.
    #[must_use]
    pub fn to_render_config(&self) -> RenderConfig {
        let r = &self.render;
        RenderConfig {
            background: Color::from(r.background.as_str()),
            grid_line: Color::from(r.grid_line.as_str()),
            line_width: r.line_width,
            ant_outline: Color::from(r.ant_outline.as_str()),
            outline_width: r.outline_width,
            heading_width: r.heading_width,
            heading_ratio: r.heading_ratio,
            ant_radius_ratio: r.ant_radius_ratio,
        }
    }

    /// Grid dimensions before the server reports its own.
    #[must_use]
    pub fn grid_size(&self) -> GridSize {
        GridSize::new(self.session.grid_width, self.session.grid_height)
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Viewport tunables. Durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSection {
    pub zoom_step: f64,
    pub pinch_sensitivity: f64,
    pub tap_threshold: f64,
    pub wheel_settle_ms: u64,
    pub touch_settle_ms: u64,
    pub pointer_settle_ms: u64,
    pub focus_scale: f64,
    pub min_grid_coverage: f64,
    pub max_scale_divisor: f64,
    pub min_cell_size: f64,
    pub spacing_margin: f64,
    pub min_canvas_width: f64,
    pub min_canvas_height: f64,
}

impl Default for ViewportSection {
    fn default() -> Self {
        let d = ViewportConfig::default();
        Self {
            zoom_step: d.zoom_step,
            pinch_sensitivity: d.pinch_sensitivity,
            tap_threshold: d.tap_threshold,
            wheel_settle_ms: millis(d.wheel_settle),
            touch_settle_ms: millis(d.touch_settle),
            pointer_settle_ms: millis(d.pointer_settle),
            focus_scale: d.focus_scale,
            min_grid_coverage: d.min_grid_coverage,
            max_scale_divisor: d.max_scale_divisor,
            min_cell_size: d.min_cell_size,
            spacing_margin: d.spacing_margin,
            min_canvas_width: d.min_canvas.width,
            min_canvas_height: d.min_canvas.height,
        }
    }
}

/// Renderer colors and widths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSection {
    pub background: String,
    pub grid_line: String,
    pub line_width: f64,
    pub ant_outline: String,
    pub outline_width: f64,
    pub heading_width: f64,
    pub heading_ratio: f64,
    pub ant_radius_ratio: f64,
}

impl Default for RenderSection {
    fn default() -> Self {
        let d = RenderConfig::default();
        Self {
            background: d.background.as_str().to_owned(),
            grid_line: d.grid_line.as_str().to_owned(),
            line_width: d.line_width,
            ant_outline: d.ant_outline.as_str().to_owned(),
            outline_width: d.outline_width,
            heading_width: d.heading_width,
            heading_ratio: d.heading_ratio,
            ant_radius_ratio: d.ant_radius_ratio,
        }
    }
}

/// Session defaults used until the server says otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub grid_width: u32,
    pub grid_height: u32,
    pub tick_interval_ms: u32,
}

impl Default for SessionSection {
    fn default() -> Self {
        let grid = GridSize::default();
        Self {
            grid_width: grid.width,
            grid_height: grid.height,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Parsed, but out of range.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "invalid config: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
