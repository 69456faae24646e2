#![forbid(unsafe_code)]

//! Layered incremental renderer for antgrid.
//!
//! # Role in antgrid
//! `antgrid-render` draws the store's state through the viewport onto three
//! stacked surfaces: grid lines, committed cells, and ants.
//!
//! # Primary responsibilities
//! - **Surface boundary**: the [`Surface`] trait and the [`Affine`] world to
//!   pixel map shared by all layers.
//! - **Repaint policy**: [`LayeredRenderer`] decides per frame whether the
//!   cell layer needs a full repaint or only the latest diff's keys.
//! - **Scheduling**: [`FrameLoop`] gates host animation callbacks with
//!   `start`/`stop`.
//! - **Headless testing**: [`RecordingSurface`] logs draw calls in pixel space.
//!
//! # How it fits
//! The facade owns a `LayeredRenderer` over the host's surfaces and calls
//! [`LayeredRenderer::frame`] on every accepted tick. A [`SurfaceError`] means
//! the frame is skipped; the next one repaints everything.

pub mod config;
pub mod frame_loop;
pub mod recording;
pub mod renderer;
pub mod surface;

pub use config::RenderConfig;
pub use frame_loop::{FrameLoop, FrameTick};
pub use recording::{DrawOp, RecordingSurface};
pub use renderer::{CellRepaint, FrameReport, LayerSet, LayeredRenderer, cell_rect, grid_lines};
pub use surface::{Affine, Layers, Point, Rect, Segment, Stroke, Surface, SurfaceError};
