#![forbid(unsafe_code)]

//! Viewport transform engine for antgrid.
//!
//! # Role in antgrid
//! `antgrid-viewport` maps between canvas pixels and grid cells and owns the
//! pan/zoom state. It turns raw mouse, wheel, and touch events into
//! transform changes and tells the renderer when a gesture is in flight.
//!
//! # Primary responsibilities
//! - **Projection**: cell sizing, scale limits, and the screen/world/grid
//!   conversions ([`Projection`]).
//! - **Gestures**: anchored wheel zoom, mouse and one-finger pan, two-finger
//!   pinch, and tap detection ([`Viewport::handle`]).
//! - **Focus**: jump to a grid point at a fixed scale.
//! - **Settle**: a host-polled timer that ends full-repaint mode once input
//!   goes quiet.
//!
//! # How it fits
//! The facade owns one [`Viewport`], forwards host input to it, routes taps to
//! the store's intents, and hands the viewport to the renderer each frame.

pub mod config;
pub mod input;
pub mod settle;
pub mod transform;
pub mod viewport;

pub use config::ViewportConfig;
pub use input::{InputEvent, InputOutcome, Touches};
pub use settle::SettleTimer;
pub use transform::{Projection, ScaleLimits, Transform, centered_on, zoom_about};
pub use viewport::Viewport;
