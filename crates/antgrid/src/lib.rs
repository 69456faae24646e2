#![forbid(unsafe_code)]

//! antgrid public facade crate.
//!
//! Wires the store, viewport, renderer, and gateway into one [`Client`] and
//! carries the ambient pieces a host needs around it: file-based
//! configuration, a tracing subscriber, the top-level [`Error`] with its
//! recovery policy, and the notice queue behind the toast area.
//!
//! ```rust,ignore
//! use antgrid::prelude::*;
//!
//! antgrid::logging::init(LogFormat::Compact)?;
//! let config = ClientConfig::from_toml_file("antgrid.toml")?.validated()?;
//! let mut client = Client::headless(&config, MemoryGateway::new());
//! client.connect()?;
//! client.resize(CanvasSize::new(800.0, 600.0));
//! client.start();
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod interaction;
pub mod logging;
pub mod notice;

// --- Facade types ----------------------------------------------------------

pub use client::Client;
pub use config::{ClientConfig, ConfigError, RenderSection, SessionSection, ViewportSection};
pub use error::{Error, Intent, Recovery, Result};
pub use interaction::{InteractionMode, UiState};
pub use logging::{LogFormat, LoggingError};
pub use notice::{Notice, NoticeQueue, Severity};

// --- Component re-exports --------------------------------------------------

pub use antgrid_core::{
    Ant, AntId, CanvasSize, CellCoord, CellMap, Color, Direction, Player, PlayerId, Rule,
    ScreenPoint, TurnDirection,
};
pub use antgrid_protocol::{Gateway, InboundMessage, MemoryGateway, OutboundMessage};
pub use antgrid_render::{FrameReport, LayerSet, RecordingSurface, Surface, SurfaceError};
pub use antgrid_store::{AntListing, ConnectionState, GameStore};
pub use antgrid_viewport::{InputEvent, InputOutcome, Viewport};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AntId, CanvasSize, CellCoord, Client, ClientConfig, ConnectionState, Error, FrameReport,
        Gateway, InputEvent, InteractionMode, LogFormat, MemoryGateway, Notice, Recovery, Result,
        Rule, ScreenPoint, TurnDirection,
    };

    pub use crate::{core, protocol, render, store, viewport};
}

pub use antgrid_core as core;
pub use antgrid_protocol as protocol;
pub use antgrid_render as render;
pub use antgrid_store as store;
pub use antgrid_viewport as viewport;
