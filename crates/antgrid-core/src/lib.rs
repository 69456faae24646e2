#![forbid(unsafe_code)]

//! Core: geometry, canonical cell keys, colors, and the shared domain model.
//!
//! # Role in antgrid
//! `antgrid-core` is the vocabulary crate. Every other crate speaks in the
//! types defined here: screen and grid coordinates, the canonical [`CellKey`],
//! CSS-hex [`Color`]s, and the [`Ant`] / [`Rule`] / [`Player`] records that
//! arrive from the server.
//!
//! # How it fits in the system
//! The protocol crate (`antgrid-protocol`) serializes these types on the wire,
//! the store (`antgrid-store`) owns them, and the viewport and renderer read
//! them. Nothing in this crate performs I/O or keeps mutable global state.

pub mod cell;
pub mod color;
pub mod geometry;
pub mod model;

pub use cell::{CellKey, CellKeyError, CellMap};
pub use color::{Color, ColorError, Rgba};
pub use geometry::{CanvasSize, CellCoord, GridPoint, GridSize, ScreenPoint};
pub use model::{Ant, AntId, Direction, Player, PlayerId, Rule, TurnDirection};
