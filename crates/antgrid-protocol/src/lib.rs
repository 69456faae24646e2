#![forbid(unsafe_code)]

//! Wire protocol for antgrid.
//!
//! Every message on the socket is a JSON object of the form
//! `{"type": "KIND", "payload": {...}}`. This crate owns:
//!
//! - **[`GridDiff`]**: the chunked `chunkKey → (cellKey → color)` cell update
//!   and its order-preserving flattening.
//! - **[`InboundMessage`] / [`OutboundMessage`]**: the typed message
//!   vocabulary in each direction, with [`decode_inbound`] for tolerant
//!   decoding (unknown kinds are reported, not fatal).
//! - **[`Gateway`]**: the boundary trait the transport layer implements, plus
//!   [`MemoryGateway`], a host-driven in-memory implementation for tests and
//!   headless embedding.

pub mod diff;
pub mod gateway;
pub mod message;

pub use diff::GridDiff;
pub use gateway::{Gateway, MemoryGateway, MemoryGatewayError};
pub use message::{
    DecodeError, ErrorPayload, GameStateSnapshotPayload, InboundMessage, OutboundMessage,
    PlaceAntAckPayload, PlayerJoinPayload, PlayerLeavePayload, RuleChangeAckPayload,
    TileFlipPayload, decode_inbound,
};
