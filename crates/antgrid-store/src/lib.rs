#![forbid(unsafe_code)]

//! Diff synchronization store for antgrid.
//!
//! # Role in antgrid
//! `antgrid-store` owns the client's copy of the game: grid cells, ants,
//! players, the local player's identity and selected rules, and the
//! connection state. It is the only component that mutates that state.
//!
//! # Primary responsibilities
//! - **Merging**: chunked diffs are flattened and merged last-write-wins; the
//!   most recent diff is published as the new-cells view for incremental
//!   repaint.
//! - **Snapshots and baselines**: wholesale resync on (re)connect and a
//!   one-shot historical baseline merged beneath live cells.
//! - **Membership**: idempotent joins, leave cleanup, placement and rule
//!   acknowledgements, and the first-join local-player heuristic.
//! - **Intents**: placement, tile flips, rule changes, and configuration
//!   requests are validated before they are handed to a
//!   [`Gateway`](antgrid_protocol::Gateway).
//!
//! # How it fits
//! The facade feeds decoded messages into the `apply_*` methods, reads the
//! store when rendering, and calls the intent methods on user input. The
//! store never talks to the network on its own.

pub mod connection;
pub mod error;
pub mod inbound;
pub mod intents;
pub mod store;
pub mod validation;

pub use connection::ConnectionState;
pub use error::{ConfigChangeError, ConnectionError, IntentError, ValidationError};
pub use inbound::{GameStateOutcome, JoinOutcome, PlacedAnt, PlacementOutcome, RuleChangeOutcome};
pub use store::{AntListing, DEFAULT_TICK_INTERVAL_MS, GameStore, PlayerMap, Snapshot};
pub use validation::{
    MIN_TICK_INTERVAL_MS, validate_config_change, validate_position, validate_rules,
};
