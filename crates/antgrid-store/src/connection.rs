#![forbid(unsafe_code)]

//! Connection state machine.
//!
//! ```text
//!   Disconnected ──▶ Connecting ──▶ Connected
//!        ▲   ▲           │  │           │
//!        │   └───────────┘  ▼           ▼
//!        └──────────────── Error ◀──────┘
//! ```
//!
//! `Connecting` can also fall straight back to `Disconnected`, and both
//! `Disconnected` and `Error` may start a new `Connecting` attempt. Anything
//! else is rejected and leaves the state unchanged.

use core::fmt;

use crate::error::ConnectionError;

/// Transport connection state as reported by the gateway driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl ConnectionState {
    /// Lowercase wire-style name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        }
    }

    /// Whether moving to `next` is allowed. Self-transitions are not.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Disconnected, Self::Connecting)
                | (Self::Error, Self::Connecting)
                | (Self::Connecting, Self::Connected)
                | (Self::Connecting, Self::Error)
                | (Self::Connecting, Self::Disconnected)
                | (Self::Connected, Self::Disconnected)
                | (Self::Connected, Self::Error)
        )
    }

    /// Validate a transition, returning the new state.
    pub fn transition(self, next: Self) -> Result<Self, ConnectionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ConnectionError {
                from: self,
                to: next,
            })
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
