#![forbid(unsafe_code)]

//! The transport boundary.
//!
//! The client never owns a socket. It hands typed [`OutboundMessage`]s to a
//! [`Gateway`] and is fed decoded inbound frames plus connection-state
//! changes by whoever drives the transport (a WebSocket task, a test, a
//! replay harness).
//!
//! # How it fits
//!
//! ```text
//! transport ──frames──▶ decode_inbound ──▶ client dispatch ──▶ store
//!     ▲                                                         │
//!     └──────────── Gateway::send(OutboundMessage) ◀── intents ─┘
//! ```

use core::fmt;

use crate::message::OutboundMessage;

/// Outbound half of the transport.
pub trait Gateway {
    /// Transport-specific error type.
    type Error: fmt::Debug + fmt::Display;

    /// Open the connection. Completion is reported asynchronously by the
    /// transport driver as a connection-state change.
    fn connect(&mut self) -> Result<(), Self::Error>;

    /// Close the connection. Idempotent.
    fn disconnect(&mut self);

    /// Whether outbound messages can currently be delivered.
    fn is_open(&self) -> bool;

    /// Serialize and send one message.
    fn send(&mut self, message: &OutboundMessage) -> Result<(), Self::Error>;
}

/// Errors from [`MemoryGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryGatewayError {
    /// `send` was called while the gateway was closed.
    NotConnected,
    /// The host asked the gateway to fail the next operation.
    Injected(String),
}

impl fmt::Display for MemoryGatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => f.write_str("gateway is not connected"),
            Self::Injected(msg) => write!(f, "injected failure: {msg}"),
        }
    }
}

impl std::error::Error for MemoryGatewayError {}

/// Host-driven in-memory gateway.
///
/// Records every sent message, both typed and as encoded JSON text, so tests
/// can assert on exactly what would have gone over the wire.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    open: bool,
    connect_calls: u32,
    sent: Vec<OutboundMessage>,
    frames: Vec<String>,
    fail_next: Option<String>,
}

impl MemoryGateway {
    /// A closed gateway with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway that is already open.
    #[must_use]
    pub fn connected() -> Self {
        Self {
            open: true,
            ..Self::default()
        }
    }

    /// Make the next `connect` or `send` fail with `reason`.
    pub fn fail_next(&mut self, reason: impl Into<String>) {
        self.fail_next = Some(reason.into());
    }

    /// Typed messages sent so far.
    #[must_use]
    pub fn sent(&self) -> &[OutboundMessage] {
        &self.sent
    }

    /// Encoded text frames sent so far.
    #[must_use]
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    /// Take and clear the sent history.
    pub fn take_sent(&mut self) -> Vec<OutboundMessage> {
        self.frames.clear();
        std::mem::take(&mut self.sent)
    }

    /// How many times `connect` succeeded.
    #[must_use]
    pub fn connect_calls(&self) -> u32 {
        self.connect_calls
    }
}

impl Gateway for MemoryGateway {
    type Error = MemoryGatewayError;

    fn connect(&mut self) -> Result<(), Self::Error> {
        if let Some(reason) = self.fail_next.take() {
            return Err(MemoryGatewayError::Injected(reason));
        }
        self.open = true;
        self.connect_calls += 1;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn send(&mut self, message: &OutboundMessage) -> Result<(), Self::Error> {
        if let Some(reason) = self.fail_next.take() {
            return Err(MemoryGatewayError::Injected(reason));
        }
        if !self.open {
            return Err(MemoryGatewayError::NotConnected);
        }
        let frame = message
            .encode()
            .map_err(|err| MemoryGatewayError::Injected(err.to_string()))?;
        self.frames.push(frame);
        self.sent.push(message.clone());
        Ok(())
    }
}
