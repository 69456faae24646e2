#![forbid(unsafe_code)]

//! Error types for store operations.
//!
//! Validation failures are caught before anything reaches the gateway and are
//! meant to be shown to the user. Transport failures are wrapped untouched so
//! the caller can route them to the connection flag.

use core::fmt;

use antgrid_core::{CellCoord, Color, GridSize};

use crate::connection::ConnectionState;

/// A rejected intent or input that never left the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The position lies outside the grid.
    OutOfBounds { position: CellCoord, grid: GridSize },
    /// The rule list is empty.
    EmptyRules,
    /// A rule carries a color that is not a hex color string.
    InvalidRuleColor { index: usize, color: Color },
    /// Two rules react to the same cell color.
    DuplicateCurrentColor { index: usize, color: Color },
    /// A rule index passed to the editor does not exist.
    RuleIndexOutOfRange { index: usize, len: usize },
}

impl ValidationError {
    /// Short headline for a user-facing notice.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::OutOfBounds { .. } => "Invalid position",
            Self::EmptyRules => "No rules selected",
            Self::InvalidRuleColor { .. }
            | Self::DuplicateCurrentColor { .. }
            | Self::RuleIndexOutOfRange { .. } => "Invalid rules",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { position, grid } => write!(
                f,
                "position ({}, {}) is outside the {}x{} grid",
                position.x, position.y, grid.width, grid.height
            ),
            Self::EmptyRules => f.write_str("at least one rule is required"),
            Self::InvalidRuleColor { index, color } => {
                write!(f, "rule {} has an invalid color {color:?}", index + 1)
            }
            Self::DuplicateCurrentColor { index, color } => write!(
                f,
                "rule {} repeats the current color {color} of an earlier rule",
                index + 1
            ),
            Self::RuleIndexOutOfRange { index, len } => {
                write!(f, "rule index {index} out of range for {len} rules")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// A rejected configuration change request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigChangeError {
    /// Grid dimensions are frozen while ants exist.
    AntsPresent { count: usize },
    /// Grid size below one cell.
    GridSizeTooSmall { requested: u32 },
    /// Tick interval below the server's floor.
    TickIntervalTooShort { requested: u32, minimum: u32 },
}

impl fmt::Display for ConfigChangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AntsPresent { count } => write!(
                f,
                "cannot change the game configuration while {count} ant(s) are active"
            ),
            Self::GridSizeTooSmall { requested } => {
                write!(f, "grid size {requested} must be at least 1")
            }
            Self::TickIntervalTooShort { requested, minimum } => {
                write!(f, "tick interval {requested}ms is below the {minimum}ms minimum")
            }
        }
    }
}

impl std::error::Error for ConfigChangeError {}

/// Why an intent was not handed to the gateway, or failed in it.
#[derive(Debug)]
pub enum IntentError<E> {
    /// Rejected locally. Nothing was sent.
    Validation(ValidationError),
    /// Configuration request rejected locally. Nothing was sent.
    ConfigChange(ConfigChangeError),
    /// The gateway refused or failed the send.
    Transport(E),
}

impl<E> IntentError<E> {
    /// Whether the intent was stopped before reaching the gateway.
    #[must_use]
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::Transport(_))
    }
}

impl<E> From<ValidationError> for IntentError<E> {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl<E> From<ConfigChangeError> for IntentError<E> {
    fn from(err: ConfigChangeError) -> Self {
        Self::ConfigChange(err)
    }
}

impl<E: fmt::Display> fmt::Display for IntentError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ConfigChange(err) => write!(f, "{err}"),
            Self::Transport(err) => write!(f, "failed to send message to server: {err}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for IntentError<E> {}

/// A connection-state change that the state machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionError {
    pub from: ConnectionState,
    pub to: ConnectionState,
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid connection transition {} -> {}",
            self.from.as_str(),
            self.to.as_str()
        )
    }
}

impl std::error::Error for ConnectionError {}
