#![forbid(unsafe_code)]

//! Client error model and recovery mapping.
//!
//! # Design Principles
//!
//! 1. **Nothing is fatal**: every error maps to a [`Recovery`] that keeps the
//!    session alive. [`Error::is_fatal`] exists for hosts that want to assert
//!    it.
//! 2. **Domain errors stay typed**: each crate's error is wrapped, not
//!    stringified, so callers can still match on it.
//! 3. **The client applies the recovery itself**: by the time an entry point
//!    returns an `Err`, the notice is queued or the connection flag is set.
//!    The returned value is for the host's own logging.

use std::fmt;

use antgrid_core::PlayerId;
use antgrid_protocol::DecodeError;
use antgrid_render::SurfaceError;
use antgrid_store::{ConfigChangeError, ConnectionError, ValidationError};

use crate::notice::Notice;

/// Which intent a validation failure belongs to. Picks the notice title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    PlaceAnt,
    FlipTile,
    ChangeRules,
    ConfigChange,
}

/// Top-level client error.
#[derive(Debug)]
pub enum Error {
    /// An intent failed local validation; nothing was sent.
    Rejected {
        intent: Intent,
        source: ValidationError,
    },
    /// A configuration change request was refused locally.
    ConfigChange(ConfigChangeError),
    /// A click or tap landed outside the grid.
    OutsideGrid { touch: bool },
    /// The server sent an `ERROR` message.
    Server(String),
    /// An inbound frame could not be decoded.
    Decode(DecodeError),
    /// A rule change named a player with no known ant.
    UnknownEntity { player_id: PlayerId },
    /// The connection state machine refused a transition.
    Connection(ConnectionError),
    /// The gateway failed to connect or send.
    Transport(String),
    /// A frame could not be drawn.
    Surface(SurfaceError),
}

/// Standard result type for client APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// What the client does with an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Queue a notice for the user.
    NotifyUser,
    /// Log and discard the offending message.
    LogAndDrop,
    /// Mark the connection as errored; the gateway owns reconnecting.
    FlagConnection,
    /// Skip this frame; the next one repaints fully.
    SkipFrame,
}

impl Error {
    #[must_use]
    pub fn recovery(&self) -> Recovery {
        match self {
            Self::Rejected { .. }
            | Self::ConfigChange(_)
            | Self::OutsideGrid { .. }
            | Self::Server(_) => Recovery::NotifyUser,
            Self::Decode(_) | Self::UnknownEntity { .. } | Self::Connection(_) => {
                Recovery::LogAndDrop
            }
            Self::Transport(_) => Recovery::FlagConnection,
            Self::Surface(_) => Recovery::SkipFrame,
        }
    }

    /// Error type label for tracing fields.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => "validation",
            Self::ConfigChange(_) => "config_change",
            Self::OutsideGrid { .. } => "outside_grid",
            Self::Server(_) => "server",
            Self::Decode(_) => "decode",
            Self::UnknownEntity { .. } => "unknown_entity",
            Self::Connection(_) => "connection",
            Self::Transport(_) => "transport",
            Self::Surface(_) => "surface",
        }
    }

    /// Always `false`: every client error is absorbed.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        false
    }

    /// The notice shown for [`Recovery::NotifyUser`] errors.
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        let notice = match self {
            Self::Rejected { intent, source } => {
                let title = match (intent, source) {
                    (Intent::PlaceAnt, ValidationError::EmptyRules) => {
                        return Some(Notice::error(
                            "No rules selected",
                            "Please select rules before placing an ant",
                        ));
                    }
                    (Intent::PlaceAnt, _) => "Invalid ant placement",
                    (Intent::ChangeRules, _) => "Invalid rules",
                    (Intent::FlipTile, _) => "Invalid tile position",
                    (Intent::ConfigChange, _) => "Configuration not changed",
                };
                Notice::error(title, source.to_string())
            }
            Self::ConfigChange(err) => Notice::error("Configuration not changed", err.to_string()),
            Self::OutsideGrid { touch } => Notice::outside_grid(*touch),
            Self::Server(message) => Notice::error("An error occurred", message.clone()),
            _ => return None,
        };
        Some(notice)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PlaceAnt => "place ant",
            Self::FlipTile => "flip tile",
            Self::ChangeRules => "change rules",
            Self::ConfigChange => "change configuration",
        })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { intent, source } => write!(f, "{intent} rejected: {source}"),
            Self::ConfigChange(err) => write!(f, "{err}"),
            Self::OutsideGrid { .. } => f.write_str("position is outside the grid boundaries"),
            Self::Server(message) => write!(f, "server error: {message}"),
            Self::Decode(err) => write!(f, "{err}"),
            Self::UnknownEntity { player_id } => {
                write!(f, "no known ant for player {player_id}")
            }
            Self::Connection(err) => write!(f, "{err}"),
            Self::Transport(message) => write!(f, "transport: {message}"),
            Self::Surface(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rejected { source, .. } => Some(source),
            Self::ConfigChange(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Connection(err) => Some(err),
            Self::Surface(err) => Some(err),
            Self::OutsideGrid { .. }
            | Self::Server(_)
            | Self::UnknownEntity { .. }
            | Self::Transport(_) => None,
        }
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err)
    }
}

impl From<ConnectionError> for Error {
    fn from(err: ConnectionError) -> Self {
        Self::Connection(err)
    }
}

impl From<SurfaceError> for Error {
    fn from(err: SurfaceError) -> Self {
        Self::Surface(err)
    }
}

impl From<ConfigChangeError> for Error {
    fn from(err: ConfigChangeError) -> Self {
        Self::ConfigChange(err)
    }
}

#[cfg(test)]
mod tests {
    use antgrid_core::{CellCoord, GridSize};
    use antgrid_store::ConnectionState;

    use super::*;
    use crate::notice::Severity;

    #[test]
    fn nothing_is_fatal() {
        let errors = [
            Error::Server("boom".into()),
            Error::Transport("closed".into()),
            Error::Surface(SurfaceError::ZeroSized { width: 0.0, height: 0.0 }),
            Error::Connection(ConnectionError {
                from: ConnectionState::Disconnected,
                to: ConnectionState::Connected,
            }),
        ];
        assert!(errors.iter().all(|e| !e.is_fatal()));
    }

    #[test]
    fn recovery_mapping() {
        assert_eq!(Error::Server("x".into()).recovery(), Recovery::NotifyUser);
        assert_eq!(
            Error::UnknownEntity { player_id: PlayerId::from("p") }.recovery(),
            Recovery::LogAndDrop
        );
        assert_eq!(Error::Transport("x".into()).recovery(), Recovery::FlagConnection);
        assert_eq!(
            Error::Surface(SurfaceError::Unavailable("gone".into())).recovery(),
            Recovery::SkipFrame
        );
    }

    #[test]
    fn placement_notices() {
        let empty = Error::Rejected {
            intent: Intent::PlaceAnt,
            source: ValidationError::EmptyRules,
        };
        assert_eq!(empty.notice().map(|n| n.title), Some("No rules selected".into()));

        let out = Error::Rejected {
            intent: Intent::PlaceAnt,
            source: ValidationError::OutOfBounds {
                position: CellCoord::new(-1, 5),
                grid: GridSize::new(50, 50),
            },
        };
        let notice = out.notice().expect("notice");
        assert_eq!(notice.title, "Invalid ant placement");
        assert_eq!(notice.description, "position (-1, 5) is outside the 50x50 grid");
        assert_eq!(notice.severity, Severity::Error);
    }

    #[test]
    fn rule_and_config_rejections_are_titled_apart() {
        let rules = Error::Rejected {
            intent: Intent::ChangeRules,
            source: ValidationError::EmptyRules,
        };
        let config = Error::Rejected {
            intent: Intent::ConfigChange,
            source: ValidationError::EmptyRules,
        };
        assert_eq!(rules.notice().map(|n| n.title), Some("Invalid rules".into()));
        assert_eq!(
            config.notice().map(|n| n.title),
            Some("Configuration not changed".into())
        );
        assert!(config.to_string().starts_with("change configuration rejected"));
    }

    #[test]
    fn log_only_errors_have_no_notice() {
        assert!(Error::Transport("x".into()).notice().is_none());
        assert!(Error::UnknownEntity { player_id: PlayerId::from("p") }.notice().is_none());
    }
}
