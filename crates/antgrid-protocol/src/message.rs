#![forbid(unsafe_code)]

//! Typed message vocabulary in both directions.
//!
//! Outbound messages serialize through serde's adjacently-tagged
//! representation. Inbound decoding is done by hand in [`decode_inbound`] so
//! that an unrecognized `type` surfaces as [`DecodeError::UnknownKind`] (logged
//! and ignored by the caller) instead of a generic parse failure, and so that
//! chunk order inside `cells` payloads is read straight from the source text.

use std::fmt;

use antgrid_core::{Ant, CellCoord, Color, PlayerId, Rule};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::diff::GridDiff;

/// `PLAYER_JOIN` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerJoinPayload {
    pub player_id: PlayerId,
    pub color: Color,
}

/// `PLAYER_LEAVE` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerLeavePayload {
    pub player_id: PlayerId,
    #[serde(default)]
    pub cells: GridDiff,
    #[serde(default)]
    pub ants: Vec<Ant>,
}

/// Inbound `PLACE_ANT` payload: the server's acknowledgement of a placement,
/// broadcast to every client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceAntAckPayload {
    /// Owner of the placed ant, when the server includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    #[serde(default)]
    pub cells: GridDiff,
    #[serde(default)]
    pub ants: Vec<Ant>,
}

/// Inbound `RULE_CHANGE` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleChangeAckPayload {
    pub player_id: PlayerId,
    pub rules: Vec<Rule>,
}

/// Inbound `TILE_FLIP` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileFlipPayload {
    #[serde(default)]
    pub cells: GridDiff,
}

/// `GAME_STATE_SNAPSHOT` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateSnapshotPayload {
    #[serde(default)]
    pub cells: GridDiff,
    /// Full ant list. Absent on cells-only updates, which keep the current ants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ants: Option<Vec<Ant>>,
    /// Grid width, when the server includes its configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Grid height, when the server includes its configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// `ERROR` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub message: String,
}

/// Server → client messages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InboundMessage {
    PlayerJoin(PlayerJoinPayload),
    PlayerLeave(PlayerLeavePayload),
    PlaceAnt(PlaceAntAckPayload),
    RuleChange(RuleChangeAckPayload),
    TileFlip(TileFlipPayload),
    GameStateSnapshot(GameStateSnapshotPayload),
    Error(ErrorPayload),
}

impl InboundMessage {
    /// Wire name of the message kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlayerJoin(_) => "PLAYER_JOIN",
            Self::PlayerLeave(_) => "PLAYER_LEAVE",
            Self::PlaceAnt(_) => "PLACE_ANT",
            Self::RuleChange(_) => "RULE_CHANGE",
            Self::TileFlip(_) => "TILE_FLIP",
            Self::GameStateSnapshot(_) => "GAME_STATE_SNAPSHOT",
            Self::Error(_) => "ERROR",
        }
    }
}

/// Client → server messages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundMessage {
    /// Request to place the local player's ant.
    PlaceAnt { position: CellCoord, rules: Vec<Rule> },
    /// Request to replace the local player's ant rules.
    RuleChange { rules: Vec<Rule> },
    /// Request to flip one tile.
    TileFlip { position: CellCoord },
    /// Request to reconfigure the game. Not part of the diff protocol.
    #[serde(rename_all = "camelCase")]
    UpdateGameConfig { grid_size: u32, tick_interval: u32 },
}

impl OutboundMessage {
    /// Wire name of the message kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlaceAnt { .. } => "PLACE_ANT",
            Self::RuleChange { .. } => "RULE_CHANGE",
            Self::TileFlip { .. } => "TILE_FLIP",
            Self::UpdateGameConfig { .. } => "UPDATE_GAME_CONFIG",
        }
    }

    /// Encode as a JSON text frame.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Why an inbound frame could not be turned into an [`InboundMessage`].
#[derive(Debug)]
pub enum DecodeError {
    /// The frame is not a JSON object with a string `type`.
    Envelope(serde_json::Error),
    /// The `type` is not one this client understands.
    UnknownKind(String),
    /// The payload does not match the shape for its kind.
    Payload {
        kind: &'static str,
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// Whether the frame was well-formed but of a kind this client ignores.
    #[must_use]
    pub fn is_unknown_kind(&self) -> bool {
        matches!(self, Self::UnknownKind(_))
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Envelope(err) => write!(f, "malformed message envelope: {err}"),
            Self::UnknownKind(kind) => write!(f, "unhandled message type: {kind}"),
            Self::Payload { kind, source } => write!(f, "malformed {kind} payload: {source}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Envelope(err) => Some(err),
            Self::Payload { source, .. } => Some(source),
            Self::UnknownKind(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct Envelope<'a> {
    #[serde(rename = "type")]
    kind: String,
    #[serde(borrow, default)]
    payload: Option<&'a RawValue>,
}

fn payload<'a, T: Deserialize<'a>>(
    kind: &'static str,
    raw: Option<&'a RawValue>,
) -> Result<T, DecodeError> {
    let text = raw.map_or("null", RawValue::get);
    serde_json::from_str(text).map_err(|source| DecodeError::Payload { kind, source })
}

/// Decode one inbound text frame.
pub fn decode_inbound(frame: &str) -> Result<InboundMessage, DecodeError> {
    let envelope: Envelope<'_> = serde_json::from_str(frame).map_err(DecodeError::Envelope)?;
    let raw = envelope.payload;
    let message = match envelope.kind.as_str() {
        "PLAYER_JOIN" => InboundMessage::PlayerJoin(payload("PLAYER_JOIN", raw)?),
        "PLAYER_LEAVE" => InboundMessage::PlayerLeave(payload("PLAYER_LEAVE", raw)?),
        "PLACE_ANT" => InboundMessage::PlaceAnt(payload("PLACE_ANT", raw)?),
        "RULE_CHANGE" => InboundMessage::RuleChange(payload("RULE_CHANGE", raw)?),
        "TILE_FLIP" => InboundMessage::TileFlip(payload("TILE_FLIP", raw)?),
        "GAME_STATE_SNAPSHOT" => {
            InboundMessage::GameStateSnapshot(payload("GAME_STATE_SNAPSHOT", raw)?)
        }
        "ERROR" => InboundMessage::Error(payload("ERROR", raw)?),
        _ => return Err(DecodeError::UnknownKind(envelope.kind)),
    };
    Ok(message)
}
