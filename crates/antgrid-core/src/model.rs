#![forbid(unsafe_code)]

//! Domain records shared by the store, the wire protocol, and the renderer.
//!
//! Field names serialize in camelCase and enum values in SCREAMING_CASE to
//! match the server's JSON.

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::CellCoord;

/// Server-assigned ant identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AntId(pub String);

/// Server-assigned player identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl From<&str> for AntId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

impl From<&str> for PlayerId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

impl fmt::Display for AntId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Heading of an ant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Screen-space angle in radians (y grows downward).
    #[must_use]
    pub fn angle(self) -> f64 {
        match self {
            Self::Right => 0.0,
            Self::Down => FRAC_PI_2,
            Self::Left => PI,
            Self::Up => -FRAC_PI_2,
        }
    }
}

/// Which way a rule turns the ant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnDirection {
    Left,
    Right,
}

/// One entry of an ant's turning table. Interpreted server-side only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub current_color: Color,
    pub new_color: Color,
    pub turn_direction: TurnDirection,
}

impl Rule {
    #[must_use]
    pub fn new(
        current_color: impl Into<Color>,
        new_color: impl Into<Color>,
        turn_direction: TurnDirection,
    ) -> Self {
        Self {
            current_color: current_color.into(),
            new_color: new_color.into(),
            turn_direction,
        }
    }

    /// The two-rule table a freshly identified player starts with: paint white
    /// cells in the player's color turning left, and restore them turning right.
    #[must_use]
    pub fn default_set(player_color: &Color) -> Vec<Rule> {
        vec![
            Rule::new(Color::white(), player_color.clone(), TurnDirection::Left),
            Rule::new(player_color.clone(), Color::white(), TurnDirection::Right),
        ]
    }
}

/// A live ant as last reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ant {
    pub id: AntId,
    pub position: CellCoord,
    pub direction: Direction,
    pub color: Color,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// A connected player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub color: Color,
    #[serde(default)]
    pub ant_id: Option<AntId>,
}

impl Player {
    /// A player that has not placed an ant yet.
    #[must_use]
    pub fn new(id: impl Into<PlayerId>, color: impl Into<Color>) -> Self {
        Self {
            id: id.into(),
            color: color.into(),
            ant_id: None,
        }
    }
}

impl From<String> for PlayerId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<String> for AntId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}
