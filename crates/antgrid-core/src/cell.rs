#![forbid(unsafe_code)]

//! Canonical cell keys and the sparse cell map.
//!
//! On the wire a cell is addressed by the string `"x,y"` with non-negative
//! decimal integers. Internally the key is kept as a pair of `u32`s so that
//! two spellings of the same coordinate (`"07,3"` and `"7,3"`) can never
//! occupy two map slots; re-encoding always produces the canonical form.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::color::Color;
use crate::geometry::CellCoord;

/// Sparse mapping from cell to color. Absent keys render as background.
pub type CellMap = HashMap<CellKey, Color, ahash::RandomState>;

/// Canonical key of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub x: u32,
    pub y: u32,
}

impl CellKey {
    #[inline]
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// The key as a signed cell coordinate.
    #[inline]
    #[must_use]
    pub fn coord(self) -> CellCoord {
        CellCoord::new(i64::from(self.x), i64::from(self.y))
    }

    /// Key for a coordinate, or `None` if either axis is negative or too large.
    #[must_use]
    pub fn from_coord(coord: CellCoord) -> Option<Self> {
        let x = u32::try_from(coord.x).ok()?;
        let y = u32::try_from(coord.y).ok()?;
        Some(Self::new(x, y))
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Why a cell key string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellKeyError {
    /// No `,` separator.
    MissingSeparator(String),
    /// An axis was empty, signed, or contained non-digit characters.
    InvalidAxis(String),
    /// An axis does not fit in `u32`.
    OutOfRange(String),
}

impl fmt::Display for CellKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator(raw) => write!(f, "cell key {raw:?} has no ',' separator"),
            Self::InvalidAxis(raw) => write!(f, "cell key {raw:?} has a non-numeric axis"),
            Self::OutOfRange(raw) => write!(f, "cell key {raw:?} is out of range"),
        }
    }
}

impl std::error::Error for CellKeyError {}

fn parse_axis(axis: &str, raw: &str) -> Result<u32, CellKeyError> {
    if axis.is_empty() || !axis.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CellKeyError::InvalidAxis(raw.to_owned()));
    }
    axis.parse::<u32>()
        .map_err(|_| CellKeyError::OutOfRange(raw.to_owned()))
}

impl FromStr for CellKey {
    type Err = CellKeyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (x, y) = raw
            .split_once(',')
            .ok_or_else(|| CellKeyError::MissingSeparator(raw.to_owned()))?;
        Ok(Self::new(parse_axis(x, raw)?, parse_axis(y, raw)?))
    }
}

impl Serialize for CellKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct CellKeyVisitor;

impl Visitor<'_> for CellKeyVisitor {
    type Value = CellKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a cell key of the form \"x,y\"")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<CellKey, E> {
        value.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for CellKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(CellKeyVisitor)
    }
}
