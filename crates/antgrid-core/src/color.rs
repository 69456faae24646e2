#![forbid(unsafe_code)]

//! CSS-hex colors.
//!
//! The server is authoritative for colors, so [`Color`] keeps the exact text it
//! was given (the same string is echoed back in rules). Syntax is only checked
//! where the client originates a color, via [`Color::parse`] or
//! [`Color::is_valid`]; rendering decodes lazily with [`Color::rgba`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// A CSS hex color string such as `#FFFFFF` or `#e5e7eb`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

/// Decoded 8-bit RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Why a color string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// Missing leading `#`.
    MissingHash(String),
    /// Wrong number of hex digits (3, 4, 6, or 8 are accepted).
    BadLength(String),
    /// A non-hex character.
    BadDigit(String),
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHash(raw) => write!(f, "color {raw:?} must start with '#'"),
            Self::BadLength(raw) => write!(f, "color {raw:?} must have 3, 4, 6 or 8 hex digits"),
            Self::BadDigit(raw) => write!(f, "color {raw:?} contains a non-hex digit"),
        }
    }
}

impl std::error::Error for ColorError {}

impl Color {
    /// Background color of an untouched cell.
    pub const WHITE: &'static str = "#FFFFFF";

    /// Validate and wrap a color string.
    pub fn parse(raw: &str) -> Result<Self, ColorError> {
        decode(raw)?;
        Ok(Self(raw.to_owned()))
    }

    /// The default background color.
    #[must_use]
    pub fn white() -> Self {
        Self(Self::WHITE.to_owned())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the string is a syntactically valid hex color.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        decode(&self.0).is_ok()
    }

    /// Decode to RGBA, or `None` for malformed strings.
    #[must_use]
    pub fn rgba(&self) -> Option<Rgba> {
        decode(&self.0).ok()
    }

    /// Compare two colors by value, ignoring spelling (`#fff` == `#FFFFFF`).
    #[must_use]
    pub fn same_as(&self, other: &Color) -> bool {
        match (self.rgba(), other.rgba()) {
            (Some(a), Some(b)) => a == b,
            _ => self.0.eq_ignore_ascii_case(&other.0),
        }
    }
}

impl From<&str> for Color {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

impl From<String> for Color {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn decode(raw: &str) -> Result<Rgba, ColorError> {
    let digits = raw
        .strip_prefix('#')
        .ok_or_else(|| ColorError::MissingHash(raw.to_owned()))?;
    let mut values = Vec::with_capacity(8);
    for b in digits.bytes() {
        values.push(nibble(b).ok_or_else(|| ColorError::BadDigit(raw.to_owned()))?);
    }
    let short = |v: u8| v * 17;
    let long = |hi: u8, lo: u8| hi * 16 + lo;
    match values.as_slice() {
        [r, g, b] => Ok(Rgba { r: short(*r), g: short(*g), b: short(*b), a: 255 }),
        [r, g, b, a] => Ok(Rgba { r: short(*r), g: short(*g), b: short(*b), a: short(*a) }),
        [r1, r2, g1, g2, b1, b2] => Ok(Rgba {
            r: long(*r1, *r2),
            g: long(*g1, *g2),
            b: long(*b1, *b2),
            a: 255,
        }),
        [r1, r2, g1, g2, b1, b2, a1, a2] => Ok(Rgba {
            r: long(*r1, *r2),
            g: long(*g1, *g2),
            b: long(*b1, *b2),
            a: long(*a1, *a2),
        }),
        _ => Err(ColorError::BadLength(raw.to_owned())),
    }
}
