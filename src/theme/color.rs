//! RGB colors as they appear in theme records and generated CSS
//!
//! A color remembers how it was written. Records and stylesheets echo that
//! notation unchanged; the channels are only used for comparisons.

use std::fmt::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Color parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("color must start with '#': {0}")]
    MissingHash(String),

    #[error("color must have 3 or 6 hex digits: {0}")]
    BadLength(String),

    #[error("invalid hex digit in color: {0}")]
    BadDigit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Notation {
    /// `#` followed by 3 or 6 hex digits, case as written
    Hex { digits: [u8; 6], len: u8 },
    /// `{"r": .., "g": .., "b": ..}`
    Channels,
}

/// An opaque sRGB color
///
/// Equality includes the notation, so `#fff` and `#FFFFFF` differ; use
/// [`Color::channels`] to compare the color itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    notation: Notation,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    /// A color written as uppercase `#RRGGBB`
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        let digits = [
            HEX_DIGITS[(r >> 4) as usize],
            HEX_DIGITS[(r & 0xF) as usize],
            HEX_DIGITS[(g >> 4) as usize],
            HEX_DIGITS[(g & 0xF) as usize],
            HEX_DIGITS[(b >> 4) as usize],
            HEX_DIGITS[(b & 0xF) as usize],
        ];
        Self {
            r,
            g,
            b,
            notation: Notation::Hex { digits, len: 6 },
        }
    }

    /// A color written as separate channels
    pub const fn from_channels(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
            notation: Notation::Channels,
        }
    }

    pub fn channels(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// Renders the notation the color was written in; channel colors render
/// as CSS `rgb()`.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.notation {
            Notation::Hex { digits, len } => {
                f.write_char('#')?;
                for &d in &digits[..usize::from(len)] {
                    f.write_char(char::from(d))?;
                }
                Ok(())
            }
            Notation::Channels => write!(f, "rgb({}, {}, {})", self.r, self.g, self.b),
        }
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(s.to_string()))?;

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::BadDigit(s.to_string()));
        }

        let parse = |hex: &str| {
            u8::from_str_radix(hex, 16).map_err(|_| ColorError::BadDigit(s.to_string()))
        };

        let (r, g, b) = match digits.len() {
            6 => (
                parse(&digits[0..2])?,
                parse(&digits[2..4])?,
                parse(&digits[4..6])?,
            ),
            3 => {
                // #abc is shorthand for #aabbcc
                let expand = |i: usize| parse(&digits[i..i + 1]).map(|v| v * 0x11);
                (expand(0)?, expand(1)?, expand(2)?)
            }
            _ => return Err(ColorError::BadLength(s.to_string())),
        };

        // ascii-only past the check above, so bytes == chars
        let mut written = [0u8; 6];
        written[..digits.len()].copy_from_slice(digits.as_bytes());
        Ok(Self {
            r,
            g,
            b,
            notation: Notation::Hex {
                digits: written,
                len: digits.len() as u8,
            },
        })
    }
}

/// Accepted shapes: "#RRGGBB" / "#RGB" or {"r":..,"g":..,"b":..}
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(String),
    Rgb { r: u8, g: u8, b: u8 },
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.notation {
            Notation::Hex { .. } => serializer.collect_str(self),
            Notation::Channels => ColorRepr::Rgb {
                r: self.r,
                g: self.g,
                b: self.b,
            }
            .serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ColorRepr::deserialize(deserializer)? {
            ColorRepr::Hex(hex) => hex.parse().map_err(serde::de::Error::custom),
            ColorRepr::Rgb { r, g, b } => Ok(Color::from_channels(r, g, b)),
        }
    }
}
