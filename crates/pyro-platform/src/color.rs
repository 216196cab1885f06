//! Colors and fill styles in the notation a 2D canvas accepts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("empty color string")]
    Empty,
    #[error("expected 3 comma-separated components, found {0}")]
    ComponentCount(usize),
    #[error("invalid color component '{0}', expected an integer in 0..=255")]
    InvalidComponent(String),
    #[error("invalid hex color '{0}', expected #rgb or #rrggbb")]
    InvalidHex(String),
}

/// An opaque color. Written as the triple `"r,g,b"` that slots into `rgba(...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn parse_hex(s: &str) -> Result<Self, ColorError> {
        let digits = &s[1..];
        let invalid = || ColorError::InvalidHex(s.to_string());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        match digits.len() {
            3 => {
                let short = |i: usize| channel(i..i + 1).map(|v| v * 17);
                Ok(Self::new(short(0)?, short(1)?, short(2)?))
            }
            6 => Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            _ => Err(invalid()),
        }
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    /// Accepts `"r,g,b"`, `#rgb` and `#rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorError::Empty);
        }
        if s.starts_with('#') {
            return Self::parse_hex(s);
        }
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(ColorError::ComponentCount(parts.len()));
        }
        let component = |p: &str| {
            p.parse::<u8>()
                .map_err(|_| ColorError::InvalidComponent(p.to_string()))
        };
        Ok(Self::new(
            component(parts[0])?,
            component(parts[1])?,
            component(parts[2])?,
        ))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// A context fill style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillStyle {
    /// `rgba(r,g,b,alpha)` with a fractional alpha.
    Rgba { rgb: Rgb, alpha: f32 },
    /// `#rrggbbaa`.
    Hex { rgb: Rgb, alpha: u8 },
}

impl FillStyle {
    pub fn rgba(rgb: Rgb, alpha: f32) -> Self {
        FillStyle::Rgba { rgb, alpha }
    }

    pub fn hex(rgb: Rgb, alpha: u8) -> Self {
        FillStyle::Hex { rgb, alpha }
    }

    /// Straight-alpha RGBA8. Fractional alpha is clamped to [0, 1] like a canvas does.
    pub fn to_rgba8(&self) -> [u8; 4] {
        match *self {
            FillStyle::Rgba { rgb, alpha } => {
                let alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
                [rgb.r, rgb.g, rgb.b, (alpha * 255.0).round() as u8]
            }
            FillStyle::Hex { rgb, alpha } => [rgb.r, rgb.g, rgb.b, alpha],
        }
    }
}

impl fmt::Display for FillStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillStyle::Rgba { rgb, alpha } => write!(f, "rgba({rgb},{alpha})"),
            FillStyle::Hex { rgb, alpha } => {
                write!(f, "#{:02x}{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b, alpha)
            }
        }
    }
}
