use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::OverlayError;

/// Opaque 8-bit sRGB color (straight, no alpha).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Pure white, the default caption color.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Pure black, used for strokes and shadows.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Construct from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional, case-insensitive).
    pub fn from_hex(s: &str) -> Result<Self, OverlayError> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return Err(OverlayError::input(format!(
                "color \"{s}\" must be #RRGGBB"
            )));
        }

        fn hex_byte(pair: &str) -> Result<u8, OverlayError> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| OverlayError::input(format!("invalid hex byte \"{pair}\"")))
        }

        Ok(Self {
            r: hex_byte(&s[0..2])?,
            g: hex_byte(&s[2..4])?,
            b: hex_byte(&s[4..6])?,
        })
    }

    /// Premultiplied RGBA8 of this color at alpha `a`.
    pub(crate) fn premul_with_alpha(self, a: u8) -> [u8; 4] {
        let a16 = u16::from(a);
        let premul = |c: u8| crate::foundation::math::mul_div255_u8(u16::from(c), a16);
        [premul(self.r), premul(self.g), premul(self.b), a]
    }
}

impl Default for Rgb8 {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb8 {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Rgb8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Arr([u8; 3]),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Self::from_hex(&s).map_err(serde::de::Error::custom),
            Repr::Arr([r, g, b]) => Ok(Self::new(r, g, b)),
        }
    }
}

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBounds {
    /// Left edge (inclusive).
    pub x0: u32,
    /// Top edge (inclusive).
    pub y0: u32,
    /// Right edge (exclusive).
    pub x1: u32,
    /// Bottom edge (exclusive).
    pub y1: u32,
}

impl PixelBounds {
    /// Width in pixels.
    pub fn width(self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    /// Height in pixels.
    pub fn height(self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    /// Tight bounds of every pixel whose alpha is non-zero in a tightly packed RGBA8 buffer.
    ///
    /// Returns `None` when nothing is covered.
    pub(crate) fn of_coverage(rgba: &[u8], width: u32, height: u32) -> Option<Self> {
        let mut out: Option<Self> = None;
        let w = width as usize;
        for y in 0..height as usize {
            let row = &rgba[y * w * 4..(y + 1) * w * 4];
            let mut first = None;
            let mut last = 0usize;
            for (x, px) in row.chunks_exact(4).enumerate() {
                if px[3] != 0 {
                    first.get_or_insert(x);
                    last = x;
                }
            }
            let Some(first) = first else { continue };
            let (x0, x1, yy) = (first as u32, last as u32 + 1, y as u32);
            out = Some(match out {
                None => Self {
                    x0,
                    y0: yy,
                    x1,
                    y1: yy + 1,
                },
                Some(b) => Self {
                    x0: b.x0.min(x0),
                    y0: b.y0,
                    x1: b.x1.max(x1),
                    y1: yy + 1,
                },
            });
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
