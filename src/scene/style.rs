use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgb8;
use crate::foundation::error::OverlayError;

/// Typography family a caption is drawn in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    /// Impact-style lettering with a thick black outline.
    Meme,
    /// Clean bold sans-serif with a soft drop shadow.
    Modern,
    /// Classy serif with a soft drop shadow.
    Elegant,
}

impl FontFamily {
    /// Every family, in table order.
    pub const ALL: [Self; 3] = [Self::Meme, Self::Modern, Self::Elegant];

    /// Human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Meme => "Meme (Impact, Thick Outline)",
            Self::Modern => "Modern (Clean, Bold)",
            Self::Elegant => "Elegant (Serif, Classy)",
        }
    }

    /// Alpha of the translucent black shadow pass for this family.
    pub fn shadow_alpha(self) -> u8 {
        match self {
            Self::Meme => 200,
            Self::Modern | Self::Elegant => 150,
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Meme => "meme",
            Self::Modern => "modern",
            Self::Elegant => "elegant",
        })
    }
}

impl FromStr for FontFamily {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "meme" => Ok(Self::Meme),
            "modern" => Ok(Self::Modern),
            "elegant" => Ok(Self::Elegant),
            other => Err(OverlayError::input(format!(
                "unknown font family \"{other}\" (expected meme, modern or elegant)"
            ))),
        }
    }
}

/// Shadow offset for non-outlined families: 6% of the font size, halved.
const SOFT_SHADOW_RATIO: f32 = 0.03;

/// Immutable styling for one render.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Typography family; selects the font asset and the shadow alpha.
    pub family: FontFamily,
    /// Fill color of the caption.
    pub color: Rgb8,
    /// Draw a black outline beneath the fill.
    pub stroke_enabled: bool,
    /// Shadow offset as a fraction of the font size; `0` disables the shadow pass.
    pub shadow_offset_ratio: f32,
}

impl StyleConfig {
    /// Family defaults: Meme is outlined with no shadow, the others get a soft shadow.
    pub fn for_family(family: FontFamily, color: Rgb8) -> Self {
        let (stroke_enabled, shadow_offset_ratio) = match family {
            FontFamily::Meme => (true, 0.0),
            FontFamily::Modern | FontFamily::Elegant => (false, SOFT_SHADOW_RATIO),
        };
        Self {
            family,
            color,
            stroke_enabled,
            shadow_offset_ratio,
        }
    }

    /// Override the outline toggle.
    pub fn with_stroke(mut self, enabled: bool) -> Self {
        self.stroke_enabled = enabled;
        self
    }

    /// Override the shadow offset ratio.
    pub fn with_shadow_offset_ratio(mut self, ratio: f32) -> Self {
        self.shadow_offset_ratio = ratio;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), OverlayError> {
        if !self.shadow_offset_ratio.is_finite() || !(0.0..=1.0).contains(&self.shadow_offset_ratio)
        {
            return Err(OverlayError::input(
                "shadow_offset_ratio must be finite and within [0, 1]",
            ));
        }
        Ok(())
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::for_family(FontFamily::Meme, Rgb8::WHITE)
    }
}

/// Caller-side caption transform applied before wrapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionPolicy {
    /// Uppercase the whole caption.
    pub uppercase: bool,
}

impl CaptionPolicy {
    /// Meme captions are shouted; everything else is left as written.
    pub fn for_family(family: FontFamily) -> Self {
        Self {
            uppercase: family == FontFamily::Meme,
        }
    }

    /// Apply the policy to a caption.
    pub fn apply(self, caption: &str) -> String {
        if self.uppercase {
            caption.to_uppercase()
        } else {
            caption.to_owned()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/style.rs"]
mod tests;
