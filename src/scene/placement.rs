use serde::{Deserialize, Serialize};

use crate::foundation::error::{OverlayError, OverlayResult};

/// Percentage-based caption placement.
///
/// `x_percent` interpolates each line's left edge between flush-left (0) and flush-right (100);
/// `y_percent` is where the first line starts; `size_percent` is the font height as a share of the
/// image height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    x_percent: f32,
    y_percent: f32,
    size_percent: f32,
}

impl Placement {
    /// Smallest accepted font size, in percent of image height.
    pub const MIN_SIZE_PERCENT: f32 = 1.0;
    /// Largest accepted font size, in percent of image height.
    pub const MAX_SIZE_PERCENT: f32 = 20.0;

    /// Validated constructor.
    pub fn new(x_percent: f32, y_percent: f32, size_percent: f32) -> OverlayResult<Self> {
        let p = Self {
            x_percent,
            y_percent,
            size_percent,
        };
        p.validate()?;
        Ok(p)
    }

    /// Horizontal interpolation factor in percent.
    pub fn x_percent(&self) -> f32 {
        self.x_percent
    }

    /// Vertical start in percent of image height.
    pub fn y_percent(&self) -> f32 {
        self.y_percent
    }

    /// Font size in percent of image height.
    pub fn size_percent(&self) -> f32 {
        self.size_percent
    }

    /// Absolute font size in pixels for an image of `image_height`, never below 1.
    pub fn font_size_px(&self, image_height: u32) -> f32 {
        let px = (f64::from(image_height) * f64::from(self.size_percent) / 100.0).floor();
        px.max(1.0) as f32
    }

    pub(crate) fn validate(&self) -> OverlayResult<()> {
        fn pct(name: &str, v: f32, lo: f32, hi: f32) -> OverlayResult<()> {
            if !v.is_finite() || v < lo || v > hi {
                return Err(OverlayError::input(format!(
                    "{name} must be within [{lo}, {hi}], got {v}"
                )));
            }
            Ok(())
        }

        pct("x_percent", self.x_percent, 0.0, 100.0)?;
        pct("y_percent", self.y_percent, 0.0, 100.0)?;
        pct(
            "size_percent",
            self.size_percent,
            Self::MIN_SIZE_PERCENT,
            Self::MAX_SIZE_PERCENT,
        )
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            x_percent: 50.0,
            y_percent: 75.0,
            size_percent: 8.0,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/placement.rs"]
mod tests;
