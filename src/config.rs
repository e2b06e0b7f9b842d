//! File- and environment-driven settings for the renderer and font lookup.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::assets::fonts::{FontBook, FontTable};
use crate::foundation::core::Rgb8;
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::render::overlay::{OverlayRenderer, RenderOptions};

/// Environment variable overriding [`OverlayConfig::fonts_dir`].
pub const FONTS_DIR_ENV: &str = "OVERLAYER_FONTS_DIR";

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    /// Directory family font files are resolved in.
    pub fonts_dir: PathBuf,
    /// Family -> file table; partial tables merge over the defaults.
    pub font_files: FontTable,
    /// Font tried before installed fonts when a family asset is unavailable.
    pub fallback_font: Option<PathBuf>,
    /// JPEG export quality.
    pub jpeg_quality: u8,
    /// Opaque color transparency is flattened against.
    pub background: Rgb8,
    /// Wrap width as a fraction of image width.
    pub wrap_width_ratio: f32,
    /// Fixed gap between lines, in pixels.
    pub line_gap_px: u32,
    /// Meme outline width as a fraction of font size.
    pub stroke_width_ratio: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        let opts = RenderOptions::default();
        Self {
            fonts_dir: PathBuf::from("fonts"),
            font_files: FontTable::default(),
            fallback_font: None,
            jpeg_quality: 90,
            background: opts.background,
            wrap_width_ratio: opts.wrap_width_ratio,
            line_gap_px: opts.line_gap_px,
            stroke_width_ratio: opts.stroke_width_ratio,
        }
    }
}

impl OverlayConfig {
    /// Read a JSON config file. Relative `fonts_dir`/`fallback_font` resolve against the file's
    /// directory.
    pub fn load(path: &Path) -> OverlayResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open config '{}'", path.display()))?;
        let mut cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| OverlayError::config(format!("parse '{}': {e}", path.display())))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        if cfg.fonts_dir.is_relative() {
            cfg.fonts_dir = base.join(&cfg.fonts_dir);
        }
        if let Some(fb) = cfg.fallback_font.as_mut()
            && fb.is_relative()
        {
            *fb = base.join(&*fb);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply [`FONTS_DIR_ENV`] if set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(dir) = std::env::var_os(FONTS_DIR_ENV).filter(|v| !v.is_empty()) {
            self.fonts_dir = PathBuf::from(dir);
        }
        self
    }

    /// Reject out-of-range values.
    pub fn validate(&self) -> OverlayResult<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(OverlayError::config("jpeg_quality must be within [1, 100]"));
        }
        if !self.wrap_width_ratio.is_finite()
            || self.wrap_width_ratio <= 0.0
            || self.wrap_width_ratio > 1.0
        {
            return Err(OverlayError::config("wrap_width_ratio must be within (0, 1]"));
        }
        if !self.stroke_width_ratio.is_finite() || !(0.0..=0.5).contains(&self.stroke_width_ratio)
        {
            return Err(OverlayError::config(
                "stroke_width_ratio must be within [0, 0.5]",
            ));
        }
        Ok(())
    }

    /// Renderer tunables derived from this config.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            wrap_width_ratio: self.wrap_width_ratio,
            line_gap_px: self.line_gap_px,
            stroke_width_ratio: self.stroke_width_ratio,
            background: self.background,
        }
    }

    /// Font book for this config's table, directory and fallback.
    pub fn font_book(&self) -> FontBook {
        let book = FontBook::new(self.font_files.clone(), &self.fonts_dir);
        match &self.fallback_font {
            Some(path) => book.with_fallback_file(path),
            None => book,
        }
    }

    /// Renderer backed by a fresh font book.
    pub fn renderer(&self) -> OverlayRenderer {
        OverlayRenderer::new(Arc::new(self.font_book()), self.render_options())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
