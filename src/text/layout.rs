use std::collections::HashMap;

use crate::assets::fonts::LoadedFont;
use crate::foundation::error::{OverlayError, OverlayResult};

/// One glyph positioned relative to the line origin (`y` is the baseline).
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PlacedGlyph {
    pub(crate) id: u32,
    pub(crate) x: f32,
    pub(crate) y: f32,
}

/// A single shaped line ready for rasterization.
#[derive(Clone, Debug)]
pub(crate) struct ShapedLine {
    pub(crate) glyphs: Vec<PlacedGlyph>,
    pub(crate) font_size: f32,
    /// Advance width of the line.
    pub(crate) width: f32,
    /// Line box height (ascent + descent + leading).
    pub(crate) height: f32,
}

/// Stateful helper building Parley layouts from loaded fonts.
///
/// Holds mutable shaping caches, so each render owns its engine; the fonts themselves are shared.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    registered: HashMap<usize, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    /// Register `font` with the shaper once and return the family name to select it by.
    fn family_name_for(&mut self, font: &LoadedFont) -> OverlayResult<String> {
        let key = std::sync::Arc::as_ptr(&font.bytes) as usize;
        if let Some(name) = self.registered.get(&key) {
            return Ok(name.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::new(font.bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            OverlayError::render("no font families registered from font bytes")
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| OverlayError::render("registered font family has no name"))?
            .to_string();

        self.registered.insert(key, family_name.clone());
        Ok(family_name)
    }

    fn layout(
        &mut self,
        text: &str,
        font: &LoadedFont,
        size_px: f32,
    ) -> OverlayResult<parley::Layout<()>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(OverlayError::render("font size must be finite and > 0"));
        }
        let family_name = self.family_name_for(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Shape `text` as one unbroken line.
    pub(crate) fn shape_line(
        &mut self,
        text: &str,
        font: &LoadedFont,
        size_px: f32,
    ) -> OverlayResult<ShapedLine> {
        let layout = self.layout(text, font, size_px)?;

        let mut glyphs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.glyphs().map(|g| PlacedGlyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }

        Ok(ShapedLine {
            glyphs,
            font_size: size_px,
            width: layout.width(),
            height: layout.height(),
        })
    }

    /// Advance width of a single `A`, the per-character width used for wrapping.
    pub(crate) fn char_advance(&mut self, font: &LoadedFont, size_px: f32) -> OverlayResult<f32> {
        let layout = self.layout("A", font, size_px)?;
        let w = layout.width();
        if !w.is_finite() || w <= 0.0 {
            return Err(OverlayError::render(format!(
                "font '{}' reports no advance for 'A'",
                font.family_name
            )));
        }
        Ok(w)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
