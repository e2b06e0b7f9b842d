use std::ops::Range;

use crate::assets::fonts::LoadedFont;
use crate::foundation::core::{PixelBounds, Rgb8};
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::text::layout::ShapedLine;

/// Widest column span rasterized in one pass. A multiple of the rasterizer's tile width so every
/// pass sees the same pixel grid.
pub(crate) const MAX_TILE_PX: u32 = 4096;

/// How a shaped line is painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum LinePaint {
    /// Caption fill, optionally over a black outline `stroke_px` wide outside the glyph edge.
    Foreground { color: Rgb8, stroke_px: f32 },
    /// Flat translucent black copy used as a drop shadow.
    Shadow { alpha: u8 },
}

/// Virtual canvas holding a whole line with `pad` pixels of margin on every side.
///
/// Only its height is bounded by the rasterizer; columns are painted in windows, so lines far
/// wider than the image (a single overflowing word) stay renderable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LineCanvas {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) pad: u32,
}

impl LineCanvas {
    pub(crate) fn for_line(line: &ShapedLine, pad: u32) -> OverlayResult<Self> {
        let width = (line.width.max(0.0).ceil() as u32).saturating_add(pad.saturating_mul(2));
        let height = (line.height.max(0.0).ceil() as u32).saturating_add(pad.saturating_mul(2));
        if height > u32::from(u16::MAX) {
            return Err(OverlayError::render("line canvas height exceeds u16"));
        }
        if width == 0 || height == 0 {
            return Err(OverlayError::render("line canvas is empty"));
        }
        Ok(Self { width, height, pad })
    }

    /// Every column.
    pub(crate) fn all_columns(&self) -> Range<u32> {
        0..self.width
    }

    /// Split `cols` (clamped to the canvas) into windows no wider than [`MAX_TILE_PX`], starting
    /// on tile-aligned columns.
    pub(crate) fn tiles(&self, cols: Range<u32>) -> impl Iterator<Item = Range<u32>> {
        let end = cols.end.min(self.width);
        let start = cols.start.min(end);
        let mut x = if start < end { start - start % 64 } else { end };
        std::iter::from_fn(move || {
            if x >= end {
                return None;
            }
            let next = x.saturating_add(MAX_TILE_PX).min(end);
            let tile = x..next;
            x = next;
            Some(tile)
        })
    }
}

/// A window of a rasterized line on its own transparent canvas.
#[derive(Clone, Debug)]
pub(crate) struct LineRaster {
    /// First canvas column held in this raster.
    pub(crate) x0: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
    /// Premultiplied RGBA8, row-major.
    pub(crate) rgba8_premul: Vec<u8>,
}

impl LineRaster {
    /// Ink bounds in line-canvas coordinates, or `None` when this window is blank.
    pub(crate) fn ink_bounds(&self) -> Option<PixelBounds> {
        PixelBounds::of_coverage(&self.rgba8_premul, self.width, self.height).map(|b| PixelBounds {
            x0: b.x0 + self.x0,
            x1: b.x1 + self.x0,
            ..b
        })
    }
}

/// Margin around the line box so outlines and overhanging glyphs are never cut off.
pub(crate) fn canvas_padding(font_size: f32, stroke_px: f32) -> u32 {
    (font_size * 0.5 + stroke_px).ceil().max(1.0) as u32
}

/// Rasterize columns `cols` of `line` drawn on `canvas`.
///
/// The glyph origin sits at `(pad, pad)` on the canvas for every window and every paint, so
/// windows tile seamlessly and foreground and shadow line up pixel for pixel.
pub(crate) fn rasterize_line(
    line: &ShapedLine,
    font: &LoadedFont,
    paint: LinePaint,
    canvas: &LineCanvas,
    cols: Range<u32>,
) -> OverlayResult<LineRaster> {
    let width = cols.end.saturating_sub(cols.start);
    let w16: u16 = width
        .try_into()
        .map_err(|_| OverlayError::render("line window width exceeds u16"))?;
    let h16: u16 = canvas
        .height
        .try_into()
        .map_err(|_| OverlayError::render("line canvas height exceeds u16"))?;
    if w16 == 0 || h16 == 0 {
        return Err(OverlayError::render("line window is empty"));
    }

    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((
        f64::from(canvas.pad) - f64::from(cols.start),
        f64::from(canvas.pad),
    )));

    let glyphs = || {
        line.glyphs.iter().map(|g| vello_cpu::Glyph {
            id: g.id,
            x: g.x,
            y: g.y,
        })
    };

    match paint {
        LinePaint::Foreground { color, stroke_px } => {
            if stroke_px > 0.0 {
                // The stroke straddles the outline; double it so the outside half is `stroke_px`.
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(f64::from(stroke_px) * 2.0));
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
                ctx.glyph_run(&font.data)
                    .font_size(line.font_size)
                    .stroke_glyphs(glyphs());
            }
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                color.r, color.g, color.b, 255,
            ));
            ctx.glyph_run(&font.data)
                .font_size(line.font_size)
                .fill_glyphs(glyphs());
        }
        LinePaint::Shadow { alpha } => {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, alpha));
            ctx.glyph_run(&font.data)
                .font_size(line.font_size)
                .fill_glyphs(glyphs());
        }
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    ctx.render_to_pixmap(&mut pixmap);

    Ok(LineRaster {
        x0: cols.start,
        width,
        height: canvas.height,
        rgba8_premul: pixmap.data_as_u8_slice().to_vec(),
    })
}

/// Ink bounds of the whole line, scanning the canvas window by window.
pub(crate) fn measure_ink(
    line: &ShapedLine,
    font: &LoadedFont,
    paint: LinePaint,
    canvas: &LineCanvas,
) -> OverlayResult<Option<PixelBounds>> {
    let mut out: Option<PixelBounds> = None;
    for cols in canvas.tiles(canvas.all_columns()) {
        let Some(b) = rasterize_line(line, font, paint, canvas, cols)?.ink_bounds() else {
            continue;
        };
        out = Some(match out {
            None => b,
            Some(a) => PixelBounds {
                x0: a.x0.min(b.x0),
                y0: a.y0.min(b.y0),
                x1: a.x1.max(b.x1),
                y1: a.y1.max(b.y1),
            },
        });
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
