use std::sync::Arc;

use crate::assets::decode::{DecodedImage, decode_image};
use crate::assets::fonts::{FontBook, FontOrigin, LoadedFont};
use crate::encode::jpeg::encode_jpeg;
use crate::foundation::core::Rgb8;
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::foundation::math::percent_of_floor;
use crate::render::composite::{Surface, blit_over, flatten_to_rgb};
use crate::render::raster::{
    LineCanvas, LinePaint, LineRaster, MAX_TILE_PX, canvas_padding, measure_ink, rasterize_line,
};
use crate::scene::placement::Placement;
use crate::scene::style::StyleConfig;
use crate::text::layout::{ShapedLine, TextLayoutEngine};
use crate::text::wrap::wrap_words;

/// Renderer tunables that stay fixed across calls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    /// Wrap width as a fraction of the image width.
    pub wrap_width_ratio: f32,
    /// Gap added below each line's ink box before the next line.
    pub line_gap_px: u32,
    /// Outline width as a fraction of the font size.
    pub stroke_width_ratio: f32,
    /// Opaque color transparent pixels are flattened against.
    pub background: Rgb8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            wrap_width_ratio: 0.9,
            line_gap_px: 15,
            stroke_width_ratio: 0.05,
            background: Rgb8::BLACK,
        }
    }
}

/// Where one caption line landed, in image pixel coordinates.
///
/// Coordinates are signed: overflowing lines may start left of or below the image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineBox {
    /// The wrapped line's text.
    pub text: String,
    /// Left edge of the line's ink.
    pub x: i64,
    /// Top edge of the line's ink.
    pub y: i64,
    /// Ink width.
    pub width: u32,
    /// Ink height.
    pub height: u32,
}

/// Output of a render: the flattened image plus the geometry that produced it.
#[derive(Clone, Debug)]
pub struct RenderedImage {
    image: image::RgbImage,
    lines: Vec<LineBox>,
    font_size_px: f32,
    font: Arc<LoadedFont>,
}

impl RenderedImage {
    /// The composed, fully opaque image.
    pub fn image(&self) -> &image::RgbImage {
        &self.image
    }

    /// Consume into the composed image.
    pub fn into_image(self) -> image::RgbImage {
        self.image
    }

    /// Placed lines, top to bottom. Blank lines are absent.
    pub fn lines(&self) -> &[LineBox] {
        &self.lines
    }

    /// Absolute font size used.
    pub fn font_size_px(&self) -> f32 {
        self.font_size_px
    }

    /// Where the font came from; a fallback origin means the family asset was unavailable.
    pub fn font_origin(&self) -> &FontOrigin {
        &self.font.origin
    }

    /// Encode as JPEG.
    pub fn to_jpeg(&self, quality: u8) -> OverlayResult<Vec<u8>> {
        encode_jpeg(&self.image, quality)
    }
}

/// Draws captions over images.
///
/// Cheap to clone; clones share the font book. Every call works on its own copy of the image and
/// its own shaping state, so one renderer can serve concurrent callers.
#[derive(Clone, Debug)]
pub struct OverlayRenderer {
    fonts: Arc<FontBook>,
    opts: RenderOptions,
}

impl OverlayRenderer {
    /// Renderer resolving fonts through `fonts`.
    pub fn new(fonts: Arc<FontBook>, opts: RenderOptions) -> Self {
        Self { fonts, opts }
    }

    /// The shared font book.
    pub fn fonts(&self) -> &Arc<FontBook> {
        &self.fonts
    }

    /// Tunables in effect.
    pub fn options(&self) -> &RenderOptions {
        &self.opts
    }

    /// Decode `image_bytes`, draw `caption`, and return the JPEG bytes.
    pub fn render_jpeg(
        &self,
        image_bytes: &[u8],
        caption: &str,
        style: &StyleConfig,
        placement: &Placement,
        quality: u8,
    ) -> OverlayResult<Vec<u8>> {
        check_caption(caption)?;
        let image = decode_image(image_bytes)?;
        self.render(&image, caption, style, placement)?
            .to_jpeg(quality)
    }

    /// Draw `caption` over a copy of `image`.
    ///
    /// The caption is used as given: case policies belong to the caller.
    #[tracing::instrument(
        skip_all,
        fields(family = %style.family, width = image.width, height = image.height)
    )]
    pub fn render(
        &self,
        image: &DecodedImage,
        caption: &str,
        style: &StyleConfig,
        placement: &Placement,
    ) -> OverlayResult<RenderedImage> {
        check_caption(caption)?;
        style.validate()?;
        placement.validate()?;

        let (img_w, img_h) = (image.width, image.height);
        let font_size = placement.font_size_px(img_h);
        let font = self.fonts.font_for(style.family)?;

        let mut engine = TextLayoutEngine::new();
        let advance = engine.char_advance(&font, font_size)?;
        let wrap_px = img_w as f32 * self.opts.wrap_width_ratio;
        let max_chars = ((wrap_px / advance).floor() as usize).max(1);
        let wrapped = wrap_words(caption, max_chars);
        tracing::debug!(font_size, advance, max_chars, lines = wrapped.len(), "wrapped caption");

        let stroke_px = if style.stroke_enabled {
            (font_size * self.opts.stroke_width_ratio).floor().max(1.0)
        } else {
            0.0
        };
        let shadow = (style.shadow_offset_ratio > 0.0).then(|| {
            (
                i64::from((font_size * style.shadow_offset_ratio).floor() as u32),
                style.family.shadow_alpha(),
            )
        });
        let pad = canvas_padding(font_size, stroke_px);

        let mut canvas = image.rgba8_premul.as_ref().clone();
        let mut cursor_y = i64::from(percent_of_floor(img_h, placement.y_percent()));
        let mut lines = Vec::with_capacity(wrapped.len());

        for text in wrapped {
            let shaped = engine.shape_line(&text, &font, font_size)?;
            let line_canvas = LineCanvas::for_line(&shaped, pad)?;
            let fg_paint = LinePaint::Foreground {
                color: style.color,
                stroke_px,
            };

            // Lines that fit one window are rasterized once and reused for drawing.
            let whole = (line_canvas.width <= MAX_TILE_PX)
                .then(|| {
                    rasterize_line(&shaped, &font, fg_paint, &line_canvas, line_canvas.all_columns())
                })
                .transpose()?;
            let ink = match &whole {
                Some(r) => r.ink_bounds(),
                None => measure_ink(&shaped, &font, fg_paint, &line_canvas)?,
            };
            let Some(ink) = ink else {
                tracing::debug!(line = %text, "skipping line without ink");
                continue;
            };

            let (w, h) = (ink.width(), ink.height());
            let slack = i64::from(img_w) - i64::from(w);
            let x = (slack as f64 * f64::from(placement.x_percent()) / 100.0).round() as i64;
            let dx = x - i64::from(ink.x0);
            let dy = cursor_y - i64::from(ink.y0);

            let mut target = Target {
                canvas: &mut canvas,
                width: img_w,
                height: img_h,
            };
            if let Some((offset, alpha)) = shadow {
                target.paint_line(
                    &shaped,
                    &font,
                    LinePaint::Shadow { alpha },
                    &line_canvas,
                    dx + offset,
                    dy + offset,
                )?;
            }
            match &whole {
                Some(r) => target.blit(r, dx, dy)?,
                None => target.paint_line(&shaped, &font, fg_paint, &line_canvas, dx, dy)?,
            }

            tracing::debug!(line = %text, x, y = cursor_y, w, h, "placed line");
            lines.push(LineBox {
                text,
                x,
                y: cursor_y,
                width: w,
                height: h,
            });
            cursor_y += i64::from(h) + i64::from(self.opts.line_gap_px);
        }

        let flat = flatten_to_rgb(&canvas, img_w, img_h, self.opts.background)?;
        tracing::info!(
            lines = lines.len(),
            font_size,
            font = %font.origin,
            "rendered caption overlay"
        );

        Ok(RenderedImage {
            image: flat,
            lines,
            font_size_px: font_size,
            font,
        })
    }
}

/// The working image lines are composited onto.
struct Target<'a> {
    canvas: &'a mut [u8],
    width: u32,
    height: u32,
}

impl Target<'_> {
    fn blit(&mut self, r: &LineRaster, dx: i64, dy: i64) -> OverlayResult<()> {
        blit_over(
            self.canvas,
            self.width,
            self.height,
            Surface {
                data: &r.rgba8_premul,
                width: r.width,
                height: r.height,
            },
            dx + i64::from(r.x0),
            dy,
        )
    }

    /// Draw `line` with its canvas origin at `(dx, dy)`, rasterizing only the columns that land
    /// on the image.
    fn paint_line(
        &mut self,
        line: &ShapedLine,
        font: &LoadedFont,
        paint: LinePaint,
        line_canvas: &LineCanvas,
        dx: i64,
        dy: i64,
    ) -> OverlayResult<()> {
        if dy >= i64::from(self.height) || dy + i64::from(line_canvas.height) <= 0 {
            return Ok(());
        }
        let span = i64::from(line_canvas.width);
        let lo = (-dx).clamp(0, span) as u32;
        let hi = (i64::from(self.width) - dx).clamp(0, span) as u32;
        for cols in line_canvas.tiles(lo..hi) {
            let r = rasterize_line(line, font, paint, line_canvas, cols)?;
            self.blit(&r, dx, dy)?;
        }
        Ok(())
    }
}

fn check_caption(caption: &str) -> OverlayResult<()> {
    if caption.trim().is_empty() {
        return Err(OverlayError::input("caption is empty"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
