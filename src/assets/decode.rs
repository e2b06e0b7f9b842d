use std::sync::Arc;

use crate::foundation::error::{OverlayError, OverlayResult};

/// Background raster in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl DecodedImage {
    /// Wrap an already decoded straight-alpha image.
    pub fn from_rgba8(img: image::RgbaImage) -> OverlayResult<Self> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(OverlayError::input("image has zero width or height"));
        }
        let mut rgba8_premul = img.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }
}

/// Decode JPEG/PNG (or any format `image` recognizes) from memory.
///
/// The input slice is only read; the returned raster is an independent copy.
pub fn decode_image(bytes: &[u8]) -> OverlayResult<DecodedImage> {
    if bytes.is_empty() {
        return Err(OverlayError::input("no image supplied"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| OverlayError::render(format!("decode image from memory: {e}")))?;
    DecodedImage::from_rgba8(dyn_img.to_rgba8())
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
