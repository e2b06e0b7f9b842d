use image::codecs::jpeg::JpegEncoder;

use crate::foundation::error::{OverlayError, OverlayResult};

/// MIME type of the export format.
pub const JPEG_MIME: &str = "image/jpeg";

/// Encode an opaque RGB image as baseline JPEG at `quality` (1..=100).
pub fn encode_jpeg(img: &image::RgbImage, quality: u8) -> OverlayResult<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(OverlayError::input(format!(
            "jpeg quality must be within [1, 100], got {quality}"
        )));
    }
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder
        .encode_image(img)
        .map_err(|e| OverlayError::render(format!("encode jpeg: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/jpeg.rs"]
mod tests;
