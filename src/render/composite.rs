use crate::foundation::core::Rgb8;
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};

/// Premultiplied RGBA8 surface.
pub(crate) struct Surface<'a> {
    pub(crate) data: &'a [u8],
    pub(crate) width: u32,
    pub(crate) height: u32,
}

fn check_len(len: usize, width: u32, height: u32, what: &str) -> OverlayResult<()> {
    let want = (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4);
    if len != want {
        return Err(OverlayError::render(format!(
            "{what} byte len {len} does not match {width}x{height} rgba8"
        )));
    }
    Ok(())
}

/// Source-over `src` onto `dst` with `src`'s top-left at `(dx, dy)`; out-of-bounds parts are
/// clipped.
pub(crate) fn blit_over(
    dst: &mut [u8],
    dst_width: u32,
    dst_height: u32,
    src: Surface<'_>,
    dx: i64,
    dy: i64,
) -> OverlayResult<()> {
    check_len(dst.len(), dst_width, dst_height, "destination")?;
    check_len(src.data.len(), src.width, src.height, "source")?;

    let x_start = dx.max(0);
    let y_start = dy.max(0);
    let x_end = (dx + i64::from(src.width)).min(i64::from(dst_width));
    let y_end = (dy + i64::from(src.height)).min(i64::from(dst_height));
    if x_start >= x_end || y_start >= y_end {
        return Ok(());
    }

    let dw = dst_width as usize;
    let sw = src.width as usize;
    for y in y_start..y_end {
        let sy = (y - dy) as usize;
        let sx0 = (x_start - dx) as usize;
        let n = (x_end - x_start) as usize;
        let d_off = (y as usize * dw + x_start as usize) * 4;
        let s_off = (sy * sw + sx0) * 4;
        premul_over_in_place(
            &mut dst[d_off..d_off + n * 4],
            &src.data[s_off..s_off + n * 4],
        );
    }
    Ok(())
}

fn premul_over_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = s[3] as u16;
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - sa;
        d[3] = add_sat_u8(sa as u8, mul_div255_u8(d[3] as u16, inv));
        for c in 0..3 {
            let dc = mul_div255_u8(d[c] as u16, inv);
            d[c] = add_sat_u8(s[c], dc);
        }
    }
}

/// Composite a premultiplied buffer over an opaque background color.
pub(crate) fn flatten_to_rgb(
    premul: &[u8],
    width: u32,
    height: u32,
    background: Rgb8,
) -> OverlayResult<image::RgbImage> {
    check_len(premul.len(), width, height, "flatten input")?;

    let bg = [background.r, background.g, background.b];
    let mut out = Vec::with_capacity((width as usize) * (height as usize) * 3);
    for px in premul.chunks_exact(4) {
        let inv = 255u16 - u16::from(px[3]);
        for c in 0..3 {
            out.push(add_sat_u8(px[c], mul_div255_u8(u16::from(bg[c]), inv)));
        }
    }
    image::RgbImage::from_raw(width, height, out)
        .ok_or_else(|| OverlayError::render("flattened buffer size mismatch"))
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
