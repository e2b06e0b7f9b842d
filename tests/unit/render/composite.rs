use super::*;

fn solid(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    px.iter()
        .copied()
        .cycle()
        .take((w * h * 4) as usize)
        .collect()
}

fn pixel(buf: &[u8], w: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * w + x) * 4) as usize;
    [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
}

#[test]
fn opaque_source_replaces_destination_inside_rect_only() {
    let mut dst = solid(4, 4, [0, 0, 255, 255]);
    let src = solid(2, 2, [255, 0, 0, 255]);
    blit_over(
        &mut dst,
        4,
        4,
        Surface {
            data: &src,
            width: 2,
            height: 2,
        },
        1,
        1,
    )
    .unwrap();

    assert_eq!(pixel(&dst, 4, 1, 1), [255, 0, 0, 255]);
    assert_eq!(pixel(&dst, 4, 2, 2), [255, 0, 0, 255]);
    assert_eq!(pixel(&dst, 4, 0, 0), [0, 0, 255, 255]);
    assert_eq!(pixel(&dst, 4, 3, 3), [0, 0, 255, 255]);
}

#[test]
fn negative_offsets_and_overhang_are_clipped() {
    let mut dst = solid(3, 3, [0, 0, 0, 255]);
    let src = solid(3, 3, [255, 255, 255, 255]);
    let surface = || Surface {
        data: &src,
        width: 3,
        height: 3,
    };

    blit_over(&mut dst, 3, 3, surface(), -2, -2).unwrap();
    assert_eq!(pixel(&dst, 3, 0, 0), [255, 255, 255, 255]);
    assert_eq!(pixel(&dst, 3, 1, 0), [0, 0, 0, 255]);

    blit_over(&mut dst, 3, 3, surface(), 10, 10).unwrap();
    blit_over(&mut dst, 3, 3, surface(), 2, 2).unwrap();
    assert_eq!(pixel(&dst, 3, 2, 2), [255, 255, 255, 255]);
    assert_eq!(pixel(&dst, 3, 1, 2), [0, 0, 0, 255]);
}

#[test]
fn translucent_source_blends() {
    let mut dst = solid(1, 1, [255, 255, 255, 255]);
    // Black at alpha 150, premultiplied.
    let src = [0u8, 0, 0, 150];
    blit_over(
        &mut dst,
        1,
        1,
        Surface {
            data: &src,
            width: 1,
            height: 1,
        },
        0,
        0,
    )
    .unwrap();
    assert_eq!(pixel(&dst, 1, 0, 0), [105, 105, 105, 255]);
}

#[test]
fn mismatched_lengths_are_rejected() {
    let mut dst = vec![0u8; 8];
    let src = vec![0u8; 4];
    let err = blit_over(
        &mut dst,
        3,
        1,
        Surface {
            data: &src,
            width: 1,
            height: 1,
        },
        0,
        0,
    );
    assert!(err.is_err());
}

#[test]
fn flatten_fills_transparency_with_background() {
    let premul = [0u8, 0, 0, 0, 255, 0, 0, 255, 64, 0, 0, 128];
    let rgb = flatten_to_rgb(&premul, 3, 1, Rgb8::new(0, 0, 200)).unwrap();
    assert_eq!(rgb.get_pixel(0, 0).0, [0, 0, 200]);
    assert_eq!(rgb.get_pixel(1, 0).0, [255, 0, 0]);
    assert_eq!(rgb.get_pixel(2, 0).0, [64, 0, 100]);
}
