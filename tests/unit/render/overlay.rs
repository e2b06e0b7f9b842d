use std::path::PathBuf;

use super::*;
use crate::assets::fonts::FontTable;
use crate::scene::style::FontFamily;

fn fixture_renderer() -> OverlayRenderer {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/fonts");
    let table = FontTable::default()
        .with_file(FontFamily::Meme, "DejaVuSans-Bold.ttf")
        .with_file(FontFamily::Modern, "DejaVuSans.ttf")
        .with_file(FontFamily::Elegant, "DejaVuSerif.ttf");
    OverlayRenderer::new(Arc::new(FontBook::new(table, dir)), RenderOptions::default())
}

fn gray(w: u32, h: u32) -> DecodedImage {
    DecodedImage::from_rgba8(image::RgbaImage::from_pixel(
        w,
        h,
        image::Rgba([128, 128, 128, 255]),
    ))
    .unwrap()
}

#[test]
fn blank_caption_is_an_input_error() {
    let r = fixture_renderer();
    for caption in ["", "   ", "\n\t"] {
        let err = r
            .render(&gray(64, 64), caption, &StyleConfig::default(), &Placement::default())
            .unwrap_err();
        assert!(err.is_input(), "{caption:?}: {err}");
    }
}

#[test]
fn invalid_style_is_rejected_before_drawing() {
    let r = fixture_renderer();
    let style = StyleConfig::default().with_shadow_offset_ratio(-1.0);
    let err = r
        .render(&gray(64, 64), "hi", &style, &Placement::default())
        .unwrap_err();
    assert!(err.is_input());
}

#[test]
fn lines_advance_by_ink_height_plus_gap() {
    let r = fixture_renderer();
    let placement = Placement::new(50.0, 10.0, 10.0).unwrap();
    let out = r
        .render(
            &gray(400, 400),
            "ONE TWO THREE FOUR FIVE SIX SEVEN EIGHT NINE TEN",
            &StyleConfig::for_family(FontFamily::Modern, Rgb8::WHITE),
            &placement,
        )
        .unwrap();

    let lines = out.lines();
    assert!(lines.len() >= 2, "expected wrapping, got {lines:?}");
    assert_eq!(lines[0].y, 40);
    for pair in lines.windows(2) {
        assert_eq!(pair[1].y, pair[0].y + i64::from(pair[0].height) + 15);
    }
}

#[test]
fn each_line_is_centered_independently() {
    let r = fixture_renderer();
    let placement = Placement::new(50.0, 5.0, 8.0).unwrap();
    let out = r
        .render(
            &gray(300, 300),
            "WIDE WIDE WIDE WIDE WIDE I",
            &StyleConfig::default(),
            &placement,
        )
        .unwrap();

    for line in out.lines() {
        let center2 = 2 * line.x + i64::from(line.width);
        assert!((center2 - 300).abs() <= 2, "{line:?}");
    }
}

#[test]
fn output_keeps_image_dimensions_and_source_is_untouched() {
    let r = fixture_renderer();
    let src = gray(120, 80);
    let before = src.rgba8_premul.as_ref().clone();
    let out = r
        .render(&src, "hello", &StyleConfig::default(), &Placement::default())
        .unwrap();
    assert_eq!(out.image().dimensions(), (120, 80));
    assert_eq!(src.rgba8_premul.as_ref(), &before);
    assert_eq!(out.font_size_px(), 6.0);
    assert!(!out.font_origin().is_fallback());
}

#[test]
fn render_jpeg_rejects_empty_caption_before_decoding() {
    let r = fixture_renderer();
    let err = r
        .render_jpeg(b"junk", "", &StyleConfig::default(), &Placement::default(), 90)
        .unwrap_err();
    assert!(err.is_input());
}

#[test]
fn word_wider_than_the_image_overflows_instead_of_failing() {
    let r = fixture_renderer();
    let src = gray(1000, 1000);
    let out = r
        .render(
            &src,
            &"A".repeat(600),
            &StyleConfig::default(),
            &Placement::new(50.0, 10.0, 20.0).unwrap(),
        )
        .unwrap();

    assert_eq!(out.image().dimensions(), (1000, 1000));
    let lines = out.lines();
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert!(line.width > 1000, "{line:?}");
    assert!(line.x < 0, "{line:?}");
    // Still centered: it spills equally past both edges.
    assert!((2 * line.x + i64::from(line.width) - 1000).abs() <= 1, "{line:?}");

    // The visible middle of the word was drawn across the full width.
    let row = line.y as u32 + line.height / 2;
    let changed = (0..1000)
        .filter(|&x| out.image().get_pixel(x, row).0 != [128, 128, 128])
        .count();
    assert!(changed > 200, "only {changed} pixels changed on row {row}");
}

#[test]
fn caption_running_off_the_bottom_is_kept_and_clipped() {
    let r = fixture_renderer();
    let out = r
        .render(
            &gray(200, 200),
            "ONE TWO THREE FOUR FIVE SIX SEVEN EIGHT NINE TEN",
            &StyleConfig::for_family(FontFamily::Modern, Rgb8::WHITE),
            &Placement::new(50.0, 90.0, 10.0).unwrap(),
        )
        .unwrap();

    assert_eq!(out.image().dimensions(), (200, 200));
    let lines = out.lines();
    assert!(lines.len() >= 2, "{lines:?}");
    assert_eq!(lines[0].y, 180);
    assert!(lines.last().unwrap().y > 200, "{lines:?}");
    for pair in lines.windows(2) {
        assert_eq!(pair[1].y, pair[0].y + i64::from(pair[0].height) + 15);
    }
}
