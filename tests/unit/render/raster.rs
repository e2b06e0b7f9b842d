use std::path::PathBuf;

use super::*;
use crate::assets::fonts::FontOrigin;
use crate::text::layout::TextLayoutEngine;

fn fixture_font() -> LoadedFont {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/fonts/DejaVuSans-Bold.ttf");
    LoadedFont::from_file(&path, FontOrigin::Asset(path.clone())).unwrap()
}

fn shaped(text: &str, size: f32) -> (ShapedLine, LoadedFont) {
    let font = fixture_font();
    let mut engine = TextLayoutEngine::new();
    let line = engine.shape_line(text, &font, size).unwrap();
    (line, font)
}

fn full(line: &ShapedLine, font: &LoadedFont, paint: LinePaint, pad: u32) -> LineRaster {
    let canvas = LineCanvas::for_line(line, pad).unwrap();
    rasterize_line(line, font, paint, &canvas, canvas.all_columns()).unwrap()
}

const WHITE: LinePaint = LinePaint::Foreground {
    color: Rgb8::WHITE,
    stroke_px: 0.0,
};

#[test]
fn foreground_ink_sits_inside_the_padded_canvas() {
    let (line, font) = shaped("HELLO", 40.0);
    let pad = canvas_padding(40.0, 0.0);
    let r = full(&line, &font, WHITE, pad);

    let ink = r.ink_bounds().unwrap();
    assert!(ink.x0 >= 1 && ink.y0 >= 1);
    assert!(ink.x1 < r.width && ink.y1 < r.height);
    assert!(ink.height() > 20 && ink.height() <= 40);
}

#[test]
fn stroke_grows_the_ink_box() {
    let (line, font) = shaped("HELLO", 40.0);
    let pad = canvas_padding(40.0, 2.0);
    let plain = full(&line, &font, WHITE, pad);
    let outlined = full(
        &line,
        &font,
        LinePaint::Foreground {
            color: Rgb8::WHITE,
            stroke_px: 2.0,
        },
        pad,
    );

    let a = plain.ink_bounds().unwrap();
    let b = outlined.ink_bounds().unwrap();
    assert!(b.x0 < a.x0 && b.x1 > a.x1);
    assert!(b.y0 < a.y0 && b.y1 > a.y1);
    // Black outline pixels exist only in the outlined raster.
    let has_black = |r: &LineRaster| {
        r.rgba8_premul
            .chunks_exact(4)
            .any(|p| p[3] == 255 && p[0] == 0 && p[1] == 0 && p[2] == 0)
    };
    assert!(has_black(&outlined));
    assert!(!has_black(&plain));
}

#[test]
fn shadow_is_translucent_black_with_same_geometry() {
    let (line, font) = shaped("Hi", 32.0);
    let pad = canvas_padding(32.0, 0.0);
    let fg = full(&line, &font, WHITE, pad);
    let shadow = full(&line, &font, LinePaint::Shadow { alpha: 150 }, pad);

    assert_eq!((fg.width, fg.height), (shadow.width, shadow.height));
    let (a, b) = (fg.ink_bounds().unwrap(), shadow.ink_bounds().unwrap());
    assert!(b.x0 >= a.x0 && b.y0 >= a.y0 && b.x1 <= a.x1 && b.y1 <= a.y1);
    assert!(b.width() + 2 >= a.width());
    assert!(shadow.rgba8_premul.chunks_exact(4).all(|p| p[0] == 0 && p[3] <= 150));
}

#[test]
fn whitespace_only_line_has_no_ink() {
    let (line, font) = shaped("   ", 24.0);
    let r = full(&line, &font, WHITE, canvas_padding(24.0, 0.0));
    assert!(r.ink_bounds().is_none());
}

#[test]
fn rasterization_is_deterministic() {
    let (line, font) = shaped("Same pixels", 28.0);
    let pad = canvas_padding(28.0, 1.0);
    let paint = LinePaint::Foreground {
        color: Rgb8::new(200, 30, 60),
        stroke_px: 1.0,
    };
    let a = full(&line, &font, paint, pad);
    let b = full(&line, &font, paint, pad);
    assert_eq!(a.rgba8_premul, b.rgba8_premul);
}

#[test]
fn tiles_cover_the_requested_columns_in_aligned_windows() {
    let canvas = LineCanvas {
        width: 10_000,
        height: 50,
        pad: 5,
    };
    let tiles: Vec<_> = canvas.tiles(canvas.all_columns()).collect();
    assert_eq!(tiles, vec![0..4096, 4096..8192, 8192..10_000]);

    let clipped: Vec<_> = canvas.tiles(100..5000).collect();
    assert_eq!(clipped, vec![64..4160, 4160..5000]);

    assert_eq!(canvas.tiles(9_000..20_000).last(), Some(9_000 - 9_000 % 64..10_000));
    assert_eq!(canvas.tiles(300..300).count(), 0);
}

#[test]
fn line_wider_than_one_window_is_measured_across_windows() {
    let (line, font) = shaped(&"W".repeat(120), 60.0);
    let pad = canvas_padding(60.0, 3.0);
    let canvas = LineCanvas::for_line(&line, pad).unwrap();
    assert!(canvas.width > MAX_TILE_PX, "canvas only {} wide", canvas.width);

    let paint = LinePaint::Foreground {
        color: Rgb8::WHITE,
        stroke_px: 3.0,
    };
    let ink = measure_ink(&line, &font, paint, &canvas).unwrap().unwrap();
    assert!(ink.x0 <= pad + 1 && ink.x0 + 5 >= pad);
    assert!(ink.x1 > canvas.width - 2 * pad && ink.x1 < canvas.width);
    assert!(ink.height() > 30 && ink.height() < canvas.height);

    // A window in the middle of the line holds ink and reports it in canvas coordinates.
    let mid = rasterize_line(&line, &font, paint, &canvas, 4096..4352).unwrap();
    assert_eq!((mid.x0, mid.width), (4096, 256));
    let b = mid.ink_bounds().unwrap();
    assert!(b.x0 >= 4096 && b.x1 <= 4352);
}

#[test]
fn windowed_raster_matches_the_whole_line() {
    let (line, font) = shaped("Tile seams", 36.0);
    let pad = canvas_padding(36.0, 2.0);
    let canvas = LineCanvas::for_line(&line, pad).unwrap();
    let paint = LinePaint::Foreground {
        color: Rgb8::new(250, 200, 20),
        stroke_px: 2.0,
    };
    let whole = rasterize_line(&line, &font, paint, &canvas, canvas.all_columns()).unwrap();
    let right = rasterize_line(&line, &font, paint, &canvas, 64..canvas.width).unwrap();

    let row = |r: &LineRaster, y: u32, x: u32| {
        let i = ((y * r.width + (x - r.x0)) * 4) as usize;
        r.rgba8_premul[i..i + 4].to_vec()
    };
    for y in (0..canvas.height).step_by(3) {
        for x in (64..canvas.width).step_by(5) {
            let (a, b) = (row(&whole, y, x), row(&right, y, x));
            assert!(
                a.iter().zip(&b).all(|(p, q)| p.abs_diff(*q) <= 2),
                "pixel ({x}, {y}): {a:?} vs {b:?}"
            );
        }
    }
}
