use std::path::PathBuf;

use super::*;
use crate::assets::fonts::FontOrigin;

fn fixture_font(name: &str) -> LoadedFont {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data/fonts")
        .join(name);
    LoadedFont::from_file(&path, FontOrigin::Asset(path.clone())).unwrap()
}

#[test]
fn shapes_one_glyph_per_ascii_char() {
    let font = fixture_font("DejaVuSans.ttf");
    let mut engine = TextLayoutEngine::new();
    let line = engine.shape_line("HELLO", &font, 40.0).unwrap();

    assert_eq!(line.glyphs.len(), 5);
    assert!(line.width > 0.0);
    assert!(line.height >= 40.0 * 0.9);
    assert_eq!(line.font_size, 40.0);
    assert!(line.glyphs.windows(2).all(|w| w[1].x > w[0].x));
}

#[test]
fn width_scales_with_font_size() {
    let font = fixture_font("DejaVuSans.ttf");
    let mut engine = TextLayoutEngine::new();
    let small = engine.shape_line("HELLO WORLD", &font, 20.0).unwrap();
    let large = engine.shape_line("HELLO WORLD", &font, 40.0).unwrap();
    assert!(large.width > small.width * 1.8);
}

#[test]
fn char_advance_is_positive_and_proportional() {
    let font = fixture_font("DejaVuSans-Bold.ttf");
    let mut engine = TextLayoutEngine::new();
    let a = engine.char_advance(&font, 50.0).unwrap();
    let b = engine.char_advance(&font, 100.0).unwrap();
    assert!(a > 0.0);
    assert!((b / a - 2.0).abs() < 0.05);
}

#[test]
fn rejects_non_positive_sizes() {
    let font = fixture_font("DejaVuSans.ttf");
    let mut engine = TextLayoutEngine::new();
    assert!(engine.shape_line("x", &font, 0.0).is_err());
    assert!(engine.shape_line("x", &font, f32::NAN).is_err());
}

#[test]
fn fonts_are_registered_once_per_engine() {
    let font = fixture_font("DejaVuSerif.ttf");
    let before = std::sync::Arc::strong_count(&font.bytes);
    let mut engine = TextLayoutEngine::new();
    engine.shape_line("one", &font, 12.0).unwrap();
    engine.shape_line("two", &font, 12.0).unwrap();
    assert_eq!(engine.registered.len(), 1);
    // The shaper holds the font's own allocation rather than a copy.
    assert!(std::sync::Arc::strong_count(&font.bytes) > before);
}
