use super::*;

#[test]
fn default_matches_centered_lower_quarter() {
    let p = Placement::default();
    assert_eq!(p.x_percent(), 50.0);
    assert_eq!(p.y_percent(), 75.0);
    assert_eq!(p.size_percent(), 8.0);
    assert_eq!(p.font_size_px(1000), 80.0);
}

#[test]
fn rejects_out_of_range_values() {
    assert!(Placement::new(-1.0, 50.0, 8.0).unwrap_err().is_input());
    assert!(Placement::new(50.0, 100.5, 8.0).is_err());
    assert!(Placement::new(50.0, 50.0, 0.5).is_err());
    assert!(Placement::new(50.0, 50.0, 21.0).is_err());
    assert!(Placement::new(f32::NAN, 50.0, 8.0).is_err());
    assert!(Placement::new(0.0, 100.0, 20.0).is_ok());
}

#[test]
fn font_size_grows_monotonically_with_size_percent() {
    let mut prev = 0.0f32;
    for i in 1..=20 {
        let p = Placement::new(50.0, 50.0, i as f32).unwrap();
        let px = p.font_size_px(1000);
        assert!(px > prev, "size {i}% gave {px}px, not above {prev}px");
        prev = px;
    }
}

#[test]
fn font_size_never_drops_below_one_pixel() {
    let p = Placement::new(50.0, 50.0, 1.0).unwrap();
    assert_eq!(p.font_size_px(10), 1.0);
}

#[test]
fn deserialized_placement_still_validates() {
    let p: Placement =
        serde_json::from_str(r#"{"x_percent": 10, "y_percent": 20, "size_percent": 30}"#).unwrap();
    assert!(p.validate().is_err());
}
