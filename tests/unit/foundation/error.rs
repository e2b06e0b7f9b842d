use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        OverlayError::input("x")
            .to_string()
            .contains("input error:")
    );
    assert!(
        OverlayError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        OverlayError::caption("x")
            .to_string()
            .contains("caption error:")
    );
    assert!(
        OverlayError::config("x")
            .to_string()
            .contains("config error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = OverlayError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_input_errors_report_is_input() {
    assert!(OverlayError::input("empty caption").is_input());
    assert!(!OverlayError::render("decode").is_input());
    assert!(!OverlayError::caption("nothing").is_input());
}
