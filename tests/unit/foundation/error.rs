use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StitchError::protocol("x")
            .to_string()
            .contains("protocol error:")
    );
    assert!(
        StitchError::payload("x")
            .to_string()
            .contains("payload error:")
    );
    assert!(
        StitchError::palette("x")
            .to_string()
            .contains("palette error:")
    );
    assert!(
        StitchError::capture("x")
            .to_string()
            .contains("capture error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StitchError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
