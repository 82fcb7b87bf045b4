use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PurikuraError::input_rejected("x")
            .to_string()
            .contains("input rejected:")
    );
    assert!(PurikuraError::decode("x").to_string().contains("decode error:"));
    assert!(
        PurikuraError::resample("x")
            .to_string()
            .contains("resample error:")
    );
    assert!(
        PurikuraError::persistence("x")
            .to_string()
            .contains("persistence error:")
    );
    assert!(
        PurikuraError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn export_busy_has_fixed_message() {
    assert_eq!(
        PurikuraError::ExportBusy.to_string(),
        "export already in progress"
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PurikuraError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
