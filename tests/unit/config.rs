use super::*;

#[test]
fn default_config_validates() {
    let cfg = ComposerConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.canvas_size, 500);
    assert_eq!(cfg.canvas_half(), 250.0);
    assert_eq!(cfg.rotation, RotationPolicy::Full);
}

#[test]
fn large_canvas_preset_validates() {
    let cfg = ComposerConfig::large_canvas();
    cfg.validate().unwrap();
    assert_eq!(cfg.canvas_size, 1024);
    assert_eq!(cfg.rotation, RotationPolicy::Limited { max_deg: 5.0 });
    assert_eq!(cfg.profile_scale, ScaleRange::new(0.6, 1.2));
}

#[test]
fn validate_rejects_degenerate_values() {
    let mut cfg = ComposerConfig::default();
    cfg.canvas_size = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = ComposerConfig::default();
    cfg.profile_scale = ScaleRange::new(2.0, 1.0);
    assert!(cfg.validate().is_err());

    let mut cfg = ComposerConfig::default();
    cfg.wheel_step = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = ComposerConfig::default();
    cfg.safe_area_ratio = 1.5;
    assert!(cfg.validate().is_err());

    let mut cfg = ComposerConfig::default();
    cfg.rotation = RotationPolicy::Limited { max_deg: f64::NAN };
    assert!(cfg.validate().is_err());
}

#[test]
fn config_round_trips_through_json() {
    let cfg = ComposerConfig::large_canvas();
    let json = serde_json::to_string(&cfg).unwrap();
    let back: ComposerConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn background_flattens_to_white() {
    assert_eq!(Background::Transparent.flatten_rgb(), [255, 255, 255]);
    assert_eq!(Background::White.flatten_rgb(), [255, 255, 255]);
}
