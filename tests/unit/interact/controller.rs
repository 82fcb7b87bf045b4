use std::sync::Arc;

use super::*;
use crate::assets::decode::PreparedImage;
use crate::config::ComposerConfig;
use crate::layer::transform::clamp_pan;

fn solid_image(width: u32, height: u32) -> PreparedImage {
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(vec![255u8; (width * height * 4) as usize]),
    }
}

fn stack_with_profile() -> LayerStack {
    let mut s = LayerStack::new(ComposerConfig::default()).unwrap();
    s.set_image(LayerKind::Profile, solid_image(100, 100)).unwrap();
    s
}

#[test]
fn pointer_down_requires_an_active_layer() {
    let empty = LayerStack::new(ComposerConfig::default()).unwrap();
    let mut ctl = InteractionController::new();
    assert!(!ctl.pointer_down(&empty, Vec2::new(10.0, 10.0)));
    assert!(!ctl.is_dragging());

    let s = stack_with_profile();
    assert!(ctl.pointer_down(&s, Vec2::new(10.0, 10.0)));
    assert!(ctl.is_dragging());
}

#[test]
fn drag_applies_per_sample_deltas() {
    let mut s = stack_with_profile();
    s.commit_scale(LayerKind::Profile, 0.5); // pan limit 75

    let mut ctl = InteractionController::new();
    assert!(ctl.pointer_down(&s, Vec2::new(100.0, 100.0)));
    assert!(ctl.pointer_move(&mut s, Vec2::new(110.0, 95.0)));
    assert!(ctl.pointer_move(&mut s, Vec2::new(130.0, 95.0)));
    assert_eq!(
        s.transform(LayerKind::Profile).translate,
        Vec2::new(30.0, -5.0)
    );

    ctl.pointer_up();
    assert!(!ctl.is_dragging());
    assert!(!ctl.pointer_move(&mut s, Vec2::new(200.0, 200.0)));
}

#[test]
fn drag_past_the_limit_stays_clamped_and_stable() {
    let mut s = stack_with_profile();
    s.commit_scale(LayerKind::Profile, 0.5); // pan limit 75

    let mut ctl = InteractionController::new();
    ctl.pointer_down(&s, Vec2::new(0.0, 0.0));
    // Long drag far past the safe radius, in many small samples.
    for i in 1..=60 {
        ctl.pointer_move(&mut s, Vec2::new(f64::from(i) * 5.0, 0.0));
    }
    ctl.pointer_up();

    let committed = s.transform(LayerKind::Profile).translate;
    assert_eq!(committed, Vec2::new(75.0, 0.0));
    // Re-clamping the committed value is a no-op.
    let again = clamp_pan(
        LayerKind::Profile,
        (100, 100),
        0.5,
        s.config(),
        committed,
    );
    assert_eq!(again, committed);
}

#[test]
fn cancel_behaves_like_pointer_up() {
    let mut s = stack_with_profile();
    let mut ctl = InteractionController::new();
    ctl.pointer_down(&s, Vec2::new(0.0, 0.0));
    ctl.pointer_cancel();
    assert!(!ctl.is_dragging());
    assert!(!ctl.pointer_move(&mut s, Vec2::new(50.0, 50.0)));
}

#[test]
fn drag_moves_whichever_layer_is_active() {
    let mut s = stack_with_profile();
    s.set_image(LayerKind::Frame, solid_image(100, 100)).unwrap();
    assert_eq!(s.active(), Some(LayerKind::Frame));

    let mut ctl = InteractionController::new();
    ctl.pointer_down(&s, Vec2::new(0.0, 0.0));
    ctl.pointer_move(&mut s, Vec2::new(400.0, 0.0));

    // Frames pan unclamped; the profile layer is untouched.
    assert_eq!(
        s.transform(LayerKind::Frame).translate,
        Vec2::new(400.0, 0.0)
    );
    assert_eq!(s.transform(LayerKind::Profile).translate, Vec2::ZERO);
}

#[test]
fn wheel_zoom_targets_only_the_active_profile_layer() {
    let mut s = stack_with_profile();
    let mut ctl = InteractionController::new();

    assert!(ctl.wheel(&mut s, 1));
    assert!((s.transform(LayerKind::Profile).scale - 0.77).abs() < 1e-12);

    s.set_image(LayerKind::Frame, solid_image(100, 100)).unwrap();
    assert!(!ctl.wheel(&mut s, 1));
    assert_eq!(s.transform(LayerKind::Frame).scale, 1.0);
    assert!((s.transform(LayerKind::Profile).scale - 0.77).abs() < 1e-12);
}

#[test]
fn wheel_five_up_five_down_returns_to_default() {
    let mut s = stack_with_profile();
    let mut ctl = InteractionController::new();

    for _ in 0..5 {
        ctl.wheel(&mut s, 1);
    }
    for _ in 0..5 {
        ctl.wheel(&mut s, -1);
    }
    assert!((s.transform(LayerKind::Profile).scale - 0.75).abs() < 1e-9);
}

#[test]
fn wheel_respects_scale_clamp() {
    let mut s = stack_with_profile();
    let mut ctl = InteractionController::new();
    ctl.wheel(&mut s, 10_000);
    assert_eq!(s.transform(LayerKind::Profile).scale, 3.0);
    ctl.wheel(&mut s, -100_000);
    assert_eq!(s.transform(LayerKind::Profile).scale, 0.1);
}
