use std::sync::Arc;

use super::*;
use crate::assets::decode::PreparedImage;
use crate::config::EnabledLayers;

fn solid_image(width: u32, height: u32) -> PreparedImage {
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(vec![255u8; (width * height * 4) as usize]),
    }
}

fn stack() -> LayerStack {
    LayerStack::new(ComposerConfig::default()).unwrap()
}

#[test]
fn new_stack_has_no_active_layer() {
    let s = stack();
    assert_eq!(s.active(), None);
    for layer in s.layers() {
        assert!(layer.image.is_none());
    }
}

#[test]
fn set_image_resets_transform_and_activates() {
    let mut s = stack();
    s.commit_scale(LayerKind::Profile, 2.0);
    s.set_image(LayerKind::Profile, solid_image(10, 10)).unwrap();

    assert_eq!(s.active(), Some(LayerKind::Profile));
    let t = s.transform(LayerKind::Profile);
    assert_eq!(t.scale, 0.75);
    assert_eq!(t.rotation_deg, 0.0);
    assert_eq!(t.translate, Vec2::ZERO);
}

#[test]
fn badge_default_transform_is_anchored_bottom_right() {
    let mut s = stack();
    s.set_image(LayerKind::Badge, solid_image(8, 8)).unwrap();
    let t = s.transform(LayerKind::Badge);
    assert_eq!(t.corner, Some(CornerAnchor::BottomRight));
    assert_eq!(t.scale, 0.15);
    assert_eq!(t.translate, Vec2::ZERO);
}

#[test]
fn set_active_is_noop_without_image() {
    let mut s = stack();
    assert!(!s.set_active(LayerKind::Frame));
    assert_eq!(s.active(), None);

    s.set_image(LayerKind::Frame, solid_image(4, 4)).unwrap();
    s.set_image(LayerKind::Profile, solid_image(4, 4)).unwrap();
    assert_eq!(s.active(), Some(LayerKind::Profile));
    assert!(s.set_active(LayerKind::Frame));
    assert_eq!(s.active(), Some(LayerKind::Frame));
}

#[test]
fn clearing_active_layer_image_deselects_it() {
    let mut s = stack();
    s.set_image(LayerKind::Profile, solid_image(4, 4)).unwrap();
    assert_eq!(s.active(), Some(LayerKind::Profile));

    s.clear_image(LayerKind::Profile);
    assert_eq!(s.active(), None);
    assert!(s.layer(LayerKind::Profile).image.is_none());
}

#[test]
fn clearing_inactive_layer_keeps_active_selection() {
    let mut s = stack();
    s.set_image(LayerKind::Frame, solid_image(4, 4)).unwrap();
    s.set_image(LayerKind::Profile, solid_image(4, 4)).unwrap();

    s.clear_image(LayerKind::Frame);
    assert_eq!(s.active(), Some(LayerKind::Profile));
}

#[test]
fn commits_route_through_clamps() {
    let mut s = stack();
    s.set_image(LayerKind::Profile, solid_image(100, 100)).unwrap();

    s.commit_scale(LayerKind::Profile, 99.0);
    assert_eq!(s.transform(LayerKind::Profile).scale, 3.0);

    s.commit_rotation(LayerKind::Profile, 365.0);
    assert_eq!(s.transform(LayerKind::Profile).rotation_deg, 5.0);

    // Square image at scale 0.5: limit = 250 - (250*0.5 + 50) = 75.
    s.commit_scale(LayerKind::Profile, 0.5);
    s.commit_translate(LayerKind::Profile, Vec2::new(1000.0, -1000.0));
    assert_eq!(
        s.transform(LayerKind::Profile).translate,
        Vec2::new(75.0, -75.0)
    );
}

#[test]
fn growing_scale_tightens_a_committed_pan() {
    let mut s = stack();
    s.set_image(LayerKind::Profile, solid_image(100, 100)).unwrap();

    s.commit_scale(LayerKind::Profile, 0.5);
    s.commit_translate(LayerKind::Profile, Vec2::new(75.0, 75.0));
    // Scale 0.6 shrinks the limit to 250 - (150 + 50) = 50.
    s.commit_scale(LayerKind::Profile, 0.6);
    assert_eq!(
        s.transform(LayerKind::Profile).translate,
        Vec2::new(50.0, 50.0)
    );
}

#[test]
fn commit_corner_re_zeroes_fine_offset() {
    let mut s = stack();
    s.set_image(LayerKind::Badge, solid_image(8, 8)).unwrap();
    s.commit_translate(LayerKind::Badge, Vec2::new(12.0, -7.0));

    s.commit_corner(CornerAnchor::TopLeft);
    let t = s.transform(LayerKind::Badge);
    assert_eq!(t.corner, Some(CornerAnchor::TopLeft));
    assert_eq!(t.translate, Vec2::ZERO);
}

#[test]
fn commits_on_empty_layers_are_ignored() {
    let mut s = stack();
    s.commit_scale(LayerKind::Frame, 1.7);
    s.commit_translate(LayerKind::Frame, Vec2::new(5.0, 5.0));
    let t = s.transform(LayerKind::Frame);
    assert_eq!(t.scale, 1.0);
    assert_eq!(t.translate, Vec2::ZERO);
}

#[test]
fn disabled_layers_reject_images() {
    let cfg = ComposerConfig {
        enabled_layers: EnabledLayers {
            profile: true,
            frame: true,
            badge: false,
        },
        ..ComposerConfig::default()
    };
    let mut s = LayerStack::new(cfg).unwrap();
    assert!(matches!(
        s.set_image(LayerKind::Badge, solid_image(4, 4)),
        Err(PurikuraError::Validation(_))
    ));
}
