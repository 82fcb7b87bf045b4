use crate::config::{ComposerConfig, RotationPolicy, ScaleRange};
use crate::foundation::core::Vec2;

/// The three composable layers, in fixed draw order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LayerKind {
    Profile,
    Frame,
    Badge,
}

impl LayerKind {
    pub const DRAW_ORDER: [LayerKind; 3] = [LayerKind::Profile, LayerKind::Frame, LayerKind::Badge];
}

/// Canvas corner a badge is anchored to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerAnchor {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl CornerAnchor {
    /// Offset of the anchor point from the canvas center, `margin` pixels in
    /// from both edges.
    pub fn offset(self, canvas_size: u32, margin: f64) -> Vec2 {
        let half = f64::from(canvas_size) / 2.0;
        match self {
            CornerAnchor::TopLeft => Vec2::new(-half + margin, -half + margin),
            CornerAnchor::TopRight => Vec2::new(half - margin, -half + margin),
            CornerAnchor::BottomLeft => Vec2::new(-half + margin, half - margin),
            CornerAnchor::BottomRight => Vec2::new(half - margin, half - margin),
        }
    }
}

pub const FRAME_SCALE: ScaleRange = ScaleRange::new(0.5, 2.0);
pub const BADGE_SCALE: ScaleRange = ScaleRange::new(0.05, 0.5);

pub const PROFILE_DEFAULT_SCALE: f64 = 0.75;
pub const FRAME_DEFAULT_SCALE: f64 = 1.0;
pub const BADGE_DEFAULT_SCALE: f64 = 0.15;

/// Per-layer affine state, expressed in logical-canvas coordinates with the
/// origin at the canvas center.
///
/// For the profile and frame layers `translate` is the offset from the canvas
/// center. For the badge layer the position is `corner` anchor plus
/// `translate` as a fine offset; `corner` is `None` for the other kinds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerTransform {
    pub translate: Vec2,
    pub scale: f64,
    pub rotation_deg: f64,
    pub corner: Option<CornerAnchor>,
}

impl LayerTransform {
    /// The transform a layer resets to when its image is (re)loaded.
    pub fn default_for(kind: LayerKind) -> Self {
        match kind {
            LayerKind::Profile => Self {
                translate: Vec2::ZERO,
                scale: PROFILE_DEFAULT_SCALE,
                rotation_deg: 0.0,
                corner: None,
            },
            LayerKind::Frame => Self {
                translate: Vec2::ZERO,
                scale: FRAME_DEFAULT_SCALE,
                rotation_deg: 0.0,
                corner: None,
            },
            LayerKind::Badge => Self {
                translate: Vec2::ZERO,
                scale: BADGE_DEFAULT_SCALE,
                rotation_deg: 0.0,
                corner: Some(CornerAnchor::default()),
            },
        }
    }
}

/// Clamp a scale value to the bounds for `kind`. Idempotent.
pub fn clamp_scale(kind: LayerKind, cfg: &ComposerConfig, value: f64) -> f64 {
    let range = match kind {
        LayerKind::Profile => cfg.profile_scale,
        LayerKind::Frame => FRAME_SCALE,
        LayerKind::Badge => BADGE_SCALE,
    };
    range.clamp(value)
}

/// Clamp (or wrap) a rotation in degrees for `kind`.
///
/// Only the profile layer rotates; everything else is pinned to 0.
pub fn clamp_rotation(kind: LayerKind, cfg: &ComposerConfig, value: f64) -> f64 {
    if kind != LayerKind::Profile {
        return 0.0;
    }
    match cfg.rotation {
        RotationPolicy::Full => value.rem_euclid(360.0),
        RotationPolicy::Limited { max_deg } => value.clamp(-max_deg, max_deg),
    }
}

/// Clamp a pan offset so the profile image cannot reveal empty canvas.
///
/// The safe limit is `canvas_half - (short_edge_ratio * canvas_half * scale +
/// margin)`, floored at zero: the shorter-edge ratio approximates the drawn
/// image's half-extent under cover fit. Frame and badge layers pan freely.
/// Idempotent: re-clamping a clamped value returns it unchanged.
pub fn clamp_pan(
    kind: LayerKind,
    image_dims: (u32, u32),
    scale: f64,
    cfg: &ComposerConfig,
    pan: Vec2,
) -> Vec2 {
    if kind != LayerKind::Profile {
        return pan;
    }
    let half = cfg.canvas_half();
    let (w, h) = (f64::from(image_dims.0), f64::from(image_dims.1));
    if w <= 0.0 || h <= 0.0 {
        return Vec2::ZERO;
    }
    let short_edge_ratio = w.min(h) / w.max(h);
    let covered = short_edge_ratio * half * scale + cfg.pan_margin_px;
    let limit = (half - covered).max(0.0);
    Vec2::new(pan.x.clamp(-limit, limit), pan.y.clamp(-limit, limit))
}
