use crate::foundation::error::{PurikuraError, PurikuraResult};

/// Rotation behavior for the profile layer.
///
/// The frame and badge layers never rotate regardless of policy.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum RotationPolicy {
    /// Any angle; committed values are wrapped into `[0, 360)`.
    Full,
    /// Fine correction only; committed values clamp to `[-max_deg, +max_deg]`.
    Limited { max_deg: f64 },
}

/// Background painted beneath all layers, and the flatten color for JPEG.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Background {
    #[default]
    Transparent,
    White,
}

impl Background {
    /// Opaque color JPEG output flattens onto (JPEG has no alpha, so the
    /// transparent configuration also flattens to white).
    pub fn flatten_rgb(self) -> [u8; 3] {
        match self {
            Background::Transparent | Background::White => [255, 255, 255],
        }
    }
}

/// Inclusive scale bounds for one layer kind.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScaleRange {
    pub min: f64,
    pub max: f64,
}

impl ScaleRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(self, v: f64) -> f64 {
        v.clamp(self.min, self.max)
    }
}

/// Which layers the host surface exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EnabledLayers {
    pub profile: bool,
    pub frame: bool,
    pub badge: bool,
}

impl Default for EnabledLayers {
    fn default() -> Self {
        Self {
            profile: true,
            frame: true,
            badge: true,
        }
    }
}

/// One configurable core in place of the divergent per-deployment builds.
///
/// Defaults reproduce the 500px canvas with free rotation; the two knobs that
/// drifted across deployments (canvas size, rotation policy, profile scale
/// bounds, wheel step) are explicit here so a single code path serves all of
/// them.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ComposerConfig {
    /// Logical canvas edge length in pixels.
    pub canvas_size: u32,
    /// Profile-layer rotation policy.
    pub rotation: RotationPolicy,
    /// Profile-layer scale bounds.
    pub profile_scale: ScaleRange,
    /// Scale delta applied per wheel tick on the profile layer.
    pub wheel_step: f64,
    /// Extra margin inside the pan-clamp safe radius, in canvas pixels.
    pub pan_margin_px: f64,
    /// Distance from the canvas edge to a badge corner anchor.
    pub badge_corner_margin_px: f64,
    /// Side length of the safe-area guide square relative to the canvas.
    pub safe_area_ratio: f64,
    /// Fill beneath all layers; also the JPEG flatten color.
    pub background: Background,
    /// Layers available in this deployment.
    pub enabled_layers: EnabledLayers,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            canvas_size: 500,
            rotation: RotationPolicy::Full,
            profile_scale: ScaleRange::new(0.1, 3.0),
            wheel_step: 0.02,
            pan_margin_px: 50.0,
            badge_corner_margin_px: 20.0,
            safe_area_ratio: 0.9,
            background: Background::Transparent,
            enabled_layers: EnabledLayers::default(),
        }
    }
}

impl ComposerConfig {
    /// The large-canvas deployment: 1024px, rotation limited to ±5°, tight
    /// profile scale bounds.
    pub fn large_canvas() -> Self {
        Self {
            canvas_size: 1024,
            rotation: RotationPolicy::Limited { max_deg: 5.0 },
            profile_scale: ScaleRange::new(0.6, 1.2),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> PurikuraResult<()> {
        if self.canvas_size == 0 {
            return Err(PurikuraError::validation("canvas_size must be > 0"));
        }
        if !(self.profile_scale.min.is_finite() && self.profile_scale.max.is_finite())
            || self.profile_scale.min <= 0.0
            || self.profile_scale.min > self.profile_scale.max
        {
            return Err(PurikuraError::validation(
                "profile_scale must satisfy 0 < min <= max",
            ));
        }
        if !self.wheel_step.is_finite() || self.wheel_step <= 0.0 {
            return Err(PurikuraError::validation("wheel_step must be > 0"));
        }
        if !self.pan_margin_px.is_finite() || self.pan_margin_px < 0.0 {
            return Err(PurikuraError::validation("pan_margin_px must be >= 0"));
        }
        if !self.badge_corner_margin_px.is_finite() || self.badge_corner_margin_px < 0.0 {
            return Err(PurikuraError::validation(
                "badge_corner_margin_px must be >= 0",
            ));
        }
        if !self.safe_area_ratio.is_finite()
            || self.safe_area_ratio <= 0.0
            || self.safe_area_ratio > 1.0
        {
            return Err(PurikuraError::validation(
                "safe_area_ratio must be in (0, 1]",
            ));
        }
        if let RotationPolicy::Limited { max_deg } = self.rotation
            && (!max_deg.is_finite() || max_deg < 0.0)
        {
            return Err(PurikuraError::validation(
                "rotation limit must be finite and >= 0",
            ));
        }
        Ok(())
    }

    pub fn canvas_half(&self) -> f64 {
        f64::from(self.canvas_size) / 2.0
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
