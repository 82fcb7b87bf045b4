use crate::assets::decode::PreparedImage;
use crate::config::ComposerConfig;
use crate::foundation::core::{CanvasSpec, Vec2};
use crate::foundation::error::{PurikuraError, PurikuraResult};
use crate::layer::transform::{
    CornerAnchor, LayerKind, LayerTransform, clamp_pan, clamp_rotation, clamp_scale,
};

/// One composable layer: a kind, an optional decoded image and its transform.
///
/// A layer without an image is inert: the compositor skips it and it can never
/// be the active layer.
#[derive(Clone, Debug)]
pub struct Layer {
    pub kind: LayerKind,
    pub image: Option<PreparedImage>,
    pub transform: LayerTransform,
}

impl Layer {
    fn empty(kind: LayerKind) -> Self {
        Self {
            kind,
            image: None,
            transform: LayerTransform::default_for(kind),
        }
    }
}

/// The ordered layer collection the compositor renders and interaction
/// mutates.
///
/// Draw order is fixed Profile → Frame → Badge. All transform mutation funnels
/// through the `commit_*` methods, which route values through the transform
/// model's clamp functions before storing them.
#[derive(Clone, Debug)]
pub struct LayerStack {
    config: ComposerConfig,
    layers: [Layer; 3],
    active: Option<LayerKind>,
}

impl LayerStack {
    pub fn new(config: ComposerConfig) -> PurikuraResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            layers: [
                Layer::empty(LayerKind::Profile),
                Layer::empty(LayerKind::Frame),
                Layer::empty(LayerKind::Badge),
            ],
            active: None,
        })
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// The logical canvas all transforms are expressed in.
    pub fn canvas(&self) -> CanvasSpec {
        CanvasSpec {
            size: self.config.canvas_size,
        }
    }

    /// Layers in draw order.
    pub fn layers(&self) -> &[Layer; 3] {
        &self.layers
    }

    pub fn layer(&self, kind: LayerKind) -> &Layer {
        &self.layers[Self::index(kind)]
    }

    fn layer_mut(&mut self, kind: LayerKind) -> &mut Layer {
        &mut self.layers[Self::index(kind)]
    }

    fn index(kind: LayerKind) -> usize {
        match kind {
            LayerKind::Profile => 0,
            LayerKind::Frame => 1,
            LayerKind::Badge => 2,
        }
    }

    fn enabled(&self, kind: LayerKind) -> bool {
        match kind {
            LayerKind::Profile => self.config.enabled_layers.profile,
            LayerKind::Frame => self.config.enabled_layers.frame,
            LayerKind::Badge => self.config.enabled_layers.badge,
        }
    }

    /// Replace a layer's image, reset its transform to the kind default and
    /// make it the active layer.
    pub fn set_image(&mut self, kind: LayerKind, image: PreparedImage) -> PurikuraResult<()> {
        if !self.enabled(kind) {
            return Err(PurikuraError::validation(format!(
                "{kind:?} layer is disabled in this configuration"
            )));
        }
        let layer = self.layer_mut(kind);
        layer.image = Some(image);
        layer.transform = LayerTransform::default_for(kind);
        self.active = Some(kind);
        Ok(())
    }

    /// Remove a layer's image and reset its transform. Deselects the layer if
    /// it was active, preserving the active-implies-image invariant.
    pub fn clear_image(&mut self, kind: LayerKind) {
        let layer = self.layer_mut(kind);
        layer.image = None;
        layer.transform = LayerTransform::default_for(kind);
        if self.active == Some(kind) {
            self.active = None;
        }
    }

    /// Switch interaction focus to `kind`. No-op when that layer has no image.
    pub fn set_active(&mut self, kind: LayerKind) -> bool {
        if self.layer(kind).image.is_none() {
            return false;
        }
        self.active = Some(kind);
        true
    }

    pub fn active(&self) -> Option<LayerKind> {
        self.active
    }

    pub fn transform(&self, kind: LayerKind) -> &LayerTransform {
        &self.layer(kind).transform
    }

    /// Commit a translate (profile/frame: offset from center; badge: fine
    /// offset from its corner anchor) through pan clamping.
    pub fn commit_translate(&mut self, kind: LayerKind, value: Vec2) {
        let dims = match &self.layer(kind).image {
            Some(img) => (img.width, img.height),
            None => return,
        };
        let scale = self.layer(kind).transform.scale;
        let clamped = clamp_pan(kind, dims, scale, &self.config, value);
        self.layer_mut(kind).transform.translate = clamped;
    }

    /// Commit a scale through the kind's bounds. The profile pan limit
    /// depends on scale, so its translate is re-clamped afterwards.
    pub fn commit_scale(&mut self, kind: LayerKind, value: f64) {
        if self.layer(kind).image.is_none() {
            return;
        }
        let clamped = clamp_scale(kind, &self.config, value);
        self.layer_mut(kind).transform.scale = clamped;
        let translate = self.layer(kind).transform.translate;
        self.commit_translate(kind, translate);
    }

    pub fn commit_rotation(&mut self, kind: LayerKind, value: f64) {
        if self.layer(kind).image.is_none() {
            return;
        }
        self.layer_mut(kind).transform.rotation_deg = clamp_rotation(kind, &self.config, value);
    }

    /// Move the badge to another corner; the fine offset re-zeroes so the
    /// badge lands exactly on the anchor.
    pub fn commit_corner(&mut self, anchor: CornerAnchor) {
        let layer = self.layer_mut(LayerKind::Badge);
        if layer.image.is_none() {
            return;
        }
        layer.transform.corner = Some(anchor);
        layer.transform.translate = Vec2::ZERO;
    }

    /// Restore the kind-default transform without touching the image.
    pub fn reset_transform(&mut self, kind: LayerKind) {
        self.layer_mut(kind).transform = LayerTransform::default_for(kind);
    }

    /// Nudge the profile scale by `steps * wheel_step`, clamped.
    pub(crate) fn nudge_profile_scale(&mut self, steps: i32) {
        let current = self.layer(LayerKind::Profile).transform.scale;
        let next = current + f64::from(steps) * self.config.wheel_step;
        self.commit_scale(LayerKind::Profile, next);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/stack.rs"]
mod tests;
