//! Purikura is a layered profile-image composition and export engine.
//!
//! It layers a profile photo, an optional decorative frame and an optional
//! corner badge on a fixed square logical canvas, applies per-layer affine
//! transforms driven by interactive input, and exports the composite as a
//! 120px or 413px PNG/JPEG through a high-quality Lanczos downsample.
//!
//! # Pipeline overview
//!
//! 1. **Load**: image bytes -> [`PreparedImage`] (format allowlist, decode,
//!    premultiply)
//! 2. **Arrange**: [`LayerStack`] + [`InteractionController`] mutate per-layer
//!    [`LayerTransform`]s through the clamp functions
//! 3. **Composite**: [`render`] draws the stack onto a [`Surface`]
//!    deterministically (preview with guides, export without)
//! 4. **Export**: [`Exporter`] resamples with [`Resampler`] and encodes via
//!    [`encode`] into an [`ExportSink`]
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: compositing and resampling are pure and
//!   stable for a given input, enabling golden-image tests.
//! - **No IO in the render path**: decoding and persistence happen at the
//!   edges; the host UI owns file pickers, downloads and the event loop.
//! - **Premultiplied RGBA8** end-to-end: every surface holds premultiplied
//!   pixels; straight alpha appears only at the encode boundary.
#![forbid(unsafe_code)]

mod assets;
mod config;
mod export;
mod foundation;
mod interact;
mod layer;
mod render;

/// High-level, standalone documentation for the crate's concepts.
pub mod guide;

pub use assets::decode::{
    PreparedImage, SourceFormat, allowed_formats, data_uri_bytes, decode_data_uri, decode_image,
    decode_layer_image, sniff_format, to_png_data_uri,
};
pub use assets::store::{
    AssetKind, AssetStore, FallbackStore, LocalAssetStore, RemoteAssetStore, SavedAsset,
};
pub use config::{Background, ComposerConfig, EnabledLayers, RotationPolicy, ScaleRange};
pub use export::encoder::{ExportSink, OutputFormat, OutputSize, VecSink, encode, file_name};
pub use export::job::{ExportRequest, Exporter};
pub use foundation::core::{Affine, CanvasSpec, Point, Rect, Rgba8Premul, Surface, Vec2};
pub use foundation::error::{PurikuraError, PurikuraResult};
pub use interact::controller::InteractionController;
pub use layer::stack::{Layer, LayerStack};
pub use layer::transform::{
    BADGE_SCALE, CornerAnchor, FRAME_SCALE, LayerKind, LayerTransform, clamp_pan, clamp_rotation,
    clamp_scale,
};
pub use render::compositor::{GuideOptions, render};
pub use render::resample::Resampler;
