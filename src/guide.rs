//! A standalone walkthrough of purikura's concepts and architecture.
//!
//! # The logical canvas
//!
//! Everything is arranged on a fixed square canvas (500px by default,
//! configurable via [`ComposerConfig::canvas_size`]). Layer transforms are
//! expressed with the origin at the canvas center; pixel space puts `(0, 0)`
//! at the top-left. The interactive preview renders at canvas resolution; the
//! export path re-renders at the same resolution and then downsamples, so the
//! preview is never the export source.
//!
//! # Layers and transforms
//!
//! Three layers exist, drawn in fixed order: profile photo, frame overlay,
//! corner badge. Each binds an optional decoded [`PreparedImage`] to a
//! [`LayerTransform`]. A layer without an image is inert. Exactly one layer at
//! a time is *active* — the one pointer input targets — and an active layer
//! always has an image; clearing the active layer's image deselects it.
//!
//! Transform mutation always flows through the clamp functions in
//! [`clamp_scale`], [`clamp_rotation`] and [`clamp_pan`]:
//!
//! - scale bounds are per layer kind (profile bounds come from config),
//! - only the profile layer rotates, under the configured
//!   [`RotationPolicy`],
//! - profile pan is clamped to a safe radius so the photo cannot drift off
//!   the visible canvas; frames and badges pan freely.
//!
//! The badge is positioned by a [`CornerAnchor`] plus a fine offset, so
//! "bottom-right with a nudge" survives canvas-size changes.
//!
//! # Interaction
//!
//! [`InteractionController`] is a small gesture state machine: pointer down
//! captures, move commits per-sample deltas through the clamps, up/cancel
//! release. Wheel ticks zoom the profile layer only. Slider-style input goes
//! straight to the stack's `commit_*` methods and bypasses pointer state.
//!
//! # Compositing and export
//!
//! [`render`] produces a premultiplied-RGBA8 [`Surface`]: background, then
//! each layer under its affine (cover fit, rotation, uniform scale), then
//! optional guides. Guides never reach exported pixels because the export
//! path renders a guide-free composite from scratch.
//!
//! [`Exporter`] drives composite → [`Resampler`] (separable Lanczos-3 with a
//! fixed mild unsharp pass) → [`encode`] (PNG keeps alpha, JPEG flattens) →
//! [`ExportSink`]. A busy flag rejects re-entrant exports; everything in the
//! pipeline is deterministic for a given stack.
//!
//! # Saved assets
//!
//! Frame/badge templates persist through the [`AssetStore`] capability:
//! [`LocalAssetStore`] (JSON collections on disk), [`RemoteAssetStore`]
//! (HTTP + `x-api-key`), or [`FallbackStore`] which prefers the remote
//! service and silently falls back to the local library when it is
//! unreachable.
//!
//! [`ComposerConfig::canvas_size`]: crate::ComposerConfig
//! [`PreparedImage`]: crate::PreparedImage
//! [`LayerTransform`]: crate::LayerTransform
//! [`clamp_scale`]: crate::clamp_scale
//! [`clamp_rotation`]: crate::clamp_rotation
//! [`clamp_pan`]: crate::clamp_pan
//! [`RotationPolicy`]: crate::RotationPolicy
//! [`CornerAnchor`]: crate::CornerAnchor
//! [`InteractionController`]: crate::InteractionController
//! [`render`]: crate::render
//! [`Surface`]: crate::Surface
//! [`Exporter`]: crate::Exporter
//! [`Resampler`]: crate::Resampler
//! [`encode`]: crate::encode
//! [`ExportSink`]: crate::ExportSink
//! [`AssetStore`]: crate::AssetStore
//! [`LocalAssetStore`]: crate::LocalAssetStore
//! [`RemoteAssetStore`]: crate::RemoteAssetStore
//! [`FallbackStore`]: crate::FallbackStore
