use std::sync::atomic::{AtomicBool, Ordering};

use crate::export::encoder::{self, ExportSink, OutputFormat, OutputSize};
use crate::foundation::error::{PurikuraError, PurikuraResult};
use crate::layer::stack::LayerStack;
use crate::layer::transform::LayerKind;
use crate::render::compositor::{self, GuideOptions};
use crate::render::resample::Resampler;

/// What to export: size, container, and JPEG quality (ignored for PNG).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExportRequest {
    pub size: OutputSize,
    pub format: OutputFormat,
    pub jpeg_quality: u8,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            size: OutputSize::default(),
            format: OutputFormat::default(),
            jpeg_quality: 95,
        }
    }
}

/// Drives the one-shot export pipeline: full-resolution composite without
/// guides, Lanczos resample to the requested size, encode, deliver to the
/// sink.
///
/// The exporter owns its resampler explicitly (no shared module state) and a
/// busy flag keyed on the export operation: a second export while one is in
/// flight fails fast with [`PurikuraError::ExportBusy`] instead of queueing.
/// The flag clears on every path, including errors, so a failed export never
/// wedges the UI.
#[derive(Debug, Default)]
pub struct Exporter {
    resampler: Resampler,
    busy: AtomicBool,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Run a full export. `timestamp_ms` feeds the file-name convention and
    /// comes from the caller so the pipeline itself stays deterministic.
    #[tracing::instrument(skip(self, stack, sink), fields(size = request.size.pixels()))]
    pub fn export(
        &self,
        stack: &LayerStack,
        request: &ExportRequest,
        timestamp_ms: Option<u64>,
        sink: &mut dyn ExportSink,
    ) -> PurikuraResult<()> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(PurikuraError::ExportBusy);
        }
        let result = self.run(stack, request, timestamp_ms, sink);
        self.busy.store(false, Ordering::SeqCst);
        result
    }

    fn run(
        &self,
        stack: &LayerStack,
        request: &ExportRequest,
        timestamp_ms: Option<u64>,
        sink: &mut dyn ExportSink,
    ) -> PurikuraResult<()> {
        if stack.layer(LayerKind::Profile).image.is_none() {
            return Err(PurikuraError::input_rejected(
                "a profile image is required before exporting",
            ));
        }

        let full = compositor::render(stack, GuideOptions::none())?;
        let resampled = self.resampler.resample(&full, request.size.pixels())?;
        let bytes = encoder::encode(
            &resampled,
            request.format,
            request.jpeg_quality,
            stack.config().background,
        )?;
        let name = encoder::file_name(request.size, request.format, timestamp_ms);
        sink.deliver(bytes, &name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/job.rs"]
mod tests;
