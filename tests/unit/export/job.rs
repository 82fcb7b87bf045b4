use std::sync::Arc;

use super::*;
use crate::assets::decode::PreparedImage;
use crate::config::ComposerConfig;
use crate::export::encoder::VecSink;

fn solid_image(width: u32, height: u32) -> PreparedImage {
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(vec![255u8; (width * height * 4) as usize]),
    }
}

fn ready_stack() -> LayerStack {
    let mut s = LayerStack::new(ComposerConfig::default()).unwrap();
    s.set_image(LayerKind::Profile, solid_image(600, 600)).unwrap();
    s
}

#[test]
fn export_without_profile_image_is_rejected() {
    let stack = LayerStack::new(ComposerConfig::default()).unwrap();
    let exporter = Exporter::new();
    let mut sink = VecSink::new();

    let err = exporter
        .export(&stack, &ExportRequest::default(), None, &mut sink)
        .unwrap_err();
    assert!(matches!(err, PurikuraError::InputRejected(_)));
    assert!(sink.deliveries().is_empty());
    assert!(!exporter.is_busy());
}

#[test]
fn export_delivers_a_png_of_the_requested_size() {
    let stack = ready_stack();
    let exporter = Exporter::new();
    let mut sink = VecSink::new();

    let request = ExportRequest {
        size: OutputSize::Px120,
        format: OutputFormat::Png,
        jpeg_quality: 95,
    };
    exporter.export(&stack, &request, None, &mut sink).unwrap();

    let (name, bytes) = &sink.deliveries()[0];
    assert_eq!(name, "profile_120.png");
    let decoded = image::load_from_memory(bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (120, 120));
    assert!(!exporter.is_busy());
}

#[test]
fn timestamp_feeds_the_file_name() {
    let stack = ready_stack();
    let exporter = Exporter::new();
    let mut sink = VecSink::new();

    exporter
        .export(&stack, &ExportRequest::default(), Some(1_700_000_000_000), &mut sink)
        .unwrap();
    assert_eq!(sink.deliveries()[0].0, "profile_413px_1700000000000.png");
}

#[test]
fn exports_are_byte_identical_across_runs() {
    let stack = ready_stack();
    let exporter = Exporter::new();

    let mut a = VecSink::new();
    let mut b = VecSink::new();
    exporter.export(&stack, &ExportRequest::default(), None, &mut a).unwrap();
    exporter.export(&stack, &ExportRequest::default(), None, &mut b).unwrap();
    assert_eq!(a.deliveries()[0].1, b.deliveries()[0].1);
}

/// A sink that tries to start a second export from inside the first one's
/// delivery, the way a misbehaving UI callback would.
struct ReentrantSink<'a> {
    exporter: &'a Exporter,
    stack: &'a LayerStack,
    inner_result: Option<PurikuraResult<()>>,
}

impl ExportSink for ReentrantSink<'_> {
    fn deliver(&mut self, _bytes: Vec<u8>, _file_name: &str) -> PurikuraResult<()> {
        let mut inner_sink = VecSink::new();
        self.inner_result = Some(self.exporter.export(
            self.stack,
            &ExportRequest::default(),
            None,
            &mut inner_sink,
        ));
        Ok(())
    }
}

#[test]
fn reentrant_export_fails_fast_with_busy() {
    let stack = ready_stack();
    let exporter = Exporter::new();
    let mut sink = ReentrantSink {
        exporter: &exporter,
        stack: &stack,
        inner_result: None,
    };

    exporter
        .export(&stack, &ExportRequest::default(), None, &mut sink)
        .unwrap();
    assert!(matches!(
        sink.inner_result,
        Some(Err(PurikuraError::ExportBusy))
    ));
    // The failed inner attempt must not wedge the flag.
    assert!(!exporter.is_busy());
    let mut again = VecSink::new();
    exporter
        .export(&stack, &ExportRequest::default(), None, &mut again)
        .unwrap();
}
