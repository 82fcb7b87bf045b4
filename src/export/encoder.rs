use image::ImageEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;

use crate::assets::decode::unpremultiply_rgba8_in_place;
use crate::config::Background;
use crate::foundation::core::Surface;
use crate::foundation::error::{PurikuraError, PurikuraResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};

/// Output raster edge length; the exporter produces exactly these two sizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OutputSize {
    /// 120×120, the ring-avatar slot.
    Px120,
    /// 413×413, the social-profile slot.
    #[default]
    Px413,
}

impl OutputSize {
    pub fn pixels(self) -> u32 {
        match self {
            OutputSize::Px120 => 120,
            OutputSize::Px413 => 413,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OutputFormat {
    /// Lossless, alpha-preserving.
    #[default]
    Png,
    /// Lossy, quality-parameterized; alpha is flattened away.
    Jpeg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

/// Encode a composited surface to its final byte stream.
///
/// PNG unpremultiplies and keeps the alpha channel intact. JPEG flattens the
/// premultiplied pixels onto `background` (transparent config flattens onto
/// white, since JPEG has no alpha) and encodes three channels at `quality`
/// (0–100).
pub fn encode(
    surface: &Surface,
    format: OutputFormat,
    quality: u8,
    background: Background,
) -> PurikuraResult<Vec<u8>> {
    if quality > 100 {
        return Err(PurikuraError::validation("jpeg quality must be 0..=100"));
    }

    let mut bytes = Vec::new();
    match format {
        OutputFormat::Png => {
            let mut straight = surface.data().to_vec();
            unpremultiply_rgba8_in_place(&mut straight);
            PngEncoder::new(&mut bytes)
                .write_image(
                    &straight,
                    surface.width(),
                    surface.height(),
                    image::ExtendedColorType::Rgba8,
                )
                .map_err(|e| PurikuraError::encode(format!("png encode: {e}")))?;
        }
        OutputFormat::Jpeg => {
            let rgb = flatten_to_rgb(surface, background);
            JpegEncoder::new_with_quality(&mut bytes, quality)
                .write_image(
                    &rgb,
                    surface.width(),
                    surface.height(),
                    image::ExtendedColorType::Rgb8,
                )
                .map_err(|e| PurikuraError::encode(format!("jpeg encode: {e}")))?;
        }
    }
    Ok(bytes)
}

/// Composite premultiplied pixels onto the flatten background and drop alpha.
fn flatten_to_rgb(surface: &Surface, background: Background) -> Vec<u8> {
    let bg = background.flatten_rgb();
    let mut rgb = Vec::with_capacity((surface.width() as usize) * (surface.height() as usize) * 3);
    for px in surface.data().chunks_exact(4) {
        let inv = 255u16 - u16::from(px[3]);
        for c in 0..3 {
            rgb.push(add_sat_u8(px[c], mul_div255_u8(u16::from(bg[c]), inv)));
        }
    }
    rgb
}

/// Download file name: `profile_{size}.{ext}`, or the timestamped variant
/// `profile_{size}px_{timestamp}.{ext}` when the caller supplies a timestamp
/// (this crate never reads a clock).
pub fn file_name(size: OutputSize, format: OutputFormat, timestamp_ms: Option<u64>) -> String {
    match timestamp_ms {
        Some(ts) => format!(
            "profile_{}px_{}.{}",
            size.pixels(),
            ts,
            format.extension()
        ),
        None => format!("profile_{}.{}", size.pixels(), format.extension()),
    }
}

/// Receives the final encoded bytes. Delivery (browser download, file write,
/// upload) is the host's concern, not this crate's.
pub trait ExportSink {
    fn deliver(&mut self, bytes: Vec<u8>, file_name: &str) -> PurikuraResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct VecSink {
    deliveries: Vec<(String, Vec<u8>)>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> &[(String, Vec<u8>)] {
        &self.deliveries
    }
}

impl ExportSink for VecSink {
    fn deliver(&mut self, bytes: Vec<u8>, file_name: &str) -> PurikuraResult<()> {
        self.deliveries.push((file_name.to_string(), bytes));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/encoder.rs"]
mod tests;
