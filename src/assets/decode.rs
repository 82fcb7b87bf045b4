use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use crate::foundation::error::{PurikuraError, PurikuraResult};
use crate::layer::transform::LayerKind;

/// Decoded raster image in premultiplied RGBA8 form, shared by value.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Container formats accepted as layer uploads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    WebP,
}

impl SourceFormat {
    pub fn mime(self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "image/jpeg",
            SourceFormat::Png => "image/png",
            SourceFormat::WebP => "image/webp",
        }
    }
}

/// Formats a layer kind accepts: the profile photo may be opaque, but frame
/// and badge overlays must come from alpha-capable containers.
pub fn allowed_formats(kind: LayerKind) -> &'static [SourceFormat] {
    match kind {
        LayerKind::Profile => &[SourceFormat::Jpeg, SourceFormat::Png, SourceFormat::WebP],
        LayerKind::Frame | LayerKind::Badge => &[SourceFormat::Png, SourceFormat::WebP],
    }
}

/// Identify the container format from magic bytes.
pub fn sniff_format(bytes: &[u8]) -> PurikuraResult<SourceFormat> {
    if bytes.is_empty() {
        return Err(PurikuraError::input_rejected("no image data provided"));
    }
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Jpeg) => Ok(SourceFormat::Jpeg),
        Ok(image::ImageFormat::Png) => Ok(SourceFormat::Png),
        Ok(image::ImageFormat::WebP) => Ok(SourceFormat::WebP),
        Ok(other) => Err(PurikuraError::input_rejected(format!(
            "unsupported image format {other:?}; use JPEG, PNG or WebP"
        ))),
        Err(_) => Err(PurikuraError::input_rejected(
            "unrecognized image data; use JPEG, PNG or WebP",
        )),
    }
}

/// Decode an upload for `kind`, enforcing the per-layer format allowlist.
///
/// Rejection happens before any decode work, so a bad upload leaves the
/// caller's layer state untouched.
pub fn decode_layer_image(kind: LayerKind, bytes: &[u8]) -> PurikuraResult<PreparedImage> {
    let format = sniff_format(bytes)?;
    if !allowed_formats(kind).contains(&format) {
        return Err(PurikuraError::input_rejected(format!(
            "{} is not accepted for this layer; use a transparent PNG or WebP",
            format.mime()
        )));
    }
    decode_image(bytes)
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> PurikuraResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| PurikuraError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        for c in 0..3 {
            let v = (u16::from(px[c]) * 255 + a / 2) / a;
            px[c] = v.min(255) as u8;
        }
    }
}

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Serialize an image as the `image/png;base64` data URI used by saved-asset
/// records.
pub fn to_png_data_uri(img: &PreparedImage) -> PurikuraResult<String> {
    let mut straight = img.rgba8_premul.as_slice().to_vec();
    unpremultiply_rgba8_in_place(&mut straight);

    let buf = image::RgbaImage::from_raw(img.width, img.height, straight)
        .ok_or_else(|| PurikuraError::encode("image buffer does not match dimensions"))?;
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(buf)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .context("encode saved asset as png")?;

    Ok(format!(
        "{PNG_DATA_URI_PREFIX}{}",
        BASE64_STANDARD.encode(&bytes)
    ))
}

/// Extract the encoded image bytes from a base64 data URI.
pub fn data_uri_bytes(uri: &str) -> PurikuraResult<Vec<u8>> {
    if !uri.starts_with("data:") || !uri.contains(";base64,") {
        return Err(PurikuraError::decode("expected a base64 image data URI"));
    }
    let payload = uri
        .splitn(2, ',')
        .nth(1)
        .ok_or_else(|| PurikuraError::decode("data URI has no payload"))?;
    BASE64_STANDARD
        .decode(payload)
        .map_err(|e| PurikuraError::decode(format!("invalid base64 payload: {e}")))
}

/// Decode a saved asset's data URI back into a layer image.
pub fn decode_data_uri(kind: LayerKind, uri: &str) -> PurikuraResult<PreparedImage> {
    let bytes = data_uri_bytes(uri)?;
    decode_layer_image(kind, &bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
