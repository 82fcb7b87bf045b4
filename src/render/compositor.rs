use crate::assets::decode::PreparedImage;
use crate::config::{Background, ComposerConfig};
use crate::foundation::core::{Affine, Point, Rgba8Premul, Surface, Vec2};
use crate::foundation::error::PurikuraResult;
use crate::foundation::math::{add_sat_u8, mul_div255_u8};
use crate::layer::stack::{Layer, LayerStack};
use crate::layer::transform::LayerKind;

/// Overlay guides drawn on top of the preview composite.
///
/// The export path always renders with all guides off; guides are never
/// stripped from pixels after the fact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GuideOptions {
    pub grid: bool,
    pub thirds: bool,
    pub safe_area: bool,
    pub crosshair: bool,
}

impl GuideOptions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            grid: true,
            thirds: true,
            safe_area: true,
            crosshair: true,
        }
    }
}

const GRID_COLOR: Rgba8Premul = Rgba8Premul {
    r: 228,
    g: 228,
    b: 231,
    a: 255,
};
const THIRDS_COLOR: Rgba8Premul = Rgba8Premul {
    r: 161,
    g: 161,
    b: 170,
    a: 255,
};
const SAFE_AREA_COLOR: Rgba8Premul = Rgba8Premul {
    r: 59,
    g: 130,
    b: 246,
    a: 255,
};

/// Render the layer stack onto the logical canvas.
///
/// Fully deterministic: the same stack and guide options always produce
/// byte-identical pixels. Background first, then each layer with an image in
/// draw order, guides last.
pub fn render(stack: &LayerStack, guides: GuideOptions) -> PurikuraResult<Surface> {
    let cfg = stack.config();
    let size = cfg.canvas_size;
    let mut surface = Surface::new(size, size)?;

    match cfg.background {
        Background::Transparent => {}
        Background::White => surface.fill(Rgba8Premul::WHITE),
    }

    for layer in stack.layers() {
        let Some(image) = &layer.image else {
            continue;
        };
        let affine = layer_affine(layer, image, cfg);
        draw_image(&mut surface, image, affine);
    }

    draw_guides(&mut surface, cfg, guides);
    Ok(surface)
}

/// Source-pixel-space to canvas-pixel-space transform for one layer.
///
/// Cover fit: the image's shorter edge spans the full canvas dimension at
/// scale 1, so the canvas never shows gaps at or above default scale. Frames
/// and badges are authored as canvas-filling squares and drawn as such.
fn layer_affine(layer: &Layer, image: &PreparedImage, cfg: &ComposerConfig) -> Affine {
    let size = f64::from(cfg.canvas_size);
    let center = Point::new(size / 2.0, size / 2.0);
    let t = &layer.transform;

    let position = match t.corner {
        Some(corner) => {
            center + corner.offset(cfg.canvas_size, cfg.badge_corner_margin_px) + t.translate
        }
        None => center + t.translate,
    };

    let (src_w, src_h) = (f64::from(image.width), f64::from(image.height));
    let (draw_w, draw_h) = match layer.kind {
        LayerKind::Profile => {
            let k = size / src_w.min(src_h);
            (src_w * k, src_h * k)
        }
        LayerKind::Frame | LayerKind::Badge => (size, size),
    };

    Affine::translate(position.to_vec2())
        * Affine::rotate(t.rotation_deg.to_radians())
        * Affine::scale(t.scale)
        * Affine::translate(Vec2::new(-draw_w / 2.0, -draw_h / 2.0))
        * Affine::scale_non_uniform(draw_w / src_w, draw_h / src_h)
}

/// Draw `image` under `affine` with bilinear sampling and premultiplied
/// source-over blending.
fn draw_image(surface: &mut Surface, image: &PreparedImage, affine: Affine) {
    let inv = affine.inverse();
    let (sw, sh) = (f64::from(image.width), f64::from(image.height));

    // Scan only the transformed bounding box.
    let corners = [
        affine * Point::new(0.0, 0.0),
        affine * Point::new(sw, 0.0),
        affine * Point::new(0.0, sh),
        affine * Point::new(sw, sh),
    ];
    let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = corners
        .iter()
        .map(|p| p.x)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = corners
        .iter()
        .map(|p| p.y)
        .fold(f64::NEG_INFINITY, f64::max);

    let x0 = min_x.floor().max(0.0) as u32;
    let y0 = min_y.floor().max(0.0) as u32;
    let x1 = (max_x.ceil().max(0.0) as u32).min(surface.width());
    let y1 = (max_y.ceil().max(0.0) as u32).min(surface.height());

    let width = surface.width() as usize;
    let src = image.rgba8_premul.as_slice();
    let data = surface.data_mut();

    for y in y0..y1 {
        for x in x0..x1 {
            let p = inv * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let px = bilinear_sample(src, image.width, image.height, p.x - 0.5, p.y - 0.5);
            if px[3] == 0 {
                continue;
            }
            let idx = ((y as usize) * width + (x as usize)) * 4;
            let dst = [data[idx], data[idx + 1], data[idx + 2], data[idx + 3]];
            let out = over_px(dst, px);
            data[idx..idx + 4].copy_from_slice(&out);
        }
    }
}

/// Premultiplied source-over.
fn over_px(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = u16::from(src[3]);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - sa;
    let mut out = [0u8; 4];
    out[3] = add_sat_u8(src[3], mul_div255_u8(u16::from(dst[3]), inv));
    for c in 0..3 {
        out[c] = add_sat_u8(src[c], mul_div255_u8(u16::from(dst[c]), inv));
    }
    out
}

fn sample_px(src: &[u8], width: u32, height: u32, x: i64, y: i64) -> [u8; 4] {
    if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
        return [0, 0, 0, 0];
    }
    let idx = ((y as usize) * (width as usize) + (x as usize)) * 4;
    [src[idx], src[idx + 1], src[idx + 2], src[idx + 3]]
}

/// Bilinear sample in premultiplied space; outside the image is transparent,
/// which gives layer edges a one-pixel antialiased falloff.
fn bilinear_sample(src: &[u8], width: u32, height: u32, fx: f64, fy: f64) -> [u8; 4] {
    let x0 = fx.floor() as i64;
    let y0 = fy.floor() as i64;
    let tx = fx - x0 as f64;
    let ty = fy - y0 as f64;

    let p00 = sample_px(src, width, height, x0, y0);
    let p10 = sample_px(src, width, height, x0 + 1, y0);
    let p01 = sample_px(src, width, height, x0, y0 + 1);
    let p11 = sample_px(src, width, height, x0 + 1, y0 + 1);

    let w00 = (1.0 - tx) * (1.0 - ty);
    let w10 = tx * (1.0 - ty);
    let w01 = (1.0 - tx) * ty;
    let w11 = tx * ty;

    let mut out = [0u8; 4];
    for c in 0..4 {
        let v = f64::from(p00[c]) * w00
            + f64::from(p10[c]) * w10
            + f64::from(p01[c]) * w01
            + f64::from(p11[c]) * w11;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

fn draw_guides(surface: &mut Surface, cfg: &ComposerConfig, guides: GuideOptions) {
    let size = cfg.canvas_size;

    if guides.grid {
        let step = f64::from(size) / 10.0;
        for i in 1..10 {
            let at = (f64::from(i) * step).round() as u32;
            draw_vline(surface, at, 0, size, GRID_COLOR);
            draw_hline(surface, at, 0, size, GRID_COLOR);
        }
    }

    if guides.thirds {
        for i in 1..3 {
            let at = (f64::from(i) * f64::from(size) / 3.0).round() as u32;
            draw_vline(surface, at, 0, size, THIRDS_COLOR);
            draw_hline(surface, at, 0, size, THIRDS_COLOR);
        }
    }

    if guides.safe_area {
        let safe = f64::from(size) * cfg.safe_area_ratio;
        let offset = ((f64::from(size) - safe) / 2.0).round() as u32;
        let far = size.saturating_sub(offset + 1);
        draw_hline(surface, offset, offset, far + 1, SAFE_AREA_COLOR);
        draw_hline(surface, far, offset, far + 1, SAFE_AREA_COLOR);
        draw_vline(surface, offset, offset, far + 1, SAFE_AREA_COLOR);
        draw_vline(surface, far, offset, far + 1, SAFE_AREA_COLOR);
    }

    if guides.crosshair {
        let mid = size / 2;
        let arm = (size / 25).max(4);
        draw_hline(
            surface,
            mid,
            mid.saturating_sub(arm),
            (mid + arm).min(size),
            SAFE_AREA_COLOR,
        );
        draw_vline(
            surface,
            mid,
            mid.saturating_sub(arm),
            (mid + arm).min(size),
            SAFE_AREA_COLOR,
        );
    }
}

fn draw_hline(surface: &mut Surface, y: u32, x0: u32, x1: u32, color: Rgba8Premul) {
    if y >= surface.height() {
        return;
    }
    let width = surface.width();
    let row = (y as usize) * (width as usize) * 4;
    let data = surface.data_mut();
    for x in x0..x1.min(width) {
        let idx = row + (x as usize) * 4;
        data[idx..idx + 4].copy_from_slice(&color.to_array());
    }
}

fn draw_vline(surface: &mut Surface, x: u32, y0: u32, y1: u32, color: Rgba8Premul) {
    if x >= surface.width() {
        return;
    }
    let width = surface.width() as usize;
    let height = surface.height();
    let data = surface.data_mut();
    for y in y0..y1.min(height) {
        let idx = ((y as usize) * width + (x as usize)) * 4;
        data[idx..idx + 4].copy_from_slice(&color.to_array());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
