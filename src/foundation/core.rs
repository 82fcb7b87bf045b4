use crate::foundation::error::{PurikuraError, PurikuraResult};
use crate::foundation::math::Fnv1a64;

pub use kurbo::{Affine, Point, Rect, Vec2};

/// The square logical canvas every layer transform is expressed in.
///
/// The origin of the transform coordinate space sits at the canvas center;
/// pixel space runs from `(0, 0)` at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSpec {
    pub size: u32,
}

impl CanvasSpec {
    pub fn new(size: u32) -> PurikuraResult<Self> {
        if size == 0 {
            return Err(PurikuraError::validation("canvas size must be > 0"));
        }
        Ok(Self { size })
    }

    pub fn half(self) -> f64 {
        f64::from(self.size) / 2.0
    }

    pub fn center(self) -> Point {
        Point::new(self.half(), self.half())
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A CPU pixel surface in row-major premultiplied RGBA8.
///
/// Both the interactive preview and the export path render into a `Surface`;
/// the resampler consumes and produces them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Allocate a fully transparent surface.
    pub fn new(width: u32, height: u32) -> PurikuraResult<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| PurikuraError::validation("surface size overflow"))?;
        if len == 0 {
            return Err(PurikuraError::validation("surface dimensions must be > 0"));
        }
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Wrap an existing premultiplied RGBA8 buffer.
    pub fn from_rgba8_premul(width: u32, height: u32, data: Vec<u8>) -> PurikuraResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| PurikuraError::validation("surface size overflow"))?;
        if data.len() != expected || expected == 0 {
            return Err(PurikuraError::validation(
                "surface buffer must match width*height*4",
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn fill(&mut self, px: Rgba8Premul) {
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px.to_array());
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    /// Stable content hash over dimensions and pixel bytes.
    ///
    /// Two surfaces fingerprint equal iff they are byte-identical, which is
    /// what the determinism tests assert.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u32(self.width);
        h.write_u32(self.height);
        h.write_bytes(&self.data);
        h.finish()
    }
}
