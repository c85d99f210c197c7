//! The shared pixel surfaces: the RGB canvas and transparent RGBA layers.
//!
//! Every stage reads and writes pixels only through these types. Access is
//! bounds-checked (out-of-range writes are dropped, matching clipped
//! drawing), and all blended writes keep channels in `[0, 255]`.

use crate::color::{Rgb, Rgba, over_channel};
use crate::error::{VoidrainError, VoidrainResult};

/// Common write seam for drawing primitives and glyph rendering.
///
/// A [`Framebuffer`] alpha-blends incoming pixels over its opaque contents; a
/// [`Layer`] stores them verbatim (sprite semantics), so a later alpha-over
/// composite applies the transparency exactly once.
pub trait Raster {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn put(&mut self, x: i32, y: i32, color: Rgba);
}

/// Opaque RGB8 canvas, 3 bytes per pixel, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Framebuffer {
    /// Create a canvas filled with black. Rejects zero dimensions and sizes
    /// whose byte length would overflow.
    pub fn new(width: u32, height: u32) -> VoidrainResult<Self> {
        let len = checked_len(width, height, 3)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Rgb> {
        let i = self.index(x, y)?;
        Some(Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Overwrite a pixel. Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = c.r;
            self.data[i + 1] = c.g;
            self.data[i + 2] = c.b;
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * 3
    }

    pub fn row(&self, y: u32) -> &[u8] {
        let s = self.stride();
        let off = y as usize * s;
        &self.data[off..off + s]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let s = self.stride();
        let off = y as usize * s;
        &mut self.data[off..off + s]
    }

    /// Circularly shift one row right by `shift` pixels (negative shifts
    /// left). The row's pixel multiset is preserved; only positions change.
    pub fn rotate_row(&mut self, y: u32, shift: i32) {
        if self.width == 0 || y >= self.height {
            return;
        }
        let px = shift.rem_euclid(self.width as i32) as usize;
        if px == 0 {
            return;
        }
        self.row_mut(y).rotate_right(px * 3);
    }

    /// Straight alpha-over composite of a same-sized layer, with an extra
    /// global opacity applied to the layer's alpha.
    pub fn composite(&mut self, layer: &Layer, opacity: f32) -> VoidrainResult<()> {
        if layer.width != self.width || layer.height != self.height {
            return Err(VoidrainError::validation(format!(
                "composite dimension mismatch: canvas {}x{}, layer {}x{}",
                self.width, self.height, layer.width, layer.height
            )));
        }
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return Ok(());
        }
        let op = (opacity * 255.0).round() as u16;
        for (d, s) in self.data.chunks_exact_mut(3).zip(layer.data.chunks_exact(4)) {
            let a = crate::color::mul_div255(u16::from(s[3]), op);
            if a == 0 {
                continue;
            }
            d[0] = over_channel(s[0], d[0], a);
            d[1] = over_channel(s[1], d[1], a);
            d[2] = over_channel(s[2], d[2], a);
        }
        Ok(())
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 3)
    }
}

impl Raster for Framebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn put(&mut self, x: i32, y: i32, color: Rgba) {
        if color.a == 0 {
            return;
        }
        if let Some(i) = self.index(x, y) {
            self.data[i] = over_channel(color.r, self.data[i], color.a);
            self.data[i + 1] = over_channel(color.g, self.data[i + 1], color.a);
            self.data[i + 2] = over_channel(color.b, self.data[i + 2], color.a);
        }
    }
}

/// Transparent straight-alpha RGBA8 buffer matching canvas dimensions.
///
/// Layers are scratch surfaces: a generator fills one, the orchestrator
/// merges it onto the canvas, and it is dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Layer {
    pub fn new(width: u32, height: u32) -> VoidrainResult<Self> {
        let len = checked_len(width, height, 4)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Rgba> {
        let i = self.index(x, y)?;
        Some(Rgba::new(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }

    /// Scale every channel (including alpha) of the whole layer, used to dim
    /// a second rain pass before compositing.
    pub fn dim(&mut self, factor: f32) {
        let f = factor.clamp(0.0, 1.0);
        for b in &mut self.data {
            *b = ((f32::from(*b) * f) as i32).clamp(0, 255) as u8;
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }
}

impl Raster for Layer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn put(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = color.r;
            self.data[i + 1] = color.g;
            self.data[i + 2] = color.b;
            self.data[i + 3] = color.a;
        }
    }
}

fn checked_len(width: u32, height: u32, bpp: usize) -> VoidrainResult<usize> {
    if width == 0 || height == 0 {
        return Err(VoidrainError::validation(format!(
            "dimensions must be positive, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(bpp))
        .ok_or_else(|| VoidrainError::validation("buffer size overflow"))
}
