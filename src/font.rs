//! Font resolution and glyph rendering.
//!
//! The pipeline asks a [`FontCatalog`] for a [`Face`] by logical role and
//! point size. A [`FontProvider`] can be injected to back roles with real
//! font assets; when resolution fails the catalog logs a warning and
//! substitutes the built-in raster face, so a missing font can never abort a
//! run — only degrade glyph shapes.
//!
//! The built-in face is a 5x7 bitmap font scaled by integer factors. It is
//! fully deterministic (no system font lookup), which the byte-identical
//! output guarantee depends on. Codepoints without a drawn form (the
//! katakana rain charset, mostly) render as stable pseudo-glyphs derived
//! from the codepoint.

use std::sync::Arc;

use crate::color::Rgba;
use crate::error::VoidrainResult;
use crate::framebuffer::Raster;

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
/// Horizontal cell advance in unscaled glyph units.
pub const GLYPH_ADVANCE: u32 = 6;

/// Logical font roles used by the artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    Mono,
    Pixel,
    Tech,
    GeistMono,
}

/// Measures and draws text at a fixed size.
pub trait GlyphRenderer: Send + Sync {
    /// Bounding box of `text` in pixels.
    fn measure(&self, text: &str) -> (u32, u32);

    /// Draw `text` with its top-left corner at `(x, y)`.
    fn draw(&self, raster: &mut dyn Raster, x: i32, y: i32, text: &str, color: Rgba);
}

/// Resolves a role + size to a renderer. Implementations may fail (missing
/// asset, unsupported format); the catalog recovers with the built-in face.
pub trait FontProvider: Send + Sync {
    fn resolve(&self, role: FontRole, size: u32) -> VoidrainResult<Face>;
}

/// A resolved, ready-to-draw font handle.
#[derive(Clone)]
pub struct Face {
    renderer: Arc<dyn GlyphRenderer>,
}

impl Face {
    pub fn new(renderer: Arc<dyn GlyphRenderer>) -> Self {
        Self { renderer }
    }

    pub fn measure(&self, text: &str) -> (u32, u32) {
        self.renderer.measure(text)
    }

    pub fn draw(&self, raster: &mut dyn Raster, x: i32, y: i32, text: &str, color: Rgba) {
        self.renderer.draw(raster, x, y, text, color);
    }
}

/// Role-to-face resolution with fallback.
#[derive(Default)]
pub struct FontCatalog {
    provider: Option<Box<dyn FontProvider>>,
}

impl FontCatalog {
    /// Catalog serving only the built-in raster face.
    pub fn builtin() -> Self {
        Self { provider: None }
    }

    pub fn with_provider(provider: Box<dyn FontProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Resolve a face; never fails. Provider errors are logged and recovered
    /// with the built-in face.
    pub fn face(&self, role: FontRole, size: u32) -> Face {
        if let Some(provider) = &self.provider {
            match provider.resolve(role, size) {
                Ok(face) => return face,
                Err(err) => {
                    tracing::warn!(?role, size, %err, "font resolution failed, using builtin face");
                }
            }
        }
        Face::new(Arc::new(BitmapFace::for_size(size)))
    }
}

/// The built-in 5x7 raster face, scaled by a whole-pixel factor.
#[derive(Clone, Copy, Debug)]
pub struct BitmapFace {
    scale: u32,
}

impl BitmapFace {
    /// Map a nominal point size to an integer cell scale (size 8 == 1x).
    pub fn for_size(size: u32) -> Self {
        Self {
            scale: (size / 8).max(1),
        }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }
}

impl GlyphRenderer for BitmapFace {
    fn measure(&self, text: &str) -> (u32, u32) {
        let n = text.chars().count() as u32;
        if n == 0 {
            return (0, GLYPH_HEIGHT * self.scale);
        }
        (
            (n * GLYPH_ADVANCE - 1) * self.scale,
            GLYPH_HEIGHT * self.scale,
        )
    }

    fn draw(&self, raster: &mut dyn Raster, x: i32, y: i32, text: &str, color: Rgba) {
        let s = self.scale as i32;
        let mut pen_x = x;
        for c in text.chars() {
            let rows = glyph(c);
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (0x10 >> col) == 0 {
                        continue;
                    }
                    let px = pen_x + col as i32 * s;
                    let py = y + row as i32 * s;
                    for dy in 0..s {
                        for dx in 0..s {
                            raster.put(px + dx, py + dy, color);
                        }
                    }
                }
            }
            pen_x += GLYPH_ADVANCE as i32 * s;
        }
    }
}

/// 5-bit row patterns, top to bottom, bit 4 is the leftmost column.
fn glyph(c: char) -> [u8; 7] {
    let c = c.to_ascii_uppercase();
    match c {
        ' ' => [0; 7],
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0E],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x1B, 0x11],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x06, 0x08, 0x10, 0x1F],
        '3' => [0x0E, 0x11, 0x01, 0x06, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '/' => [0x01, 0x01, 0x02, 0x04, 0x08, 0x10, 0x10],
        '#' => [0x0A, 0x0A, 0x1F, 0x0A, 0x1F, 0x0A, 0x0A],
        '?' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
        '*' => [0x00, 0x0A, 0x04, 0x1F, 0x04, 0x0A, 0x00],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '+' => [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        '$' => [0x04, 0x0F, 0x14, 0x0E, 0x05, 0x1E, 0x04],
        '%' => [0x19, 0x1A, 0x02, 0x04, 0x08, 0x0B, 0x13],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '\'' => [0x04, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        '"' => [0x0A, 0x0A, 0x00, 0x00, 0x00, 0x00, 0x00],
        '<' => [0x02, 0x04, 0x08, 0x10, 0x08, 0x04, 0x02],
        '>' => [0x08, 0x04, 0x02, 0x01, 0x02, 0x04, 0x08],
        '=' => [0x00, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x00],
        '|' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        '∅' => [0x0E, 0x13, 0x15, 0x15, 0x15, 0x19, 0x0E],
        '∞' => [0x00, 0x0A, 0x15, 0x15, 0x0A, 0x00, 0x00],
        '¤' => [0x11, 0x0E, 0x0A, 0x0E, 0x11, 0x00, 0x00],
        other => pseudo_glyph(other),
    }
}

/// Stable "digital noise" pattern for codepoints without a drawn form. A
/// strong top bar keeps the texture reading like the katakana rain charset.
fn pseudo_glyph(c: char) -> [u8; 7] {
    let mut z = (c as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;

    let mut rows = [0u8; 7];
    rows[0] = 0x1F;
    for (i, row) in rows.iter_mut().enumerate().skip(1) {
        let bits = ((z >> (i * 5)) & 0x1F) as u8;
        *row = if bits == 0 { 0x04 } else { bits };
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::error::VoidrainError;
    use crate::framebuffer::Layer;

    #[test]
    fn measure_scales_linearly() {
        let f1 = BitmapFace::for_size(8);
        let f4 = BitmapFace::for_size(32);
        let (w1, h1) = f1.measure("VOID");
        let (w4, h4) = f4.measure("VOID");
        assert_eq!((w4, h4), (w1 * 4, h1 * 4));
    }

    #[test]
    fn tiny_sizes_clamp_to_unit_scale() {
        assert_eq!(BitmapFace::for_size(1).scale(), 1);
        assert_eq!(BitmapFace::for_size(0).scale(), 1);
    }

    #[test]
    fn draw_touches_pixels_within_measured_box() {
        let face = BitmapFace::for_size(8);
        let mut layer = Layer::new(64, 16).unwrap();
        face.draw(&mut layer, 2, 3, "A", Rgba::new(255, 255, 255, 255));
        let (w, h) = face.measure("A");
        let mut lit = 0;
        for y in 0..16 {
            for x in 0..64 {
                if layer.get(x, y).unwrap().a > 0 {
                    assert!(x >= 2 && x < 2 + w as i32);
                    assert!(y >= 3 && y < 3 + h as i32);
                    lit += 1;
                }
            }
        }
        assert!(lit > 0);
    }

    #[test]
    fn unknown_codepoints_render_stable_pseudo_glyphs() {
        assert_eq!(pseudo_glyph('ア'), pseudo_glyph('ア'));
        assert_ne!(pseudo_glyph('ア'), pseudo_glyph('イ'));
        assert!(pseudo_glyph('ア').iter().all(|&r| r != 0));
    }

    #[test]
    fn lowercase_maps_to_uppercase_form() {
        assert_eq!(glyph('v'), glyph('V'));
    }

    struct FailingProvider;

    impl FontProvider for FailingProvider {
        fn resolve(&self, role: FontRole, _size: u32) -> VoidrainResult<Face> {
            Err(VoidrainError::font(format!("no asset for {role:?}")))
        }
    }

    #[test]
    fn catalog_falls_back_to_builtin_on_provider_failure() {
        let catalog = FontCatalog::with_provider(Box::new(FailingProvider));
        let face = catalog.face(FontRole::Tech, 16);
        let (w, h) = face.measure("ERR");
        assert!(w > 0 && h > 0);
    }
}
