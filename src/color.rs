//! Color values and the fixed artifact palette.
//!
//! Every channel is an 8-bit value; all blend arithmetic rounds with
//! `(x*y + 127) / 255` and saturates so results stay in `[0, 255]`.

/// Opaque RGB triple, the unit stored in the [`Framebuffer`](crate::Framebuffer).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn with_alpha(self, a: u8) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Halve every channel (the "dim variant" used by barcode palettes).
    pub const fn half(self) -> Self {
        Self::new(self.r / 2, self.g / 2, self.b / 2)
    }

    pub fn scale(self, f: f32) -> Self {
        Self::new(scale_channel(self.r, f), scale_channel(self.g, f), scale_channel(self.b, f))
    }
}

/// Straight-alpha RGBA, the unit stored in a [`Layer`](crate::Layer).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn opaque(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Scale all four channels, matching a whole-layer dimming pass.
    pub fn scale(self, f: f32) -> Self {
        Self::new(
            scale_channel(self.r, f),
            scale_channel(self.g, f),
            scale_channel(self.b, f),
            scale_channel(self.a, f),
        )
    }
}

impl From<Rgb> for Rgba {
    fn from(c: Rgb) -> Self {
        c.with_alpha(255)
    }
}

fn scale_channel(c: u8, f: f32) -> u8 {
    ((f32::from(c) * f) as i32).clamp(0, 255) as u8
}

/// `(x*y + 127) / 255` with rounding.
pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

/// Straight alpha-over of one channel: `src*a + dst*(1-a)`.
pub(crate) fn over_channel(src: u8, dst: u8, alpha: u8) -> u8 {
    let inv = 255u16 - u16::from(alpha);
    mul_div255(u16::from(src), u16::from(alpha)).saturating_add(mul_div255(u16::from(dst), inv))
}

/// The refined palette of the artifact. Used consistently across stages.
pub mod palette {
    use super::Rgb;

    pub const VOID_BLACK: Rgb = Rgb::new(5, 5, 8);
    pub const ELECTRIC_GREEN: Rgb = Rgb::new(0, 255, 65);
    pub const MAGENTA: Rgb = Rgb::new(255, 0, 128);
    pub const CYAN: Rgb = Rgb::new(0, 200, 255);
    pub const DIM_GREEN: Rgb = Rgb::new(0, 45, 18);
    pub const DIM_MAGENTA: Rgb = Rgb::new(45, 0, 30);
    pub const GHOST_GREEN: Rgb = Rgb::new(0, 20, 8);
    pub const FAINT_GREEN: Rgb = Rgb::new(0, 12, 5);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_channel_identity_cases() {
        assert_eq!(over_channel(200, 17, 0), 17);
        assert_eq!(over_channel(200, 17, 255), 200);
    }

    #[test]
    fn scale_clamps_to_byte_range() {
        let c = Rgb::new(200, 10, 0);
        let s = c.scale(2.0);
        assert_eq!(s, Rgb::new(255, 20, 0));
    }

    #[test]
    fn half_floors_each_channel() {
        assert_eq!(palette::ELECTRIC_GREEN.half(), Rgb::new(0, 127, 32));
    }
}
