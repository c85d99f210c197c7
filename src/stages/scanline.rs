//! CRT scanline simulation: periodic row dimming plus solid line bands.

use crate::color::Rgb;
use crate::error::VoidrainResult;
use crate::framebuffer::Framebuffer;
use crate::stages::{StageCtx, streams};

/// Multiplier applied to every second row.
const FINE_DIM: f32 = 0.88;
/// Solid dim line color, every 4th row.
const MEDIUM_LINE: Rgb = Rgb::new(3, 3, 5);
/// Accent line period and gates.
const ACCENT_PERIOD: u32 = 28;
const ACCENT_CHANCE: f64 = 0.65;
const ACCENT_SECOND_CHANCE: f64 = 0.5;

pub fn apply(fb: &mut Framebuffer, ctx: &StageCtx<'_>) -> VoidrainResult<()> {
    let h = fb.height();
    let mut rng = ctx.rng(streams::SCANLINE);

    for y in (0..h).step_by(2) {
        for px in fb.row_mut(y).iter_mut() {
            *px = (f32::from(*px) * FINE_DIM) as u8;
        }
    }

    for y in (0..h).step_by(4) {
        fill_row(fb, y, MEDIUM_LINE);
    }

    for y in (0..h).step_by(ACCENT_PERIOD as usize) {
        if rng.chance(ACCENT_CHANCE) {
            fill_row(fb, y, Rgb::new(0, 0, 0));
            if rng.chance(ACCENT_SECOND_CHANCE) && y + 1 < h {
                fill_row(fb, y + 1, Rgb::new(0, 0, 0));
            }
        }
    }

    Ok(())
}

fn fill_row(fb: &mut Framebuffer, y: u32, c: Rgb) {
    for px in fb.row_mut(y).chunks_exact_mut(3) {
        px[0] = c.r;
        px[1] = c.g;
        px[2] = c.b;
    }
}
