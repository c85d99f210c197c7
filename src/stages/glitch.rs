//! Glitch band displacement: horizontal strips of rows circularly shifted,
//! with occasional per-row channel tinting.
//!
//! Bands rotate rows in place, so where two bands overlap their shifts
//! compose (a row moved by both) rather than the later band resetting the
//! earlier one. Each row stays an exact permutation of itself either way.

use crate::error::VoidrainResult;
use crate::framebuffer::Framebuffer;
use crate::stages::{StageCtx, streams};

/// Band count at intensity 1.0.
const BASE_BANDS: f32 = 14.0;
const TINT_CHANCE: f64 = 0.45;

/// Per-channel deltas for the three accent tints.
const TINTS: [[u8; 3]; 3] = [
    [22, 0, 0],  // red
    [0, 12, 18], // cyan
    [18, 0, 12], // magenta
];

pub fn apply(fb: &mut Framebuffer, ctx: &StageCtx<'_>) -> VoidrainResult<()> {
    let intensity = ctx.cfg.glitch_intensity;
    let h = fb.height() as i32;
    let mut rng = ctx.rng(streams::GLITCH);

    let bands = (BASE_BANDS * intensity) as u32;
    let max_height = ((12.0 * intensity) as i32).max(2);
    let max_shift = (35.0 * intensity) as i32;

    for _ in 0..bands {
        let y_start = rng.range_i32(0, h - 1);
        let band_h = rng.range_i32(2, max_height);
        let x_off = rng.range_i32(-max_shift, max_shift);

        for y in y_start..(y_start + band_h).min(h) {
            fb.rotate_row(y as u32, x_off);

            if rng.chance(TINT_CHANCE) {
                let tint = *rng.pick(&TINTS);
                for px in fb.row_mut(y as u32).chunks_exact_mut(3) {
                    px[0] = px[0].saturating_add(tint[0]);
                    px[1] = px[1].saturating_add(tint[1]);
                    px[2] = px[2].saturating_add(tint[2]);
                }
            }
        }
    }

    Ok(())
}
