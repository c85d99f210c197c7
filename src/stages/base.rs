//! Base field: deep-void radial gradient plus dense additive noise.

use rayon::prelude::*;

use crate::error::VoidrainResult;
use crate::framebuffer::Framebuffer;
use crate::stages::{StageCtx, streams};

/// Fraction of full brightness lost at the canvas corners.
const GRADIENT_FALLOFF: f64 = 0.25;
/// Signed per-channel noise amplitude.
const NOISE_AMPLITUDE: i32 = 6;

pub fn apply(fb: &mut Framebuffer, ctx: &StageCtx<'_>) -> VoidrainResult<()> {
    let (w, h) = (fb.width(), fb.height());
    let cx = f64::from(w / 2);
    let cy = f64::from(h / 2);
    let max_dist = (cx * cx + cy * cy).sqrt();

    // Noise samples are distributed evenly across rows and drawn from a
    // per-row RNG stream, so the parallel fill is byte-identical to a
    // sequential one.
    let samples_per_row = (ctx.cfg.noise_samples / h as usize).max(1);
    let stride = fb.stride();
    let root = ctx.rng(streams::BASE);

    fb.data_mut()
        .par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let yf = y as f64;
            for (x, px) in row.chunks_exact_mut(3).enumerate() {
                let dx = x as f64 - cx;
                let dy = yf - cy;
                let dist = (dx * dx + dy * dy).sqrt();
                let f = 1.0 - (dist / max_dist) * GRADIENT_FALLOFF;
                px[0] = (5.0 + 6.0 * f) as u8;
                px[1] = (5.0 + 8.0 * f) as u8;
                px[2] = (8.0 + 12.0 * f) as u8;
            }

            let mut rng = root.fork(y as u64);
            for _ in 0..samples_per_row {
                let x = rng.range_usize(0, w as usize - 1);
                let n = rng.range_i32(-NOISE_AMPLITUDE, NOISE_AMPLITUDE);
                let g_extra = rng.range_i32(0, 2);
                let px = &mut row[x * 3..x * 3 + 3];
                px[0] = (i32::from(px[0]) + n).clamp(0, 255) as u8;
                px[1] = (i32::from(px[1]) + n + g_extra).clamp(0, 255) as u8;
                px[2] = (i32::from(px[2]) + n).clamp(0, 255) as u8;
            }
        });

    Ok(())
}
