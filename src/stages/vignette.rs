//! Radial vignette: darken pixels toward black beyond an inner radius.
//!
//! Columns are sampled at stride 2 for speed; the sampled column's darkened
//! pixel value is copied verbatim onto the skipped right-hand neighbor, so
//! horizontal resolution is halved inside the falloff region.

use rayon::prelude::*;

use crate::error::VoidrainResult;
use crate::framebuffer::Framebuffer;
use crate::stages::StageCtx;

/// Fraction of the max center distance that stays untouched.
const INNER_RADIUS: f64 = 0.45;

pub fn apply(fb: &mut Framebuffer, ctx: &StageCtx<'_>) -> VoidrainResult<()> {
    let strength = f64::from(ctx.cfg.vignette_strength);
    let (w, h) = (fb.width(), fb.height());
    let cx = f64::from(w / 2);
    let cy = f64::from(h / 2);
    let max_d = (cx * cx + cy * cy).sqrt();
    let inner = max_d * INNER_RADIUS;
    let span = max_d * (1.0 - INNER_RADIUS);
    let stride = fb.stride();

    fb.data_mut()
        .par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let dy = y as f64 - cy;
            let mut x = 0usize;
            while x < w as usize {
                let dx = x as f64 - cx;
                let d = (dx * dx + dy * dy).sqrt();
                if d > inner {
                    let f = (((d - inner) / span) * strength).min(1.0);
                    let keep = 1.0 - f;
                    let i = x * 3;
                    darken(&mut row[i..i + 3], keep);
                    if x + 1 < w as usize {
                        let (sampled, rest) = row.split_at_mut(i + 3);
                        rest[..3].copy_from_slice(&sampled[i..i + 3]);
                    }
                }
                x += 2;
            }
        });

    Ok(())
}

fn darken(px: &mut [u8], keep: f64) {
    for c in px {
        *c = (f64::from(*c) * keep) as u8;
    }
}
