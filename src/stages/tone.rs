//! Final tone pass: global contrast around the mean luminance, a gentle
//! unsharp blend against a 3x3 smooth kernel, and a sparse near-black
//! scanline overlay to reinforce the CRT look.

use crate::error::VoidrainResult;
use crate::framebuffer::Framebuffer;
use crate::stages::{StageCtx, streams};

/// Period and gate of the final sparse line overlay.
const OVERLAY_PERIOD: usize = 3;
const OVERLAY_CHANCE: f64 = 0.28;

pub fn apply(fb: &mut Framebuffer, ctx: &StageCtx<'_>) -> VoidrainResult<()> {
    contrast(fb, ctx.cfg.contrast);
    sharpen(fb, ctx.cfg.sharpness);

    let h = fb.height();
    let mut rng = ctx.rng(streams::TONE);
    for y in (0..h).step_by(OVERLAY_PERIOD) {
        if rng.chance(OVERLAY_CHANCE) {
            for px in fb.row_mut(y).iter_mut() {
                *px = 0;
            }
        }
    }

    Ok(())
}

/// Contrast stretch pivoting on the mean luminance of the whole canvas
/// (`out = mean + (v - mean) * factor`), the classic enhance semantics.
fn contrast(fb: &mut Framebuffer, factor: f32) {
    if factor == 1.0 {
        return;
    }
    let mut sum: u64 = 0;
    let mut count: u64 = 0;
    for px in fb.data().chunks_exact(3) {
        let lum = (299 * u32::from(px[0]) + 587 * u32::from(px[1]) + 114 * u32::from(px[2])) / 1000;
        sum += u64::from(lum);
        count += 1;
    }
    if count == 0 {
        return;
    }
    let mean = ((sum + count / 2) / count) as f32;

    for c in fb.data_mut() {
        let v = mean + (f32::from(*c) - mean) * factor;
        *c = (v.round() as i32).clamp(0, 255) as u8;
    }
}

/// Unsharp blend against the 3x3 smooth kernel [1,1,1; 1,5,1; 1,1,1]/13.
/// The one-pixel border is left untouched.
fn sharpen(fb: &mut Framebuffer, factor: f32) {
    if factor == 1.0 {
        return;
    }
    let amount = factor - 1.0;
    let w = fb.width() as usize;
    let h = fb.height() as usize;
    if w < 3 || h < 3 {
        return;
    }
    let stride = fb.stride();
    let src = fb.data().to_vec();
    let dst = fb.data_mut();

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            for ch in 0..3 {
                let i = y * stride + x * 3 + ch;
                let mut acc = 5 * u32::from(src[i]);
                for (dy, dx) in [
                    (-1i32, -1i32),
                    (-1, 0),
                    (-1, 1),
                    (0, -1),
                    (0, 1),
                    (1, -1),
                    (1, 0),
                    (1, 1),
                ] {
                    let j = (y as i32 + dy) as usize * stride + (x as i32 + dx) as usize * 3 + ch;
                    acc += u32::from(src[j]);
                }
                let smooth = acc as f32 / 13.0;
                let orig = f32::from(src[i]);
                let v = orig + (orig - smooth) * amount;
                dst[i] = (v.round() as i32).clamp(0, 255) as u8;
            }
        }
    }
}
