//! Chromatic aberration: the red channel shifts right and the blue channel
//! shifts left by the configured pixel offset. Edge behavior is wrap-around
//! (the displaced channel re-enters on the opposite side), matching the
//! channel-offset semantics the artifact was authored with.

use crate::error::VoidrainResult;
use crate::framebuffer::Framebuffer;
use crate::stages::StageCtx;

pub fn apply(fb: &mut Framebuffer, ctx: &StageCtx<'_>) -> VoidrainResult<()> {
    let k = ctx.cfg.aberration_offset;
    if k == 0 {
        return Ok(());
    }
    let w = fb.width() as i32;
    let h = fb.height();

    for y in 0..h {
        let row = fb.row(y);
        let reds: Vec<u8> = row.chunks_exact(3).map(|p| p[0]).collect();
        let blues: Vec<u8> = row.chunks_exact(3).map(|p| p[2]).collect();

        let row = fb.row_mut(y);
        for (x, px) in row.chunks_exact_mut(3).enumerate() {
            let src_r = (x as i32 - k).rem_euclid(w) as usize;
            let src_b = (x as i32 + k).rem_euclid(w) as usize;
            px[0] = reds[src_r];
            px[2] = blues[src_b];
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::font::FontCatalog;
    use crate::pipeline::PipelineConfig;

    fn ctx_for<'a>(cfg: &'a PipelineConfig, fonts: &'a FontCatalog) -> StageCtx<'a> {
        StageCtx { cfg, fonts }
    }

    #[test]
    fn red_moves_right_blue_moves_left_green_stays() {
        let cfg = PipelineConfig {
            width: 8,
            height: 1,
            aberration_offset: 2,
            ..PipelineConfig::default()
        };
        let fonts = FontCatalog::builtin();
        let mut fb = Framebuffer::new(8, 1).unwrap();
        fb.set(3, 0, Rgb::new(200, 150, 100));
        apply(&mut fb, &ctx_for(&cfg, &fonts)).unwrap();

        assert_eq!(fb.get(5, 0).unwrap().r, 200);
        assert_eq!(fb.get(3, 0).unwrap().r, 0);
        assert_eq!(fb.get(1, 0).unwrap().b, 100);
        assert_eq!(fb.get(3, 0).unwrap().b, 0);
        assert_eq!(fb.get(3, 0).unwrap().g, 150);
    }

    #[test]
    fn offsets_wrap_at_the_edges() {
        let cfg = PipelineConfig {
            width: 4,
            height: 1,
            aberration_offset: 2,
            ..PipelineConfig::default()
        };
        let fonts = FontCatalog::builtin();
        let mut fb = Framebuffer::new(4, 1).unwrap();
        fb.set(3, 0, Rgb::new(99, 0, 77));
        apply(&mut fb, &ctx_for(&cfg, &fonts)).unwrap();

        // With width 4 and offset 2, both the rightward red shift and the
        // leftward blue shift carry x=3 to x=1.
        assert_eq!(fb.get(1, 0).unwrap().r, 99);
        assert_eq!(fb.get(1, 0).unwrap().b, 77);
    }
}
