//! Ghosted watermark: the large centered word drawn several times at small
//! positional/color offsets with very low alpha, plus a subtitle beneath.
//! The ghost draw order is fixed for reproducibility.

use crate::color::Rgba;
use crate::error::VoidrainResult;
use crate::font::FontRole;
use crate::framebuffer::{Framebuffer, Layer};
use crate::stages::StageCtx;

const WORD: &str = "USELESS";
const SUBTITLE: &str = ".io";
const WORD_SIZE: u32 = 320;
const SUBTITLE_SIZE: u32 = 160;
/// Vertical lift of the word above true center.
const CENTER_LIFT: i32 = 60;

/// `(dx, fill)` per ghost pass, drawn in this exact order.
const GHOSTS: [(i32, Rgba); 4] = [
    (0, Rgba::new(0, 25, 12, 6)),
    (-8, Rgba::new(60, 0, 30, 5)),
    (8, Rgba::new(0, 15, 50, 5)),
    (0, Rgba::new(0, 55, 22, 10)),
];

pub fn apply(fb: &mut Framebuffer, ctx: &StageCtx<'_>) -> VoidrainResult<()> {
    let layer = render_layer(fb.width(), fb.height(), ctx)?;
    fb.composite(&layer, 1.0)
}

pub fn render_layer(width: u32, height: u32, ctx: &StageCtx<'_>) -> VoidrainResult<Layer> {
    let mut layer = Layer::new(width, height)?;

    let face = ctx.fonts.face(FontRole::Tech, WORD_SIZE);
    let (tw, th) = face.measure(WORD);
    let x = (width as i32 - tw as i32) / 2;
    let y = (height as i32 - th as i32) / 2 - CENTER_LIFT;

    for (dx, fill) in GHOSTS {
        face.draw(&mut layer, x + dx, y, WORD, fill);
    }

    let sub_face = ctx.fonts.face(FontRole::Tech, SUBTITLE_SIZE);
    let (sw, _) = sub_face.measure(SUBTITLE);
    let sub_x = (width as i32 - sw as i32) / 2;
    sub_face.draw(
        &mut layer,
        sub_x,
        y + th as i32 + 15,
        SUBTITLE,
        Rgba::new(0, 35, 15, 8),
    );

    Ok(layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontCatalog;
    use crate::pipeline::PipelineConfig;

    #[test]
    fn layer_touches_the_center_band_only() {
        let cfg = PipelineConfig::default();
        let fonts = FontCatalog::builtin();
        let ctx = StageCtx {
            cfg: &cfg,
            fonts: &fonts,
        };
        let layer = render_layer(cfg.width, cfg.height, &ctx).unwrap();

        let mut lit = 0u32;
        let mut top_strip = 0u32;
        for y in 0..cfg.height as i32 {
            for x in 0..cfg.width as i32 {
                if layer.get(x, y).unwrap().a > 0 {
                    lit += 1;
                    if y < 40 {
                        top_strip += 1;
                    }
                }
            }
        }
        assert!(lit > 0);
        assert_eq!(top_strip, 0);
    }

    #[test]
    fn ghost_order_is_fixed() {
        let cfg = PipelineConfig::default();
        let fonts = FontCatalog::builtin();
        let ctx = StageCtx {
            cfg: &cfg,
            fonts: &fonts,
        };
        let a = render_layer(cfg.width, cfg.height, &ctx).unwrap();
        let b = render_layer(cfg.width, cfg.height, &ctx).unwrap();
        assert_eq!(a, b);
    }
}
