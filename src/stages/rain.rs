//! Matrix rain: vertical glyph streams with a head-to-tail brightness ramp.
//!
//! Two independent layers are generated from separate RNG streams; the back
//! layer is dimmed to half before compositing for a depth effect. Each
//! column forks its own RNG sub-stream, so columns can be laid out in any
//! order without changing the output.

use crate::color::Rgba;
use crate::error::VoidrainResult;
use crate::font::FontRole;
use crate::framebuffer::{Framebuffer, Layer};
use crate::rng::RngStream;
use crate::stages::{StageCtx, streams};

/// Product vocabulary mixed into the rain.
pub const PRODUCTS: [&str; 18] = [
    "USELESS",
    "NOTHING",
    "VOID",
    "NULL",
    "ERROR",
    "TOASTER",
    "WIFI",
    "ROCK",
    "CLOUD",
    "INVISIBLE",
    "SILENCE",
    "EMPTY",
    "ZERO",
    "STATIC",
    "GLITCH",
    "CORRUPT",
    "DECAY",
    "ENTROPY",
];

const MATRIX_CHARS: &str = "01アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモ";

const COLUMN_WIDTH: u32 = 22;
const BRIGHTNESS_BASE: f32 = 0.12;
const BRIGHTNESS_RANGE: f32 = 0.65;
/// Columns never start above this row; keeps the extreme top rows free of
/// glyphs so the corner stays part of the dark frame.
const TOP_START: i32 = 6;

pub fn apply_front(fb: &mut Framebuffer, ctx: &StageCtx<'_>) -> VoidrainResult<()> {
    let rng = ctx.rng(streams::RAIN_FRONT);
    let layer = render_layer(fb.width(), fb.height(), FontRole::GeistMono, &rng, ctx)?;
    fb.composite(&layer, 1.0)
}

pub fn apply_back(fb: &mut Framebuffer, ctx: &StageCtx<'_>) -> VoidrainResult<()> {
    let rng = ctx.rng(streams::RAIN_BACK);
    let mut layer = render_layer(fb.width(), fb.height(), FontRole::Mono, &rng, ctx)?;
    layer.dim(0.5);
    fb.composite(&layer, 1.0)
}

pub fn render_layer(
    width: u32,
    height: u32,
    role: FontRole,
    rng: &RngStream,
    ctx: &StageCtx<'_>,
) -> VoidrainResult<Layer> {
    let mut layer = Layer::new(width, height)?;
    let glyphs: Vec<char> = MATRIX_CHARS.chars().collect();

    let face_small = ctx.fonts.face(role, 10);
    let face_medium = ctx.fonts.face(role, 13);
    let face_large = ctx.fonts.face(role, 16);

    for (col, col_x) in (0..width).step_by(COLUMN_WIDTH as usize).enumerate() {
        let mut rng = rng.fork(col as u64);
        let x = col_x as i32 + rng.range_i32(-4, 4);

        let chars: Vec<char> = if rng.chance(0.45) {
            rng.pick(&PRODUCTS).chars().collect()
        } else {
            let len = rng.range_usize(10, 30);
            (0..len).map(|_| *rng.pick(&glyphs)).collect()
        };

        let start_y = rng.range_i32(TOP_START, (height as i32 - 80).max(TOP_START));
        let spacing = rng.range_i32(13, 18);

        for (i, &c) in chars.iter().enumerate() {
            let y = start_y + i as i32 * spacing;
            if y > height as i32 + 15 {
                continue;
            }

            let progress = i as f32 / chars.len() as f32;
            let brightness = BRIGHTNESS_BASE + progress * BRIGHTNESS_RANGE;
            let tail = i == chars.len() - 1;

            let (face, color) = if tail {
                (&face_large, Rgba::new(255, 255, 255, 255))
            } else {
                let face = if progress < 0.4 {
                    &face_small
                } else {
                    &face_medium
                };
                let color = if rng.chance(0.07) {
                    scaled(255, 40, 120, 190, brightness)
                } else {
                    scaled(25, 255, 70, 170, brightness)
                };
                (face, color)
            };

            let s = c.to_string();
            if rng.chance(0.08) {
                face.draw(&mut layer, x - 1, y, &s, Rgba::new(255, 0, 0, 50));
                face.draw(&mut layer, x + 1, y, &s, Rgba::new(0, 0, 255, 50));
            }
            face.draw(&mut layer, x, y, &s, color);
        }
    }

    Ok(layer)
}

fn scaled(r: u8, g: u8, b: u8, a: u8, brightness: f32) -> Rgba {
    let s = |c: u8| (f32::from(c) * brightness) as u8;
    Rgba::new(s(r), s(g), s(b), s(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontCatalog;
    use crate::pipeline::PipelineConfig;

    fn test_ctx<'a>(cfg: &'a PipelineConfig, fonts: &'a FontCatalog) -> StageCtx<'a> {
        StageCtx { cfg, fonts }
    }

    #[test]
    fn layer_is_deterministic_per_stream() {
        let cfg = PipelineConfig {
            seed: 42,
            ..PipelineConfig::default()
        };
        let fonts = FontCatalog::builtin();
        let ctx = test_ctx(&cfg, &fonts);
        let rng = ctx.rng(streams::RAIN_FRONT);
        let a = render_layer(cfg.width, cfg.height, FontRole::GeistMono, &rng, &ctx).unwrap();
        let b = render_layer(cfg.width, cfg.height, FontRole::GeistMono, &rng, &ctx).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn front_and_back_streams_differ() {
        let cfg = PipelineConfig {
            seed: 42,
            ..PipelineConfig::default()
        };
        let fonts = FontCatalog::builtin();
        let ctx = test_ctx(&cfg, &fonts);
        let front = render_layer(
            cfg.width,
            cfg.height,
            FontRole::GeistMono,
            &ctx.rng(streams::RAIN_FRONT),
            &ctx,
        )
        .unwrap();
        let back = render_layer(
            cfg.width,
            cfg.height,
            FontRole::Mono,
            &ctx.rng(streams::RAIN_BACK),
            &ctx,
        )
        .unwrap();
        assert_ne!(front, back);
    }

    #[test]
    fn top_rows_stay_clear_of_glyphs() {
        let cfg = PipelineConfig {
            seed: 7,
            ..PipelineConfig::default()
        };
        let fonts = FontCatalog::builtin();
        let ctx = test_ctx(&cfg, &fonts);
        let layer = render_layer(
            cfg.width,
            cfg.height,
            FontRole::GeistMono,
            &ctx.rng(streams::RAIN_FRONT),
            &ctx,
        )
        .unwrap();
        for y in 0..TOP_START {
            for x in 0..cfg.width as i32 {
                assert_eq!(layer.get(x, y).unwrap().a, 0, "glyph pixel at ({x},{y})");
            }
        }
    }
}
