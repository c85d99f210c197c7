//! Zone-driven commerce elements: corrupted cart icons, synthetic barcodes,
//! degenerate price tags, and the fixed border annotations.
//!
//! Placement is stochastic within each zone's ranges; overlap between placed
//! elements is expected and never checked for.

use kurbo::Point;

use crate::color::{Rgb, Rgba, palette};
use crate::draw;
use crate::error::VoidrainResult;
use crate::font::FontRole;
use crate::framebuffer::Framebuffer;
use crate::rng::RngStream;
use crate::stages::{StageCtx, streams};

/// Rectangular placement region for cart icons.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CartZone {
    /// Inclusive x placement range.
    pub x: [i32; 2],
    /// Inclusive y placement range.
    pub y: [i32; 2],
    /// Inclusive icon size range.
    pub size: [i32; 2],
    /// Inclusive icon count range.
    pub count: [u32; 2],
    /// Upper bound of the per-icon corruption sample.
    pub max_corruption: f32,
    pub palette: Vec<Rgb>,
}

/// Rectangular placement region for barcodes.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct BarcodeZone {
    pub x: [i32; 2],
    pub y: [i32; 2],
    pub count: u32,
}

/// The five cart zones of the 1920x1080 artifact, scaled to the canvas.
pub fn default_cart_zones(w: i32, h: i32) -> Vec<CartZone> {
    vec![
        CartZone {
            x: [50, w / 3],
            y: [30, h / 4],
            size: [18, 32],
            count: [4, 8],
            max_corruption: 0.25,
            palette: vec![palette::GHOST_GREEN, palette::FAINT_GREEN],
        },
        CartZone {
            x: [w / 3, w * 2 / 3],
            y: [h / 4, h * 3 / 4],
            size: [28, 55],
            count: [4, 8],
            max_corruption: 0.6,
            palette: vec![
                palette::DIM_GREEN,
                palette::DIM_MAGENTA,
                palette::ELECTRIC_GREEN,
                palette::MAGENTA,
            ],
        },
        CartZone {
            x: [w * 2 / 3, w - 50],
            y: [30, h / 3],
            size: [20, 38],
            count: [4, 8],
            max_corruption: 0.35,
            palette: vec![palette::DIM_GREEN, palette::GHOST_GREEN],
        },
        CartZone {
            x: [40, w / 2],
            y: [h * 3 / 4, h - 40],
            size: [22, 42],
            count: [4, 8],
            max_corruption: 0.45,
            palette: vec![palette::DIM_GREEN, palette::DIM_MAGENTA],
        },
        CartZone {
            x: [w / 2, w - 60],
            y: [h * 2 / 3, h - 50],
            size: [25, 45],
            count: [4, 8],
            max_corruption: 0.5,
            palette: vec![palette::DIM_MAGENTA, palette::DIM_GREEN],
        },
    ]
}

/// The four barcode cluster zones, scaled to the canvas.
pub fn default_barcode_zones(w: i32, h: i32) -> Vec<BarcodeZone> {
    vec![
        BarcodeZone {
            x: [0, w / 3],
            y: [0, h / 3],
            count: 5,
        },
        BarcodeZone {
            x: [w * 2 / 3, w - 80],
            y: [h / 4, h * 2 / 3],
            count: 6,
        },
        BarcodeZone {
            x: [w / 4, w * 3 / 4],
            y: [h * 2 / 3, h - 30],
            count: 7,
        },
        BarcodeZone {
            x: [50, w / 2],
            y: [h / 3, h / 2],
            count: 4,
        },
    ]
}

const BARCODE_LABELS: [&str; 8] = ["$0.00", "NULL", "ERR", "N/A", "∅", "void", "#NaN", "---"];

const PRICES: [&str; 10] = [
    "$∞", "$0.00", "$NaN", "FREE*", "$???", "¤0", "$.NULL", "$-1", "$(void)", "$ERR",
];

pub fn apply(fb: &mut Framebuffer, ctx: &StageCtx<'_>) -> VoidrainResult<()> {
    let w = fb.width() as i32;
    let h = fb.height() as i32;
    let rng = ctx.rng(streams::ICONS);

    let cart_zones = ctx
        .cfg
        .cart_zones
        .clone()
        .unwrap_or_else(|| default_cart_zones(w, h));
    for (i, zone) in cart_zones.iter().enumerate() {
        let mut zone_rng = rng.fork(0x100 + i as u64);
        place_carts(fb, zone, &mut zone_rng);
    }

    let face_small = ctx.fonts.face(FontRole::Pixel, 10);
    let barcode_zones = ctx
        .cfg
        .barcode_zones
        .clone()
        .unwrap_or_else(|| default_barcode_zones(w, h));
    for (i, zone) in barcode_zones.iter().enumerate() {
        let mut zone_rng = rng.fork(0x200 + i as u64);
        for _ in 0..zone.count {
            let x = zone_rng.range_i32(zone.x[0], (zone.x[1] - 100).max(zone.x[0]));
            let y = zone_rng.range_i32(zone.y[0], (zone.y[1] - 45).max(zone.y[0]));
            let bw = zone_rng.range_i32(65, 130);
            let bh = zone_rng.range_i32(22, 45);

            let color = barcode_color(&mut zone_rng);

            let glitch = zone_rng.uniform(0.12, 0.38);
            draw_barcode(fb, x, y, bw, bh, color, glitch, &mut zone_rng);

            if zone_rng.chance(0.55) {
                let label = rng_label(&mut zone_rng);
                face_small.draw(fb, x, y + bh + 2, label, color.into());
            }
        }
    }

    let face_price = ctx.fonts.face(FontRole::Pixel, 14);
    let mut price_rng = rng.fork(0x300);
    let count = price_rng.range_u32(ctx.cfg.price_count[0], ctx.cfg.price_count[1]);
    for _ in 0..count {
        let x = price_rng.range_i32(45, w - 90);
        let y = price_rng.range_i32(45, h - 45);
        let price = *price_rng.pick(&PRICES);
        let color = if price_rng.chance(0.68) {
            palette::ELECTRIC_GREEN
        } else {
            palette::MAGENTA
        };

        if price_rng.chance(0.45) {
            face_price.draw(fb, x - 2, y, price, Rgba::new(color.r, 0, 0, 255));
            let blue = color.g.saturating_add(40).min(200);
            face_price.draw(fb, x + 2, y, price, Rgba::new(0, 0, blue, 255));
        }
        face_price.draw(fb, x, y, price, color.into());
    }

    draw_annotations(fb, ctx);
    Ok(())
}

/// Place one zone's worth of cart icons.
pub fn place_carts(fb: &mut Framebuffer, zone: &CartZone, rng: &mut RngStream) {
    let count = rng.range_u32(zone.count[0], zone.count[1]);
    for _ in 0..count {
        let x = rng.range_i32(zone.x[0], zone.x[1]);
        let y = rng.range_i32(zone.y[0], zone.y[1]);
        let size = rng.range_i32(zone.size[0], zone.size[1]);
        let color = *rng.pick(&zone.palette);
        let corrupt = rng.uniform(0.0, zone.max_corruption);
        draw_cart(fb, x, y, f64::from(size), color, corrupt, rng);
    }
}

/// Stylized shopping cart: quadrilateral body, handle line, two wheels.
/// Corruption jitters the body vertices; past ~0.4 it also draws red/cyan
/// ghost outlines shifted horizontally, beneath the primary outline.
pub fn draw_cart(
    fb: &mut Framebuffer,
    cx: i32,
    cy: i32,
    size: f64,
    color: Rgb,
    corrupt: f32,
    rng: &mut RngStream,
) {
    let cxf = f64::from(cx);
    let cyf = f64::from(cy);
    let mut body = [
        Point::new(cxf - size * 0.35, cyf - size * 0.15),
        Point::new(cxf + size * 0.45, cyf - size * 0.15),
        Point::new(cxf + size * 0.35, cyf + size * 0.25),
        Point::new(cxf - size * 0.25, cyf + size * 0.25),
    ];

    if corrupt > 0.0 {
        for p in &mut body {
            p.x += f64::from(rng.uniform(-corrupt, corrupt)) * 3.0;
            p.y += f64::from(rng.uniform(-corrupt, corrupt)) * 2.0;
        }
    }

    if corrupt > 0.4 {
        let off = f64::from((corrupt * 3.0) as i32);
        let right: Vec<Point> = body.iter().map(|p| Point::new(p.x + off, p.y)).collect();
        let left: Vec<Point> = body.iter().map(|p| Point::new(p.x - off, p.y)).collect();
        draw::polygon_outline(fb, &right, 1, Rgba::new(color.r, 0, 0, 255));
        let cyan_g = color.g / 2;
        draw::polygon_outline(fb, &left, 1, Rgba::new(0, cyan_g, color.g, 255));
    }

    let fill: Rgba = color.into();
    draw::polygon_outline(fb, &body, 2, fill);

    // Handle.
    draw::line_thick(
        fb,
        (cxf - size * 0.45) as i32,
        (cyf - size * 0.35) as i32,
        (cxf - size * 0.35) as i32,
        (cyf - size * 0.15) as i32,
        2,
        fill,
    );

    // Wheels.
    let wy = (cyf + size * 0.35) as i32;
    let r = ((size * 0.08) as i32).max(3);
    draw::circle_outline(fb, (cxf - size * 0.2) as i32, wy, r, 2, fill);
    draw::circle_outline(fb, (cxf + size * 0.2) as i32, wy, r, 2, fill);
}

/// Vertical bars advancing left to right with randomized widths and gaps.
/// `glitch` scales the chance and magnitude of per-bar offset and height
/// jitter; rare bars get red/cyan shadow copies drawn before the main bar.
pub fn draw_barcode(
    fb: &mut Framebuffer,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    color: Rgb,
    glitch: f32,
    rng: &mut RngStream,
) {
    const BAR_WIDTHS: [i32; 5] = [2, 2, 3, 4, 2];
    const GAPS: [i32; 4] = [1, 2, 1, 2];

    let mut cx = x;
    while cx < x + w {
        let bar_w = *rng.pick(&BAR_WIDTHS);
        let gap = *rng.pick(&GAPS);

        if rng.chance(0.75) {
            let ox = if rng.chance(f64::from(glitch)) {
                rng.range_i32(-6, 6)
            } else {
                0
            };
            let bh = if rng.chance(1.0 - f64::from(glitch) * 0.5) {
                h
            } else {
                (f64::from(h) * f64::from(rng.uniform(0.75, 1.1))) as i32
            };

            if rng.chance(0.12) {
                draw::fill_rect(fb, cx + ox + 2, y, bar_w, bh, Rgba::new(color.r, 0, 0, 255));
                let blue = color.g.saturating_add(40).min(200);
                draw::fill_rect(fb, cx + ox - 2, y, bar_w, bh, Rgba::new(0, 0, blue, 255));
            }

            draw::fill_rect(fb, cx + ox, y, bar_w, bh, color.into());
        }

        cx += bar_w + gap;
    }
}

fn rng_label(rng: &mut RngStream) -> &'static str {
    BARCODE_LABELS[rng.range_usize(0, BARCODE_LABELS.len() - 1)]
}

/// Barcode ink: 55% of codes draw at full brightness with a 65% green bias;
/// the dim remainder picks green or magenta evenly before halving.
fn barcode_color(rng: &mut RngStream) -> Rgb {
    if rng.chance(0.55) {
        if rng.chance(0.65) {
            palette::ELECTRIC_GREEN
        } else {
            palette::MAGENTA
        }
    } else {
        let base = if rng.chance(0.5) {
            palette::ELECTRIC_GREEN
        } else {
            palette::MAGENTA
        };
        base.half()
    }
}

/// Fixed-position reference markers at the corners and tick marks along the
/// border. Always drawn, never randomized. Ticks start one stride in so the
/// exact corners stay part of the dark frame.
fn draw_annotations(fb: &mut Framebuffer, ctx: &StageCtx<'_>) {
    let w = fb.width() as i32;
    let h = fb.height() as i32;
    let face = ctx.fonts.face(FontRole::Mono, 8);
    let dim: Rgba = palette::DIM_GREEN.into();

    let markers = [
        (12, 12, "SYS://RETAIL.ERR"),
        (w - 105, 12, "NODE_0x00FF"),
        (12, h - 22, "SECTOR.NULL"),
        (w - 80, h - 22, "v0.0.0"),
    ];
    for (mx, my, text) in markers {
        face.draw(fb, mx, my, text, dim);
    }

    let x_step = (w / 12).max(1);
    let mut x = x_step;
    while x < w {
        draw::vline(fb, x, 0, 6, dim);
        draw::vline(fb, x, h - 6, h - 1, dim);
        x += x_step;
    }
    let y_step = (h / 8).max(1);
    let mut y = y_step;
    while y < h {
        draw::hline(fb, 0, 6, y, dim);
        draw::hline(fb, w - 6, w - 1, y, dim);
        y += y_step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontCatalog;
    use crate::pipeline::PipelineConfig;

    #[test]
    fn zero_count_zone_draws_nothing() {
        let mut fb = Framebuffer::new(64, 64).unwrap();
        let before = fb.clone();
        let zone = CartZone {
            x: [10, 50],
            y: [10, 50],
            size: [10, 20],
            count: [0, 0],
            max_corruption: 0.5,
            palette: vec![palette::ELECTRIC_GREEN],
        };
        let mut rng = RngStream::new(42);
        place_carts(&mut fb, &zone, &mut rng);
        assert_eq!(fb, before);
    }

    #[test]
    fn cart_zone_draws_within_reachable_bounds() {
        // A cart may extend past its anchor by roughly half its size; an
        // anchor range well inside the canvas keeps everything visible.
        let mut fb = Framebuffer::new(200, 200).unwrap();
        let zone = CartZone {
            x: [60, 140],
            y: [60, 140],
            size: [10, 20],
            count: [3, 5],
            max_corruption: 0.0,
            palette: vec![palette::ELECTRIC_GREEN],
        };
        let mut rng = RngStream::new(7);
        place_carts(&mut fb, &zone, &mut rng);
        let lit = fb.data().iter().filter(|&&b| b != 0).count();
        assert!(lit > 0);
    }

    #[test]
    fn barcode_is_deterministic() {
        let mut a = Framebuffer::new(160, 60).unwrap();
        let mut b = Framebuffer::new(160, 60).unwrap();
        let mut ra = RngStream::new(3);
        let mut rb = RngStream::new(3);
        draw_barcode(&mut a, 5, 5, 120, 40, palette::MAGENTA, 0.3, &mut ra);
        draw_barcode(&mut b, 5, 5, 120, 40, palette::MAGENTA, 0.3, &mut rb);
        assert_eq!(a, b);
    }

    #[test]
    fn dim_barcodes_pick_green_and_magenta_evenly() {
        let mut rng = RngStream::new(17);
        let mut bright_green = 0u32;
        let mut bright = 0u32;
        let mut dim_green = 0u32;
        let mut dim = 0u32;
        for _ in 0..4000 {
            match barcode_color(&mut rng) {
                c if c == palette::ELECTRIC_GREEN => {
                    bright += 1;
                    bright_green += 1;
                }
                c if c == palette::MAGENTA => bright += 1,
                c if c == palette::ELECTRIC_GREEN.half() => {
                    dim += 1;
                    dim_green += 1;
                }
                _ => dim += 1,
            }
        }
        let dim_green_frac = f64::from(dim_green) / f64::from(dim);
        assert!(
            (0.4..0.6).contains(&dim_green_frac),
            "dim branch green fraction {dim_green_frac}"
        );
        let bright_green_frac = f64::from(bright_green) / f64::from(bright);
        assert!(
            (0.55..0.75).contains(&bright_green_frac),
            "bright branch green fraction {bright_green_frac}"
        );
    }

    #[test]
    fn annotations_avoid_the_exact_corners() {
        let cfg = PipelineConfig::default();
        let fonts = FontCatalog::builtin();
        let ctx = StageCtx {
            cfg: &cfg,
            fonts: &fonts,
        };
        let mut fb = Framebuffer::new(cfg.width, cfg.height).unwrap();
        draw_annotations(&mut fb, &ctx);
        assert_eq!(fb.get(0, 0), Some(Rgb::new(0, 0, 0)));
        let w = cfg.width as i32;
        let h = cfg.height as i32;
        assert_eq!(fb.get(w - 1, 0), Some(Rgb::new(0, 0, 0)));
        assert_eq!(fb.get(0, h - 1), Some(Rgb::new(0, 0, 0)));
    }
}
