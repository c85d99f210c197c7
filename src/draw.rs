//! Raster drawing primitives shared by the glyph, icon, and annotation
//! stages. Everything clips implicitly through [`Raster::put`].

use kurbo::Point;

use crate::color::Rgba;
use crate::framebuffer::Raster;

/// Bresenham line.
pub fn line<R: Raster + ?Sized>(r: &mut R, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);
    loop {
        r.put(x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Line stamped with a `thickness`-square pen.
pub fn line_thick<R: Raster + ?Sized>(
    r: &mut R,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    thickness: i32,
    color: Rgba,
) {
    if thickness <= 1 {
        line(r, x0, y0, x1, y1, color);
        return;
    }
    for ox in 0..thickness {
        for oy in 0..thickness {
            line(r, x0 + ox, y0 + oy, x1 + ox, y1 + oy, color);
        }
    }
}

pub fn hline<R: Raster + ?Sized>(r: &mut R, x0: i32, x1: i32, y: i32, color: Rgba) {
    let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
    for x in lo..=hi {
        r.put(x, y, color);
    }
}

pub fn vline<R: Raster + ?Sized>(r: &mut R, x: i32, y0: i32, y1: i32, color: Rgba) {
    let (lo, hi) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
    for y in lo..=hi {
        r.put(x, y, color);
    }
}

pub fn fill_rect<R: Raster + ?Sized>(r: &mut R, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
    for yy in y..y + h.max(0) {
        for xx in x..x + w.max(0) {
            r.put(xx, yy, color);
        }
    }
}

/// Closed polygon outline through the given vertices.
pub fn polygon_outline<R: Raster + ?Sized>(r: &mut R, pts: &[Point], thickness: i32, color: Rgba) {
    if pts.len() < 2 {
        return;
    }
    for i in 0..pts.len() {
        let a = pts[i];
        let b = pts[(i + 1) % pts.len()];
        line_thick(
            r,
            a.x.round() as i32,
            a.y.round() as i32,
            b.x.round() as i32,
            b.y.round() as i32,
            thickness,
            color,
        );
    }
}

/// Midpoint circle outline; `thickness > 1` stacks concentric rings inward.
pub fn circle_outline<R: Raster + ?Sized>(
    r: &mut R,
    cx: i32,
    cy: i32,
    radius: i32,
    thickness: i32,
    color: Rgba,
) {
    for t in 0..thickness.max(1) {
        let rad = radius - t;
        if rad <= 0 {
            break;
        }
        circle_ring(r, cx, cy, rad, color);
    }
}

fn circle_ring<R: Raster + ?Sized>(r: &mut R, cx: i32, cy: i32, radius: i32, color: Rgba) {
    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;
    while x >= y {
        for (px, py) in [
            (cx + x, cy + y),
            (cx - x, cy + y),
            (cx + x, cy - y),
            (cx - x, cy - y),
            (cx + y, cy + x),
            (cx - y, cy + x),
            (cx + y, cy - x),
            (cx - y, cy - x),
        ] {
            r.put(px, py, color);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}
