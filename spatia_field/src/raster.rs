// Copyright 2025 the Spatia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Seed rasterization: integer line drawing into a square grid.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

use crate::GridPoint;

/// Calls `plot` for every in-grid cell on the segment `a → b`.
///
/// `a` and `b` are in grid coordinates (cell centres at integer values).
/// The segment is first clipped to the grid so far-away endpoints cost
/// nothing; cells that still fall outside are skipped individually. Segments
/// with non-finite endpoints are skipped entirely.
pub(crate) fn draw_line(a: Point, b: Point, size: usize, mut plot: impl FnMut(GridPoint)) {
    if !(a.is_finite() && b.is_finite()) || size == 0 {
        return;
    }
    let max = size as f64;
    let Some((a, b)) = clip(a, b, -1.0, max) else {
        return;
    };
    let (x0, y0) = (to_cell(a.x), to_cell(a.y));
    let (x1, y1) = (to_cell(b.x), to_cell(b.y));
    bresenham(x0, y0, x1, y1, |x, y| {
        if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
            if x < size && y < size {
                plot(GridPoint::new(x, y));
            }
        }
    });
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "callers clip coordinates to the grid before rounding"
)]
fn to_cell(v: f64) -> i64 {
    v.round() as i64
}

/// Liang–Barsky clip of a segment against the square `[lo, hi]²`.
fn clip(a: Point, b: Point, lo: f64, hi: f64) -> Option<(Point, Point)> {
    let d = b - a;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-d.x, a.x - lo),
        (d.x, hi - a.x),
        (-d.y, a.y - lo),
        (d.y, hi - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((a + d * t0, a + d * t1))
}

/// Integer Bresenham line from `(x0, y0)` to `(x1, y1)`, both ends inclusive.
fn bresenham(mut x0: i64, mut y0: i64, x1: i64, y1: i64, mut plot: impl FnMut(i64, i64)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        plot(x0, y0);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
