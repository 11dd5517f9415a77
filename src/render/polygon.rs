//! Convex polygon, triangle and trapezoid scanline fills.
//!
//! The polygon walker sorts out the topmost vertex, then advances two edge
//! cursors (one along each perimeter chain) through monotonic y-spans. Each
//! span's fractional x-intercepts become a trapezoid, and the trapezoid
//! filler steps its left/right x accumulators in 16.16 fixed point across
//! scanlines. Rows and columns are half-open, so shapes sharing an edge
//! never double-fill.

use super::Paint;
use crate::blend::{effective_alpha, with_combine, OPAQUE};
use crate::blit::put_with;
use crate::color::Rgba;
use crate::fixed::{self, Fixed};
use crate::surface::Surface;

/// A y-monotonic span with linearly stepping left/right edges, all x values
/// in 16.16 fixed point.
#[derive(Debug, Clone, Copy)]
pub struct Trapezoid {
    /// Top scanline.
    pub y: i32,
    /// Number of scanlines.
    pub height: i32,
    /// Left x at the top scanline.
    pub xl: Fixed,
    /// Right x at the top scanline.
    pub xr: Fixed,
    /// Left x step per scanline.
    pub dxl: Fixed,
    /// Right x step per scanline.
    pub dxr: Fixed,
}

fn fill_trapezoid_with<F>(
    surface: &mut Surface<'_>,
    trap: Trapezoid,
    f: &F,
    color: Rgba,
    alpha: u32,
) where
    F: Fn(u32, Rgba, u32) -> u32,
{
    let mut xl = trap.xl;
    let mut xr = trap.xr;
    for y in trap.y..trap.y + trap.height {
        let a = fixed::round(xl);
        let b = fixed::round(xr);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        for x in lo..hi {
            put_with(surface, x, y, f, color, alpha);
        }
        xl += trap.dxl;
        xr += trap.dxr;
    }
}

/// Fill a trapezoid. Degenerate height is a silent no-op.
pub fn fill_trapezoid(surface: &mut Surface<'_>, trap: Trapezoid, paint: Paint) {
    if trap.height <= 0 {
        return;
    }
    let eff = effective_alpha(paint.blend, paint.alpha.min(OPAQUE), paint.color.a);
    if eff == 0 {
        return;
    }
    let color = paint.color;
    with_combine!(paint.blend, f => {
        fill_trapezoid_with(surface, trap, &f, color, eff);
    });
}

/// One chain cursor: the active edge's accumulator, step and end row.
struct Cursor {
    idx: usize,
    x: Fixed,
    dx: Fixed,
    y_end: i32,
}

/// Advance a cursor to the next edge whose end lies below row `y`.
/// Returns false once the chain runs out (the walk reached the bottom).
fn advance(pts: &[(i32, i32)], cursor: &mut Cursor, forward: bool, y: i32) -> bool {
    let n = pts.len();
    for _ in 0..n {
        let next = if forward {
            (cursor.idx + 1) % n
        } else {
            (cursor.idx + n - 1) % n
        };
        let (x0, y0) = pts[cursor.idx];
        let (x1, y1) = pts[next];
        if y1 <= y {
            // Horizontal or ascending edge at this row; skip past it.
            cursor.idx = next;
            if y1 < y0 {
                return false;
            }
            continue;
        }
        cursor.dx = fixed::ratio(x1 - x0, y1 - y0);
        cursor.x = fixed::from_i32(x0) + (y - y0) * cursor.dx;
        cursor.y_end = y1;
        cursor.idx = next;
        return true;
    }
    false
}

/// Fill a convex polygon given its vertices in perimeter order (either
/// winding). Fewer than 3 vertices, or a fully flat polygon, is a no-op.
pub fn fill_convex_polygon(surface: &mut Surface<'_>, pts: &[(i32, i32)], paint: Paint) {
    if pts.len() < 3 {
        return;
    }
    let eff = effective_alpha(paint.blend, paint.alpha.min(OPAQUE), paint.color.a);
    if eff == 0 {
        return;
    }
    let scaled: Vec<(i32, i32)>;
    let pts = if paint.dpi_aware {
        scaled = pts
            .iter()
            .map(|&(x, y)| (surface.device(x), surface.device(y)))
            .collect();
        &scaled[..]
    } else {
        pts
    };

    // Topmost vertex, ties broken by x: the start of both chains.
    let top = (0..pts.len())
        .min_by_key(|&i| (pts[i].1, pts[i].0))
        .unwrap_or(0);
    let mut y = pts[top].1;

    let mut a = Cursor {
        idx: top,
        x: 0,
        dx: 0,
        y_end: y,
    };
    let mut b = Cursor {
        idx: top,
        x: 0,
        dx: 0,
        y_end: y,
    };
    if !advance(pts, &mut a, false, y) || !advance(pts, &mut b, true, y) {
        return;
    }

    let color = paint.color;
    with_combine!(paint.blend, f => {
        loop {
            let y_next = a.y_end.min(b.y_end);
            let h = y_next - y;
            if h > 0 {
                fill_trapezoid_with(
                    surface,
                    Trapezoid {
                        y,
                        height: h,
                        xl: a.x,
                        xr: b.x,
                        dxl: a.dx,
                        dxr: b.dx,
                    },
                    &f,
                    color,
                    eff,
                );
                a.x += h * a.dx;
                b.x += h * b.dx;
                y = y_next;
            }
            let more_a = a.y_end > y || advance(pts, &mut a, false, y);
            let more_b = b.y_end > y || advance(pts, &mut b, true, y);
            if !more_a || !more_b {
                return;
            }
        }
    });
}

/// Fill a triangle. Same scanline semantics as [`fill_convex_polygon`] with
/// exactly three vertices.
pub fn fill_triangle(
    surface: &mut Surface<'_>,
    a: (i32, i32),
    b: (i32, i32),
    c: (i32, i32),
    paint: Paint,
) {
    fill_convex_polygon(surface, &[a, b, c], paint);
}
