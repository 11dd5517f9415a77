//! Quadratic and cubic Bezier curves: evaluation, precomputed cubic
//! coefficients, tolerance-driven flattening, stroking and filling, and
//! y-for-x queries (closed form for quadratics, bounded bisection for
//! cubics).

use super::line::draw_line_f;
use super::polygon::fill_convex_polygon;
use super::Paint;
use crate::geometry::Point;
use crate::surface::Surface;

/// Recursion cap for adaptive flattening; 2^16 segments is far below any
/// useful tolerance.
const MAX_DEPTH: u32 = 16;

/// Evaluate a quadratic Bezier at parameter `t`.
#[must_use]
pub fn quad_point(p0: Point, p1: Point, p2: Point, t: f32) -> Point {
    let u = 1.0 - t;
    Point::new(
        u * u * p0.x + 2.0 * u * t * p1.x + t * t * p2.x,
        u * u * p0.y + 2.0 * u * t * p1.y + t * t * p2.y,
    )
}

/// Evaluate a cubic Bezier at parameter `t`.
#[must_use]
pub fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f32) -> Point {
    let u = 1.0 - t;
    let (uu, tt) = (u * u, t * t);
    Point::new(
        u * uu * p0.x + 3.0 * uu * t * p1.x + 3.0 * u * tt * p2.x + t * tt * p3.x,
        u * uu * p0.y + 3.0 * uu * t * p1.y + 3.0 * u * tt * p2.y + t * tt * p3.y,
    )
}

/// Polynomial form of a cubic Bezier: `a*t^3 + b*t^2 + c*t + d` per axis.
/// Computed once from the control points, then evaluated cheaply.
#[derive(Debug, Clone, Copy)]
pub struct CubicCoeffs {
    a: Point,
    b: Point,
    c: Point,
    d: Point,
}

impl CubicCoeffs {
    /// Precompute the coefficients from four control points.
    #[must_use]
    pub fn from_controls(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        let c = Point::new(3.0 * (p1.x - p0.x), 3.0 * (p1.y - p0.y));
        let b = Point::new(
            3.0 * (p2.x - p1.x) - c.x,
            3.0 * (p2.y - p1.y) - c.y,
        );
        let a = Point::new(p3.x - p0.x - c.x - b.x, p3.y - p0.y - c.y - b.y);
        Self { a, b, c, d: p0 }
    }

    /// Evaluate the curve at `t` (Horner form).
    #[must_use]
    pub fn eval(&self, t: f32) -> Point {
        Point::new(
            ((self.a.x * t + self.b.x) * t + self.c.x) * t + self.d.x,
            ((self.a.y * t + self.b.y) * t + self.c.y) * t + self.d.y,
        )
    }
}

/// Perpendicular distance from `p` to the infinite line through `a`-`b`;
/// falls back to point distance when the chord degenerates.
fn line_distance(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    if len2 <= f32::EPSILON {
        return p.distance(a);
    }
    ((p.x - a.x) * dy - (p.y - a.y) * dx).abs() / len2.sqrt()
}

fn flatten_quad_rec<F: FnMut(Point)>(
    p0: Point,
    p1: Point,
    p2: Point,
    tolerance: f32,
    depth: u32,
    emit: &mut F,
) {
    // A quadratic deviates from its chord by at most half the control
    // point's distance to it.
    if depth == 0 || line_distance(p1, p0, p2) * 0.5 <= tolerance {
        emit(p2);
        return;
    }
    let a = p0.lerp(p1, 0.5);
    let b = p1.lerp(p2, 0.5);
    let mid = a.lerp(b, 0.5);
    flatten_quad_rec(p0, a, mid, tolerance, depth - 1, emit);
    flatten_quad_rec(mid, b, p2, tolerance, depth - 1, emit);
}

/// Flatten a quadratic Bezier into chords whose maximum deviation from the
/// curve stays below `tolerance`. Emits the start point first, then every
/// chord endpoint.
pub fn flatten_quad<F: FnMut(Point)>(
    p0: Point,
    p1: Point,
    p2: Point,
    tolerance: f32,
    mut emit: F,
) {
    let tolerance = tolerance.max(1.0 / 64.0);
    emit(p0);
    flatten_quad_rec(p0, p1, p2, tolerance, MAX_DEPTH, &mut emit);
}

fn flatten_cubic_rec<F: FnMut(Point)>(
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    tolerance: f32,
    depth: u32,
    emit: &mut F,
) {
    let dev = line_distance(p1, p0, p3).max(line_distance(p2, p0, p3));
    if depth == 0 || dev * 0.75 <= tolerance {
        emit(p3);
        return;
    }
    // de Casteljau split at t = 1/2.
    let a = p0.lerp(p1, 0.5);
    let b = p1.lerp(p2, 0.5);
    let c = p2.lerp(p3, 0.5);
    let ab = a.lerp(b, 0.5);
    let bc = b.lerp(c, 0.5);
    let mid = ab.lerp(bc, 0.5);
    flatten_cubic_rec(p0, a, ab, mid, tolerance, depth - 1, emit);
    flatten_cubic_rec(mid, bc, c, p3, tolerance, depth - 1, emit);
}

/// Flatten a cubic Bezier into chords within `tolerance` of the curve.
/// Emits the start point first, then every chord endpoint.
pub fn flatten_cubic<F: FnMut(Point)>(
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    tolerance: f32,
    mut emit: F,
) {
    let tolerance = tolerance.max(1.0 / 64.0);
    emit(p0);
    flatten_cubic_rec(p0, p1, p2, p3, tolerance, MAX_DEPTH, &mut emit);
}

/// Stroke a quadratic Bezier as flattened sub-pixel line segments.
pub fn draw_quad_bezier(
    surface: &mut Surface<'_>,
    p0: Point,
    p1: Point,
    p2: Point,
    tolerance: f32,
    paint: Paint,
) {
    let mut prev: Option<Point> = None;
    flatten_quad(p0, p1, p2, tolerance, |p| {
        if let Some(q) = prev {
            draw_line_f(surface, q, p, paint);
        }
        prev = Some(p);
    });
}

/// Stroke a cubic Bezier as flattened sub-pixel line segments.
pub fn draw_cubic_bezier(
    surface: &mut Surface<'_>,
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    tolerance: f32,
    paint: Paint,
) {
    let mut prev: Option<Point> = None;
    flatten_cubic(p0, p1, p2, p3, tolerance, |p| {
        if let Some(q) = prev {
            draw_line_f(surface, q, p, paint);
        }
        prev = Some(p);
    });
}

/// Fill the region enclosed by a quadratic Bezier and its chord. The
/// flattened outline must be convex, which holds for any single Bezier
/// segment and its closing chord.
pub fn fill_quad_bezier(
    surface: &mut Surface<'_>,
    p0: Point,
    p1: Point,
    p2: Point,
    tolerance: f32,
    paint: Paint,
) {
    let mut pts: Vec<(i32, i32)> = Vec::new();
    flatten_quad(p0, p1, p2, tolerance, |p| {
        pts.push((p.x.round() as i32, p.y.round() as i32));
    });
    pts.dedup();
    fill_convex_polygon(surface, &pts, paint);
}

/// Fill the region enclosed by a cubic Bezier and its chord. As with the
/// quadratic fill, the flattened outline closed by the chord must be convex,
/// which holds whenever the curve stays on one side of its chord.
pub fn fill_cubic_bezier(
    surface: &mut Surface<'_>,
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    tolerance: f32,
    paint: Paint,
) {
    let mut pts: Vec<(i32, i32)> = Vec::new();
    flatten_cubic(p0, p1, p2, p3, tolerance, |p| {
        pts.push((p.x.round() as i32, p.y.round() as i32));
    });
    pts.dedup();
    fill_convex_polygon(surface, &pts, paint);
}

/// Solve `y` at a given `x` on a quadratic Bezier, if any parameter in
/// `[0, 1]` maps there. Closed-form quadratic solve on the x polynomial.
#[must_use]
pub fn quad_y_for_x(p0: Point, p1: Point, p2: Point, x: f32) -> Option<f32> {
    let a = p0.x - 2.0 * p1.x + p2.x;
    let b = 2.0 * (p1.x - p0.x);
    let c = p0.x - x;
    let t = if a.abs() <= f32::EPSILON {
        if b.abs() <= f32::EPSILON {
            return None;
        }
        -c / b
    } else {
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        let t0 = (-b + sq) / (2.0 * a);
        let t1 = (-b - sq) / (2.0 * a);
        if (0.0..=1.0).contains(&t0) {
            t0
        } else {
            t1
        }
    };
    if (0.0..=1.0).contains(&t) {
        Some(quad_point(p0, p1, p2, t).y)
    } else {
        None
    }
}

/// Solve `y` at a given `x` on a cubic Bezier whose x component is
/// monotonic in `t`, by bounded bisection over the parameter (fixed
/// iteration count, no convergence loop).
#[must_use]
pub fn cubic_y_for_x(coeffs: &CubicCoeffs, x0: f32, x1_hint: f32, x: f32) -> Option<f32> {
    let (lo_x, hi_x) = if x0 <= x1_hint {
        (x0, x1_hint)
    } else {
        (x1_hint, x0)
    };
    if x < lo_x || x > hi_x {
        return None;
    }
    let ascending = x0 <= x1_hint;
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    for _ in 0..24 {
        let mid = (lo + hi) * 0.5;
        let px = coeffs.eval(mid).x;
        let below = if ascending { px < x } else { px > x };
        if below {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Some(coeffs.eval((lo + hi) * 0.5).y)
}
