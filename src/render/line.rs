//! Line rasterizers: Bresenham core, axis/diagonal fast paths, anti-aliased,
//! sub-pixel (float), dashed and thick variants.

use super::Paint;
use crate::blend::{effective_alpha, with_combine, OPAQUE};
use crate::blit::put_with;
use crate::color::Rgba;
use crate::fixed::{self, Fixed};
use crate::geometry::Point;
use crate::surface::Surface;

/// Generic integer Bresenham over all octants, endpoints inclusive.
///
/// The dedicated horizontal/vertical/diagonal paths in [`draw_line`] must
/// produce exactly the pixels this stepper produces for the same endpoints.
pub(crate) fn step_line<F: FnMut(i32, i32)>(
    mut x0: i32,
    mut y0: i32,
    x1: i32,
    y1: i32,
    mut plot: F,
) {
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
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

/// Draw a line between integer endpoints (inclusive).
///
/// Horizontal, vertical and 45-degree lines take dedicated loops that are
/// pixel identical to the generic stepper. With `paint.anti_alias`, sloped
/// lines split the alpha between the stepped pixel and its perpendicular
/// neighbor from the accumulator fraction.
pub fn draw_line(surface: &mut Surface<'_>, x0: i32, y0: i32, x1: i32, y1: i32, paint: Paint) {
    let (x0, y0, x1, y1) = if paint.dpi_aware {
        (
            surface.device(x0),
            surface.device(y0),
            surface.device(x1),
            surface.device(y1),
        )
    } else {
        (x0, y0, x1, y1)
    };
    draw_line_device(surface, x0, y0, x1, y1, paint);
}

/// Line drawing in device coordinates; used directly by the float entry
/// point, which never pre-scales.
fn draw_line_device(surface: &mut Surface<'_>, x0: i32, y0: i32, x1: i32, y1: i32, paint: Paint) {
    let eff = effective_alpha(paint.blend, paint.alpha.min(OPAQUE), paint.color.a);
    if eff == 0 {
        return;
    }
    if paint.anti_alias {
        draw_line_aa(surface, x0, y0, x1, y1, paint.color, eff, paint);
        return;
    }
    let color = paint.color;
    with_combine!(paint.blend, f => {
        if y0 == y1 {
            for x in x0.min(x1)..=x0.max(x1) {
                put_with(surface, x, y0, &f, color, eff);
            }
        } else if x0 == x1 {
            for y in y0.min(y1)..=y0.max(y1) {
                put_with(surface, x0, y, &f, color, eff);
            }
        } else if (x1 - x0).abs() == (y1 - y0).abs() {
            let sx = if x0 < x1 { 1 } else { -1 };
            let sy = if y0 < y1 { 1 } else { -1 };
            let (mut x, mut y) = (x0, y0);
            loop {
                put_with(surface, x, y, &f, color, eff);
                if x == x1 {
                    break;
                }
                x += sx;
                y += sy;
            }
        } else {
            step_line(x0, y0, x1, y1, |x, y| put_with(surface, x, y, &f, color, eff));
        }
    });
}

/// Coverage-weighted line: the accumulator fraction at each major-axis step
/// decides how the alpha splits across the two boundary pixels.
fn draw_line_aa(
    surface: &mut Surface<'_>,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color: Rgba,
    alpha: u32,
    paint: Paint,
) {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    // Axis-aligned and exact diagonals are fully covered; no feathering.
    if dx == 0 || dy == 0 || dx == dy {
        let mut plain = paint;
        plain.anti_alias = false;
        plain.dpi_aware = false;
        draw_line_device(surface, x0, y0, x1, y1, plain);
        return;
    }
    with_combine!(paint.blend, f => {
        if dx > dy {
            let (x0, y0, x1, y1) = if x0 < x1 { (x0, y0, x1, y1) } else { (x1, y1, x0, y0) };
            let grad = fixed::ratio(y1 - y0, x1 - x0);
            let mut acc: Fixed = fixed::from_i32(y0);
            for x in x0..=x1 {
                let y = fixed::floor(acc);
                let w = (fixed::frac(acc) >> 8) as u32;
                put_with(surface, x, y, &f, color, (alpha * (256 - w)) >> 8);
                put_with(surface, x, y + 1, &f, color, (alpha * w) >> 8);
                acc += grad;
            }
        } else {
            let (x0, y0, x1, y1) = if y0 < y1 { (x0, y0, x1, y1) } else { (x1, y1, x0, y0) };
            let grad = fixed::ratio(x1 - x0, y1 - y0);
            let mut acc: Fixed = fixed::from_i32(x0);
            for y in y0..=y1 {
                let x = fixed::floor(acc);
                let w = (fixed::frac(acc) >> 8) as u32;
                put_with(surface, x, y, &f, color, (alpha * (256 - w)) >> 8);
                put_with(surface, x + 1, y, &f, color, (alpha * w) >> 8);
                acc += grad;
            }
        }
    });
}

/// Draw a line between sub-pixel endpoints.
///
/// The endpoints are clipped parametrically against the surface bounds
/// before any stepping, so arbitrarily distant endpoints cost nothing.
/// Float coordinates are already device coordinates; no DPI pre-scaling.
pub fn draw_line_f(surface: &mut Surface<'_>, p0: Point, p1: Point, paint: Paint) {
    let w = surface.width() as f32;
    let h = surface.height() as f32;
    let (dx, dy) = (p1.x - p0.x, p1.y - p0.y);
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;
    // Liang-Barsky: each boundary trims the parameter interval.
    for (p, q) in [
        (-dx, p0.x),
        (dx, w - 1.0 - p0.x),
        (-dy, p0.y),
        (dy, h - 1.0 - p0.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return;
            }
            if r > t0 {
                t0 = r;
            }
        } else {
            if r < t0 {
                return;
            }
            if r < t1 {
                t1 = r;
            }
        }
    }
    let a = p0.lerp(p1, t0);
    let b = p0.lerp(p1, t1);
    draw_line_device(
        surface,
        a.x.round() as i32,
        a.y.round() as i32,
        b.x.round() as i32,
        b.y.round() as i32,
        paint,
    );
}

/// Draw a dashed line: `on` lit pixels, then `off` dark pixels, repeating
/// along the stepped path. `on == 0` is a no-op.
pub fn draw_line_dashed(
    surface: &mut Surface<'_>,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    on: u32,
    off: u32,
    paint: Paint,
) {
    if on == 0 {
        return;
    }
    let (x0, y0, x1, y1) = if paint.dpi_aware {
        (
            surface.device(x0),
            surface.device(y0),
            surface.device(x1),
            surface.device(y1),
        )
    } else {
        (x0, y0, x1, y1)
    };
    let eff = effective_alpha(paint.blend, paint.alpha.min(OPAQUE), paint.color.a);
    if eff == 0 {
        return;
    }
    let color = paint.color;
    let period = on + off;
    let mut run = 0u32;
    with_combine!(paint.blend, f => {
        step_line(x0, y0, x1, y1, |x, y| {
            if run % period < on {
                put_with(surface, x, y, &f, color, eff);
            }
            run += 1;
        });
    });
}

/// Draw a line of the given pixel width: each step fills a span
/// perpendicular to the major axis. Width 0 or 1 falls back to
/// [`draw_line`].
pub fn draw_thick_line(
    surface: &mut Surface<'_>,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    width: u32,
    paint: Paint,
) {
    if width <= 1 {
        draw_line(surface, x0, y0, x1, y1, paint);
        return;
    }
    let (x0, y0, x1, y1) = if paint.dpi_aware {
        (
            surface.device(x0),
            surface.device(y0),
            surface.device(x1),
            surface.device(y1),
        )
    } else {
        (x0, y0, x1, y1)
    };
    let eff = effective_alpha(paint.blend, paint.alpha.min(OPAQUE), paint.color.a);
    if eff == 0 {
        return;
    }
    let color = paint.color;
    let w = width as i32;
    let lo = -(w / 2);
    let hi = lo + w - 1;
    let x_major = (x1 - x0).abs() >= (y1 - y0).abs();
    with_combine!(paint.blend, f => {
        step_line(x0, y0, x1, y1, |x, y| {
            if x_major {
                for o in lo..=hi {
                    put_with(surface, x, y + o, &f, color, eff);
                }
            } else {
                for o in lo..=hi {
                    put_with(surface, x + o, y, &f, color, eff);
                }
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Pixmap;
    use std::collections::HashSet;

    fn drawn_pixels(pm: &Pixmap) -> HashSet<(i32, i32)> {
        let r = pm.as_ref();
        let mut set = HashSet::new();
        for y in 0..pm.height() as i32 {
            for x in 0..pm.width() as i32 {
                if r.pixel(x, y) != Some(Rgba::TRANSPARENT) {
                    set.insert((x, y));
                }
            }
        }
        set
    }

    fn generic_pixels(x0: i32, y0: i32, x1: i32, y1: i32) -> HashSet<(i32, i32)> {
        let mut set = HashSet::new();
        step_line(x0, y0, x1, y1, |x, y| {
            set.insert((x, y));
        });
        set
    }

    #[test]
    fn test_fast_paths_match_generic_stepper() {
        // Horizontal, vertical, both 45-degree diagonals, both directions.
        let cases = [
            (1, 3, 8, 3),
            (8, 3, 1, 3),
            (4, 0, 4, 9),
            (4, 9, 4, 0),
            (0, 0, 7, 7),
            (7, 7, 0, 0),
            (0, 9, 9, 0),
        ];
        for (x0, y0, x1, y1) in cases {
            let mut pm = Pixmap::new(10, 10).unwrap();
            draw_line(&mut pm.surface(), x0, y0, x1, y1, Paint::new(Rgba::RED));
            assert_eq!(
                drawn_pixels(&pm),
                generic_pixels(x0, y0, x1, y1),
                "case {x0},{y0} -> {x1},{y1}"
            );
        }
    }

    #[test]
    fn test_generic_line_endpoints_inclusive() {
        let mut pm = Pixmap::new(16, 16).unwrap();
        draw_line(&mut pm.surface(), 1, 2, 12, 9, Paint::new(Rgba::GREEN));
        let px = drawn_pixels(&pm);
        assert!(px.contains(&(1, 2)));
        assert!(px.contains(&(12, 9)));
    }

    #[test]
    fn test_line_clips_silently() {
        let mut pm = Pixmap::new(4, 4).unwrap();
        draw_line(&mut pm.surface(), -10, -10, 20, 20, Paint::new(Rgba::RED));
        // Diagonal through the whole surface; out-of-bounds steps dropped.
        assert_eq!(drawn_pixels(&pm).len(), 4);
    }

    #[test]
    fn test_aa_line_splits_alpha() {
        let mut pm = Pixmap::new(16, 16).unwrap();
        draw_line(
            &mut pm.surface(),
            0,
            0,
            12,
            5,
            Paint::new(Rgba::WHITE).anti_aliased(),
        );
        // Away from the endpoints, each column's two boundary pixels share
        // the full alpha.
        let r = pm.as_ref();
        for x in 1..12 {
            let col: u32 = (0..16)
                .filter_map(|y| r.pixel(x, y))
                .map(|p| u32::from(p.r))
                .sum();
            assert!((253..=256).contains(&col), "column {x} sums to {col}");
        }
    }

    #[test]
    fn test_dashed_pattern() {
        let mut pm = Pixmap::new(12, 1).unwrap();
        draw_line_dashed(&mut pm.surface(), 0, 0, 11, 0, 2, 2, Paint::new(Rgba::RED));
        let px = drawn_pixels(&pm);
        for x in 0..12 {
            let lit = x % 4 < 2;
            assert_eq!(px.contains(&(x, 0)), lit, "x = {x}");
        }
    }

    #[test]
    fn test_thick_line_width() {
        let mut pm = Pixmap::new(10, 10).unwrap();
        draw_thick_line(&mut pm.surface(), 1, 5, 8, 5, 3, Paint::new(Rgba::BLUE));
        let px = drawn_pixels(&pm);
        for x in 1..=8 {
            assert!(px.contains(&(x, 4)) && px.contains(&(x, 5)) && px.contains(&(x, 6)));
        }
        assert!(!px.contains(&(1, 3)) && !px.contains(&(1, 7)));
    }

    #[test]
    fn test_float_line_clips_distant_endpoints() {
        let mut pm = Pixmap::new(8, 8).unwrap();
        draw_line_f(
            &mut pm.surface(),
            Point::new(-1000.0, 3.5),
            Point::new(1000.0, 3.5),
            Paint::new(Rgba::RED),
        );
        let px = drawn_pixels(&pm);
        assert_eq!(px.len(), 8);
        assert!(px.iter().all(|&(_, y)| y == 3 || y == 4));
    }

    #[test]
    fn test_float_line_fully_outside_is_noop() {
        let mut pm = Pixmap::new(8, 8).unwrap();
        draw_line_f(
            &mut pm.surface(),
            Point::new(-5.0, -5.0),
            Point::new(-1.0, -9.0),
            Paint::new(Rgba::RED),
        );
        assert!(drawn_pixels(&pm).is_empty());
    }

    #[test]
    fn test_dpi_aware_prescaling() {
        let mut buf = vec![0u32; 12 * 12];
        let mut s = Surface::new(&mut buf, 12, 12).unwrap().with_scale(2);
        draw_line(&mut s, 1, 1, 3, 1, Paint::new(Rgba::RED).dpi_aware());
        drop(s);
        // (1,1)-(3,1) scales to (2,2)-(6,2).
        assert_eq!(Rgba::from_bits(buf[2 * 12 + 2]), Rgba::RED);
        assert_eq!(Rgba::from_bits(buf[2 * 12 + 6]), Rgba::RED);
        assert_eq!(buf[2 * 12 + 7], 0);
        assert_eq!(buf[12 + 2], 0);
    }
}
