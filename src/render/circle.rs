//! Circle, filled circle and arc rasterizers.
//!
//! The default path is an exact midpoint-circle walk with 8-way symmetry;
//! the anti-aliased variant steps unit x computing `y = sqrt(r^2 - x^2)` and
//! feathers the two boundary pixels from the fractional part. Arcs reuse the
//! same walks, filtering emitted points per 90-degree quadrant.

use super::Paint;
use crate::blend::{effective_alpha, with_combine, OPAQUE};
use crate::blit::put_with;
use crate::color::Rgba;
use crate::surface::Surface;
use std::ops::BitOr;

/// Bitmask of 90-degree-aligned quadrants, in screen coordinates (y down).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quadrants(u8);

impl Quadrants {
    /// +x, -y.
    pub const TOP_RIGHT: Self = Self(1);
    /// -x, -y.
    pub const TOP_LEFT: Self = Self(2);
    /// -x, +y.
    pub const BOTTOM_LEFT: Self = Self(4);
    /// +x, +y.
    pub const BOTTOM_RIGHT: Self = Self(8);
    /// The full circle.
    pub const ALL: Self = Self(15);

    /// True if a point at the given center-relative offset falls in any
    /// selected quadrant. Axis points belong to both adjacent quadrants.
    #[must_use]
    pub const fn admits(self, dx: i32, dy: i32) -> bool {
        let mut mask = 0u8;
        if dx >= 0 && dy <= 0 {
            mask |= Self::TOP_RIGHT.0;
        }
        if dx <= 0 && dy <= 0 {
            mask |= Self::TOP_LEFT.0;
        }
        if dx <= 0 && dy >= 0 {
            mask |= Self::BOTTOM_LEFT.0;
        }
        if dx >= 0 && dy >= 0 {
            mask |= Self::BOTTOM_RIGHT.0;
        }
        self.0 & mask != 0
    }
}

impl BitOr for Quadrants {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Draw a full circle outline of integer radius.
pub fn draw_circle(surface: &mut Surface<'_>, cx: i32, cy: i32, r: i32, paint: Paint) {
    draw_arc(surface, cx, cy, r, Quadrants::ALL, paint);
}

/// Draw the selected quadrants of a circle outline.
pub fn draw_arc(
    surface: &mut Surface<'_>,
    cx: i32,
    cy: i32,
    r: i32,
    quadrants: Quadrants,
    paint: Paint,
) {
    let (cx, cy, r) = if paint.dpi_aware {
        (surface.device(cx), surface.device(cy), surface.device(r))
    } else {
        (cx, cy, r)
    };
    if r < 0 {
        return;
    }
    let eff = effective_alpha(paint.blend, paint.alpha.min(OPAQUE), paint.color.a);
    if eff == 0 {
        return;
    }
    if r == 0 {
        let color = paint.color;
        with_combine!(paint.blend, f => {
            put_with(surface, cx, cy, &f, color, eff);
        });
        return;
    }
    if paint.anti_alias {
        draw_arc_aa(surface, cx, cy, r, quadrants, paint.color, eff, paint);
        return;
    }
    let color = paint.color;
    with_combine!(paint.blend, f => {
        let mut emit = |dx: i32, dy: i32| {
            if quadrants.admits(dx, dy) {
                put_with(surface, cx + dx, cy + dy, &f, color, eff);
            }
        };
        let mut x = r;
        let mut y = 0;
        let mut e = 1 - r;
        while x >= y {
            if y == 0 {
                emit(x, 0);
                emit(-x, 0);
                emit(0, x);
                emit(0, -x);
            } else if x == y {
                emit(x, x);
                emit(-x, x);
                emit(x, -x);
                emit(-x, -x);
            } else {
                emit(x, y);
                emit(-x, y);
                emit(x, -y);
                emit(-x, -y);
                emit(y, x);
                emit(-y, x);
                emit(y, -x);
                emit(-y, -x);
            }
            y += 1;
            if e < 0 {
                e += 2 * y + 1;
            } else {
                x -= 1;
                e += 2 * (y - x) + 1;
            }
        }
    });
}

/// Anti-aliased arc: per unit x, `y = sqrt(r^2 - x^2)` splits the alpha
/// between the two rows bracketing the true boundary.
#[allow(clippy::too_many_arguments)]
fn draw_arc_aa(
    surface: &mut Surface<'_>,
    cx: i32,
    cy: i32,
    r: i32,
    quadrants: Quadrants,
    color: Rgba,
    alpha: u32,
    paint: Paint,
) {
    let rr = (r * r) as f32;
    with_combine!(paint.blend, f => {
        let mut emit = |dx: i32, dy: i32, a: u32| {
            if a != 0 && quadrants.admits(dx, dy) {
                put_with(surface, cx + dx, cy + dy, &f, color, a);
            }
        };
        let mut x = 0;
        loop {
            let yf = (rr - (x * x) as f32).sqrt();
            let yi = yf.floor() as i32;
            if x > yi {
                break;
            }
            let w = ((yf - yf.floor()) * 256.0) as u32;
            let a_in = (alpha * (256 - w)) >> 8;
            let a_out = (alpha * w) >> 8;
            for (y, a) in [(yi, a_in), (yi + 1, a_out)] {
                emit(x, -y, a);
                emit(x, y, a);
                if x != 0 {
                    emit(-x, -y, a);
                    emit(-x, y, a);
                }
                // Mirrored octant, skipping the diagonal duplicate.
                if x != y {
                    emit(y, -x, a);
                    emit(-y, -x, a);
                    if x != 0 {
                        emit(y, x, a);
                        emit(-y, x, a);
                    }
                }
            }
            x += 1;
        }
    });
}

fn isqrt(v: i64) -> i32 {
    if v <= 0 {
        return 0;
    }
    let mut x = (v as f64).sqrt() as i64;
    while (x + 1) * (x + 1) <= v {
        x += 1;
    }
    while x * x > v {
        x -= 1;
    }
    x as i32
}

/// Fill a circle with horizontal spans, one per row.
pub fn fill_circle(surface: &mut Surface<'_>, cx: i32, cy: i32, r: i32, paint: Paint) {
    let (cx, cy, r) = if paint.dpi_aware {
        (surface.device(cx), surface.device(cy), surface.device(r))
    } else {
        (cx, cy, r)
    };
    if r < 0 {
        return;
    }
    let eff = effective_alpha(paint.blend, paint.alpha.min(OPAQUE), paint.color.a);
    if eff == 0 {
        return;
    }
    let color = paint.color;
    let rr = i64::from(r) * i64::from(r);
    with_combine!(paint.blend, f => {
        for dy in -r..=r {
            let half = isqrt(rr - i64::from(dy) * i64::from(dy));
            for x in cx - half..=cx + half {
                put_with(surface, x, cy + dy, &f, color, eff);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Pixmap;
    use std::collections::HashSet;

    fn drawn(pm: &Pixmap) -> HashSet<(i32, i32)> {
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

    #[test]
    fn test_circle_symmetry_all_radii() {
        for r in 0..=64 {
            let mut pm = Pixmap::new(161, 161).unwrap();
            draw_circle(&mut pm.surface(), 80, 80, r, Paint::new(Rgba::WHITE));
            let px = drawn(&pm);
            for &(x, y) in &px {
                let (dx, dy) = (x - 80, y - 80);
                // 4 axis reflections plus the diagonal swap.
                for p in [
                    (80 - dx, 80 + dy),
                    (80 + dx, 80 - dy),
                    (80 - dx, 80 - dy),
                    (80 + dy, 80 + dx),
                ] {
                    assert!(px.contains(&p), "r={r}: {:?} missing mate {p:?}", (x, y));
                }
            }
        }
    }

    #[test]
    fn test_circle_radius_zero_is_center_pixel() {
        let mut pm = Pixmap::new(5, 5).unwrap();
        draw_circle(&mut pm.surface(), 2, 2, 0, Paint::new(Rgba::RED));
        assert_eq!(drawn(&pm), HashSet::from([(2, 2)]));
    }

    #[test]
    fn test_circle_extremes_on_axes() {
        let mut pm = Pixmap::new(21, 21).unwrap();
        draw_circle(&mut pm.surface(), 10, 10, 7, Paint::new(Rgba::RED));
        let px = drawn(&pm);
        for p in [(17, 10), (3, 10), (10, 17), (10, 3)] {
            assert!(px.contains(&p));
        }
        assert!(!px.contains(&(10, 10)));
    }

    #[test]
    fn test_fill_circle_center_row_width() {
        let mut pm = Pixmap::new(21, 21).unwrap();
        fill_circle(&mut pm.surface(), 10, 10, 5, Paint::new(Rgba::BLUE));
        let px = drawn(&pm);
        for x in 5..=15 {
            assert!(px.contains(&(x, 10)));
        }
        assert!(!px.contains(&(4, 10)) && !px.contains(&(16, 10)));
        assert!(px.contains(&(10, 10)));
    }

    #[test]
    fn test_fill_circle_symmetric_and_in_radius() {
        let mut pm = Pixmap::new(31, 31).unwrap();
        fill_circle(&mut pm.surface(), 15, 15, 9, Paint::new(Rgba::RED));
        let px = drawn(&pm);
        for &(x, y) in &px {
            let (dx, dy) = (x - 15, y - 15);
            assert!(dx * dx + dy * dy <= 81);
            assert!(px.contains(&(15 - dx, 15 + dy)));
            assert!(px.contains(&(15 + dx, 15 - dy)));
        }
    }

    #[test]
    fn test_arc_single_quadrant() {
        let mut pm = Pixmap::new(21, 21).unwrap();
        draw_arc(
            &mut pm.surface(),
            10,
            10,
            6,
            Quadrants::TOP_RIGHT,
            Paint::new(Rgba::GREEN),
        );
        for (x, y) in drawn(&pm) {
            assert!(x >= 10 && y <= 10, "pixel {:?} outside quadrant", (x, y));
        }
        // The axis endpoints belong to the quadrant.
        assert!(drawn(&pm).contains(&(16, 10)));
        assert!(drawn(&pm).contains(&(10, 4)));
    }

    #[test]
    fn test_arc_clips_out_of_bounds_silently() {
        let mut pm = Pixmap::new(8, 8).unwrap();
        draw_circle(&mut pm.surface(), 0, 0, 6, Paint::new(Rgba::RED));
        // Only the bottom-right quadrant can land in bounds; no panic.
        for (x, y) in drawn(&pm) {
            assert!((0..8).contains(&x) && (0..8).contains(&y));
        }
    }

    #[test]
    fn test_aa_circle_feathers_boundary() {
        let mut pm = Pixmap::new(41, 41).unwrap();
        draw_circle(
            &mut pm.surface(),
            20,
            20,
            10,
            Paint::new(Rgba::WHITE).anti_aliased(),
        );
        // Off-axis columns carry two partial pixels summing near full alpha.
        let r = pm.as_ref();
        let col: u32 = (0..41)
            .filter_map(|y| r.pixel(23, y))
            .map(|p| u32::from(p.r))
            .sum();
        // Two boundary crossings (top and bottom) in this column.
        assert!((450..=512).contains(&col), "column sums to {col}");
    }
}
