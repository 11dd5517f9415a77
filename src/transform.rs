//! Scaled, rotated, delta and mesh-transform blits.
//!
//! All source stepping is done with 16.16 fixed-point accumulators. When a
//! destination rectangle is clipped, the accumulators are advanced by the
//! clipped-away pixel count with the same step the loop would have taken, so
//! clipping and runtime stepping agree exactly.
//!
//! [`scaled_blit`] maps an axis-aligned source rectangle onto an axis-aligned
//! destination rectangle. [`delta_blit`] samples the source along an
//! arbitrary destination-space affine field and is the per-cell engine of
//! [`transform_blit`]; [`rotated_blit`] builds such a field from an angle.

use crate::blend::{effective_alpha, with_combine, Blend, Filter, OPAQUE};
use crate::color::Rgba;
use crate::fixed::{self, Fixed, ONE};
use crate::geometry::{IntRect, Point};
use crate::surface::{Surface, SurfaceRef};

/// Minification step (~1.7x) beyond which bilinear scaling switches to the
/// filter-down kernel in both axes.
const FILTER_DOWN_STEP: Fixed = (ONE / 10) * 17;

fn sample_nearest(src: SurfaceRef<'_>, sx: Fixed, sy: Fixed) -> u32 {
    src.pixel_clamped(fixed::floor(sx), fixed::floor(sy))
}

/// Four-tap bilinear sample with 16.16 fractional weights (reduced to 8 bits
/// per axis before the weight products).
fn sample_bilinear(src: SurfaceRef<'_>, sx: Fixed, sy: Fixed) -> u32 {
    let x0 = fixed::floor(sx);
    let y0 = fixed::floor(sy);
    let fx = (fixed::frac(sx) >> 8) as u32;
    let fy = (fixed::frac(sy) >> 8) as u32;
    let p00 = Rgba::from_bits(src.pixel_clamped(x0, y0));
    let p10 = Rgba::from_bits(src.pixel_clamped(x0 + 1, y0));
    let p01 = Rgba::from_bits(src.pixel_clamped(x0, y0 + 1));
    let p11 = Rgba::from_bits(src.pixel_clamped(x0 + 1, y0 + 1));
    let ch = |c00: u8, c10: u8, c01: u8, c11: u8| -> u8 {
        let top = u32::from(c00) * (256 - fx) + u32::from(c10) * fx;
        let bot = u32::from(c01) * (256 - fx) + u32::from(c11) * fx;
        ((top * (256 - fy) + bot * fy + 32768) >> 16) as u8
    };
    Rgba::new(
        ch(p00.r, p10.r, p01.r, p11.r),
        ch(p00.g, p10.g, p01.g, p11.g),
        ch(p00.b, p10.b, p01.b, p11.b),
        ch(p00.a, p10.a, p01.a, p11.a),
    )
    .to_bits()
}

/// 3x3 weighted average over taps spaced half a source step apart, weights
/// `[1,2,1] x [1,2,1] / 16`. Used instead of plain bilinear when minifying
/// hard enough that four taps would alias.
fn sample_filter_down(src: SurfaceRef<'_>, sx: Fixed, sy: Fixed, x_step: Fixed, y_step: Fixed) -> u32 {
    let hx = x_step / 2;
    let hy = y_step / 2;
    let mut acc = [0u32; 4];
    for (oy, wy) in [(-hy, 1u32), (0, 2), (hy, 1)] {
        for (ox, wx) in [(-hx, 1u32), (0, 2), (hx, 1)] {
            let p = Rgba::from_bits(src.pixel_clamped(
                fixed::floor(sx + ox),
                fixed::floor(sy + oy),
            ));
            let w = wx * wy;
            acc[0] += u32::from(p.r) * w;
            acc[1] += u32::from(p.g) * w;
            acc[2] += u32::from(p.b) * w;
            acc[3] += u32::from(p.a) * w;
        }
    }
    Rgba::new(
        ((acc[0] + 8) >> 4) as u8,
        ((acc[1] + 8) >> 4) as u8,
        ((acc[2] + 8) >> 4) as u8,
        ((acc[3] + 8) >> 4) as u8,
    )
    .to_bits()
}

/// Stretch or shrink a source rectangle onto a destination rectangle.
///
/// Steps are derived from the caller's rectangles before clipping, so
/// clipping never changes which source pixel a surviving destination pixel
/// samples. With a 1:1 scale, copy mode and full alpha this is pixel
/// identical to [`crate::blit::blit`].
pub fn scaled_blit(
    dst: &mut Surface<'_>,
    dst_rect: IntRect,
    src: SurfaceRef<'_>,
    src_rect: IntRect,
    alpha: u32,
    blend: Blend,
) {
    let alpha = alpha.min(OPAQUE);
    if alpha == 0 || dst_rect.is_empty() || src_rect.is_empty() {
        return;
    }
    if src_rect.intersect(&src.bounds()).is_empty() {
        return;
    }
    let x_step = fixed::ratio(src_rect.width, dst_rect.width);
    let y_step = fixed::ratio(src_rect.height, dst_rect.height);
    let dr = dst_rect.intersect(&dst.bounds());
    if dr.is_empty() {
        return;
    }
    if dst.intercept(|h| h.scaled_blit(dst_rect, src_rect, alpha, blend)) {
        return;
    }
    // Advance the accumulators over the clipped-away destination pixels.
    let sx0 = (i64::from(fixed::from_i32(src_rect.x))
        + i64::from(dr.x - dst_rect.x) * i64::from(x_step)) as Fixed;
    let sy0 = (i64::from(fixed::from_i32(src_rect.y))
        + i64::from(dr.y - dst_rect.y) * i64::from(y_step)) as Fixed;

    let filter_down =
        blend.filter == Filter::Bilinear && x_step > FILTER_DOWN_STEP && y_step > FILTER_DOWN_STEP;
    let (x0, x1) = (dr.x as usize, dr.right() as usize);
    with_combine!(blend, f => {
        let mut sy = sy0;
        for y in dr.y..dr.bottom() {
            let mut sx = sx0;
            for px in &mut dst.row_mut(y as u32)[x0..x1] {
                let bits = if filter_down {
                    sample_filter_down(src, sx, sy, x_step, y_step)
                } else {
                    match blend.filter {
                        Filter::Nearest => sample_nearest(src, sx, sy),
                        Filter::Bilinear => sample_bilinear(src, sx, sy),
                    }
                };
                let sp = Rgba::from_bits(bits);
                let eff = effective_alpha(blend, alpha, sp.a);
                if eff != 0 {
                    *px = f(*px, sp, eff);
                }
                sx += x_step;
            }
            sy += y_step;
        }
    });
}

/// Destination-space affine sampling field.
///
/// `(s, t)` is the source coordinate sampled for a destination pixel:
/// `s(x, y) = s0 + x*ds_dx + y*ds_dy + x*y*d2s_dxdy` with `(x, y)` relative
/// to the destination rectangle's top-left pixel, all values 16.16. The
/// second derivatives are zero for a pure affine map and nonzero for mesh
/// cells whose opposite edges differ.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaField {
    /// Source s at the destination rectangle's top-left pixel.
    pub s0: Fixed,
    /// Source t at the destination rectangle's top-left pixel.
    pub t0: Fixed,
    /// ds/dx.
    pub ds_dx: Fixed,
    /// dt/dx.
    pub dt_dx: Fixed,
    /// ds/dy.
    pub ds_dy: Fixed,
    /// dt/dy.
    pub dt_dy: Fixed,
    /// d²s/dxdy.
    pub d2s_dxdy: Fixed,
    /// d²t/dxdy.
    pub d2t_dxdy: Fixed,
}

/// Per-pixel alpha ramp over a destination rectangle, on the `[0, 256]`
/// alpha scale in 16.16 (so `256 << 16` is opaque everywhere).
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphaRamp {
    /// Alpha at the top-left pixel.
    pub a0: Fixed,
    /// da/dx.
    pub da_dx: Fixed,
    /// da/dy.
    pub da_dy: Fixed,
    /// d²a/dxdy.
    pub d2a_dxdy: Fixed,
}

impl AlphaRamp {
    /// Constant ramp from a `[0, 256]` alpha.
    #[must_use]
    pub const fn flat(alpha: u32) -> Self {
        Self {
            a0: (alpha as Fixed) << 16,
            da_dx: 0,
            da_dy: 0,
            d2a_dxdy: 0,
        }
    }
}

fn delta_blit_inner(
    dst: &mut Surface<'_>,
    dst_rect: IntRect,
    src: SurfaceRef<'_>,
    field: DeltaField,
    ramp: AlphaRamp,
    blend: Blend,
) {
    let dr = dst_rect.intersect(&dst.bounds());
    if dr.is_empty() {
        return;
    }
    let (sw, sh) = (src.width() as i32, src.height() as i32);
    let (x0, x1) = (dr.x as usize, dr.right() as usize);
    let xoff = i64::from(dr.x - dst_rect.x);
    with_combine!(blend, f => {
        for y in dr.y..dr.bottom() {
            let yy = i64::from(y - dst_rect.y);
            // The x-step varies per row when second derivatives are present.
            let sx_step = (i64::from(field.ds_dx) + yy * i64::from(field.d2s_dxdy)) as Fixed;
            let tx_step = (i64::from(field.dt_dx) + yy * i64::from(field.d2t_dxdy)) as Fixed;
            let mut s = (i64::from(field.s0)
                + yy * i64::from(field.ds_dy)
                + xoff * i64::from(sx_step)) as Fixed;
            let mut t = (i64::from(field.t0)
                + yy * i64::from(field.dt_dy)
                + xoff * i64::from(tx_step)) as Fixed;
            let a_step = (i64::from(ramp.da_dx) + yy * i64::from(ramp.d2a_dxdy)) as Fixed;
            let mut a = (i64::from(ramp.a0)
                + yy * i64::from(ramp.da_dy)
                + xoff * i64::from(a_step)) as Fixed;
            for px in &mut dst.row_mut(y as u32)[x0..x1] {
                let ix = fixed::floor(s);
                let iy = fixed::floor(t);
                // Pixels whose sample falls outside the source are skipped,
                // not clamped; a warped quad must not smear its edges.
                if ix >= 0 && iy >= 0 && ix < sw && iy < sh {
                    let bits = match blend.filter {
                        Filter::Nearest => src.pixel_clamped(ix, iy),
                        Filter::Bilinear => sample_bilinear(src, s, t),
                    };
                    let sp = Rgba::from_bits(bits);
                    let ramp_alpha = (fixed::floor(a).clamp(0, OPAQUE as i32)) as u32;
                    let eff = effective_alpha(blend, ramp_alpha, sp.a);
                    if eff != 0 {
                        *px = f(*px, sp, eff);
                    }
                }
                s += sx_step;
                t += tx_step;
                a += a_step;
            }
        }
    });
}

/// Sample the source along an affine field with a constant alpha.
pub fn delta_blit(
    dst: &mut Surface<'_>,
    dst_rect: IntRect,
    src: SurfaceRef<'_>,
    field: DeltaField,
    alpha: u32,
    blend: Blend,
) {
    let alpha = alpha.min(OPAQUE);
    if alpha == 0 || dst_rect.is_empty() {
        return;
    }
    delta_blit_inner(dst, dst_rect, src, field, AlphaRamp::flat(alpha), blend);
}

/// Sample the source along an affine field with a per-pixel alpha ramp.
pub fn delta_blit_faded(
    dst: &mut Surface<'_>,
    dst_rect: IntRect,
    src: SurfaceRef<'_>,
    field: DeltaField,
    ramp: AlphaRamp,
    blend: Blend,
) {
    if dst_rect.is_empty() {
        return;
    }
    delta_blit_inner(dst, dst_rect, src, field, ramp, blend);
}

/// Blit a source rectangle rotated by `angle` radians, centered on `center`
/// in destination space.
///
/// Builds the inverse-rotation affine field over the rotated bounding box
/// and delegates to [`delta_blit`]; destination pixels mapping outside the
/// source rectangle stay untouched.
pub fn rotated_blit(
    dst: &mut Surface<'_>,
    center: (i32, i32),
    src: SurfaceRef<'_>,
    src_rect: IntRect,
    angle: f32,
    alpha: u32,
    blend: Blend,
) {
    let alpha = alpha.min(OPAQUE);
    if alpha == 0 || src_rect.is_empty() {
        return;
    }
    let sr = src_rect.intersect(&src.bounds());
    if sr.is_empty() {
        return;
    }
    let (sin, cos) = angle.sin_cos();
    let hw = sr.width as f32 / 2.0;
    let hh = sr.height as f32 / 2.0;
    // Bounding half-extents of the rotated rectangle.
    let bx = (hw * cos.abs() + hh * sin.abs()).ceil() as i32 + 1;
    let by = (hw * sin.abs() + hh * cos.abs()).ceil() as i32 + 1;
    let dst_rect = IntRect::new(center.0 - bx, center.1 - by, 2 * bx, 2 * by);

    // Inverse rotation, sampled at destination pixel centers.
    let src_cx = sr.x as f32 + hw;
    let src_cy = sr.y as f32 + hh;
    let px0 = (dst_rect.x - center.0) as f32 + 0.5;
    let py0 = (dst_rect.y - center.1) as f32 + 0.5;
    let field = DeltaField {
        s0: fixed::from_f32(src_cx + px0 * cos + py0 * sin),
        t0: fixed::from_f32(src_cy - px0 * sin + py0 * cos),
        ds_dx: fixed::from_f32(cos),
        dt_dx: fixed::from_f32(-sin),
        ds_dy: fixed::from_f32(sin),
        dt_dy: fixed::from_f32(cos),
        d2s_dxdy: 0,
        d2t_dxdy: 0,
    };
    delta_blit_inner(dst, dst_rect, src, field, AlphaRamp::flat(alpha), blend);
}

/// One vertex of a transform-blit mesh: a source coordinate and a vertex
/// alpha in `[0, 1]` (interpolated across each cell, multiplied into the
/// call's constant alpha).
#[derive(Debug, Clone, Copy)]
pub struct MeshVertex {
    /// Source-space coordinate in pixels.
    pub src: Point,
    /// Vertex alpha, `0.0..=1.0`.
    pub alpha: f32,
}

impl MeshVertex {
    /// Fully opaque vertex.
    #[must_use]
    pub const fn opaque(src: Point) -> Self {
        Self { src, alpha: 1.0 }
    }
}

fn cell_field(
    v00: Point,
    v10: Point,
    v01: Point,
    v11: Point,
    w: i32,
    h: i32,
) -> DeltaField {
    let s00 = fixed::from_f32(v00.x);
    let t00 = fixed::from_f32(v00.y);
    let s10 = fixed::from_f32(v10.x);
    let t10 = fixed::from_f32(v10.y);
    let s01 = fixed::from_f32(v01.x);
    let t01 = fixed::from_f32(v01.y);
    let s11 = fixed::from_f32(v11.x);
    let t11 = fixed::from_f32(v11.y);
    DeltaField {
        s0: s00,
        t0: t00,
        ds_dx: (s10 - s00) / w,
        dt_dx: (t10 - t00) / w,
        ds_dy: (s01 - s00) / h,
        dt_dy: (t01 - t00) / h,
        d2s_dxdy: ((s11 - s01) - (s10 - s00)) / (w * h),
        d2t_dxdy: ((t11 - t01) - (t10 - t00)) / (w * h),
    }
}

/// Warp the source onto `dst_rect` through a `cols x rows` grid of source
/// coordinates (row-major, `cols * rows` vertices, both at least 2).
///
/// The destination rectangle is subdivided into `(cols-1) x (rows-1)` cells;
/// each cell derives a local affine field (with second derivatives when the
/// cell's opposite edges differ) and is drawn by the delta engine. Vertex
/// alphas below 1 turn the cell into an alpha-ramped delta blit.
pub fn transform_blit(
    dst: &mut Surface<'_>,
    dst_rect: IntRect,
    src: SurfaceRef<'_>,
    grid: &[MeshVertex],
    cols: usize,
    rows: usize,
    alpha: u32,
    blend: Blend,
) {
    let alpha = alpha.min(OPAQUE);
    if alpha == 0 || dst_rect.is_empty() || cols < 2 || rows < 2 || grid.len() != cols * rows {
        return;
    }
    let edge_x = |i: usize| dst_rect.x + (i as i32 * dst_rect.width) / (cols as i32 - 1);
    let edge_y = |j: usize| dst_rect.y + (j as i32 * dst_rect.height) / (rows as i32 - 1);
    let alpha_fixed = |a: f32| -> Fixed { fixed::from_f32(a.clamp(0.0, 1.0) * alpha as f32) };

    for j in 0..rows - 1 {
        let (cy0, cy1) = (edge_y(j), edge_y(j + 1));
        let h = cy1 - cy0;
        if h <= 0 {
            continue;
        }
        for i in 0..cols - 1 {
            let (cx0, cx1) = (edge_x(i), edge_x(i + 1));
            let w = cx1 - cx0;
            if w <= 0 {
                continue;
            }
            let v00 = grid[j * cols + i];
            let v10 = grid[j * cols + i + 1];
            let v01 = grid[(j + 1) * cols + i];
            let v11 = grid[(j + 1) * cols + i + 1];
            let field = cell_field(v00.src, v10.src, v01.src, v11.src, w, h);
            let cell = IntRect::new(cx0, cy0, w, h);
            let uniform = v00.alpha == v10.alpha && v00.alpha == v01.alpha && v00.alpha == v11.alpha;
            if uniform {
                let a = (fixed::floor(alpha_fixed(v00.alpha)).clamp(0, OPAQUE as i32)) as u32;
                delta_blit(dst, cell, src, field, a, blend);
            } else {
                let a00 = alpha_fixed(v00.alpha);
                let a10 = alpha_fixed(v10.alpha);
                let a01 = alpha_fixed(v01.alpha);
                let a11 = alpha_fixed(v11.alpha);
                let ramp = AlphaRamp {
                    a0: a00,
                    da_dx: (a10 - a00) / w,
                    da_dy: (a01 - a00) / h,
                    d2a_dxdy: ((a11 - a01) - (a10 - a00)) / (w * h),
                };
                delta_blit_faded(dst, cell, src, field, ramp, blend);
            }
        }
    }
}
