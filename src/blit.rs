//! Solid fills and unscaled copy/blend blits.
//!
//! Every entry point follows the same shape: validate and clip, offer the
//! clipped request to the surface's acceleration hook, then run a software
//! scanline loop with a combine function resolved once per call. Invalid
//! input (empty rectangle, zero alpha, fully clipped geometry) is a silent
//! no-op; nothing here partially writes and then aborts.

use crate::blend::{self, effective_alpha, with_combine, Blend, BlendOp, OPAQUE};
use crate::color::Rgba;
use crate::geometry::IntRect;
use crate::surface::{Surface, SurfaceRef};

/// Clear the whole surface to a color.
pub fn clear(surface: &mut Surface<'_>, color: Rgba) {
    if surface.intercept(|h| h.clear(color)) {
        return;
    }
    let bits = color.to_bits();
    for y in 0..surface.height() {
        surface.row_mut(y).fill(bits);
    }
}

/// Fill a rectangle with a solid color under a blend descriptor.
///
/// The rectangle is clipped to the surface; a rectangle poking past any
/// edge shrinks. `alpha` is on the `[0, 256]` scale and values above 256
/// are treated as opaque.
pub fn fill_rect(surface: &mut Surface<'_>, rect: IntRect, color: Rgba, alpha: u32, blend: Blend) {
    let eff = effective_alpha(blend, alpha.min(OPAQUE), color.a);
    if eff == 0 {
        return;
    }
    let clipped = rect.intersect(&surface.bounds());
    if clipped.is_empty() {
        return;
    }
    if surface.intercept(|h| h.fill_rect(clipped, color, eff, blend)) {
        return;
    }
    let (x0, x1) = (clipped.x as usize, clipped.right() as usize);
    if blend.op == BlendOp::Copy {
        let bits = color.to_bits();
        match eff {
            OPAQUE => {
                for y in clipped.y..clipped.bottom() {
                    surface.row_mut(y as u32)[x0..x1].fill(bits);
                }
                return;
            }
            128 => {
                for y in clipped.y..clipped.bottom() {
                    for px in &mut surface.row_mut(y as u32)[x0..x1] {
                        *px = blend::mix_half(*px, bits);
                    }
                }
                return;
            }
            64 => {
                for y in clipped.y..clipped.bottom() {
                    for px in &mut surface.row_mut(y as u32)[x0..x1] {
                        *px = blend::mix_quarter(*px, bits);
                    }
                }
                return;
            }
            192 => {
                for y in clipped.y..clipped.bottom() {
                    for px in &mut surface.row_mut(y as u32)[x0..x1] {
                        *px = blend::mix_quarter(bits, *px);
                    }
                }
                return;
            }
            _ => {}
        }
    }
    with_combine!(blend, f => {
        for y in clipped.y..clipped.bottom() {
            for px in &mut surface.row_mut(y as u32)[x0..x1] {
                *px = f(*px, color, eff);
            }
        }
    });
}

/// Fill a rectangle with a vertical two-color gradient.
///
/// The ramp is parameterized over the *unclipped* rectangle, so clipping
/// trims rows without shifting the colors of the rows that remain.
pub fn fill_rect_gradient(
    surface: &mut Surface<'_>,
    rect: IntRect,
    top: Rgba,
    bottom: Rgba,
    alpha: u32,
    blend: Blend,
) {
    let alpha = alpha.min(OPAQUE);
    if alpha == 0 {
        return;
    }
    let clipped = rect.intersect(&surface.bounds());
    if clipped.is_empty() {
        return;
    }
    let (x0, x1) = (clipped.x as usize, clipped.right() as usize);
    // Guarded: a one-row gradient is just the top color.
    let denom = (rect.height - 1).max(1) as f32;
    with_combine!(blend, f => {
        for y in clipped.y..clipped.bottom() {
            let t = (y - rect.y) as f32 / denom;
            let color = top.lerp(bottom, t);
            let eff = effective_alpha(blend, alpha, color.a);
            if eff == 0 {
                continue;
            }
            for px in &mut surface.row_mut(y as u32)[x0..x1] {
                *px = f(*px, color, eff);
            }
        }
    });
}

/// AND a mask into every pixel of a rectangle (masked channel clear).
pub fn rect_and_bits(surface: &mut Surface<'_>, rect: IntRect, mask: u32) {
    let clipped = rect.intersect(&surface.bounds());
    if clipped.is_empty() {
        return;
    }
    let (x0, x1) = (clipped.x as usize, clipped.right() as usize);
    for y in clipped.y..clipped.bottom() {
        for px in &mut surface.row_mut(y as u32)[x0..x1] {
            *px &= mask;
        }
    }
}

/// OR a mask into every pixel of a rectangle.
pub fn rect_or_bits(surface: &mut Surface<'_>, rect: IntRect, mask: u32) {
    let clipped = rect.intersect(&surface.bounds());
    if clipped.is_empty() {
        return;
    }
    let (x0, x1) = (clipped.x as usize, clipped.right() as usize);
    for y in clipped.y..clipped.bottom() {
        for px in &mut surface.row_mut(y as u32)[x0..x1] {
            *px |= mask;
        }
    }
}

/// Read a pixel, asking the backend first. `None` outside the surface.
pub fn get_pixel(surface: &mut Surface<'_>, x: i32, y: i32) -> Option<Rgba> {
    surface.intercept_get(x, y).or_else(|| surface.pixel(x, y))
}

/// Write a pixel under a blend descriptor. Out of bounds is a no-op.
pub fn put_pixel(surface: &mut Surface<'_>, x: i32, y: i32, color: Rgba, alpha: u32, blend: Blend) {
    let eff = effective_alpha(blend, alpha.min(OPAQUE), color.a);
    if eff == 0 {
        return;
    }
    if blend.op == BlendOp::Copy && eff == OPAQUE {
        if surface.intercept(|h| h.put_pixel(x, y, color)) {
            return;
        }
        surface.set_pixel(x, y, color);
        return;
    }
    if let Some(dst) = surface.pixel(x, y) {
        let out = blend::combine(blend, dst.to_bits(), color, eff);
        surface.set_pixel(x, y, Rgba::from_bits(out));
    }
}

/// Combine one pixel in place with an already-resolved combine function,
/// ignoring out-of-bounds coordinates. The per-pixel workhorse of the
/// line/circle/polygon rasterizers.
#[inline]
pub(crate) fn put_with<F>(surface: &mut Surface<'_>, x: i32, y: i32, f: &F, src: Rgba, alpha: u32)
where
    F: Fn(u32, Rgba, u32) -> u32,
{
    if alpha == 0 || x < 0 || y < 0 || x >= surface.width() as i32 || y >= surface.height() as i32 {
        return;
    }
    let px = &mut surface.row_mut(y as u32)[x as usize];
    *px = f(*px, src, alpha);
}

/// Copy/blend a source rectangle onto the destination at `dst_pos`.
///
/// The source rectangle is clipped against the source bounds, translated,
/// and clipped again against the destination; the loop runs only over the
/// overlap. Flipped orientation on either side is resolved by the row
/// accessors, never inside the loop body.
pub fn blit(
    dst: &mut Surface<'_>,
    dst_pos: (i32, i32),
    src: SurfaceRef<'_>,
    src_rect: IntRect,
    alpha: u32,
    blend: Blend,
) {
    let alpha = alpha.min(OPAQUE);
    if alpha == 0 {
        return;
    }
    let sr = src_rect.intersect(&src.bounds());
    if sr.is_empty() {
        return;
    }
    // Source clipping shifts the paste position by the same amount.
    let dx = dst_pos.0 + (sr.x - src_rect.x);
    let dy = dst_pos.1 + (sr.y - src_rect.y);
    let dr = IntRect::new(dx, dy, sr.width, sr.height).intersect(&dst.bounds());
    if dr.is_empty() {
        return;
    }
    let sx0 = (sr.x + (dr.x - dx)) as usize;
    let sy0 = sr.y + (dr.y - dy);
    if dst.intercept(|h| {
        h.blit(
            (dr.x, dr.y),
            IntRect::new(sx0 as i32, sy0, dr.width, dr.height),
            alpha,
            blend,
        )
    }) {
        return;
    }
    let (x0, w) = (dr.x as usize, dr.width as usize);
    if blend.op == BlendOp::Copy && !blend.source_alpha {
        match alpha {
            OPAQUE => {
                for i in 0..dr.height {
                    let srow = &src.row((sy0 + i) as u32)[sx0..sx0 + w];
                    dst.row_mut((dr.y + i) as u32)[x0..x0 + w].copy_from_slice(srow);
                }
                return;
            }
            128 => {
                for i in 0..dr.height {
                    let srow = &src.row((sy0 + i) as u32)[sx0..sx0 + w];
                    let drow = &mut dst.row_mut((dr.y + i) as u32)[x0..x0 + w];
                    for (d, &s) in drow.iter_mut().zip(srow) {
                        *d = blend::mix_half(*d, s);
                    }
                }
                return;
            }
            _ => {}
        }
    }
    with_combine!(blend, f => {
        for i in 0..dr.height {
            let srow = &src.row((sy0 + i) as u32)[sx0..sx0 + w];
            let drow = &mut dst.row_mut((dr.y + i) as u32)[x0..x0 + w];
            for (d, &s) in drow.iter_mut().zip(srow) {
                let sp = Rgba::from_bits(s);
                let eff = effective_alpha(blend, alpha, sp.a);
                if eff == 0 {
                    continue;
                }
                *d = f(*d, sp, eff);
            }
        }
    });
}
