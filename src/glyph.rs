//! Glyph coverage compositing.
//!
//! A rendered glyph arrives as an 8-bit coverage buffer owned by the caller;
//! compositing multiplies each coverage value into the call's constant alpha
//! and pushes a solid tint color through the ordinary combine family. The
//! core never rasterizes outlines into coverage itself.

use crate::blend::{self, with_combine, Blend, OPAQUE};
use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::geometry::IntRect;
use crate::surface::Surface;

/// Read-only view over an 8-bit, row-major coverage buffer.
#[derive(Clone, Copy)]
pub struct Coverage<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride: u32,
    flipped: bool,
}

impl<'a> Coverage<'a> {
    /// Create a tightly packed coverage view (stride == width).
    ///
    /// # Errors
    ///
    /// Returns an error for zero dimensions or a buffer shorter than
    /// `width * height`.
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Result<Self> {
        Self::with_stride(data, width, height, width)
    }

    /// Create a coverage view with an explicit row stride in bytes.
    ///
    /// # Errors
    ///
    /// Same geometry invariants as [`Surface::with_stride`].
    pub fn with_stride(data: &'a [u8], width: u32, height: u32, stride: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        if stride < width {
            return Err(Error::InvalidStride { stride, width });
        }
        let needed = (height as usize - 1) * stride as usize + width as usize;
        if data.len() < needed {
            return Err(Error::BufferTooSmall {
                needed,
                len: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
            flipped: false,
        })
    }

    /// Mark the buffer as stored bottom-up.
    #[must_use]
    pub fn flipped(mut self, flipped: bool) -> Self {
        self.flipped = flipped;
        self
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Logical row `y` as a slice of `width` coverage values.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u32) -> &[u8] {
        let py = if self.flipped {
            self.height - 1 - y
        } else {
            y
        };
        let start = py as usize * self.stride as usize;
        &self.data[start..start + self.width as usize]
    }
}

/// Composite a glyph's coverage at `pos`, tinting it with `tint`.
///
/// Per pixel, the effective alpha is the product of the constant `alpha`,
/// the 8-bit coverage value, and (under a source-alpha descriptor) the
/// tint's own alpha. Zero-coverage pixels cost one compare and are never
/// combined, so glyph backgrounds stay untouched under every blend op.
pub fn draw_glyph(
    surface: &mut Surface<'_>,
    pos: (i32, i32),
    coverage: &Coverage<'_>,
    tint: Rgba,
    alpha: u32,
    blend: Blend,
) {
    let alpha = alpha.min(OPAQUE);
    if alpha == 0 {
        return;
    }
    let gr = IntRect::new(pos.0, pos.1, coverage.width as i32, coverage.height as i32);
    let dr = gr.intersect(&surface.bounds());
    if dr.is_empty() {
        return;
    }
    if surface.intercept(|h| h.draw_glyph(pos, coverage.width, coverage.height, tint, alpha, blend))
    {
        return;
    }
    let base = if blend.source_alpha {
        blend::modulate(alpha, tint.a)
    } else {
        alpha
    };
    if base == 0 {
        return;
    }
    let (cx0, cy0) = ((dr.x - gr.x) as usize, dr.y - gr.y);
    let (x0, w) = (dr.x as usize, dr.width as usize);
    with_combine!(blend, f => {
        for i in 0..dr.height {
            let cov = &coverage.row((cy0 + i) as u32)[cx0..cx0 + w];
            let drow = &mut surface.row_mut((dr.y + i) as u32)[x0..x0 + w];
            for (d, &c) in drow.iter_mut().zip(cov) {
                if c == 0 {
                    continue;
                }
                let eff = blend::modulate(base, c);
                if eff != 0 {
                    *d = f(*d, tint, eff);
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blit;
    use crate::surface::Pixmap;

    #[test]
    fn test_coverage_geometry_checks() {
        let data = [0u8; 12];
        assert!(Coverage::new(&data, 4, 3).is_ok());
        assert!(matches!(
            Coverage::new(&data, 0, 3),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Coverage::with_stride(&data, 6, 2, 4),
            Err(Error::InvalidStride { .. })
        ));
        assert!(matches!(
            Coverage::new(&data, 4, 4),
            Err(Error::BufferTooSmall { .. })
        ));
    }

    #[test]
    fn test_full_coverage_paints_tint() {
        let data = [255u8; 4];
        let cov = Coverage::new(&data, 2, 2).unwrap();
        let mut pm = Pixmap::new(4, 4).unwrap();
        draw_glyph(&mut pm.surface(), (1, 1), &cov, Rgba::RED, OPAQUE, Blend::copy());
        assert_eq!(pm.as_ref().pixel(1, 1), Some(Rgba::RED));
        assert_eq!(pm.as_ref().pixel(2, 2), Some(Rgba::RED));
        assert_eq!(pm.as_ref().pixel(0, 0), Some(Rgba::TRANSPARENT));
        assert_eq!(pm.as_ref().pixel(3, 3), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_zero_coverage_untouched() {
        let data = [0u8, 255, 0, 255];
        let cov = Coverage::new(&data, 2, 2).unwrap();
        let mut pm = Pixmap::new(2, 2).unwrap();
        blit::clear(&mut pm.surface(), Rgba::rgb(7, 7, 7));
        draw_glyph(&mut pm.surface(), (0, 0), &cov, Rgba::WHITE, OPAQUE, Blend::copy());
        assert_eq!(pm.as_ref().pixel(0, 0), Some(Rgba::rgb(7, 7, 7)));
        assert_eq!(pm.as_ref().pixel(1, 0), Some(Rgba::WHITE));
        assert_eq!(pm.as_ref().pixel(0, 1), Some(Rgba::rgb(7, 7, 7)));
    }

    #[test]
    fn test_partial_coverage_scales_alpha() {
        let data = [128u8];
        let cov = Coverage::new(&data, 1, 1).unwrap();
        let mut pm = Pixmap::new(1, 1).unwrap();
        draw_glyph(&mut pm.surface(), (0, 0), &cov, Rgba::WHITE, OPAQUE, Blend::copy());
        let p = pm.as_ref().pixel(0, 0).unwrap();
        // Coverage 128 maps to alpha 129 of 256.
        assert!((i32::from(p.r) - 128).abs() <= 2, "got {}", p.r);
    }

    #[test]
    fn test_glyph_clips_at_edges() {
        let data = [255u8; 9];
        let cov = Coverage::new(&data, 3, 3).unwrap();
        let mut pm = Pixmap::new(4, 4).unwrap();
        draw_glyph(&mut pm.surface(), (-1, -1), &cov, Rgba::BLUE, OPAQUE, Blend::copy());
        assert_eq!(pm.as_ref().pixel(0, 0), Some(Rgba::BLUE));
        assert_eq!(pm.as_ref().pixel(1, 1), Some(Rgba::BLUE));
        assert_eq!(pm.as_ref().pixel(2, 2), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_flipped_coverage() {
        let data = [255u8, 0];
        let cov = Coverage::with_stride(&data, 1, 2, 1).unwrap().flipped(true);
        let mut pm = Pixmap::new(1, 2).unwrap();
        draw_glyph(&mut pm.surface(), (0, 0), &cov, Rgba::RED, OPAQUE, Blend::copy());
        // Logical row 0 reads the last physical row (coverage 0).
        assert_eq!(pm.as_ref().pixel(0, 0), Some(Rgba::TRANSPARENT));
        assert_eq!(pm.as_ref().pixel(0, 1), Some(Rgba::RED));
    }
}
