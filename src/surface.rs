//! Pixel-buffer views.
//!
//! [`Surface`] is a mutable, stride-aware view over a caller-owned `u32`
//! pixel buffer; [`SurfaceRef`] is its read-only counterpart used as a blit
//! source. The core never allocates or frees the backing storage; a view
//! lives for the duration of one call sequence and is dropped afterwards.
//! [`Pixmap`] is a small owned buffer for callers (and tests) that do not
//! have an external backend.
//!
//! Bottom-up storage is expressed with an explicit `flipped` flag instead of
//! a negative stride; the flag is resolved to a physical row index once, in
//! [`Surface::row`]/[`Surface::row_mut`], and never propagated through
//! scanline loops.

use crate::accel::AccelHook;
use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::geometry::IntRect;

fn check_geometry(len: usize, width: u32, height: u32, stride: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(Error::InvalidStride { stride, width });
    }
    let needed = (height as usize - 1) * stride as usize + width as usize;
    if len < needed {
        return Err(Error::BufferTooSmall { needed, len });
    }
    Ok(())
}

/// Mutable stride-aware view over a pixel buffer.
pub struct Surface<'a> {
    pixels: &'a mut [u32],
    width: u32,
    height: u32,
    stride: u32,
    flipped: bool,
    scale: u32,
    hook: Option<&'a mut dyn AccelHook>,
}

impl<'a> Surface<'a> {
    /// Create a tightly packed view (stride == width).
    ///
    /// # Errors
    ///
    /// Returns an error for zero dimensions or a buffer shorter than
    /// `width * height`.
    pub fn new(pixels: &'a mut [u32], width: u32, height: u32) -> Result<Self> {
        Self::with_stride(pixels, width, height, width)
    }

    /// Create a view with an explicit row stride in pixels.
    ///
    /// # Errors
    ///
    /// Returns an error for zero dimensions, `stride < width`, or a buffer
    /// shorter than the declared geometry.
    pub fn with_stride(pixels: &'a mut [u32], width: u32, height: u32, stride: u32) -> Result<Self> {
        check_geometry(pixels.len(), width, height, stride)?;
        Ok(Self {
            pixels,
            width,
            height,
            stride,
            flipped: false,
            scale: 0,
            hook: None,
        })
    }

    /// Mark the buffer as stored bottom-up.
    #[must_use]
    pub fn flipped(mut self, flipped: bool) -> Self {
        self.flipped = flipped;
        self
    }

    /// Set the integer DPI scale factor (0 disables pre-scaling).
    #[must_use]
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    /// Attach a backend acceleration hook.
    #[must_use]
    pub fn with_hook(mut self, hook: &'a mut dyn AccelHook) -> Self {
        self.hook = Some(hook);
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

    /// Row stride in pixels (>= width).
    #[must_use]
    pub const fn stride(&self) -> u32 {
        self.stride
    }

    /// True if rows are stored bottom-up.
    #[must_use]
    pub const fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Integer DPI scale factor; 0 means pre-scaling is disabled.
    #[must_use]
    pub const fn scale_factor(&self) -> u32 {
        self.scale
    }

    /// Full surface bounds as an integer rectangle at the origin.
    #[must_use]
    pub const fn bounds(&self) -> IntRect {
        IntRect::of_size(self.width as i32, self.height as i32)
    }

    /// Apply the DPI scale factor to a device coordinate.
    #[must_use]
    pub const fn device(&self, v: i32) -> i32 {
        if self.scale > 0 {
            v * self.scale as i32
        } else {
            v
        }
    }

    /// Physical row index for a logical row, resolving the flip once.
    #[inline]
    fn phys_row(&self, y: u32) -> usize {
        let py = if self.flipped {
            self.height - 1 - y
        } else {
            y
        };
        py as usize * self.stride as usize
    }

    /// Logical row `y` as a slice of `width` pixels.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height` (internal callers clip first).
    #[inline]
    #[must_use]
    pub fn row(&self, y: u32) -> &[u32] {
        let start = self.phys_row(y);
        &self.pixels[start..start + self.width as usize]
    }

    /// Logical row `y` as a mutable slice of `width` pixels.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u32] {
        let start = self.phys_row(y);
        &mut self.pixels[start..start + self.width as usize]
    }

    /// Read a pixel; `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(Rgba::from_bits(self.row(y as u32)[x as usize]))
    }

    /// Write a pixel; out-of-bounds coordinates are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.row_mut(y as u32)[x as usize] = color.to_bits();
    }

    /// Read-only view of the same buffer.
    #[must_use]
    pub fn as_ref(&self) -> SurfaceRef<'_> {
        SurfaceRef {
            pixels: self.pixels,
            width: self.width,
            height: self.height,
            stride: self.stride,
            flipped: self.flipped,
        }
    }

    /// Run the acceleration hook, if any.
    ///
    /// Returns `true` when the backend fulfilled the request and the
    /// software path must be skipped.
    #[inline]
    pub(crate) fn intercept<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut dyn AccelHook) -> bool,
    {
        match self.hook.as_deref_mut() {
            Some(hook) => f(hook),
            None => false,
        }
    }

    /// Ask the hook for a pixel read.
    #[inline]
    pub(crate) fn intercept_get(&mut self, x: i32, y: i32) -> Option<Rgba> {
        self.hook.as_deref_mut().and_then(|h| h.get_pixel(x, y))
    }
}

/// Read-only stride-aware view over a pixel buffer, the blit source type.
#[derive(Clone, Copy)]
pub struct SurfaceRef<'a> {
    pixels: &'a [u32],
    width: u32,
    height: u32,
    stride: u32,
    flipped: bool,
}

impl<'a> SurfaceRef<'a> {
    /// Create a tightly packed read-only view (stride == width).
    ///
    /// # Errors
    ///
    /// Same invariants as [`Surface::new`].
    pub fn new(pixels: &'a [u32], width: u32, height: u32) -> Result<Self> {
        Self::with_stride(pixels, width, height, width)
    }

    /// Create a read-only view with an explicit row stride in pixels.
    ///
    /// # Errors
    ///
    /// Same invariants as [`Surface::with_stride`].
    pub fn with_stride(pixels: &'a [u32], width: u32, height: u32, stride: u32) -> Result<Self> {
        check_geometry(pixels.len(), width, height, stride)?;
        Ok(Self {
            pixels,
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

    /// Full bounds at the origin.
    #[must_use]
    pub const fn bounds(&self) -> IntRect {
        IntRect::of_size(self.width as i32, self.height as i32)
    }

    /// Logical row `y` as a slice of `width` pixels.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u32) -> &[u32] {
        let py = if self.flipped {
            self.height - 1 - y
        } else {
            y
        };
        let start = py as usize * self.stride as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// Read a pixel; `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(Rgba::from_bits(self.row(y as u32)[x as usize]))
    }

    /// Raw packed pixel at clamped coordinates (used by samplers that have
    /// already clipped their accumulators).
    #[inline]
    #[must_use]
    pub(crate) fn pixel_clamped(&self, x: i32, y: i32) -> u32 {
        let cx = x.clamp(0, self.width as i32 - 1) as u32;
        let cy = y.clamp(0, self.height as i32 - 1) as u32;
        self.row(cy)[cx as usize]
    }
}

/// Owned pixel buffer with the same geometry rules as [`Surface`].
///
/// Exists for callers without an external bitmap backend (scratch buffers,
/// tests, tools). Drawing still goes through the view types.
#[derive(Debug, Clone)]
pub struct Pixmap {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
}

impl Pixmap {
    /// Allocate a zeroed (transparent black) pixmap.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self {
            pixels: vec![0; width as usize * height as usize],
            width,
            height,
        })
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

    /// Mutable drawing view of the whole pixmap.
    #[must_use]
    pub fn surface(&mut self) -> Surface<'_> {
        Surface {
            pixels: &mut self.pixels,
            width: self.width,
            height: self.height,
            stride: self.width,
            flipped: false,
            scale: 0,
            hook: None,
        }
    }

    /// Read-only view of the whole pixmap.
    #[must_use]
    pub fn as_ref(&self) -> SurfaceRef<'_> {
        SurfaceRef {
            pixels: &self.pixels,
            width: self.width,
            height: self.height,
            stride: self.width,
            flipped: false,
        }
    }

    /// Raw packed pixels, row-major, tightly packed.
    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface() {
        let mut buf = vec![0u32; 100 * 50];
        let s = Surface::new(&mut buf, 100, 50).unwrap();
        assert_eq!(s.width(), 100);
        assert_eq!(s.height(), 50);
        assert_eq!(s.stride(), 100);
        assert!(!s.is_flipped());
        assert_eq!(s.scale_factor(), 0);
    }

    #[test]
    fn test_invalid_geometry() {
        let mut buf = vec![0u32; 16];
        assert!(matches!(
            Surface::new(&mut buf, 0, 4),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Surface::with_stride(&mut buf, 8, 2, 4),
            Err(Error::InvalidStride { .. })
        ));
        assert!(matches!(
            Surface::new(&mut buf, 8, 8),
            Err(Error::BufferTooSmall { .. })
        ));
    }

    #[test]
    fn test_stride_last_row_needs_width_only() {
        // 3 rows at stride 10, width 8: 2*10 + 8 = 28 pixels suffice.
        let mut buf = vec![0u32; 28];
        assert!(Surface::with_stride(&mut buf, 8, 3, 10).is_ok());
        let mut short = vec![0u32; 27];
        assert!(Surface::with_stride(&mut short, 8, 3, 10).is_err());
    }

    #[test]
    fn test_set_get_pixel() {
        let mut buf = vec![0u32; 10 * 10];
        let mut s = Surface::new(&mut buf, 10, 10).unwrap();
        s.set_pixel(5, 5, Rgba::BLUE);
        assert_eq!(s.pixel(5, 5), Some(Rgba::BLUE));
        assert_eq!(s.pixel(100, 100), None);
        // Out-of-bounds writes are ignored.
        s.set_pixel(-1, 0, Rgba::RED);
        s.set_pixel(0, 10, Rgba::RED);
    }

    #[test]
    fn test_flipped_row_mapping() {
        let mut buf = vec![0u32; 4 * 3];
        let mut s = Surface::new(&mut buf, 4, 3).unwrap().flipped(true);
        s.set_pixel(0, 0, Rgba::RED);
        drop(s);
        // Logical row 0 of a flipped surface is the last physical row.
        assert_eq!(Rgba::from_bits(buf[2 * 4]), Rgba::RED);
    }

    #[test]
    fn test_device_scaling() {
        let mut buf = vec![0u32; 8 * 8];
        let s = Surface::new(&mut buf, 8, 8).unwrap().with_scale(2);
        assert_eq!(s.device(3), 6);
        let mut buf2 = vec![0u32; 8 * 8];
        let unscaled = Surface::new(&mut buf2, 8, 8).unwrap();
        assert_eq!(unscaled.device(3), 3);
    }

    #[test]
    fn test_pixmap_views() {
        let mut pm = Pixmap::new(4, 4).unwrap();
        pm.surface().set_pixel(1, 2, Rgba::GREEN);
        assert_eq!(pm.as_ref().pixel(1, 2), Some(Rgba::GREEN));
        assert!(Pixmap::new(0, 4).is_err());
    }

    #[test]
    fn test_pixel_clamped() {
        let mut pm = Pixmap::new(2, 2).unwrap();
        pm.surface().set_pixel(0, 0, Rgba::RED);
        let r = pm.as_ref();
        assert_eq!(r.pixel_clamped(-5, -5), Rgba::RED.to_bits());
    }
}
