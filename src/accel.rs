//! Backend acceleration hook.
//!
//! A bitmap backend may be able to fulfill some requests natively (a
//! hardware fill, a DMA copy). The hook gives it first refusal: every
//! software entry point consults the surface's hook before rasterizing, and
//! skips its own work when the hook reports the request as handled.
//!
//! The software paths are complete on their own; a hook is never required
//! for correctness, only for speed.

use crate::blend::Blend;
use crate::color::Rgba;
use crate::geometry::IntRect;

/// Interception point offered to the bitmap backend.
///
/// Every method defaults to "not handled", so a backend only overrides the
/// requests it can actually accelerate. A method must either fulfill the
/// whole request and return `true`, or leave the target untouched and
/// return `false`; partial handling is not part of the contract.
pub trait AccelHook {
    /// Clear the whole surface to a color.
    fn clear(&mut self, color: Rgba) -> bool {
        let _ = color;
        false
    }

    /// Fill a clipped rectangle.
    fn fill_rect(&mut self, rect: IntRect, color: Rgba, alpha: u32, blend: Blend) -> bool {
        let _ = (rect, color, alpha, blend);
        false
    }

    /// Unscaled copy/blend of `src_rect` to `dst_pos`.
    fn blit(&mut self, dst_pos: (i32, i32), src_rect: IntRect, alpha: u32, blend: Blend) -> bool {
        let _ = (dst_pos, src_rect, alpha, blend);
        false
    }

    /// Scaled copy/blend of `src_rect` onto `dst_rect`.
    fn scaled_blit(&mut self, dst_rect: IntRect, src_rect: IntRect, alpha: u32, blend: Blend) -> bool {
        let _ = (dst_rect, src_rect, alpha, blend);
        false
    }

    /// Read one pixel. `Some` means the backend answered.
    fn get_pixel(&mut self, x: i32, y: i32) -> Option<Rgba> {
        let _ = (x, y);
        None
    }

    /// Write one pixel.
    fn put_pixel(&mut self, x: i32, y: i32, color: Rgba) -> bool {
        let _ = (x, y, color);
        false
    }

    /// Composite a glyph coverage buffer at `pos`.
    fn draw_glyph(
        &mut self,
        pos: (i32, i32),
        width: u32,
        height: u32,
        tint: Rgba,
        alpha: u32,
        blend: Blend,
    ) -> bool {
        let _ = (pos, width, height, tint, alpha, blend);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Inert;
    impl AccelHook for Inert {}

    #[test]
    fn test_default_hook_declines_everything() {
        let mut hook = Inert;
        assert!(!hook.clear(Rgba::BLACK));
        assert!(!hook.fill_rect(IntRect::of_size(4, 4), Rgba::RED, 256, Blend::copy()));
        assert!(!hook.put_pixel(0, 0, Rgba::RED));
        assert!(hook.get_pixel(0, 0).is_none());
    }
}
