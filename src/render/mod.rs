//! Shape rasterizers: lines, circles and arcs, polygons, Bezier curves.
//!
//! Every entry point takes a [`Paint`] describing the color, alpha, blend
//! descriptor and the anti-aliasing / DPI-awareness requests. Rasterizers
//! resolve the combine function once per call and push pixels through the
//! blit layer's bounds-checked writer, so no shape call can write outside
//! the surface.

pub mod bezier;
pub mod circle;
pub mod line;
pub mod polygon;

pub use bezier::{
    cubic_point, cubic_y_for_x, draw_cubic_bezier, draw_quad_bezier, fill_cubic_bezier,
    fill_quad_bezier, flatten_cubic, flatten_quad, quad_point, quad_y_for_x, CubicCoeffs,
};
pub use circle::{draw_arc, draw_circle, fill_circle, Quadrants};
pub use line::{draw_line, draw_line_dashed, draw_line_f, draw_thick_line};
pub use polygon::{fill_convex_polygon, fill_trapezoid, fill_triangle, Trapezoid};

use crate::blend::{Blend, OPAQUE};
use crate::color::Rgba;

/// How a shape is drawn: color, alpha, blend descriptor and per-call flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint {
    /// Source color.
    pub color: Rgba,
    /// Constant alpha on the `[0, 256]` scale.
    pub alpha: u32,
    /// Blend descriptor.
    pub blend: Blend,
    /// Anti-alias edges where the rasterizer supports it.
    pub anti_alias: bool,
    /// Pre-scale integer coordinates by the surface's DPI scale factor.
    pub dpi_aware: bool,
}

impl Paint {
    /// Opaque copy paint in the given color.
    #[must_use]
    pub const fn new(color: Rgba) -> Self {
        Self {
            color,
            alpha: OPAQUE,
            blend: Blend::copy(),
            anti_alias: false,
            dpi_aware: false,
        }
    }

    /// Replace the constant alpha (clamped to 256 at use sites).
    #[must_use]
    pub const fn with_alpha(mut self, alpha: u32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Replace the blend descriptor.
    #[must_use]
    pub const fn with_blend(mut self, blend: Blend) -> Self {
        self.blend = blend;
        self
    }

    /// Request anti-aliased edges.
    #[must_use]
    pub const fn anti_aliased(mut self) -> Self {
        self.anti_alias = true;
        self
    }

    /// Request DPI-aware coordinate pre-scaling.
    #[must_use]
    pub const fn dpi_aware(mut self) -> Self {
        self.dpi_aware = true;
        self
    }
}

impl Default for Paint {
    fn default() -> Self {
        Self::new(Rgba::WHITE)
    }
}
