//! # Softblit
//!
//! Software 2D compositing and rasterization over caller-owned pixel
//! buffers.
//!
//! Softblit draws into 32-bit packed-pixel surfaces it never allocates: the
//! bitmap backend hands the core a buffer view, and every entry point
//! validates, clips and either draws or silently does nothing. An optional
//! [`AccelHook`](accel::AccelHook) lets a backend fulfill individual
//! requests natively before the software path runs.
//!
//! ## Features
//!
//! - **Combine family**: copy/add/dodge/multiply/overlay/HSV-adjust blend
//!   ops, constant or per-pixel source alpha, clamped or caller-trusted
//!   ranges, with whole-word masked fast paths for exact alpha fractions
//! - **Blit engine**: solid and gradient fills, masked bit clears, unscaled,
//!   scaled (nearest/bilinear/filter-down), rotated, delta and mesh
//!   transform blits, all on 16.16 fixed-point accumulators
//! - **Shape rasterizers**: Bresenham and anti-aliased lines, midpoint
//!   circles and arcs, convex polygon and trapezoid scanline fills,
//!   quadratic/cubic Beziers
//! - **Glyph compositing**: 8-bit coverage buffers tinted through the same
//!   combine family
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use softblit::prelude::*;
//!
//! let mut pm = Pixmap::new(320, 200)?;
//! let mut surface = pm.surface();
//! blit::clear(&mut surface, Rgba::BLACK);
//! render::draw_line(&mut surface, 10, 10, 300, 150, Paint::new(Rgba::WHITE));
//! ```
//!
//! ## Feature Flags
//!
//! - `compact-dispatch`: route blend dispatch through one function-pointer
//!   table instead of monomorphizing the scanline loops per descriptor,
//!   trading per-pixel speed for smaller code

#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in pixel-pushing code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and color space conversions.
pub mod color;

/// 16.16 fixed-point helpers for scan conversion.
pub mod fixed;

/// Geometric primitives (points, rectangles).
pub mod geometry;

/// Pixel-buffer views and the owned test/scratch pixmap.
pub mod surface;

// ============================================================================
// Compositing Modules
// ============================================================================

/// The combine (blend) function family and its dispatch.
pub mod blend;

/// Solid fills and unscaled copy/blend blits.
pub mod blit;

/// Scaled, rotated, delta and mesh-transform blits.
pub mod transform;

/// Glyph coverage compositing.
pub mod glyph;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Shape rasterizers (lines, circles, polygons, Beziers).
pub mod render;

/// Backend acceleration hook.
pub mod accel;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for view construction.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and functions for convenient imports.
///
/// ```rust,ignore
/// use softblit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::accel::AccelHook;
    pub use crate::blend::{Blend, BlendOp, Filter, OPAQUE};
    pub use crate::blit;
    pub use crate::color::{Hsv, Rgba};
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{IntRect, Point};
    pub use crate::glyph::{self, Coverage};
    pub use crate::render::{self, Paint, Quadrants};
    pub use crate::surface::{Pixmap, Surface, SurfaceRef};
    pub use crate::transform::{self, AlphaRamp, DeltaField, MeshVertex};
}
