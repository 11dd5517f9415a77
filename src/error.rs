//! Error types for surface construction.
//!
//! Errors exist only at the boundary where a pixel-buffer view is built and
//! its invariants are checked. The drawing entry points themselves never
//! fail: invalid or degenerate input makes them a silent no-op instead.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when constructing a pixel-buffer view.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Zero width or height for a surface or pixmap.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Row stride smaller than the surface width.
    #[error("invalid stride: {stride} pixels for width {width}")]
    InvalidStride {
        /// Stride in pixels.
        stride: u32,
        /// Width in pixels.
        width: u32,
    },

    /// Backing buffer too small for the declared geometry.
    #[error("buffer too small: need {needed} pixels, have {len}")]
    BufferTooSmall {
        /// Pixels required by width/height/stride.
        needed: usize,
        /// Pixels actually provided.
        len: usize,
    },
}
