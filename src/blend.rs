//! Combine (blend) function family.
//!
//! A [`Blend`] descriptor names a base operation, an alpha source, a clamp
//! policy and (for scaled blits) a filter. Each drawing entry point resolves
//! the descriptor to a concrete combine function *once*, then runs its
//! scanline loop with that function, keeping the "pick the fast function,
//! loop many times" shape.
//!
//! The default build monomorphizes the loops per (op, clamp) pair through
//! `with_combine!`. The `compact-dispatch` feature instead routes every
//! loop through a single function-pointer table ([`select`]), trading a
//! little per-pixel indirection for much less generated code.
//!
//! # Contract
//!
//! `combine(dst, src, alpha) -> new_dst` with `alpha` in `[0, 256]`: the
//! constant blend alpha, or the precomputed product of constant alpha and
//! per-pixel source alpha (see [`modulate`]). Two laws hold for every
//! descriptor and are pinned by tests:
//!
//! * `alpha == 0` leaves the destination bit-identical.
//! * `alpha == 256` with op `Copy` reproduces the source exactly.

use crate::color::{self, Rgba};

/// Fully opaque constant alpha.
pub const OPAQUE: u32 = 256;

/// Base combine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendOp {
    /// Replace the destination with the source.
    Copy,
    /// Per-channel sum.
    Add,
    /// Color dodge: brighten the destination toward the source.
    Dodge,
    /// Per-channel product.
    Multiply,
    /// Overlay: multiply in shadows, screen in highlights.
    Overlay,
    /// Shift the destination's hue/saturation/value by the source channels.
    HsvShift,
}

/// Sampling filter for scaled and rotated blits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Nearest-neighbor sampling.
    #[default]
    Nearest,
    /// Four-tap bilinear sampling.
    Bilinear,
}

/// Blend-mode descriptor: one base op, one alpha-source policy, one clamp
/// policy, one filter. The filter is only meaningful for scaled/rotated
/// blits and ignored elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blend {
    /// Base operation.
    pub op: BlendOp,
    /// Multiply the constant alpha by each source pixel's own alpha.
    pub source_alpha: bool,
    /// Clamp channel results to `[0, 255]`; when off, the caller guarantees
    /// the operation cannot leave that range.
    pub clamp: bool,
    /// Sampling filter for scaled blits.
    pub filter: Filter,
}

impl Default for Blend {
    fn default() -> Self {
        Self::copy()
    }
}

impl Blend {
    /// Descriptor with the given base op, constant alpha, clamping, nearest.
    #[must_use]
    pub const fn new(op: BlendOp) -> Self {
        Self {
            op,
            source_alpha: false,
            clamp: true,
            filter: Filter::Nearest,
        }
    }

    /// Plain copy descriptor.
    #[must_use]
    pub const fn copy() -> Self {
        Self::new(BlendOp::Copy)
    }

    /// Additive descriptor.
    #[must_use]
    pub const fn add() -> Self {
        Self::new(BlendOp::Add)
    }

    /// Multiply descriptor.
    #[must_use]
    pub const fn multiply() -> Self {
        Self::new(BlendOp::Multiply)
    }

    /// Enable per-pixel source alpha modulation.
    #[must_use]
    pub const fn with_source_alpha(mut self) -> Self {
        self.source_alpha = true;
        self
    }

    /// Trust the caller's value range instead of clamping.
    #[must_use]
    pub const fn unclamped(mut self) -> Self {
        self.clamp = false;
        self
    }

    /// Request bilinear filtering for scaled blits.
    #[must_use]
    pub const fn bilinear(mut self) -> Self {
        self.filter = Filter::Bilinear;
        self
    }
}

/// Signature shared by every combine function.
pub type CombineFn = fn(u32, Rgba, u32) -> u32;

/// Clamp a float alpha in `[0, 1]` to the integer `[0, 256]` scale.
#[must_use]
pub fn alpha_from_f32(alpha: f32) -> u32 {
    (alpha.clamp(0.0, 1.0) * OPAQUE as f32).round() as u32
}

/// Fold a source pixel's own alpha into a constant alpha.
///
/// Maps the 8-bit source alpha onto `[0, 256]` (255 maps to exactly 256 so
/// an opaque source pixel does not darken) and multiplies.
#[inline]
#[must_use]
pub fn modulate(alpha: u32, src_a: u8) -> u32 {
    let a = u32::from(src_a) + u32::from(src_a >> 7);
    (alpha * a) >> 8
}

/// Per-call effective alpha for a source pixel under a descriptor.
#[inline]
#[must_use]
pub fn effective_alpha(blend: Blend, alpha: u32, src_a: u8) -> u32 {
    if blend.source_alpha {
        modulate(alpha, src_a)
    } else {
        alpha
    }
}

// ---------------------------------------------------------------------------
// Whole-word masked mixes
// ---------------------------------------------------------------------------

/// Exact per-channel `floor((a + b) / 2)` on all four packed channels at
/// once. Valid only for the pinned `A<<24|B<<16|G<<8|R` layout.
#[inline]
#[must_use]
pub(crate) fn mix_half(a: u32, b: u32) -> u32 {
    (a & b) + (((a ^ b) >> 1) & 0x7F7F_7F7F)
}

/// Approximate `(3a + b) / 4` per channel, two nested half mixes.
#[inline]
#[must_use]
pub(crate) fn mix_quarter(a: u32, b: u32) -> u32 {
    mix_half(mix_half(a, b), a)
}

// ---------------------------------------------------------------------------
// Combine implementations
// ---------------------------------------------------------------------------

/// Interpolate one channel toward its full-op result by `alpha/256`.
#[inline]
fn lerp_ch(d: u32, s: u32, alpha: u32) -> u32 {
    (d as i32 + (((s as i32 - d as i32) * alpha as i32) >> 8)) as u32
}

/// Rebuild a packed pixel from r/g/b results, interpolated by alpha, with
/// the destination's alpha channel preserved.
#[inline]
fn lerp_rgb(dst: u32, r: u32, g: u32, b: u32, alpha: u32) -> u32 {
    let d = Rgba::from_bits(dst);
    let r = lerp_ch(u32::from(d.r), r, alpha);
    let g = lerp_ch(u32::from(d.g), g, alpha);
    let b = lerp_ch(u32::from(d.b), b, alpha);
    r << color::R_SHIFT | g << color::G_SHIFT | b << color::B_SHIFT | (dst & 0xFF00_0000)
}

pub(crate) mod ops {
    //! Monomorphized combine bodies, one per (op, clamp policy).

    use super::{lerp_ch, lerp_rgb, mix_half, mix_quarter, Rgba};
    use crate::color::{self, HUE_STEPS};

    /// Copy, with whole-word fast paths for the exact alpha fractions
    /// 0/64/128/192/256 of 256. The fast paths are derived for those
    /// fractions only and must not be entered for any other alpha.
    pub(crate) fn copy<const CLAMP: bool>(dst: u32, src: Rgba, alpha: u32) -> u32 {
        match alpha {
            0 => dst,
            256 => src.to_bits(),
            128 => mix_half(dst, src.to_bits()),
            64 => mix_quarter(dst, src.to_bits()),
            192 => mix_quarter(src.to_bits(), dst),
            _ => {
                let d = Rgba::from_bits(dst);
                let r = lerp_ch(u32::from(d.r), u32::from(src.r), alpha);
                let g = lerp_ch(u32::from(d.g), u32::from(src.g), alpha);
                let b = lerp_ch(u32::from(d.b), u32::from(src.b), alpha);
                let a = lerp_ch(u32::from(d.a), u32::from(src.a), alpha);
                r << color::R_SHIFT | g << color::G_SHIFT | b << color::B_SHIFT | a << color::A_SHIFT
            }
        }
    }

    /// Additive: `dst + src` per channel, clamped or caller-trusted.
    pub(crate) fn add<const CLAMP: bool>(dst: u32, src: Rgba, alpha: u32) -> u32 {
        let d = Rgba::from_bits(dst);
        let ch = |d: u8, s: u8| -> u32 {
            let sum = u32::from(d) + u32::from(s);
            if CLAMP {
                sum.min(255)
            } else {
                sum & 0xFF
            }
        };
        lerp_rgb(dst, ch(d.r, src.r), ch(d.g, src.g), ch(d.b, src.b), alpha)
    }

    /// Multiply: `dst * src / 255` per channel (always in range).
    pub(crate) fn multiply<const CLAMP: bool>(dst: u32, src: Rgba, alpha: u32) -> u32 {
        let d = Rgba::from_bits(dst);
        let ch = |d: u8, s: u8| -> u32 { (u32::from(d) * u32::from(s) + 127) / 255 };
        lerp_rgb(dst, ch(d.r, src.r), ch(d.g, src.g), ch(d.b, src.b), alpha)
    }

    /// Color dodge: `dst * 255 / (255 - src)`, saturating at src == 255.
    pub(crate) fn dodge<const CLAMP: bool>(dst: u32, src: Rgba, alpha: u32) -> u32 {
        let d = Rgba::from_bits(dst);
        let ch = |d: u8, s: u8| -> u32 {
            if s == 255 {
                return 255;
            }
            let t = u32::from(d) * 255 / (255 - u32::from(s));
            if CLAMP {
                t.min(255)
            } else {
                t & 0xFF
            }
        };
        lerp_rgb(dst, ch(d.r, src.r), ch(d.g, src.g), ch(d.b, src.b), alpha)
    }

    /// Overlay: `2*d*s/255` below mid-gray, else `255 - 2*(255-d)*(255-s)/255`.
    ///
    /// The upper branch is the same value as the equivalent derivation
    /// `2*(d + s - d*s/255) - 255`; both forms appear in fixed-point
    /// implementations and agree channel-for-channel.
    pub(crate) fn overlay<const CLAMP: bool>(dst: u32, src: Rgba, alpha: u32) -> u32 {
        let d = Rgba::from_bits(dst);
        let ch = |d: u8, s: u8| -> u32 {
            let (d, s) = (u32::from(d), u32::from(s));
            if d < 128 {
                (2 * d * s + 127) / 255
            } else {
                255 - (2 * (255 - d) * (255 - s) + 127) / 255
            }
        };
        lerp_rgb(dst, ch(d.r, src.r), ch(d.g, src.g), ch(d.b, src.b), alpha)
    }

    /// HSV adjust: round-trip the destination through HSV, offsetting hue by
    /// `src.r * 6` hue units (full-circle range) and scaling saturation and
    /// value by `(src.g+1)/128` and `(src.b+1)/128` (128 is identity).
    pub(crate) fn hsv_shift<const CLAMP: bool>(dst: u32, src: Rgba, alpha: u32) -> u32 {
        let d = Rgba::from_bits(dst);
        let mut hsv = d.to_hsv();
        hsv.h = (hsv.h + u16::from(src.r) * 6) % HUE_STEPS;
        let scale = |c: u8, k: u8| -> u8 {
            let t = u32::from(c) * (u32::from(k) + 1) / 128;
            if CLAMP {
                t.min(255) as u8
            } else {
                t as u8
            }
        };
        hsv.s = scale(hsv.s, src.g);
        hsv.v = scale(hsv.v, src.b);
        let shifted = hsv.to_rgba();
        lerp_rgb(
            dst,
            u32::from(shifted.r),
            u32::from(shifted.g),
            u32::from(shifted.b),
            alpha,
        )
    }
}

/// Resolve a descriptor to its combine function pointer.
///
/// This is the whole dispatch under `compact-dispatch`; the default build
/// uses it only where a pointer is genuinely needed (tests, the glyph
/// compositor's per-pixel loop).
#[must_use]
pub fn select(blend: Blend) -> CombineFn {
    match (blend.op, blend.clamp) {
        (BlendOp::Copy, true) => ops::copy::<true>,
        (BlendOp::Copy, false) => ops::copy::<false>,
        (BlendOp::Add, true) => ops::add::<true>,
        (BlendOp::Add, false) => ops::add::<false>,
        (BlendOp::Dodge, true) => ops::dodge::<true>,
        (BlendOp::Dodge, false) => ops::dodge::<false>,
        (BlendOp::Multiply, true) => ops::multiply::<true>,
        (BlendOp::Multiply, false) => ops::multiply::<false>,
        (BlendOp::Overlay, true) => ops::overlay::<true>,
        (BlendOp::Overlay, false) => ops::overlay::<false>,
        (BlendOp::HsvShift, true) => ops::hsv_shift::<true>,
        (BlendOp::HsvShift, false) => ops::hsv_shift::<false>,
    }
}

/// Apply a descriptor's combine function to one pixel.
#[inline]
#[must_use]
pub fn combine(blend: Blend, dst: u32, src: Rgba, alpha: u32) -> u32 {
    select(blend)(dst, src, alpha)
}

/// Bind a combine function for a descriptor and run a loop body with it.
///
/// Default build: expands to a `match` whose arms bind distinct function
/// items, so the body monomorphizes per (op, clamp) pair. With
/// `compact-dispatch`: binds the function pointer from [`select`] instead.
#[cfg(not(feature = "compact-dispatch"))]
macro_rules! with_combine {
    ($blend:expr, $f:ident => $body:expr) => {{
        let __b = $blend;
        match (__b.op, __b.clamp) {
            ($crate::blend::BlendOp::Copy, true) => {
                let $f = $crate::blend::ops::copy::<true>;
                $body
            }
            ($crate::blend::BlendOp::Copy, false) => {
                let $f = $crate::blend::ops::copy::<false>;
                $body
            }
            ($crate::blend::BlendOp::Add, true) => {
                let $f = $crate::blend::ops::add::<true>;
                $body
            }
            ($crate::blend::BlendOp::Add, false) => {
                let $f = $crate::blend::ops::add::<false>;
                $body
            }
            ($crate::blend::BlendOp::Dodge, true) => {
                let $f = $crate::blend::ops::dodge::<true>;
                $body
            }
            ($crate::blend::BlendOp::Dodge, false) => {
                let $f = $crate::blend::ops::dodge::<false>;
                $body
            }
            ($crate::blend::BlendOp::Multiply, true) => {
                let $f = $crate::blend::ops::multiply::<true>;
                $body
            }
            ($crate::blend::BlendOp::Multiply, false) => {
                let $f = $crate::blend::ops::multiply::<false>;
                $body
            }
            ($crate::blend::BlendOp::Overlay, true) => {
                let $f = $crate::blend::ops::overlay::<true>;
                $body
            }
            ($crate::blend::BlendOp::Overlay, false) => {
                let $f = $crate::blend::ops::overlay::<false>;
                $body
            }
            ($crate::blend::BlendOp::HsvShift, true) => {
                let $f = $crate::blend::ops::hsv_shift::<true>;
                $body
            }
            ($crate::blend::BlendOp::HsvShift, false) => {
                let $f = $crate::blend::ops::hsv_shift::<false>;
                $body
            }
        }
    }};
}

#[cfg(feature = "compact-dispatch")]
macro_rules! with_combine {
    ($blend:expr, $f:ident => $body:expr) => {{
        let $f = $crate::blend::select($blend);
        $body
    }};
}

pub(crate) use with_combine;
