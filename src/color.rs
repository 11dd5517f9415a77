//! Color types and color space conversions.
//!
//! Provides the packed RGBA pixel type used by every surface, plus the
//! integer HSV representation and the fixed-point RGB↔HSV conversions used
//! by the hue-shifting combine mode.
//!
//! # Packed layout
//!
//! A pixel is a `u32` packed as `A<<24 | B<<16 | G<<8 | R`, which is byte
//! order `[R, G, B, A]` on little-endian machines. This layout is a contract, not
//! an implementation detail: the whole-word masked fast paths in the combine
//! family (exact 50/25/75% mixes) manipulate all four channels of a packed
//! word at once and are only correct for this layout.

use once_cell::sync::Lazy;

/// Bit offset of the red channel inside a packed pixel.
pub const R_SHIFT: u32 = 0;
/// Bit offset of the green channel inside a packed pixel.
pub const G_SHIFT: u32 = 8;
/// Bit offset of the blue channel inside a packed pixel.
pub const B_SHIFT: u32 = 16;
/// Bit offset of the alpha channel inside a packed pixel.
pub const A_SHIFT: u32 = 24;

/// Number of hue units in a full rotation: 6 sectors of 256 units.
pub const HUE_STEPS: u16 = 1536;

/// Reciprocal table: `RECIP16[i] == round(65536 / i)`, `RECIP16[0] == 0`.
///
/// Built once on first use and read-only thereafter. Replaces per-pixel
/// division in the saturation and hue-fraction math.
static RECIP16: Lazy<[u32; 256]> = Lazy::new(|| {
    let mut table = [0u32; 256];
    for (i, slot) in table.iter_mut().enumerate().skip(1) {
        *slot = ((1u32 << 16) + (i as u32 / 2)) / i as u32;
    }
    table
});

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::new(0, 255, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0, 0, 255, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Pack into the `u32` pixel layout (`A<<24 | B<<16 | G<<8 | R`).
    #[must_use]
    pub const fn to_bits(self) -> u32 {
        (self.r as u32) << R_SHIFT
            | (self.g as u32) << G_SHIFT
            | (self.b as u32) << B_SHIFT
            | (self.a as u32) << A_SHIFT
    }

    /// Unpack from the `u32` pixel layout.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self::new(
            (bits >> R_SHIFT) as u8,
            (bits >> G_SHIFT) as u8,
            (bits >> B_SHIFT) as u8,
            (bits >> A_SHIFT) as u8,
        )
    }

    /// Convert to array representation `[r, g, b, a]`.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from array representation `[r, g, b, a]`.
    #[must_use]
    pub const fn from_array(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Linear interpolation between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let inv_t = 1.0 - t;

        Self::new(
            (f32::from(self.r) * inv_t + f32::from(other.r) * t) as u8,
            (f32::from(self.g) * inv_t + f32::from(other.g) * t) as u8,
            (f32::from(self.b) * inv_t + f32::from(other.b) * t) as u8,
            (f32::from(self.a) * inv_t + f32::from(other.a) * t) as u8,
        )
    }

    /// Convert to HSV.
    #[must_use]
    pub fn to_hsv(self) -> Hsv {
        rgb_to_hsv(self)
    }
}

/// HSV color with integer components.
///
/// Hue lives in `0..1536` (six sectors of 256 units each, red at 0);
/// saturation and value are 8-bit. The asymmetric hue range keeps the
/// fraction within a sector at full 8-bit precision, which is what lets the
/// RGB round trip stay within ±1 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hsv {
    /// Hue (0..1536, wrapping; 0 = red, 512 = green, 1024 = blue).
    pub h: u16,
    /// Saturation (0-255).
    pub s: u8,
    /// Value (0-255).
    pub v: u8,
}

impl Hsv {
    /// Create a new HSV color. Hue is wrapped into `0..1536`.
    #[must_use]
    pub const fn new(h: u16, s: u8, v: u8) -> Self {
        Self {
            h: h % HUE_STEPS,
            s,
            v,
        }
    }

    /// Convert to RGBA (opaque).
    #[must_use]
    pub fn to_rgba(self) -> Rgba {
        hsv_to_rgb(self)
    }
}

impl From<Hsv> for Rgba {
    fn from(hsv: Hsv) -> Self {
        hsv.to_rgba()
    }
}

impl From<Rgba> for Hsv {
    fn from(rgba: Rgba) -> Self {
        rgba.to_hsv()
    }
}

/// Convert an RGB color to HSV using the reciprocal table.
///
/// Alpha is ignored. Gray inputs (including black) report hue 0 and
/// saturation 0.
#[must_use]
pub fn rgb_to_hsv(c: Rgba) -> Hsv {
    let (r, g, b) = (u32::from(c.r), u32::from(c.g), u32::from(c.b));
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max as u8;
    if delta == 0 {
        return Hsv { h: 0, s: 0, v };
    }

    // s = delta * 255 / max, via the reciprocal table.
    let s = ((u64::from(delta * 255) * u64::from(RECIP16[max as usize]) + 32768) >> 16) as u8;

    // Fraction within a sector, in 1/256 sector units: diff * 256 / delta.
    let frac = |num: i64| -> i64 { (num * 256 * i64::from(RECIP16[delta as usize]) + 32768) >> 16 };

    let h = if max == r {
        let f = frac(i64::from(g) - i64::from(b));
        (i64::from(HUE_STEPS) + f) % i64::from(HUE_STEPS)
    } else if max == g {
        512 + frac(i64::from(b) - i64::from(r))
    } else {
        1024 + frac(i64::from(r) - i64::from(g))
    };

    Hsv { h: h as u16, s, v }
}

/// Convert an HSV color back to opaque RGBA.
#[must_use]
pub fn hsv_to_rgb(c: Hsv) -> Rgba {
    let v = u32::from(c.v);
    let s = u32::from(c.s);
    if s == 0 {
        return Rgba::rgb(c.v, c.v, c.v);
    }

    let h = u32::from(c.h) % u32::from(HUE_STEPS);
    let sector = h >> 8;
    let frac = h & 0xFF;

    // 65280 == 255 * 256: the common denominator of the 8-bit saturation and
    // the 256-unit sector fraction.
    const DEN: u32 = 255 * 256;
    let p = ((v * (255 - s) * 256 + DEN / 2) / DEN) as u8;
    let q = ((v * (DEN - s * frac) + DEN / 2) / DEN) as u8;
    let t = ((v * (DEN - s * (256 - frac)) + DEN / 2) / DEN) as u8;
    let v = v as u8;

    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgba::rgb(r, g, b)
}
