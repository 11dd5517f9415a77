//! 16.16 fixed-point helpers for scan conversion.
//!
//! Every stepping loop in the blit and polygon engines accumulates in 16.16
//! so that clipping and runtime stepping agree exactly: a clipped start value
//! is computed by advancing the same accumulator the loop would have stepped,
//! never by re-deriving it from floats.

/// A 16.16 fixed-point value stored in an `i32`.
pub type Fixed = i32;

/// One in 16.16 fixed point.
pub const ONE: Fixed = 1 << 16;

/// Half in 16.16 fixed point.
pub const HALF: Fixed = 1 << 15;

/// Number of fractional bits.
pub const FRAC_BITS: u32 = 16;

/// Convert an integer to fixed point.
#[inline]
#[must_use]
pub const fn from_i32(v: i32) -> Fixed {
    v << FRAC_BITS
}

/// Convert an `f32` to fixed point (truncating toward negative infinity).
#[inline]
#[must_use]
pub fn from_f32(v: f32) -> Fixed {
    (v * ONE as f32).floor() as Fixed
}

/// Integer part (floor).
#[inline]
#[must_use]
pub const fn floor(v: Fixed) -> i32 {
    v >> FRAC_BITS
}

/// Fractional part, in `0..65536`.
#[inline]
#[must_use]
pub const fn frac(v: Fixed) -> i32 {
    v & (ONE - 1)
}

/// Round to the nearest integer.
#[inline]
#[must_use]
pub const fn round(v: Fixed) -> i32 {
    (v + HALF) >> FRAC_BITS
}

/// Ratio of two integers as a fixed-point value. Returns 0 for den == 0.
#[inline]
#[must_use]
pub const fn ratio(num: i32, den: i32) -> Fixed {
    if den == 0 {
        0
    } else {
        (((num as i64) << FRAC_BITS) / den as i64) as Fixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_round_trip() {
        for v in [-300, -1, 0, 1, 77, 32767] {
            assert_eq!(floor(from_i32(v)), v);
        }
    }

    #[test]
    fn test_floor_is_floor_for_negatives() {
        assert_eq!(floor(from_f32(-1.5)), -2);
        assert_eq!(floor(from_f32(2.75)), 2);
    }

    #[test]
    fn test_frac() {
        assert_eq!(frac(from_f32(2.5)), HALF);
        assert_eq!(frac(from_i32(9)), 0);
    }

    #[test]
    fn test_round() {
        assert_eq!(round(from_f32(2.49)), 2);
        assert_eq!(round(from_f32(2.51)), 3);
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio(1, 2), HALF);
        assert_eq!(ratio(5, 0), 0);
        assert_eq!(ratio(-3, 2), from_f32(-1.5));
    }
}
