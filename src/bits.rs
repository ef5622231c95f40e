//! Bit-level primitives for the three value domains.
//!
//! Successor/predecessor representable values, subnormal predicates, and
//! precision-narrowing of an exact `f64` to the nearest representable
//! neighbors at 16 and 32 bits. All conversions go through
//! `to_bits`/`from_bits`; there is no shared scratch buffer, so every
//! function here is pure and re-entrant.

use half::f16;

/// Next f64 toward positive infinity. NaN and +∞ map to themselves.
pub fn next_up_f64(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    let next = if bits >> 63 == 0 { bits + 1 } else { bits - 1 };
    f64::from_bits(next)
}

/// Next f64 toward negative infinity. NaN and -∞ map to themselves.
pub fn next_down_f64(x: f64) -> f64 {
    -next_up_f64(-x)
}

/// Next f32 toward positive infinity.
pub fn next_up_f32(x: f32) -> f32 {
    if x.is_nan() || x == f32::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f32::from_bits(1);
    }
    let bits = x.to_bits();
    let next = if bits >> 31 == 0 { bits + 1 } else { bits - 1 };
    f32::from_bits(next)
}

/// Next f32 toward negative infinity.
pub fn next_down_f32(x: f32) -> f32 {
    -next_up_f32(-x)
}

/// Next f16 toward positive infinity.
pub fn next_up_f16(x: f16) -> f16 {
    if x.is_nan() || x == f16::INFINITY {
        return x;
    }
    if x == f16::from_f32(0.0) {
        return f16::from_bits(1);
    }
    let bits = x.to_bits();
    let next = if bits >> 15 == 0 { bits + 1 } else { bits - 1 };
    f16::from_bits(next)
}

/// Next f16 toward negative infinity.
pub fn next_down_f16(x: f16) -> f16 {
    -next_up_f16(-x)
}

/// True if `x` is a nonzero f64 with magnitude below the smallest normal.
pub fn is_subnormal_f64(x: f64) -> bool {
    x != 0.0 && x.is_finite() && x.abs() < f64::MIN_POSITIVE
}

/// True if `x`, viewed as an exact real, lies strictly between zero and the
/// smallest normal f32 magnitude. `x` need not be f32-representable.
pub fn is_subnormal_f32(x: f64) -> bool {
    x != 0.0 && x.is_finite() && x.abs() < f32::MIN_POSITIVE as f64
}

/// True if `x`, viewed as an exact real, lies strictly between zero and the
/// smallest normal f16 magnitude.
pub fn is_subnormal_f16(x: f64) -> bool {
    x != 0.0 && x.is_finite() && x.abs() < f16::MIN_POSITIVE.to_f64()
}

/// Round `x` to the nearest f32 (ties to even) and widen back to f64.
pub fn quantize_f32(x: f64) -> f64 {
    (x as f32) as f64
}

/// Round `x` to the nearest f16 (ties to even) and widen back to f64.
pub fn quantize_f16(x: f64) -> f64 {
    f16::from_f64(x).to_f64()
}

/// The one or two f32 values bracketing the exact real `x`.
///
/// If `x` is exactly representable the bracket is a single value. A finite
/// `x` above `f32::MAX` brackets between `f32::MAX` and +∞ (a conforming
/// implementation may round either way at the overflow threshold).
pub fn bracket_f32(x: f64) -> (f64, Option<f64>) {
    debug_assert!(!x.is_nan(), "NaN has no representable bracket");
    if x.is_infinite() {
        return (x, None);
    }
    let rounded = x as f32;
    if rounded as f64 == x {
        return (x, None);
    }
    if rounded as f64 > x {
        (next_down_f32(rounded) as f64, Some(rounded as f64))
    } else {
        (rounded as f64, Some(next_up_f32(rounded) as f64))
    }
}

/// The one or two f16 values bracketing the exact real `x`.
pub fn bracket_f16(x: f64) -> (f64, Option<f64>) {
    debug_assert!(!x.is_nan(), "NaN has no representable bracket");
    if x.is_infinite() {
        return (x, None);
    }
    let rounded = f16::from_f64(x);
    if rounded.to_f64() == x {
        return (x, None);
    }
    if rounded.to_f64() > x {
        (next_down_f16(rounded).to_f64(), Some(rounded.to_f64()))
    } else {
        (rounded.to_f64(), Some(next_up_f16(rounded).to_f64()))
    }
}

/// Nearest representable f32 strictly above (`up`) or below `x`, widened to
/// f64. `x` itself need not be representable.
pub fn next_f32(x: f64, up: bool) -> f64 {
    let (lo, hi) = bracket_f32(x);
    match hi {
        // x representable: step one ULP off it
        None => {
            if up {
                next_up_f32(x as f32) as f64
            } else {
                next_down_f32(x as f32) as f64
            }
        }
        Some(hi) => {
            if up {
                hi
            } else {
                lo
            }
        }
    }
}

/// Nearest representable f16 strictly above or below `x`, widened to f64.
pub fn next_f16(x: f64, up: bool) -> f64 {
    let (lo, hi) = bracket_f16(x);
    match hi {
        None => {
            if up {
                next_up_f16(f16::from_f64(x)).to_f64()
            } else {
                next_down_f16(f16::from_f64(x)).to_f64()
            }
        }
        Some(hi) => {
            if up {
                hi
            } else {
                lo
            }
        }
    }
}

/// Nearest f64 strictly above or below `x`.
pub fn next_f64(x: f64, up: bool) -> f64 {
    if up {
        next_up_f64(x)
    } else {
        next_down_f64(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_up_down_f32_basics() {
        assert_eq!(next_up_f32(1.0), f32::from_bits(0x3f80_0001));
        assert_eq!(next_down_f32(1.0), f32::from_bits(0x3f7f_ffff));
        assert_eq!(next_up_f32(0.0), f32::from_bits(1));
        assert_eq!(next_down_f32(0.0), -f32::from_bits(1));
        assert_eq!(next_up_f32(f32::MAX), f32::INFINITY);
        assert_eq!(next_up_f32(f32::INFINITY), f32::INFINITY);
    }

    #[test]
    fn next_up_down_f16_basics() {
        let one = f16::from_f32(1.0);
        assert_eq!(next_up_f16(one).to_f32(), 1.0 + 2.0f32.powi(-10));
        assert_eq!(next_up_f16(f16::MAX), f16::INFINITY);
        assert_eq!(next_up_f16(f16::from_f32(0.0)), f16::from_bits(1));
    }

    #[test]
    fn subnormal_predicates() {
        assert!(is_subnormal_f32(1.0e-40));
        assert!(!is_subnormal_f32(0.0));
        assert!(!is_subnormal_f32(1.0e-38));
        assert!(is_subnormal_f16(1.0e-5));
        assert!(!is_subnormal_f16(1.0e-4));
        assert!(is_subnormal_f64(1.0e-310));
    }

    #[test]
    fn bracket_exact_value_is_single() {
        assert_eq!(bracket_f32(1.5), (1.5, None));
        assert_eq!(bracket_f16(0.5), (0.5, None));
        assert_eq!(bracket_f32(f64::INFINITY), (f64::INFINITY, None));
    }

    #[test]
    fn bracket_inexact_value_straddles() {
        // 0.1 is not representable at either narrow width
        let (lo, hi) = bracket_f32(0.1);
        let hi = hi.unwrap();
        assert!(lo < 0.1 && 0.1 < hi);
        assert_eq!(next_up_f32(lo as f32) as f64, hi);

        let (lo, hi) = bracket_f16(0.1);
        let hi = hi.unwrap();
        assert!(lo < 0.1 && 0.1 < hi);
        assert_eq!(next_up_f16(f16::from_f64(lo)).to_f64(), hi);
    }

    #[test]
    fn bracket_overflow_reaches_infinity() {
        let (lo, hi) = bracket_f32(1.0e39);
        assert_eq!(lo, f32::MAX as f64);
        assert_eq!(hi, Some(f64::INFINITY));
    }

    #[test]
    fn quantize_narrows() {
        assert_eq!(quantize_f32(1.0), 1.0);
        assert!(quantize_f32(0.1) != 0.1);
        assert_eq!(quantize_f16(65504.0), 65504.0);
        // Beyond f16 range rounds to infinity
        assert_eq!(quantize_f16(1.0e6), f64::INFINITY);
    }

    #[test]
    fn next_toward_from_unrepresentable() {
        let up = next_f32(0.1, true);
        let down = next_f32(0.1, false);
        assert!(down < 0.1 && 0.1 < up);
        // From a representable point, stepping moves exactly one ULP
        assert_eq!(next_f32(1.0, true), next_up_f32(1.0) as f64);
        assert_eq!(next_f32(1.0, false), next_down_f32(1.0) as f64);
    }
}
