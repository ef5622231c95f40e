//! Precision kinds and their capability surface.
//!
//! [`FpKind`] selects one of the three value domains the engine understands:
//! IEEE binary16, binary32, or the "abstract" domain backed by binary64.
//! Every precision-dependent primitive — quantization, correct rounding,
//! subnormal flushing, one-ULP — dispatches on the kind, and the per-kind
//! constant tables live in [`FpConstants`]. Operations that a kind does not
//! implement are reported through `ops::OpError`, never silently stubbed.

use serde::{Deserialize, Serialize};

use crate::bits;

/// Precision selector for the engine.
///
/// `Abstract` is the f64-backed domain used for abstract-float expressions;
/// it implements the correctly-rounded operation family and the vector and
/// matrix operations, but not the ULP- or absolute-error-bounded
/// transcendental family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FpKind {
    F16,
    F32,
    Abstract,
}

impl core::fmt::Display for FpKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FpKind::F16 => write!(f, "f16"),
            FpKind::F32 => write!(f, "f32"),
            FpKind::Abstract => write!(f, "abstract"),
        }
    }
}

/// Value-domain constants for one precision.
///
/// Orientation follows the number line: `negative_min` is the most negative
/// finite value, `negative_max` the largest (closest to zero) negative
/// normal. All values are exact when widened to f64.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpConstants {
    /// Largest finite positive value.
    pub positive_max: f64,
    /// Smallest positive normal.
    pub positive_min: f64,
    /// Largest positive subnormal.
    pub positive_subnormal_max: f64,
    /// Smallest positive subnormal.
    pub positive_subnormal_min: f64,
    /// Largest finite value strictly below `positive_max`.
    pub positive_nearest_max: f64,
    /// Most negative finite value (`-positive_max`).
    pub negative_min: f64,
    /// Largest negative normal (`-positive_min`).
    pub negative_max: f64,
    /// Most negative subnormal.
    pub negative_subnormal_min: f64,
    /// Largest (closest to zero) negative subnormal.
    pub negative_subnormal_max: f64,
    /// Machine epsilon: distance from 1.0 to the next representable value.
    pub eps: f64,
    /// Magnitude bound on `|y|` inside which division carries its 2.5 ULP
    /// accuracy guarantee.
    pub division_extent: f64,
}

const F16_CONSTANTS: FpConstants = FpConstants {
    positive_max: 65504.0,
    positive_min: 6.103515625e-5,              // 2^-14
    positive_subnormal_max: 6.097555160522461e-5, // 2^-14 - 2^-24
    positive_subnormal_min: 5.960464477539063e-8, // 2^-24
    positive_nearest_max: 65472.0,
    negative_min: -65504.0,
    negative_max: -6.103515625e-5,
    negative_subnormal_min: -6.097555160522461e-5,
    negative_subnormal_max: -5.960464477539063e-8,
    eps: 9.765625e-4, // 2^-10
    division_extent: 16384.0, // 2^14
};

const F32_CONSTANTS: FpConstants = FpConstants {
    positive_max: 3.4028234663852886e38,
    positive_min: 1.1754943508222875e-38,          // 2^-126
    positive_subnormal_max: 1.1754942106924411e-38, // 2^-126 - 2^-149
    positive_subnormal_min: 1.401298464324817e-45,  // 2^-149
    positive_nearest_max: 3.4028232635611926e38,
    negative_min: -3.4028234663852886e38,
    negative_max: -1.1754943508222875e-38,
    negative_subnormal_min: -1.1754942106924411e-38,
    negative_subnormal_max: -1.401298464324817e-45,
    eps: 1.1920928955078125e-7, // 2^-23
    division_extent: 8.507059173023462e37, // 2^126
};

const ABSTRACT_CONSTANTS: FpConstants = FpConstants {
    positive_max: f64::MAX,
    positive_min: 2.2250738585072014e-308,          // 2^-1022
    positive_subnormal_max: 2.225073858507201e-308, // 2^-1022 - 2^-1074
    positive_subnormal_min: 5e-324,                 // 2^-1074
    positive_nearest_max: 1.7976931348623155e308,
    negative_min: f64::MIN,
    negative_max: -2.2250738585072014e-308,
    negative_subnormal_min: -2.225073858507201e-308,
    negative_subnormal_max: -5e-324,
    eps: 2.220446049250313e-16, // 2^-52
    division_extent: 4.4942328371557898e307, // 2^1022
};

impl FpKind {
    /// Constant table for this precision.
    pub fn constants(self) -> &'static FpConstants {
        match self {
            FpKind::F16 => &F16_CONSTANTS,
            FpKind::F32 => &F32_CONSTANTS,
            FpKind::Abstract => &ABSTRACT_CONSTANTS,
        }
    }

    /// Round `n` to the nearest representable value at this precision
    /// (ties to even), widened back to f64.
    ///
    /// Used on raw test inputs before they reach an operation, mirroring
    /// shader constant-folding of literals. NaN and infinities pass through.
    pub fn quantize(self, n: f64) -> f64 {
        match self {
            FpKind::F16 => bits::quantize_f16(n),
            FpKind::F32 => bits::quantize_f32(n),
            FpKind::Abstract => n,
        }
    }

    /// True if `n` is exactly representable at this precision.
    pub fn is_representable(self, n: f64) -> bool {
        !n.is_nan() && self.quantize(n) == n
    }

    /// True if `n` is finite and within this precision's finite range.
    pub fn is_finite_value(self, n: f64) -> bool {
        n.is_finite() && n.abs() <= self.constants().positive_max
    }

    /// True if `n` lies strictly between zero and the smallest normal
    /// magnitude of this precision. `n` need not be representable.
    pub fn is_subnormal(self, n: f64) -> bool {
        match self {
            FpKind::F16 => bits::is_subnormal_f16(n),
            FpKind::F32 => bits::is_subnormal_f32(n),
            FpKind::Abstract => bits::is_subnormal_f64(n),
        }
    }

    /// Flush `n` to zero if it is subnormal at this precision.
    ///
    /// # Panics
    ///
    /// Panics if `n` is NaN; a NaN reaching the flushing machinery is a
    /// library bug, not recoverable input.
    pub fn flush_subnormal(self, n: f64) -> f64 {
        assert!(!n.is_nan(), "flush_subnormal: NaN is not a flushable value");
        if self.is_subnormal(n) {
            0.0
        } else {
            n
        }
    }

    /// The set of values a conforming implementation may produce when
    /// rounding the exact real `n` to this precision: the one or two
    /// adjacent representable values bracketing `n`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is NaN.
    pub fn correctly_rounded(self, n: f64) -> Vec<f64> {
        assert!(!n.is_nan(), "correctly_rounded: NaN has no rounding bracket");
        let (lo, hi) = match self {
            FpKind::F16 => bits::bracket_f16(n),
            FpKind::F32 => bits::bracket_f32(n),
            FpKind::Abstract => (n, None),
        };
        match hi {
            None => vec![lo],
            Some(hi) => vec![lo, hi],
        }
    }

    /// Extend `values` with the flush-to-zero alternate of every subnormal
    /// member. Zero itself is added once if any member is subnormal.
    pub fn add_flushed_if_needed(self, values: &[f64]) -> Vec<f64> {
        let mut out: Vec<f64> = values.to_vec();
        if values.iter().any(|&v| self.is_subnormal(v)) && !out.contains(&0.0) {
            out.push(0.0);
        }
        out
    }

    /// Nearest representable value strictly above (`up == true`) or below
    /// `n` at this precision.
    pub fn next_toward(self, n: f64, up: bool) -> f64 {
        match self {
            FpKind::F16 => bits::next_f16(n, up),
            FpKind::F32 => bits::next_f32(n, up),
            FpKind::Abstract => bits::next_f64(n, up),
        }
    }

    /// Magnitude of one unit in the last place at `target`.
    ///
    /// With `flush == true`, a subnormal target is first flushed to zero, so
    /// the result is the ULP a flushing implementation observes. At or
    /// beyond the top of the range the ULP of the highest binade is used.
    ///
    /// # Panics
    ///
    /// Panics if `target` is NaN.
    pub fn one_ulp(self, target: f64, flush: bool) -> f64 {
        assert!(!target.is_nan(), "one_ulp: NaN has no ULP");
        let c = self.constants();
        let target = if flush { self.flush_subnormal(target) } else { target };
        if target >= c.positive_max {
            return c.positive_max - c.positive_nearest_max;
        }
        if target <= c.negative_min {
            return c.positive_max - c.positive_nearest_max;
        }
        let before = self.next_toward(target, false);
        let after = self.next_toward(target, true);
        if self.is_representable(target) {
            f64::min(target - before, after - target)
        } else {
            after - before
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_per_kind() {
        assert_eq!(FpKind::Abstract.quantize(0.1), 0.1);
        assert!(FpKind::F32.quantize(0.1) != 0.1);
        assert!(FpKind::F16.quantize(0.1) != FpKind::F32.quantize(0.1));
        assert!(FpKind::F32.is_representable(FpKind::F32.quantize(0.1)));
        assert!(FpKind::F16.is_representable(FpKind::F16.quantize(0.1)));
    }

    #[test]
    fn constants_are_representable() {
        for kind in [FpKind::F16, FpKind::F32, FpKind::Abstract] {
            let c = kind.constants();
            for v in [
                c.positive_max,
                c.positive_min,
                c.positive_subnormal_max,
                c.positive_subnormal_min,
                c.positive_nearest_max,
                c.negative_min,
                c.negative_max,
            ] {
                assert!(kind.is_representable(v), "{kind}: {v:e} not representable");
            }
            assert!(kind.is_subnormal(c.positive_subnormal_max));
            assert!(kind.is_subnormal(c.positive_subnormal_min));
            assert!(!kind.is_subnormal(c.positive_min));
        }
    }

    #[test]
    fn correctly_rounded_exact_is_single() {
        assert_eq!(FpKind::F32.correctly_rounded(1.5), vec![1.5]);
        assert_eq!(FpKind::F16.correctly_rounded(0.25), vec![0.25]);
        assert_eq!(FpKind::Abstract.correctly_rounded(0.1), vec![0.1]);
    }

    #[test]
    fn correctly_rounded_inexact_brackets() {
        let r = FpKind::F32.correctly_rounded(0.1);
        assert_eq!(r.len(), 2);
        assert!(r[0] < 0.1 && 0.1 < r[1]);

        let r = FpKind::F16.correctly_rounded(0.1);
        assert_eq!(r.len(), 2);
        assert!(r[0] < 0.1 && 0.1 < r[1]);
    }

    #[test]
    #[should_panic(expected = "NaN")]
    fn correctly_rounded_rejects_nan() {
        FpKind::F32.correctly_rounded(f64::NAN);
    }

    #[test]
    fn flushing() {
        let sub = 1.0e-40;
        assert_eq!(FpKind::F32.flush_subnormal(sub), 0.0);
        assert_eq!(FpKind::F32.flush_subnormal(1.0), 1.0);
        // Flushing at abstract precision only affects f64 subnormals
        assert_eq!(FpKind::Abstract.flush_subnormal(sub), sub);

        let expanded = FpKind::F32.add_flushed_if_needed(&[sub]);
        assert_eq!(expanded, vec![sub, 0.0]);
        let unchanged = FpKind::F32.add_flushed_if_needed(&[1.0, 2.0]);
        assert_eq!(unchanged, vec![1.0, 2.0]);
    }

    #[test]
    fn one_ulp_mid_binade() {
        assert_eq!(FpKind::F32.one_ulp(1.5, true), 2.0f64.powi(-23));
        assert_eq!(FpKind::F16.one_ulp(1.5, true), 2.0f64.powi(-10));
        assert_eq!(FpKind::Abstract.one_ulp(1.5, true), 2.0f64.powi(-52));
    }

    #[test]
    fn one_ulp_at_binade_boundary_takes_smaller_gap() {
        // At 1.0 the spacing below is half the spacing above; ULP is the
        // minimum distance of a bracketing pair
        assert_eq!(FpKind::F32.one_ulp(1.0, true), 2.0f64.powi(-24));
        assert_eq!(FpKind::F16.one_ulp(1.0, true), 2.0f64.powi(-11));
    }

    #[test]
    fn one_ulp_of_unrepresentable_spans_bracket() {
        // 0.1 is strictly inside an f32 bracket; its ULP is that gap
        let ulp = FpKind::F32.one_ulp(0.1, false);
        let lo = FpKind::F32.next_toward(0.1, false);
        let hi = FpKind::F32.next_toward(0.1, true);
        assert_eq!(ulp, hi - lo);
    }

    #[test]
    fn one_ulp_flush_mode_at_subnormals() {
        let sub = FpKind::F32.constants().positive_subnormal_min;
        // Flushed, the target is zero and the ULP is the subnormal step;
        // either way the step near the origin is one subnormal quantum.
        assert_eq!(FpKind::F32.one_ulp(sub, true), sub);
        assert_eq!(FpKind::F32.one_ulp(sub, false), sub);
    }

    #[test]
    fn one_ulp_at_range_top() {
        let c = FpKind::F32.constants();
        assert_eq!(
            FpKind::F32.one_ulp(c.positive_max, false),
            c.positive_max - c.positive_nearest_max
        );
        assert_eq!(
            FpKind::F32.one_ulp(f64::INFINITY, false),
            c.positive_max - c.positive_nearest_max
        );
    }

    #[test]
    fn finite_value_respects_kind_range() {
        assert!(FpKind::F32.is_finite_value(1.0e38));
        assert!(!FpKind::F16.is_finite_value(1.0e38));
        assert!(!FpKind::F32.is_finite_value(f64::INFINITY));
        assert!(FpKind::Abstract.is_finite_value(1.0e308));
    }
}
