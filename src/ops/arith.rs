//! Arithmetic and rounding operations: the correctly-rounded family,
//! plus division and remainder with their domain guards.

use crate::interval::{FpInterval, IntoInterval};
use crate::kind::FpKind;

use super::{run_scalar_pair_to_interval, run_scalar_to_interval, OpError, PairExtrema};

/// Division has a discontinuity at `y = 0`. When the denominator interval
/// straddles it, clamp the denominator to the discontinuity point; the
/// domain guard then reports accuracy as undefined there.
fn division_extrema(kind: FpKind, x: &FpInterval, y: &FpInterval) -> (FpInterval, FpInterval) {
    if y.contains_value(0.0) {
        (*x, FpInterval::point(kind, 0.0))
    } else {
        (*x, *y)
    }
}

impl FpKind {
    pub(crate) fn negation_inner(self, x: &FpInterval) -> FpInterval {
        run_scalar_to_interval(self, x, None, &|a| self.correctly_rounded_interval(-a))
    }

    /// Acceptance interval for unary `-x`. Correctly rounded.
    pub fn negation_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        Ok(self.negation_inner(&x.into_interval(self)))
    }

    pub(crate) fn abs_inner(self, x: &FpInterval) -> FpInterval {
        run_scalar_to_interval(self, x, None, &|a| self.correctly_rounded_interval(a.abs()))
    }

    /// Acceptance interval for `abs(x)`. Correctly rounded.
    pub fn abs_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        Ok(self.abs_inner(&x.into_interval(self)))
    }

    pub(crate) fn sign_inner(self, x: &FpInterval) -> FpInterval {
        run_scalar_to_interval(self, x, None, &|a| {
            let s = if a > 0.0 {
                1.0
            } else if a < 0.0 {
                -1.0
            } else {
                0.0
            };
            self.correctly_rounded_interval(s)
        })
    }

    /// Acceptance interval for `sign(x)`: exactly -1, 0, or 1.
    pub fn sign_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        Ok(self.sign_inner(&x.into_interval(self)))
    }

    pub(crate) fn floor_inner(self, x: &FpInterval) -> FpInterval {
        run_scalar_to_interval(self, x, None, &|a| {
            self.correctly_rounded_interval(a.floor())
        })
    }

    /// Acceptance interval for `floor(x)`. Correctly rounded.
    pub fn floor_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        Ok(self.floor_inner(&x.into_interval(self)))
    }

    pub(crate) fn ceil_inner(self, x: &FpInterval) -> FpInterval {
        run_scalar_to_interval(self, x, None, &|a| self.correctly_rounded_interval(a.ceil()))
    }

    /// Acceptance interval for `ceil(x)`. Correctly rounded.
    pub fn ceil_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        Ok(self.ceil_inner(&x.into_interval(self)))
    }

    pub(crate) fn trunc_inner(self, x: &FpInterval) -> FpInterval {
        run_scalar_to_interval(self, x, None, &|a| {
            self.correctly_rounded_interval(a.trunc())
        })
    }

    /// Acceptance interval for `trunc(x)`. Correctly rounded.
    pub fn trunc_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        Ok(self.trunc_inner(&x.into_interval(self)))
    }

    pub(crate) fn round_inner(self, x: &FpInterval) -> FpInterval {
        run_scalar_to_interval(self, x, None, &|a| {
            self.correctly_rounded_interval(a.round_ties_even())
        })
    }

    /// Acceptance interval for `round(x)`, rounding ties to even.
    pub fn round_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        Ok(self.round_inner(&x.into_interval(self)))
    }

    pub(crate) fn fract_inner(self, x: &FpInterval) -> FpInterval {
        // x - floor(x); exact in f64 for any representable narrow input
        run_scalar_to_interval(self, x, None, &|a| {
            self.correctly_rounded_interval(a - a.floor())
        })
    }

    /// Acceptance interval for `fract(x) = x - floor(x)`.
    pub fn fract_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        Ok(self.fract_inner(&x.into_interval(self)))
    }

    pub(crate) fn saturate_inner(self, x: &FpInterval) -> FpInterval {
        run_scalar_to_interval(self, x, None, &|a| {
            self.correctly_rounded_interval(a.clamp(0.0, 1.0))
        })
    }

    /// Acceptance interval for `saturate(x) = clamp(x, 0.0, 1.0)`.
    pub fn saturate_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        Ok(self.saturate_inner(&x.into_interval(self)))
    }

    /// Acceptance interval at f32 for `quantizeToF16(x)`: the f16 rounding
    /// bracket of `x` (plus flush alternates), viewed as f32 values.
    /// Inputs beyond the f16 range have no finite result.
    pub fn quantize_to_f16_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        self.require_f32("quantizeToF16")?;
        let x = x.into_interval(self);
        Ok(run_scalar_to_interval(self, &x, None, &|a| {
            let i = FpKind::F16.correctly_rounded_interval(a);
            // Retag the f16 bracket as the f32-kind result interval
            i.into_interval(self)
        }))
    }

    pub(crate) fn addition_inner(self, x: &FpInterval, y: &FpInterval) -> FpInterval {
        run_scalar_pair_to_interval(self, x, y, None, None, &|a, b| {
            self.correctly_rounded_interval(a + b)
        })
    }

    /// Acceptance interval for `x + y`. Correctly rounded.
    ///
    /// ```
    /// use fpbounds::FpKind;
    ///
    /// let i = FpKind::F32.addition_interval(1.0, 2.0).unwrap();
    /// assert!(i.is_point());
    /// assert!(i.contains_value(3.0));
    /// ```
    pub fn addition_interval(
        self,
        x: impl IntoInterval,
        y: impl IntoInterval,
    ) -> Result<FpInterval, OpError> {
        Ok(self.addition_inner(&x.into_interval(self), &y.into_interval(self)))
    }

    pub(crate) fn subtraction_inner(self, x: &FpInterval, y: &FpInterval) -> FpInterval {
        run_scalar_pair_to_interval(self, x, y, None, None, &|a, b| {
            self.correctly_rounded_interval(a - b)
        })
    }

    /// Acceptance interval for `x - y`. Correctly rounded.
    pub fn subtraction_interval(
        self,
        x: impl IntoInterval,
        y: impl IntoInterval,
    ) -> Result<FpInterval, OpError> {
        Ok(self.subtraction_inner(&x.into_interval(self), &y.into_interval(self)))
    }

    pub(crate) fn multiplication_inner(self, x: &FpInterval, y: &FpInterval) -> FpInterval {
        run_scalar_pair_to_interval(self, x, y, None, None, &|a, b| {
            self.correctly_rounded_interval(a * b)
        })
    }

    /// Acceptance interval for `x * y`. Correctly rounded.
    pub fn multiplication_interval(
        self,
        x: impl IntoInterval,
        y: impl IntoInterval,
    ) -> Result<FpInterval, OpError> {
        Ok(self.multiplication_inner(&x.into_interval(self), &y.into_interval(self)))
    }

    /// Domain of division: both operands bounded by the kind's division
    /// extent, the denominator additionally a nonzero value away from the
    /// subnormal range.
    fn division_domain(self) -> ([FpInterval; 1], [FpInterval; 2]) {
        let ext = self.constants().division_extent;
        let min_norm = self.constants().positive_min;
        (
            [FpInterval::new(self, -ext, ext)],
            [
                FpInterval::new(self, -ext, -min_norm),
                FpInterval::new(self, min_norm, ext),
            ],
        )
    }

    pub(crate) fn division_inner(self, x: &FpInterval, y: &FpInterval) -> FpInterval {
        let (dx, dy) = self.division_domain();
        run_scalar_pair_to_interval(
            self,
            x,
            y,
            Some((&dx, &dy)),
            Some(division_extrema as PairExtrema),
            &|a, b| match self {
                // Abstract division folds exactly at shader-creation time
                FpKind::Abstract => self.correctly_rounded_interval(a / b),
                _ => self.ulp_interval(a / b, 2.5),
            },
        )
    }

    /// Acceptance interval for `x / y`: within 2.5 ULP while `|y|` stays
    /// inside the kind's division extent; accuracy undefined (the "any"
    /// interval) at or across `y = 0`.
    ///
    /// ```
    /// use fpbounds::FpKind;
    ///
    /// assert!(FpKind::F32.division_interval(1.0, 0.0).unwrap().is_any());
    /// ```
    pub fn division_interval(
        self,
        x: impl IntoInterval,
        y: impl IntoInterval,
    ) -> Result<FpInterval, OpError> {
        Ok(self.division_inner(&x.into_interval(self), &y.into_interval(self)))
    }

    pub(crate) fn remainder_inner(self, x: &FpInterval, y: &FpInterval) -> FpInterval {
        // x % y = x - y * trunc(x / y), inherited through division
        let q = self.division_inner(x, y);
        let t = self.trunc_inner(&q);
        let m = self.multiplication_inner(y, &t);
        self.subtraction_inner(x, &m)
    }

    /// Acceptance interval for `x % y`, inherited from
    /// `x - y * trunc(x / y)`.
    pub fn remainder_interval(
        self,
        x: impl IntoInterval,
        y: impl IntoInterval,
    ) -> Result<FpInterval, OpError> {
        Ok(self.remainder_inner(&x.into_interval(self), &y.into_interval(self)))
    }

    pub(crate) fn min_inner(self, x: &FpInterval, y: &FpInterval) -> FpInterval {
        run_scalar_pair_to_interval(self, x, y, None, None, &|a, b| {
            self.correctly_rounded_interval(f64::min(a, b))
        })
    }

    /// Acceptance interval for `min(x, y)`. Correctly rounded.
    pub fn min_interval(
        self,
        x: impl IntoInterval,
        y: impl IntoInterval,
    ) -> Result<FpInterval, OpError> {
        Ok(self.min_inner(&x.into_interval(self), &y.into_interval(self)))
    }

    pub(crate) fn max_inner(self, x: &FpInterval, y: &FpInterval) -> FpInterval {
        run_scalar_pair_to_interval(self, x, y, None, None, &|a, b| {
            self.correctly_rounded_interval(f64::max(a, b))
        })
    }

    /// Acceptance interval for `max(x, y)`. Correctly rounded.
    pub fn max_interval(
        self,
        x: impl IntoInterval,
        y: impl IntoInterval,
    ) -> Result<FpInterval, OpError> {
        Ok(self.max_inner(&x.into_interval(self), &y.into_interval(self)))
    }
}
