//! Exponential, logarithmic, and power operations. All of these carry
//! ULP- or absolute-error bounds, so the abstract domain reports them
//! unimplemented.

use crate::interval::{FpInterval, IntoInterval};
use crate::kind::FpKind;

use super::{run_scalar_to_interval, OpError};

impl FpKind {
    /// Absolute error permitted for log/log2 on `[0.5, 2.0]`, where the
    /// result is near zero and a ULP bound would be meaninglessly tight.
    fn log_absolute_error(self) -> f64 {
        match self {
            FpKind::F16 => 2.0f64.powi(-7),
            _ => 2.0f64.powi(-21),
        }
    }

    /// The positive reals representable at this kind, subnormals included.
    fn positive_domain(self) -> [FpInterval; 1] {
        let c = self.constants();
        [FpInterval::new(
            self,
            c.positive_subnormal_min,
            c.positive_max,
        )]
    }

    pub(crate) fn exp_inner(self, x: &FpInterval) -> FpInterval {
        run_scalar_to_interval(self, x, None, &|a| {
            self.ulp_interval(a.exp(), 3.0 + 2.0 * a.abs())
        })
    }

    /// Acceptance interval for `exp(x)`: within `3 + 2|x|` ULP.
    pub fn exp_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        self.require_transcendental("exp")?;
        Ok(self.exp_inner(&x.into_interval(self)))
    }

    pub(crate) fn exp2_inner(self, x: &FpInterval) -> FpInterval {
        run_scalar_to_interval(self, x, None, &|a| {
            self.ulp_interval(a.exp2(), 3.0 + 2.0 * a.abs())
        })
    }

    /// Acceptance interval for `exp2(x)`: within `3 + 2|x|` ULP.
    pub fn exp2_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        self.require_transcendental("exp2")?;
        Ok(self.exp2_inner(&x.into_interval(self)))
    }

    pub(crate) fn log_inner(self, x: &FpInterval) -> FpInterval {
        let domain = self.positive_domain();
        run_scalar_to_interval(self, x, Some(&domain), &|a| {
            if (0.5..=2.0).contains(&a) {
                self.abs_error_interval(a.ln(), self.log_absolute_error())
            } else {
                self.ulp_interval(a.ln(), 3.0)
            }
        })
    }

    /// Acceptance interval for `log(x)`: absolute error `2^-21` on
    /// `[0.5, 2.0]`, 3 ULP elsewhere in the positive domain; accuracy
    /// undefined at or below zero.
    pub fn log_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        self.require_transcendental("log")?;
        Ok(self.log_inner(&x.into_interval(self)))
    }

    pub(crate) fn log2_inner(self, x: &FpInterval) -> FpInterval {
        let domain = self.positive_domain();
        run_scalar_to_interval(self, x, Some(&domain), &|a| {
            if (0.5..=2.0).contains(&a) {
                self.abs_error_interval(a.log2(), self.log_absolute_error())
            } else {
                self.ulp_interval(a.log2(), 3.0)
            }
        })
    }

    /// Acceptance interval for `log2(x)`, with the same error model as
    /// [`log_interval`](Self::log_interval).
    pub fn log2_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        self.require_transcendental("log2")?;
        Ok(self.log2_inner(&x.into_interval(self)))
    }

    pub(crate) fn inverse_sqrt_inner(self, x: &FpInterval) -> FpInterval {
        let domain = self.positive_domain();
        run_scalar_to_interval(self, x, Some(&domain), &|a| {
            self.ulp_interval(1.0 / a.sqrt(), 2.0)
        })
    }

    /// Acceptance interval for `inverseSqrt(x)`: within 2 ULP over the
    /// positive domain.
    pub fn inverse_sqrt_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        self.require_transcendental("inverseSqrt")?;
        Ok(self.inverse_sqrt_inner(&x.into_interval(self)))
    }

    pub(crate) fn sqrt_inner(self, x: &FpInterval) -> FpInterval {
        // sqrt(x) = 1 / inverseSqrt(x), inherited
        let inv = self.inverse_sqrt_inner(x);
        self.division_inner(&FpInterval::point(self, 1.0), &inv)
    }

    /// Acceptance interval for `sqrt(x)`, inherited from
    /// `1 / inverseSqrt(x)`.
    pub fn sqrt_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        self.require_transcendental("sqrt")?;
        Ok(self.sqrt_inner(&x.into_interval(self)))
    }

    pub(crate) fn pow_inner(self, x: &FpInterval, y: &FpInterval) -> FpInterval {
        // pow(x, y) = exp2(y * log2(x)), inherited; log2 carries the
        // x > 0 domain requirement
        let l = self.log2_inner(x);
        let m = self.multiplication_inner(y, &l);
        self.exp2_inner(&m)
    }

    /// Acceptance interval for `pow(x, y)`, inherited from
    /// `exp2(y * log2(x))`.
    pub fn pow_interval(
        self,
        x: impl IntoInterval,
        y: impl IntoInterval,
    ) -> Result<FpInterval, OpError> {
        self.require_transcendental("pow")?;
        Ok(self.pow_inner(&x.into_interval(self), &y.into_interval(self)))
    }
}
