//! Trigonometric and hyperbolic operations, plus the angle-unit
//! conversions. Error-bounded throughout, so unimplemented at abstract
//! precision; degrees/radians are plain multiplications and work
//! everywhere.

use core::f64::consts::PI;

use crate::interval::{FpInterval, IntoInterval};
use crate::kind::FpKind;

use super::{run_scalar_pair_to_interval, run_scalar_to_interval, OpError, PairExtrema};

/// atan2 jumps by 2π across `y = 0` for negative `x`. When the input
/// straddles that branch cut the accuracy is undefined.
fn atan2_extrema(kind: FpKind, y: &FpInterval, x: &FpInterval) -> (FpInterval, FpInterval) {
    if y.contains_value(0.0) && x.begin() < 0.0 {
        (FpInterval::any(kind), FpInterval::any(kind))
    } else {
        (*y, *x)
    }
}

impl FpKind {
    /// Absolute error permitted for sin/cos on `[-π, π]`.
    fn trig_absolute_error(self) -> f64 {
        match self {
            FpKind::F16 => 2.0f64.powi(-7),
            _ => 2.0f64.powi(-11),
        }
    }

    fn pi_domain(self) -> [FpInterval; 1] {
        // The kind's own nearest-π value; at f32 that rounds up, so the
        // representable π itself stays inside the domain
        let pi = self.quantize(PI);
        [FpInterval::new(self, -pi, pi)]
    }

    pub(crate) fn sin_inner(self, x: &FpInterval) -> FpInterval {
        let domain = self.pi_domain();
        run_scalar_to_interval(self, x, Some(&domain), &|a| {
            self.abs_error_interval(a.sin(), self.trig_absolute_error())
        })
    }

    /// Acceptance interval for `sin(x)`: absolute error `2^-11` on
    /// `[-π, π]`, accuracy undefined outside.
    pub fn sin_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        self.require_transcendental("sin")?;
        Ok(self.sin_inner(&x.into_interval(self)))
    }

    pub(crate) fn cos_inner(self, x: &FpInterval) -> FpInterval {
        let domain = self.pi_domain();
        run_scalar_to_interval(self, x, Some(&domain), &|a| {
            self.abs_error_interval(a.cos(), self.trig_absolute_error())
        })
    }

    /// Acceptance interval for `cos(x)`, with the same error model as
    /// [`sin_interval`](Self::sin_interval).
    pub fn cos_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        self.require_transcendental("cos")?;
        Ok(self.cos_inner(&x.into_interval(self)))
    }

    pub(crate) fn tan_inner(self, x: &FpInterval) -> FpInterval {
        let s = self.sin_inner(x);
        let c = self.cos_inner(x);
        self.division_inner(&s, &c)
    }

    /// Acceptance interval for `tan(x)`, inherited from
    /// `sin(x) / cos(x)`.
    pub fn tan_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        self.require_transcendental("tan")?;
        Ok(self.tan_inner(&x.into_interval(self)))
    }

    pub(crate) fn atan_inner(self, x: &FpInterval) -> FpInterval {
        run_scalar_to_interval(self, x, None, &|a| self.ulp_interval(a.atan(), 4096.0))
    }

    /// Acceptance interval for `atan(x)`: within 4096 ULP.
    pub fn atan_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        self.require_transcendental("atan")?;
        Ok(self.atan_inner(&x.into_interval(self)))
    }

    /// Domain of atan2's second operand: nonzero normal values.
    fn atan2_x_domain(self) -> [FpInterval; 2] {
        let c = self.constants();
        [
            FpInterval::new(self, c.negative_min, c.negative_max),
            FpInterval::new(self, c.positive_min, c.positive_max),
        ]
    }

    pub(crate) fn atan2_inner(self, y: &FpInterval, x: &FpInterval) -> FpInterval {
        let dy = [FpInterval::new(
            self,
            self.constants().negative_min,
            self.constants().positive_max,
        )];
        let dx = self.atan2_x_domain();
        run_scalar_pair_to_interval(
            self,
            y,
            x,
            Some((&dy, &dx)),
            Some(atan2_extrema as PairExtrema),
            &|b, a| self.ulp_interval(f64::atan2(b, a), 4096.0),
        )
    }

    /// Acceptance interval for `atan2(y, x)`: within 4096 ULP for nonzero
    /// normal `x`; accuracy undefined at `x = 0` and across the negative-x
    /// branch cut.
    pub fn atan2_interval(
        self,
        y: impl IntoInterval,
        x: impl IntoInterval,
    ) -> Result<FpInterval, OpError> {
        self.require_transcendental("atan2")?;
        Ok(self.atan2_inner(&y.into_interval(self), &x.into_interval(self)))
    }

    fn unit_domain(self) -> [FpInterval; 1] {
        [FpInterval::new(self, -1.0, 1.0)]
    }

    pub(crate) fn asin_inner(self, x: &FpInterval) -> FpInterval {
        let domain = self.unit_domain();
        if !super::domain_contains(&domain, x) {
            return FpInterval::any(self);
        }
        // asin(x) = atan2(x, sqrt((1 + x)(1 - x))), inherited
        let p = self.multiplication_inner(
            &self.addition_inner(&FpInterval::point(self, 1.0), x),
            &self.subtraction_inner(&FpInterval::point(self, 1.0), x),
        );
        let s = self.sqrt_inner(&p);
        self.atan2_inner(x, &s)
    }

    /// Acceptance interval for `asin(x)` on `[-1, 1]`, inherited from
    /// `atan2(x, sqrt((1 + x)(1 - x)))`.
    pub fn asin_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        self.require_transcendental("asin")?;
        Ok(self.asin_inner(&x.into_interval(self)))
    }

    pub(crate) fn acos_inner(self, x: &FpInterval) -> FpInterval {
        let domain = self.unit_domain();
        if !super::domain_contains(&domain, x) {
            return FpInterval::any(self);
        }
        // acos(x) = atan2(sqrt((1 + x)(1 - x)), x), inherited
        let p = self.multiplication_inner(
            &self.addition_inner(&FpInterval::point(self, 1.0), x),
            &self.subtraction_inner(&FpInterval::point(self, 1.0), x),
        );
        let s = self.sqrt_inner(&p);
        self.atan2_inner(&s, x)
    }

    /// Acceptance interval for `acos(x)` on `[-1, 1]`, inherited from
    /// `atan2(sqrt((1 + x)(1 - x)), x)`.
    pub fn acos_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        self.require_transcendental("acos")?;
        Ok(self.acos_inner(&x.into_interval(self)))
    }

    pub(crate) fn sinh_inner(self, x: &FpInterval) -> FpInterval {
        // (exp(x) - exp(-x)) / 2
        let e1 = self.exp_inner(x);
        let e2 = self.exp_inner(&self.negation_inner(x));
        let d = self.subtraction_inner(&e1, &e2);
        self.multiplication_inner(&d, &FpInterval::point(self, 0.5))
    }

    /// Acceptance interval for `sinh(x)`, inherited from
    /// `(exp(x) - exp(-x)) / 2`.
    pub fn sinh_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        self.require_transcendental("sinh")?;
        Ok(self.sinh_inner(&x.into_interval(self)))
    }

    pub(crate) fn cosh_inner(self, x: &FpInterval) -> FpInterval {
        // (exp(x) + exp(-x)) / 2
        let e1 = self.exp_inner(x);
        let e2 = self.exp_inner(&self.negation_inner(x));
        let s = self.addition_inner(&e1, &e2);
        self.multiplication_inner(&s, &FpInterval::point(self, 0.5))
    }

    /// Acceptance interval for `cosh(x)`, inherited from
    /// `(exp(x) + exp(-x)) / 2`.
    pub fn cosh_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        self.require_transcendental("cosh")?;
        Ok(self.cosh_inner(&x.into_interval(self)))
    }

    pub(crate) fn tanh_inner(self, x: &FpInterval) -> FpInterval {
        let s = self.sinh_inner(x);
        let c = self.cosh_inner(x);
        self.division_inner(&s, &c)
    }

    /// Acceptance interval for `tanh(x)`, inherited from
    /// `sinh(x) / cosh(x)`.
    pub fn tanh_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        self.require_transcendental("tanh")?;
        Ok(self.tanh_inner(&x.into_interval(self)))
    }

    pub(crate) fn asinh_inner(self, x: &FpInterval) -> FpInterval {
        // log(x + sqrt(x^2 + 1))
        let sq = self.multiplication_inner(x, x);
        let p = self.addition_inner(&sq, &FpInterval::point(self, 1.0));
        let s = self.sqrt_inner(&p);
        self.log_inner(&self.addition_inner(x, &s))
    }

    /// Acceptance interval for `asinh(x)`, inherited from
    /// `log(x + sqrt(x² + 1))`.
    pub fn asinh_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        self.require_transcendental("asinh")?;
        Ok(self.asinh_inner(&x.into_interval(self)))
    }

    pub(crate) fn acosh_inner(self, x: &FpInterval) -> FpInterval {
        let c = self.constants();
        let domain = [FpInterval::new(self, 1.0, c.positive_max)];
        if !super::domain_contains(&domain, x) {
            return FpInterval::any(self);
        }
        // log(x + sqrt((x + 1)(x - 1)))
        let p = self.multiplication_inner(
            &self.addition_inner(x, &FpInterval::point(self, 1.0)),
            &self.subtraction_inner(x, &FpInterval::point(self, 1.0)),
        );
        let s = self.sqrt_inner(&p);
        self.log_inner(&self.addition_inner(x, &s))
    }

    /// Acceptance interval for `acosh(x)` on `[1, ∞)`, inherited from
    /// `log(x + sqrt((x + 1)(x - 1)))`.
    pub fn acosh_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        self.require_transcendental("acosh")?;
        Ok(self.acosh_inner(&x.into_interval(self)))
    }

    pub(crate) fn atanh_inner(self, x: &FpInterval) -> FpInterval {
        let domain = self.unit_domain();
        if !super::domain_contains(&domain, x) {
            return FpInterval::any(self);
        }
        // log((1 + x) / (1 - x)) * 0.5
        let num = self.addition_inner(&FpInterval::point(self, 1.0), x);
        let den = self.subtraction_inner(&FpInterval::point(self, 1.0), x);
        let q = self.division_inner(&num, &den);
        let l = self.log_inner(&q);
        self.multiplication_inner(&l, &FpInterval::point(self, 0.5))
    }

    /// Acceptance interval for `atanh(x)` on `(-1, 1)`, inherited from
    /// `log((1 + x) / (1 - x)) * 0.5`.
    pub fn atanh_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        self.require_transcendental("atanh")?;
        Ok(self.atanh_inner(&x.into_interval(self)))
    }

    pub(crate) fn degrees_inner(self, x: &FpInterval) -> FpInterval {
        let factor = FpInterval::point(self, self.quantize(180.0 / PI));
        self.multiplication_inner(x, &factor)
    }

    /// Acceptance interval for `degrees(x)`, inherited from
    /// multiplication by the kind-quantized `180/π`.
    pub fn degrees_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        Ok(self.degrees_inner(&x.into_interval(self)))
    }

    pub(crate) fn radians_inner(self, x: &FpInterval) -> FpInterval {
        let factor = FpInterval::point(self, self.quantize(PI / 180.0));
        self.multiplication_inner(x, &factor)
    }

    /// Acceptance interval for `radians(x)`, inherited from
    /// multiplication by the kind-quantized `π/180`.
    pub fn radians_interval(self, x: impl IntoInterval) -> Result<FpInterval, OpError> {
        Ok(self.radians_inner(&x.into_interval(self)))
    }
}
