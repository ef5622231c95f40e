//! Selection and blending operations: clamp, mix, step, smoothstep, fma,
//! ldexp. Where the specification admits more than one evaluation
//! strategy (clamp, mix), each strategy gets its own interval and case
//! generation wraps them in an "any of" expectation.

use crate::interval::{FpInterval, IntoInterval};
use crate::kind::FpKind;

use super::{run_scalar_pair_to_interval, OpError};

impl FpKind {
    pub(crate) fn clamp_min_max_inner(
        self,
        x: &FpInterval,
        low: &FpInterval,
        high: &FpInterval,
    ) -> FpInterval {
        // min(max(x, low), high), inherited
        let m = self.max_inner(x, low);
        self.min_inner(&m, high)
    }

    /// Acceptance interval for `clamp(x, low, high)` evaluated as
    /// `min(max(x, low), high)`.
    pub fn clamp_min_max_interval(
        self,
        x: impl IntoInterval,
        low: impl IntoInterval,
        high: impl IntoInterval,
    ) -> Result<FpInterval, OpError> {
        Ok(self.clamp_min_max_inner(
            &x.into_interval(self),
            &low.into_interval(self),
            &high.into_interval(self),
        ))
    }

    pub(crate) fn clamp_median_inner(
        self,
        x: &FpInterval,
        low: &FpInterval,
        high: &FpInterval,
    ) -> FpInterval {
        // median(x, low, high): with the median computed exactly on the
        // sampled points, the result is correctly rounded
        let imp = |a: f64, b: f64, c: f64| {
            let mut v = [a, b, c];
            v.sort_by(f64::total_cmp);
            self.correctly_rounded_interval(v[1])
        };
        run_scalar_triple(self, x, low, high, &imp)
    }

    /// Acceptance interval for `clamp(x, low, high)` evaluated as the
    /// median of the three values.
    pub fn clamp_median_interval(
        self,
        x: impl IntoInterval,
        low: impl IntoInterval,
        high: impl IntoInterval,
    ) -> Result<FpInterval, OpError> {
        Ok(self.clamp_median_inner(
            &x.into_interval(self),
            &low.into_interval(self),
            &high.into_interval(self),
        ))
    }

    pub(crate) fn step_inner(self, edge: &FpInterval, x: &FpInterval) -> FpInterval {
        // 0.0 for x < edge, 1.0 otherwise; when the rounded/flushed inputs
        // disagree on the comparison the span widens to [0, 1]
        run_scalar_pair_to_interval(self, edge, x, None, None, &|e, a| {
            self.correctly_rounded_interval(if a < e { 0.0 } else { 1.0 })
        })
    }

    /// Acceptance interval for `step(edge, x)`: exactly 0 or 1, widening
    /// to `[0, 1]` when the comparison is ambiguous under rounding.
    pub fn step_interval(
        self,
        edge: impl IntoInterval,
        x: impl IntoInterval,
    ) -> Result<FpInterval, OpError> {
        Ok(self.step_inner(&edge.into_interval(self), &x.into_interval(self)))
    }

    pub(crate) fn mix_precise_inner(
        self,
        x: &FpInterval,
        y: &FpInterval,
        z: &FpInterval,
    ) -> FpInterval {
        // x * (1 - z) + y * z
        let one_minus = self.subtraction_inner(&FpInterval::point(self, 1.0), z);
        let t1 = self.multiplication_inner(x, &one_minus);
        let t2 = self.multiplication_inner(y, z);
        self.addition_inner(&t1, &t2)
    }

    /// Acceptance interval for `mix(x, y, z)` evaluated as
    /// `x * (1 - z) + y * z`.
    pub fn mix_precise_interval(
        self,
        x: impl IntoInterval,
        y: impl IntoInterval,
        z: impl IntoInterval,
    ) -> Result<FpInterval, OpError> {
        Ok(self.mix_precise_inner(
            &x.into_interval(self),
            &y.into_interval(self),
            &z.into_interval(self),
        ))
    }

    pub(crate) fn mix_imprecise_inner(
        self,
        x: &FpInterval,
        y: &FpInterval,
        z: &FpInterval,
    ) -> FpInterval {
        // x + z * (y - x)
        let d = self.subtraction_inner(y, x);
        let m = self.multiplication_inner(z, &d);
        self.addition_inner(x, &m)
    }

    /// Acceptance interval for `mix(x, y, z)` evaluated as
    /// `x + z * (y - x)`.
    pub fn mix_imprecise_interval(
        self,
        x: impl IntoInterval,
        y: impl IntoInterval,
        z: impl IntoInterval,
    ) -> Result<FpInterval, OpError> {
        Ok(self.mix_imprecise_inner(
            &x.into_interval(self),
            &y.into_interval(self),
            &z.into_interval(self),
        ))
    }

    pub(crate) fn smoothstep_inner(
        self,
        low: &FpInterval,
        high: &FpInterval,
        x: &FpInterval,
    ) -> FpInterval {
        // t = clamp((x - low) / (high - low), 0, 1); t * t * (3 - 2t).
        // The division carries the discontinuity handling for low == high.
        let num = self.subtraction_inner(x, low);
        let den = self.subtraction_inner(high, low);
        let q = self.division_inner(&num, &den);
        let t = self.clamp_min_max_inner(
            &q,
            &FpInterval::point(self, 0.0),
            &FpInterval::point(self, 1.0),
        );
        let t2 = self.multiplication_inner(&t, &t);
        let two_t = self.multiplication_inner(&FpInterval::point(self, 2.0), &t);
        let poly = self.subtraction_inner(&FpInterval::point(self, 3.0), &two_t);
        self.multiplication_inner(&t2, &poly)
    }

    /// Acceptance interval for `smoothstep(low, high, x)`, inherited from
    /// its Hermite polynomial expansion.
    pub fn smoothstep_interval(
        self,
        low: impl IntoInterval,
        high: impl IntoInterval,
        x: impl IntoInterval,
    ) -> Result<FpInterval, OpError> {
        Ok(self.smoothstep_inner(
            &low.into_interval(self),
            &high.into_interval(self),
            &x.into_interval(self),
        ))
    }

    pub(crate) fn fma_inner(self, x: &FpInterval, y: &FpInterval, z: &FpInterval) -> FpInterval {
        let m = self.multiplication_inner(x, y);
        self.addition_inner(&m, z)
    }

    /// Acceptance interval for `fma(x, y, z)`, inherited from
    /// `x * y + z`.
    pub fn fma_interval(
        self,
        x: impl IntoInterval,
        y: impl IntoInterval,
        z: impl IntoInterval,
    ) -> Result<FpInterval, OpError> {
        Ok(self.fma_inner(
            &x.into_interval(self),
            &y.into_interval(self),
            &z.into_interval(self),
        ))
    }

    /// Acceptance interval for `ldexp(x, k) = x * 2^k` with an integral
    /// exponent. Correctly rounded; overflow yields the "any" interval.
    pub fn ldexp_interval(self, x: impl IntoInterval, k: i32) -> Result<FpInterval, OpError> {
        let x = x.into_interval(self);
        Ok(super::run_scalar_to_interval(self, &x, None, &|a| {
            self.correctly_rounded_interval(a * 2.0f64.powi(k))
        }))
    }
}

/// Round-and-flush evaluation of a ternary point implementation over the
/// Cartesian product of the three inputs' endpoint expansions.
fn run_scalar_triple(
    kind: FpKind,
    x: &FpInterval,
    y: &FpInterval,
    z: &FpInterval,
    imp: &dyn Fn(f64, f64, f64) -> FpInterval,
) -> FpInterval {
    if !x.is_finite() || !y.is_finite() || !z.is_finite() {
        return FpInterval::any(kind);
    }
    let mut results = Vec::new();
    for &a in &x.bounds() {
        for &b in &y.bounds() {
            for &c in &z.bounds() {
                let xs = kind.add_flushed_if_needed(&kind.correctly_rounded(a));
                let ys = kind.add_flushed_if_needed(&kind.correctly_rounded(b));
                let zs = kind.add_flushed_if_needed(&kind.correctly_rounded(c));
                for &va in &xs {
                    for &vb in &ys {
                        for &vc in &zs {
                            results.push(imp(va, vb, vc));
                        }
                    }
                }
            }
        }
    }
    crate::interval::span_intervals(&results)
}
