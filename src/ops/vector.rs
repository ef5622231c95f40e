//! Vector operations, expressed component-wise in terms of the scalar
//! primitives. Multi-term sums (dot) span every addition order, since
//! floating-point addition is not associative.

use crate::interval::{FpInterval, FpVector};
use crate::kind::FpKind;

use super::{sum_all_orders, OpError};

/// Lift raw input components to point intervals; the scalar machinery
/// performs the rounding/flushing expansion per operation.
pub(crate) fn lift(kind: FpKind, v: &[f64]) -> Vec<FpInterval> {
    v.iter().map(|&n| FpInterval::new(kind, n, n)).collect()
}

fn assert_vector_len(n: usize) {
    assert!((2..=4).contains(&n), "vector length {n} outside 2..=4");
}

fn assert_same_len(x: &[f64], y: &[f64]) {
    assert!(
        x.len() == y.len(),
        "mismatched vector lengths {} and {}",
        x.len(),
        y.len()
    );
}

impl FpKind {
    pub(crate) fn dot_inner(self, x: &[FpInterval], y: &[FpInterval]) -> FpInterval {
        let terms: Vec<FpInterval> = x
            .iter()
            .zip(y)
            .map(|(a, b)| self.multiplication_inner(a, b))
            .collect();
        sum_all_orders(self, &terms)
    }

    /// Acceptance interval for `dot(x, y)`, spanning every addition order
    /// of the component products.
    pub fn dot_interval(self, x: &[f64], y: &[f64]) -> Result<FpInterval, OpError> {
        assert_vector_len(x.len());
        assert_same_len(x, y);
        Ok(self.dot_inner(&lift(self, x), &lift(self, y)))
    }

    pub(crate) fn cross_inner(self, x: &[FpInterval], y: &[FpInterval]) -> FpVector {
        let sub = |a, b| self.subtraction_inner(&a, &b);
        let mul = |a: &FpInterval, b: &FpInterval| self.multiplication_inner(a, b);
        FpVector::new(vec![
            sub(mul(&x[1], &y[2]), mul(&x[2], &y[1])),
            sub(mul(&x[2], &y[0]), mul(&x[0], &y[2])),
            sub(mul(&x[0], &y[1]), mul(&x[1], &y[0])),
        ])
    }

    /// Acceptance intervals for `cross(x, y)` of 3-element vectors.
    pub fn cross_interval(self, x: &[f64], y: &[f64]) -> Result<FpVector, OpError> {
        assert!(x.len() == 3 && y.len() == 3, "cross requires 3-element vectors");
        Ok(self.cross_inner(&lift(self, x), &lift(self, y)))
    }

    pub(crate) fn length_inner(self, x: &[FpInterval]) -> FpInterval {
        self.sqrt_inner(&self.dot_inner(x, x))
    }

    /// Acceptance interval for `length(x)`, inherited from
    /// `sqrt(dot(x, x))`.
    pub fn length_interval(self, x: &[f64]) -> Result<FpInterval, OpError> {
        self.require_transcendental("length")?;
        assert_vector_len(x.len());
        Ok(self.length_inner(&lift(self, x)))
    }

    /// Acceptance interval for `distance(x, y)`, inherited from
    /// `length(x - y)`.
    pub fn distance_interval(self, x: &[f64], y: &[f64]) -> Result<FpInterval, OpError> {
        self.require_transcendental("distance")?;
        assert_vector_len(x.len());
        assert_same_len(x, y);
        let xs = lift(self, x);
        let ys = lift(self, y);
        let diff: Vec<FpInterval> = xs
            .iter()
            .zip(&ys)
            .map(|(a, b)| self.subtraction_inner(a, b))
            .collect();
        Ok(self.length_inner(&diff))
    }

    /// Acceptance intervals for `normalize(x) = x / length(x)`.
    pub fn normalize_interval(self, x: &[f64]) -> Result<FpVector, OpError> {
        self.require_transcendental("normalize")?;
        assert_vector_len(x.len());
        let xs = lift(self, x);
        let len = self.length_inner(&xs);
        Ok(FpVector::new(
            xs.iter().map(|c| self.division_inner(c, &len)).collect(),
        ))
    }

    /// Acceptance intervals for `reflect(e1, e2) = e1 - 2 * dot(e2, e1) * e2`.
    pub fn reflect_interval(self, e1: &[f64], e2: &[f64]) -> Result<FpVector, OpError> {
        assert_vector_len(e1.len());
        assert_same_len(e1, e2);
        let i = lift(self, e1);
        let s = lift(self, e2);
        let d = self.dot_inner(&s, &i);
        let two_d = self.multiplication_inner(&FpInterval::point(self, 2.0), &d);
        Ok(FpVector::new(
            i.iter()
                .zip(&s)
                .map(|(ic, sc)| {
                    self.subtraction_inner(ic, &self.multiplication_inner(&two_d, sc))
                })
                .collect(),
        ))
    }

    /// Acceptance intervals for `refract(i, s, r)`.
    ///
    /// `k = 1 - r²(1 - dot(s, i)²)`; a strictly negative `k` yields the
    /// zero vector, and a `k` interval straddling zero means the branch
    /// taken is implementation-dependent, so every component is "any".
    pub fn refract_interval(self, i: &[f64], s: &[f64], r: f64) -> Result<FpVector, OpError> {
        self.require_transcendental("refract")?;
        assert_vector_len(i.len());
        assert_same_len(i, s);
        let iv = lift(self, i);
        let sv = lift(self, s);
        let rv = FpInterval::new(self, r, r);

        let d = self.dot_inner(&sv, &iv);
        let d2 = self.multiplication_inner(&d, &d);
        let one_minus_d2 =
            self.subtraction_inner(&FpInterval::point(self, 1.0), &d2);
        let r2 = self.multiplication_inner(&rv, &rv);
        let k = self.subtraction_inner(
            &FpInterval::point(self, 1.0),
            &self.multiplication_inner(&r2, &one_minus_d2),
        );

        if !k.is_finite() || k.contains_value(0.0) {
            return Ok(FpVector::any(self, i.len()));
        }
        if k.end() < 0.0 {
            return Ok(FpVector::new(vec![
                self.correctly_rounded_interval(0.0);
                i.len()
            ]));
        }

        // r * i - (r * dot(s, i) + sqrt(k)) * s
        let sqrt_k = self.sqrt_inner(&k);
        let t = self.addition_inner(&self.multiplication_inner(&rv, &d), &sqrt_k);
        Ok(FpVector::new(
            iv.iter()
                .zip(&sv)
                .map(|(ic, sc)| {
                    self.subtraction_inner(
                        &self.multiplication_inner(&rv, ic),
                        &self.multiplication_inner(&t, sc),
                    )
                })
                .collect(),
        ))
    }

    /// Candidate acceptance intervals for `faceForward(x, y, z)`: `x` when
    /// `dot(z, y) < 0`, `-x` otherwise. When the dot interval straddles
    /// zero both candidates are legal and the expectation is "any of"
    /// them.
    pub fn face_forward_intervals(
        self,
        x: &[f64],
        y: &[f64],
        z: &[f64],
    ) -> Result<Vec<FpVector>, OpError> {
        assert_vector_len(x.len());
        assert_same_len(x, y);
        assert_same_len(x, z);
        let xs = lift(self, x);
        let d = self.dot_inner(&lift(self, z), &lift(self, y));

        let positive: Vec<FpInterval> = xs
            .iter()
            .map(|c| self.correctly_rounded_interval(c.begin()))
            .collect();
        let negated: Vec<FpInterval> = xs.iter().map(|c| self.negation_inner(c)).collect();

        let mut candidates = Vec::with_capacity(2);
        if !d.is_finite() || d.contains_value(0.0) {
            candidates.push(FpVector::new(positive));
            candidates.push(FpVector::new(negated));
        } else if d.end() < 0.0 {
            candidates.push(FpVector::new(positive));
        } else {
            candidates.push(FpVector::new(negated));
        }
        Ok(candidates)
    }

    /// Acceptance intervals for component-wise `v * s`.
    pub fn vector_scalar_multiplication_interval(
        self,
        v: &[f64],
        s: f64,
    ) -> Result<FpVector, OpError> {
        assert_vector_len(v.len());
        let sv = FpInterval::new(self, s, s);
        Ok(FpVector::new(
            lift(self, v)
                .iter()
                .map(|c| self.multiplication_inner(c, &sv))
                .collect(),
        ))
    }

    /// Acceptance intervals for component-wise `s * v`.
    pub fn scalar_vector_multiplication_interval(
        self,
        s: f64,
        v: &[f64],
    ) -> Result<FpVector, OpError> {
        self.vector_scalar_multiplication_interval(v, s)
    }
}
