//! The operation-interval library.
//!
//! One interval-valued implementation per language operation, expressed as
//! methods on [`FpKind`]: `FpKind::F32.addition_interval(1.0, 2.0)` returns
//! the interval of results a conforming implementation may produce. Every
//! operation is an operation descriptor at heart: an `impl` computing a
//! raw interval from flushed/rounded point inputs, an optional `domain`
//! outside which the result is the "any" interval, and an optional
//! `extrema` step that clamps inputs to a discontinuity contained in
//! them, all run through the shared round-and-flush machinery in this
//! module.
//!
//! Error taxonomy: domain violations are values (the "any" interval), an
//! operation a precision does not implement is a loud
//! [`OpError::Unimplemented`], and malformed intervals or NaN reaching the
//! rounding primitives are panics.

mod arith;
mod blend;
mod exp_log;
mod matrix;
mod trig;
mod vector;

use crate::interval::{span_intervals, FpInterval};
use crate::kind::FpKind;

/// Errors from the operation library and case generation.
///
/// ```
/// use fpbounds::{FpKind, OpError};
///
/// let err = FpKind::Abstract.sin_interval(0.5).unwrap_err();
/// assert_eq!(err, OpError::Unimplemented { op: "sin", kind: FpKind::Abstract });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpError {
    /// The operation has no accuracy definition at this precision.
    Unimplemented { op: &'static str, kind: FpKind },
}

impl core::fmt::Display for OpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OpError::Unimplemented { op, kind } => {
                write!(f, "operation `{op}` is not implemented for {kind}")
            }
        }
    }
}

impl std::error::Error for OpError {}

impl FpKind {
    /// The error-bounded transcendental family has no accuracy definition
    /// in the abstract (f64-backed) domain.
    pub(crate) fn require_transcendental(self, op: &'static str) -> Result<(), OpError> {
        match self {
            FpKind::Abstract => Err(OpError::Unimplemented { op, kind: self }),
            _ => Ok(()),
        }
    }

    pub(crate) fn require_f32(self, op: &'static str) -> Result<(), OpError> {
        match self {
            FpKind::F32 => Ok(()),
            _ => Err(OpError::Unimplemented { op, kind: self }),
        }
    }
}

// ---------------------------------------------------------------------------
// Error-model interval constructors
// ---------------------------------------------------------------------------

impl FpKind {
    /// Acceptance interval for a correctly-rounded operation producing the
    /// exact value `n`: the span of `n`'s representable bracket plus the
    /// flush-to-zero alternates of any subnormal member.
    ///
    /// An exact result of NaN (e.g. from an intermediate `inf - inf` in a
    /// composed operation) has no constrained accuracy and yields the "any"
    /// interval.
    pub fn correctly_rounded_interval(self, n: f64) -> FpInterval {
        if n.is_nan() {
            return FpInterval::any(self);
        }
        let values = self.add_flushed_if_needed(&self.correctly_rounded(n));
        let begin = values.iter().copied().fold(f64::INFINITY, f64::min);
        let end = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        FpInterval::new(self, begin, end)
    }

    /// Acceptance interval for a result within an absolute error of the
    /// exact value `n`.
    ///
    /// # Panics
    ///
    /// Panics if `error` is negative or non-finite.
    pub fn abs_error_interval(self, n: f64, error: f64) -> FpInterval {
        assert!(
            error.is_finite() && error >= 0.0,
            "abs_error_interval: error bound {error:e} must be finite and non-negative"
        );
        if n.is_nan() || !self.is_finite_value(n) {
            return FpInterval::any(self);
        }
        if error == 0.0 {
            return self.correctly_rounded_interval(n);
        }
        self.correctly_rounded_interval(n - error)
            .span(&self.correctly_rounded_interval(n + error))
    }

    /// Acceptance interval for a result within `num_ulps` units in the last
    /// place of the exact value `n`. The ULP magnitude is the larger of the
    /// flushing and non-flushing views, so both implementation styles are
    /// accepted.
    ///
    /// # Panics
    ///
    /// Panics if `num_ulps` is negative or non-finite.
    pub fn ulp_interval(self, n: f64, num_ulps: f64) -> FpInterval {
        assert!(
            num_ulps.is_finite() && num_ulps >= 0.0,
            "ulp_interval: ULP count {num_ulps} must be finite and non-negative"
        );
        if n.is_nan() || !self.is_finite_value(n) {
            return FpInterval::any(self);
        }
        let ulp = f64::max(self.one_ulp(n, true), self.one_ulp(n, false));
        self.correctly_rounded_interval(n - num_ulps * ulp)
            .span(&self.correctly_rounded_interval(n + num_ulps * ulp))
    }
}

// ---------------------------------------------------------------------------
// Round-and-flush runners
// ---------------------------------------------------------------------------

/// True if `x` lies entirely within one of the domain's intervals.
pub(crate) fn domain_contains(domain: &[FpInterval], x: &FpInterval) -> bool {
    domain.iter().any(|d| d.contains_interval(x))
}

/// Acceptance interval for applying `imp` to the single point input `n`:
/// every representable rounding of `n`, plus flush-to-zero alternates,
/// is fed through `imp` and the results are spanned.
///
/// # Panics
///
/// Panics if `n` is NaN; inputs are validated before they reach here.
fn round_and_flush_1(kind: FpKind, n: f64, imp: &dyn Fn(f64) -> FpInterval) -> FpInterval {
    assert!(!n.is_nan(), "round_and_flush: NaN input");
    let inputs = kind.add_flushed_if_needed(&kind.correctly_rounded(n));
    let results: Vec<FpInterval> = inputs.iter().map(|&v| imp(v)).collect();
    span_intervals(&results)
}

fn round_and_flush_2(
    kind: FpKind,
    x: f64,
    y: f64,
    imp: &dyn Fn(f64, f64) -> FpInterval,
) -> FpInterval {
    assert!(!x.is_nan() && !y.is_nan(), "round_and_flush: NaN input");
    let xs = kind.add_flushed_if_needed(&kind.correctly_rounded(x));
    let ys = kind.add_flushed_if_needed(&kind.correctly_rounded(y));
    let mut results = Vec::with_capacity(xs.len() * ys.len());
    for &a in &xs {
        for &b in &ys {
            results.push(imp(a, b));
        }
    }
    span_intervals(&results)
}

/// Run a unary scalar operation descriptor over an input interval:
/// optional extrema clamp, finiteness and domain guards, then the span of
/// the round-and-flush evaluation at each endpoint.
pub(crate) fn run_scalar_to_interval(
    kind: FpKind,
    x: &FpInterval,
    domain: Option<&[FpInterval]>,
    imp: &dyn Fn(f64) -> FpInterval,
) -> FpInterval {
    if !x.is_finite() {
        return FpInterval::any(kind);
    }
    if let Some(d) = domain {
        if !domain_contains(d, x) {
            return FpInterval::any(kind);
        }
    }
    let results: Vec<FpInterval> = x
        .bounds()
        .iter()
        .map(|&b| round_and_flush_1(kind, b, imp))
        .collect();
    span_intervals(&results)
}

/// Extrema adjustment for a binary operation: narrows/clamps the input
/// intervals to a discontinuity contained within them, so the endpoint
/// sampling below stays tight (or degrades to "any" when accuracy is
/// genuinely undefined across the discontinuity).
pub(crate) type PairExtrema = fn(FpKind, &FpInterval, &FpInterval) -> (FpInterval, FpInterval);

/// Run a binary scalar operation descriptor over two input intervals.
pub(crate) fn run_scalar_pair_to_interval(
    kind: FpKind,
    x: &FpInterval,
    y: &FpInterval,
    domain: Option<(&[FpInterval], &[FpInterval])>,
    extrema: Option<PairExtrema>,
    imp: &dyn Fn(f64, f64) -> FpInterval,
) -> FpInterval {
    let (x, y) = match extrema {
        Some(adjust) => adjust(kind, x, y),
        None => (*x, *y),
    };
    if !x.is_finite() || !y.is_finite() {
        return FpInterval::any(kind);
    }
    if let Some((dx, dy)) = domain {
        if !domain_contains(dx, &x) || !domain_contains(dy, &y) {
            return FpInterval::any(kind);
        }
    }
    let mut results = Vec::new();
    for &a in &x.bounds() {
        for &b in &y.bounds() {
            results.push(round_and_flush_2(kind, a, b, imp));
        }
    }
    span_intervals(&results)
}

// ---------------------------------------------------------------------------
// Shared combinatorics
// ---------------------------------------------------------------------------

/// All orderings of `0..n`. Floating-point addition is not associative, so
/// multi-term sums (dot, determinant) must span every evaluation order.
pub(crate) fn permutations(n: usize) -> Vec<Vec<usize>> {
    fn recurse(prefix: &mut Vec<usize>, remaining: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if remaining.is_empty() {
            out.push(prefix.clone());
            return;
        }
        for i in 0..remaining.len() {
            let item = remaining.remove(i);
            prefix.push(item);
            recurse(prefix, remaining, out);
            prefix.pop();
            remaining.insert(i, item);
        }
    }
    let mut out = Vec::new();
    recurse(&mut Vec::new(), &mut (0..n).collect(), &mut out);
    out
}

/// Span of the left-folded sum of `terms` over every addition order.
pub(crate) fn sum_all_orders(kind: FpKind, terms: &[FpInterval]) -> FpInterval {
    assert!(!terms.is_empty(), "sum_all_orders: no terms");
    if terms.len() == 1 {
        return terms[0];
    }
    let orders = permutations(terms.len());
    let mut results = Vec::with_capacity(orders.len());
    for order in &orders {
        let mut acc = terms[order[0]];
        for &i in &order[1..] {
            acc = kind.addition_inner(&acc, &terms[i]);
        }
        results.push(acc);
    }
    span_intervals(&results)
}
