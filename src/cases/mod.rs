//! Case generation: from raw input ranges and operation-interval
//! functions to `{input, expected}` test cases.
//!
//! Every generator quantizes its inputs to the target precision (mirroring
//! shader constant-folding), evaluates one or more operation
//! implementations, and wraps the resulting expectations in a comparator:
//! a plain interval for a single implementation, "any of" when the
//! specification admits several evaluation strategies. With
//! [`CaseFilter::Finite`] a case whose expectation is non-finite is
//! omitted entirely, for compile-time-evaluated test variants where
//! overflow is illegal.
//!
//! Homogeneous multi-input generators take the Cartesian product of their
//! ranges; heterogeneous ones (scalar x vector, matrix x scalar, ...)
//! iterate nested loops, since the two input kinds are not drawn from one
//! pool.
//!
//! Full-precision sweeps are expensive, so generated arrays are meant to
//! be memoized per suite run in a [`CaseCache`] keyed by operation name,
//! precision, and filter.

mod tests;

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::compare::{Comparator, Expectation, SerializedComparator};
use crate::interval::{FpInterval, FpMatrix, FpVector};
use crate::kind::FpKind;
use crate::ops::OpError;
use crate::value::{SerializedValue, Value};

/// One generated test case: concrete precision-quantized inputs and the
/// expectation to judge the runtime result against.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub input: Vec<Value>,
    pub expected: Comparator,
}

impl Case {
    pub fn to_serialized(&self) -> SerializedCase {
        SerializedCase {
            input: self.input.iter().map(|v| v.to_serialized()).collect(),
            expected: self.expected.to_serialized(),
        }
    }
}

/// Plain-data mirror of [`Case`]; byte-for-byte reloadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedCase {
    pub input: Vec<SerializedValue>,
    pub expected: SerializedComparator,
}

impl SerializedCase {
    pub fn to_case(&self) -> Case {
        Case {
            input: self.input.iter().map(|v| v.to_value()).collect(),
            expected: self.expected.to_comparator(),
        }
    }
}

/// Whether to keep every generated case or only those with finite
/// expectations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseFilter {
    All,
    /// Drop cases whose expectation (any component, any strategy) is
    /// non-finite; used for const-eval variants where overflow and
    /// undefined accuracy are specification-illegal.
    Finite,
}

// ---------------------------------------------------------------------------
// Operation function signatures accepted by the generators
// ---------------------------------------------------------------------------

pub type ScalarOp = fn(FpKind, f64) -> Result<FpInterval, OpError>;
pub type ScalarPairOp = fn(FpKind, f64, f64) -> Result<FpInterval, OpError>;
pub type ScalarTripleOp = fn(FpKind, f64, f64, f64) -> Result<FpInterval, OpError>;
pub type VectorOp = fn(FpKind, &[f64]) -> Result<FpInterval, OpError>;
pub type VectorToVectorOp = fn(FpKind, &[f64]) -> Result<FpVector, OpError>;
pub type VectorPairOp = fn(FpKind, &[f64], &[f64]) -> Result<FpInterval, OpError>;
pub type VectorPairToVectorOp = fn(FpKind, &[f64], &[f64]) -> Result<FpVector, OpError>;
pub type ScalarVectorOp = fn(FpKind, f64, &[f64]) -> Result<FpVector, OpError>;
pub type VectorScalarOp = fn(FpKind, &[f64], f64) -> Result<FpVector, OpError>;
pub type MatrixOp = fn(FpKind, &[Vec<f64>]) -> Result<FpInterval, OpError>;
pub type MatrixToMatrixOp = fn(FpKind, &[Vec<f64>]) -> Result<FpMatrix, OpError>;
pub type MatrixPairOp = fn(FpKind, &[Vec<f64>], &[Vec<f64>]) -> Result<FpMatrix, OpError>;
pub type MatrixScalarOp = fn(FpKind, &[Vec<f64>], f64) -> Result<FpMatrix, OpError>;
pub type ScalarMatrixOp = fn(FpKind, f64, &[Vec<f64>]) -> Result<FpMatrix, OpError>;
pub type MatrixVectorOp = fn(FpKind, &[Vec<f64>], &[f64]) -> Result<FpVector, OpError>;
pub type VectorMatrixOp = fn(FpKind, &[f64], &[Vec<f64>]) -> Result<FpVector, OpError>;

// ---------------------------------------------------------------------------
// Case assembly
// ---------------------------------------------------------------------------

fn expectation_is_finite(e: &Expectation) -> bool {
    match e {
        Expectation::Scalar(i) => i.is_finite(),
        Expectation::Vector(v) => v.is_finite(),
        Expectation::Matrix(m) => m.is_finite(),
    }
}

/// Wrap per-strategy expectations into the case comparator: a bare
/// interval for one strategy, "any of" for several. Returns `None` when
/// the finite filter discards the case.
fn make_case(
    input: Vec<Value>,
    mut expectations: Vec<Expectation>,
    filter: CaseFilter,
) -> Option<Case> {
    assert!(!expectations.is_empty(), "case with no expectations");
    if filter == CaseFilter::Finite && !expectations.iter().all(expectation_is_finite) {
        return None;
    }
    let expected = if expectations.len() == 1 {
        Comparator::Interval(expectations.remove(0))
    } else {
        Comparator::AnyOf(
            expectations
                .into_iter()
                .map(Comparator::Interval)
                .collect(),
        )
    };
    Some(Case { input, expected })
}

fn quantize_vector(kind: FpKind, v: &[f64]) -> Vec<f64> {
    v.iter().map(|&n| kind.quantize(n)).collect()
}

fn quantize_matrix(kind: FpKind, m: &[Vec<f64>]) -> Vec<Vec<f64>> {
    m.iter().map(|c| quantize_vector(kind, c)).collect()
}

// ---------------------------------------------------------------------------
// Scalar-shaped generators
// ---------------------------------------------------------------------------

/// Cases for unary scalar operations over `values`.
///
/// ```
/// use fpbounds::{cases, CaseFilter, FpKind};
///
/// let cases = cases::generate_scalar_cases(
///     FpKind::F32,
///     &[-5.0, 0.0],
///     CaseFilter::Finite,
///     &[|k, x| k.sign_interval(x)],
/// )
/// .unwrap();
/// assert_eq!(cases.len(), 2);
/// ```
pub fn generate_scalar_cases(
    kind: FpKind,
    values: &[f64],
    filter: CaseFilter,
    ops: &[ScalarOp],
) -> Result<Vec<Case>, OpError> {
    let mut out = Vec::new();
    for &x in values {
        let qx = kind.quantize(x);
        let mut expectations = Vec::with_capacity(ops.len());
        for op in ops {
            expectations.push(Expectation::Scalar(op(kind, qx)?));
        }
        if let Some(case) = make_case(vec![Value::scalar(kind, qx)], expectations, filter) {
            out.push(case);
        }
    }
    Ok(out)
}

/// Cases for binary scalar operations over the Cartesian product
/// `xs` x `ys`.
pub fn generate_scalar_pair_cases(
    kind: FpKind,
    xs: &[f64],
    ys: &[f64],
    filter: CaseFilter,
    ops: &[ScalarPairOp],
) -> Result<Vec<Case>, OpError> {
    let mut out = Vec::new();
    for &x in xs {
        let qx = kind.quantize(x);
        for &y in ys {
            let qy = kind.quantize(y);
            let mut expectations = Vec::with_capacity(ops.len());
            for op in ops {
                expectations.push(Expectation::Scalar(op(kind, qx, qy)?));
            }
            let input = vec![Value::scalar(kind, qx), Value::scalar(kind, qy)];
            if let Some(case) = make_case(input, expectations, filter) {
                out.push(case);
            }
        }
    }
    Ok(out)
}

/// Cases for ternary scalar operations over `xs` x `ys` x `zs`.
pub fn generate_scalar_triple_cases(
    kind: FpKind,
    xs: &[f64],
    ys: &[f64],
    zs: &[f64],
    filter: CaseFilter,
    ops: &[ScalarTripleOp],
) -> Result<Vec<Case>, OpError> {
    let mut out = Vec::new();
    for &x in xs {
        let qx = kind.quantize(x);
        for &y in ys {
            let qy = kind.quantize(y);
            for &z in zs {
                let qz = kind.quantize(z);
                let mut expectations = Vec::with_capacity(ops.len());
                for op in ops {
                    expectations.push(Expectation::Scalar(op(kind, qx, qy, qz)?));
                }
                let input = vec![
                    Value::scalar(kind, qx),
                    Value::scalar(kind, qy),
                    Value::scalar(kind, qz),
                ];
                if let Some(case) = make_case(input, expectations, filter) {
                    out.push(case);
                }
            }
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Vector-shaped generators
// ---------------------------------------------------------------------------

/// Cases for vector-to-scalar operations (length, determinant-like
/// reductions) over `vectors`.
pub fn generate_vector_cases(
    kind: FpKind,
    vectors: &[Vec<f64>],
    filter: CaseFilter,
    ops: &[VectorOp],
) -> Result<Vec<Case>, OpError> {
    let mut out = Vec::new();
    for v in vectors {
        let qv = quantize_vector(kind, v);
        let mut expectations = Vec::with_capacity(ops.len());
        for op in ops {
            expectations.push(Expectation::Scalar(op(kind, &qv)?));
        }
        if let Some(case) = make_case(vec![Value::vector(kind, &qv)], expectations, filter) {
            out.push(case);
        }
    }
    Ok(out)
}

/// Cases for vector-to-vector operations (normalize) over `vectors`.
pub fn generate_vector_to_vector_cases(
    kind: FpKind,
    vectors: &[Vec<f64>],
    filter: CaseFilter,
    ops: &[VectorToVectorOp],
) -> Result<Vec<Case>, OpError> {
    let mut out = Vec::new();
    for v in vectors {
        let qv = quantize_vector(kind, v);
        let mut expectations = Vec::with_capacity(ops.len());
        for op in ops {
            expectations.push(Expectation::Vector(op(kind, &qv)?));
        }
        if let Some(case) = make_case(vec![Value::vector(kind, &qv)], expectations, filter) {
            out.push(case);
        }
    }
    Ok(out)
}

/// Cases for vector-pair-to-scalar operations (dot, distance) over the
/// Cartesian product of the ranges.
pub fn generate_vector_pair_cases(
    kind: FpKind,
    xs: &[Vec<f64>],
    ys: &[Vec<f64>],
    filter: CaseFilter,
    ops: &[VectorPairOp],
) -> Result<Vec<Case>, OpError> {
    let mut out = Vec::new();
    for x in xs {
        let qx = quantize_vector(kind, x);
        for y in ys {
            let qy = quantize_vector(kind, y);
            let mut expectations = Vec::with_capacity(ops.len());
            for op in ops {
                expectations.push(Expectation::Scalar(op(kind, &qx, &qy)?));
            }
            let input = vec![Value::vector(kind, &qx), Value::vector(kind, &qy)];
            if let Some(case) = make_case(input, expectations, filter) {
                out.push(case);
            }
        }
    }
    Ok(out)
}

/// Cases for vector-pair-to-vector operations (cross, reflect).
pub fn generate_vector_pair_to_vector_cases(
    kind: FpKind,
    xs: &[Vec<f64>],
    ys: &[Vec<f64>],
    filter: CaseFilter,
    ops: &[VectorPairToVectorOp],
) -> Result<Vec<Case>, OpError> {
    let mut out = Vec::new();
    for x in xs {
        let qx = quantize_vector(kind, x);
        for y in ys {
            let qy = quantize_vector(kind, y);
            let mut expectations = Vec::with_capacity(ops.len());
            for op in ops {
                expectations.push(Expectation::Vector(op(kind, &qx, &qy)?));
            }
            let input = vec![Value::vector(kind, &qx), Value::vector(kind, &qy)];
            if let Some(case) = make_case(input, expectations, filter) {
                out.push(case);
            }
        }
    }
    Ok(out)
}

/// Cases for scalar x vector operations; nested loops over the two
/// heterogeneous ranges.
pub fn generate_scalar_vector_cases(
    kind: FpKind,
    scalars: &[f64],
    vectors: &[Vec<f64>],
    filter: CaseFilter,
    ops: &[ScalarVectorOp],
) -> Result<Vec<Case>, OpError> {
    let mut out = Vec::new();
    for &s in scalars {
        let qs = kind.quantize(s);
        for v in vectors {
            let qv = quantize_vector(kind, v);
            let mut expectations = Vec::with_capacity(ops.len());
            for op in ops {
                expectations.push(Expectation::Vector(op(kind, qs, &qv)?));
            }
            let input = vec![Value::scalar(kind, qs), Value::vector(kind, &qv)];
            if let Some(case) = make_case(input, expectations, filter) {
                out.push(case);
            }
        }
    }
    Ok(out)
}

/// Cases for vector x scalar operations.
pub fn generate_vector_scalar_cases(
    kind: FpKind,
    vectors: &[Vec<f64>],
    scalars: &[f64],
    filter: CaseFilter,
    ops: &[VectorScalarOp],
) -> Result<Vec<Case>, OpError> {
    let mut out = Vec::new();
    for v in vectors {
        let qv = quantize_vector(kind, v);
        for &s in scalars {
            let qs = kind.quantize(s);
            let mut expectations = Vec::with_capacity(ops.len());
            for op in ops {
                expectations.push(Expectation::Vector(op(kind, &qv, qs)?));
            }
            let input = vec![Value::vector(kind, &qv), Value::scalar(kind, qs)];
            if let Some(case) = make_case(input, expectations, filter) {
                out.push(case);
            }
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Matrix-shaped generators
// ---------------------------------------------------------------------------

/// Cases for matrix-to-scalar operations (determinant).
pub fn generate_matrix_cases(
    kind: FpKind,
    matrices: &[Vec<Vec<f64>>],
    filter: CaseFilter,
    ops: &[MatrixOp],
) -> Result<Vec<Case>, OpError> {
    let mut out = Vec::new();
    for m in matrices {
        let qm = quantize_matrix(kind, m);
        let mut expectations = Vec::with_capacity(ops.len());
        for op in ops {
            expectations.push(Expectation::Scalar(op(kind, &qm)?));
        }
        if let Some(case) = make_case(vec![Value::matrix(kind, &qm)], expectations, filter) {
            out.push(case);
        }
    }
    Ok(out)
}

/// Cases for matrix-to-matrix operations (transpose, inverse, negation).
pub fn generate_matrix_to_matrix_cases(
    kind: FpKind,
    matrices: &[Vec<Vec<f64>>],
    filter: CaseFilter,
    ops: &[MatrixToMatrixOp],
) -> Result<Vec<Case>, OpError> {
    let mut out = Vec::new();
    for m in matrices {
        let qm = quantize_matrix(kind, m);
        let mut expectations = Vec::with_capacity(ops.len());
        for op in ops {
            expectations.push(Expectation::Matrix(op(kind, &qm)?));
        }
        if let Some(case) = make_case(vec![Value::matrix(kind, &qm)], expectations, filter) {
            out.push(case);
        }
    }
    Ok(out)
}

/// Cases for matrix-pair operations (addition, product) over the
/// Cartesian product of the ranges.
pub fn generate_matrix_pair_cases(
    kind: FpKind,
    xs: &[Vec<Vec<f64>>],
    ys: &[Vec<Vec<f64>>],
    filter: CaseFilter,
    ops: &[MatrixPairOp],
) -> Result<Vec<Case>, OpError> {
    let mut out = Vec::new();
    for x in xs {
        let qx = quantize_matrix(kind, x);
        for y in ys {
            let qy = quantize_matrix(kind, y);
            let mut expectations = Vec::with_capacity(ops.len());
            for op in ops {
                expectations.push(Expectation::Matrix(op(kind, &qx, &qy)?));
            }
            let input = vec![Value::matrix(kind, &qx), Value::matrix(kind, &qy)];
            if let Some(case) = make_case(input, expectations, filter) {
                out.push(case);
            }
        }
    }
    Ok(out)
}

/// Cases for matrix x scalar operations; nested heterogeneous loops.
pub fn generate_matrix_scalar_cases(
    kind: FpKind,
    matrices: &[Vec<Vec<f64>>],
    scalars: &[f64],
    filter: CaseFilter,
    ops: &[MatrixScalarOp],
) -> Result<Vec<Case>, OpError> {
    let mut out = Vec::new();
    for m in matrices {
        let qm = quantize_matrix(kind, m);
        for &s in scalars {
            let qs = kind.quantize(s);
            let mut expectations = Vec::with_capacity(ops.len());
            for op in ops {
                expectations.push(Expectation::Matrix(op(kind, &qm, qs)?));
            }
            let input = vec![Value::matrix(kind, &qm), Value::scalar(kind, qs)];
            if let Some(case) = make_case(input, expectations, filter) {
                out.push(case);
            }
        }
    }
    Ok(out)
}

/// Cases for scalar x matrix operations.
pub fn generate_scalar_matrix_cases(
    kind: FpKind,
    scalars: &[f64],
    matrices: &[Vec<Vec<f64>>],
    filter: CaseFilter,
    ops: &[ScalarMatrixOp],
) -> Result<Vec<Case>, OpError> {
    let mut out = Vec::new();
    for &s in scalars {
        let qs = kind.quantize(s);
        for m in matrices {
            let qm = quantize_matrix(kind, m);
            let mut expectations = Vec::with_capacity(ops.len());
            for op in ops {
                expectations.push(Expectation::Matrix(op(kind, qs, &qm)?));
            }
            let input = vec![Value::scalar(kind, qs), Value::matrix(kind, &qm)];
            if let Some(case) = make_case(input, expectations, filter) {
                out.push(case);
            }
        }
    }
    Ok(out)
}

/// Cases for matrix x vector products.
pub fn generate_matrix_vector_cases(
    kind: FpKind,
    matrices: &[Vec<Vec<f64>>],
    vectors: &[Vec<f64>],
    filter: CaseFilter,
    ops: &[MatrixVectorOp],
) -> Result<Vec<Case>, OpError> {
    let mut out = Vec::new();
    for m in matrices {
        let qm = quantize_matrix(kind, m);
        for v in vectors {
            let qv = quantize_vector(kind, v);
            let mut expectations = Vec::with_capacity(ops.len());
            for op in ops {
                expectations.push(Expectation::Vector(op(kind, &qm, &qv)?));
            }
            let input = vec![Value::matrix(kind, &qm), Value::vector(kind, &qv)];
            if let Some(case) = make_case(input, expectations, filter) {
                out.push(case);
            }
        }
    }
    Ok(out)
}

/// Cases for vector x matrix products.
pub fn generate_vector_matrix_cases(
    kind: FpKind,
    vectors: &[Vec<f64>],
    matrices: &[Vec<Vec<f64>>],
    filter: CaseFilter,
    ops: &[VectorMatrixOp],
) -> Result<Vec<Case>, OpError> {
    let mut out = Vec::new();
    for v in vectors {
        let qv = quantize_vector(kind, v);
        for m in matrices {
            let qm = quantize_matrix(kind, m);
            let mut expectations = Vec::with_capacity(ops.len());
            for op in ops {
                expectations.push(Expectation::Vector(op(kind, &qv, &qm)?));
            }
            let input = vec![Value::vector(kind, &qv), Value::matrix(kind, &qm)];
            if let Some(case) = make_case(input, expectations, filter) {
                out.push(case);
            }
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Identity of one generated case array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseKey {
    pub op: String,
    pub kind: FpKind,
    pub filter: CaseFilter,
}

impl CaseKey {
    pub fn new(op: impl Into<String>, kind: FpKind, filter: CaseFilter) -> Self {
        CaseKey {
            op: op.into(),
            kind,
            filter,
        }
    }
}

/// Memoizes generated case arrays for the lifetime of a test-suite run.
///
/// ```
/// use fpbounds::{cases, CaseCache, CaseFilter, CaseKey, FpKind};
///
/// let mut cache = CaseCache::new();
/// let key = CaseKey::new("addition", FpKind::F32, CaseFilter::Finite);
/// let built = cache
///     .get_or_build(key.clone(), || {
///         cases::generate_scalar_pair_cases(
///             FpKind::F32,
///             &[1.0],
///             &[2.0],
///             CaseFilter::Finite,
///             &[|k, x, y| k.addition_interval(x, y)],
///         )
///     })
///     .unwrap()
///     .len();
/// // Second lookup is served from the cache
/// let cached = cache.get_or_build(key, || unreachable!()).unwrap().len();
/// assert_eq!(built, cached);
/// ```
#[derive(Debug, Default)]
pub struct CaseCache {
    map: HashMap<CaseKey, Vec<Case>>,
}

impl CaseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached case arrays.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The cases under `key`, building them with `build` on first use.
    /// A build error is not cached; the next lookup retries.
    pub fn get_or_build(
        &mut self,
        key: CaseKey,
        build: impl FnOnce() -> Result<Vec<Case>, OpError>,
    ) -> Result<&[Case], OpError> {
        match self.map.entry(key) {
            Entry::Occupied(e) => Ok(e.into_mut().as_slice()),
            Entry::Vacant(v) => Ok(v.insert(build()?).as_slice()),
        }
    }
}
