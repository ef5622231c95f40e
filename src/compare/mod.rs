//! Judging produced values against expectations.
//!
//! A [`Comparator`] is a closed tagged union: exact value, interval
//! containment (scalar, vector, or matrix shaped), "any of" alternatives,
//! "skip if undefined", and "always pass". [`compare`] produces a
//! `{matched, got, expected}` triple whose string fields are human-readable
//! diagnostics for a test log, never machine-parsed. A mismatch is normal
//! control flow, not an error; the engine never panics on one.


use serde::{Deserialize, Serialize};

use crate::interval::{FpInterval, FpMatrix, FpVector};
use crate::kind::FpKind;
use crate::value::{SerializedValue, Value};

/// Shape-tagged interval expectation.
#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    Scalar(FpInterval),
    Vector(FpVector),
    Matrix(FpMatrix),
}

/// What a produced value is judged against.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparator {
    /// Exact comparison. Precision kinds are one "float" family for type
    /// matching, but the payload must be bit-identical.
    Value(Value),
    /// Containment in a shape-matched interval expectation.
    Interval(Expectation),
    /// Passes if any alternative matches; aggregates every failure
    /// message otherwise.
    AnyOf(Vec<Comparator>),
    /// `None` means this input combination has no defined result and the
    /// comparison trivially passes; `Some` delegates.
    SkipUndefined(Option<Box<Comparator>>),
    /// Always matches; used when only "did it run" matters.
    AlwaysPass(String),
}

/// Verdict plus printable diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub matched: bool,
    pub got: String,
    pub expected: String,
}

impl Comparison {
    fn pass(got: &Value, expected: String) -> Self {
        Comparison {
            matched: true,
            got: got.to_string(),
            expected,
        }
    }

    fn fail(got: &Value, expected: String) -> Self {
        Comparison {
            matched: false,
            got: got.to_string(),
            expected,
        }
    }
}

fn expectation_to_string(e: &Expectation) -> String {
    match e {
        Expectation::Scalar(i) => i.to_string(),
        Expectation::Vector(v) => {
            let parts: Vec<String> = v.elements().iter().map(|i| i.to_string()).collect();
            format!("({})", parts.join(", "))
        }
        Expectation::Matrix(m) => {
            let cols: Vec<String> = m
                .columns()
                .iter()
                .map(|c| {
                    let parts: Vec<String> = c.iter().map(|i| i.to_string()).collect();
                    format!("[{}]", parts.join(", "))
                })
                .collect();
            format!("[{}]", cols.join("; "))
        }
    }
}

/// Judge `got` against `expected`.
///
/// # Examples
///
/// ```
/// use fpbounds::{compare, Comparator, Expectation, FpInterval, FpKind, Value};
///
/// let got = Value::scalar(FpKind::F32, 3.0);
/// let a = FpInterval::new(FpKind::F32, 1.0, 2.0);
/// let b = FpInterval::new(FpKind::F32, 2.0, 4.0);
/// let cmp = Comparator::AnyOf(vec![
///     Comparator::Interval(Expectation::Scalar(a)),
///     Comparator::Interval(Expectation::Scalar(b)),
/// ]);
/// assert!(compare(&got, &cmp).matched);
/// ```
pub fn compare(got: &Value, expected: &Comparator) -> Comparison {
    match expected {
        Comparator::Value(want) => compare_exact(got, want),
        Comparator::Interval(e) => compare_interval(got, e),
        Comparator::AnyOf(alternatives) => {
            let mut failures = Vec::with_capacity(alternatives.len());
            for alt in alternatives {
                let c = compare(got, alt);
                if c.matched {
                    return c;
                }
                failures.push(c.expected);
            }
            Comparison::fail(got, format!("any of ({})", failures.join("; ")))
        }
        Comparator::SkipUndefined(inner) => match inner {
            None => Comparison::pass(got, "undefined result, comparison skipped".to_string()),
            Some(c) => compare(got, c),
        },
        Comparator::AlwaysPass(msg) => Comparison::pass(got, msg.clone()),
    }
}

/// Exact comparison with the float-family kind relaxation: f16/f32/abstract
/// count as one type, payloads must be bit-identical.
fn compare_exact(got: &Value, want: &Value) -> Comparison {
    let matched = match (got, want) {
        (Value::Scalar { value: g, .. }, Value::Scalar { value: w, .. }) => {
            g.to_bits() == w.to_bits()
        }
        (Value::Vector { elements: g, .. }, Value::Vector { elements: w, .. }) => {
            g.len() == w.len()
                && g.iter().zip(w).all(|(a, b)| a.to_bits() == b.to_bits())
        }
        (Value::Matrix { cols: g, .. }, Value::Matrix { cols: w, .. }) => {
            g.len() == w.len()
                && g.iter().zip(w).all(|(gc, wc)| {
                    gc.len() == wc.len()
                        && gc.iter().zip(wc).all(|(a, b)| a.to_bits() == b.to_bits())
                })
        }
        _ => false,
    };
    if matched {
        Comparison::pass(got, want.to_string())
    } else {
        Comparison::fail(got, want.to_string())
    }
}

fn compare_interval(got: &Value, e: &Expectation) -> Comparison {
    match (got, e) {
        (Value::Scalar { value, .. }, Expectation::Scalar(i)) => {
            if i.contains_value(*value) {
                Comparison::pass(got, i.to_string())
            } else {
                Comparison::fail(got, i.to_string())
            }
        }
        (Value::Vector { elements, .. }, Expectation::Vector(v)) => {
            if elements.len() != v.len() {
                return Comparison::fail(
                    got,
                    format!(
                        "{} (dimension mismatch: got {} components)",
                        expectation_to_string(e),
                        elements.len()
                    ),
                );
            }
            let misses: Vec<usize> = elements
                .iter()
                .enumerate()
                .filter(|(i, g)| !v[*i].contains_value(**g))
                .map(|(i, _)| i)
                .collect();
            if misses.is_empty() {
                Comparison::pass(got, expectation_to_string(e))
            } else {
                let marked: Vec<String> = v
                    .elements()
                    .iter()
                    .enumerate()
                    .map(|(i, iv)| {
                        if misses.contains(&i) {
                            format!("*{iv}")
                        } else {
                            iv.to_string()
                        }
                    })
                    .collect();
                Comparison::fail(got, format!("({})", marked.join(", ")))
            }
        }
        (Value::Matrix { cols, .. }, Expectation::Matrix(m)) => {
            if cols.len() != m.ncols() || cols[0].len() != m.nrows() {
                return Comparison::fail(
                    got,
                    format!(
                        "{} (dimension mismatch: got {}x{})",
                        expectation_to_string(e),
                        cols.len(),
                        cols[0].len()
                    ),
                );
            }
            let mut all_contained = true;
            let mut marked_cols = Vec::with_capacity(cols.len());
            for (ci, col) in cols.iter().enumerate() {
                let mut marked = Vec::with_capacity(col.len());
                for (ri, g) in col.iter().enumerate() {
                    let iv = m.get(ci, ri);
                    if iv.contains_value(*g) {
                        marked.push(iv.to_string());
                    } else {
                        all_contained = false;
                        marked.push(format!("*{iv}"));
                    }
                }
                marked_cols.push(format!("[{}]", marked.join(", ")));
            }
            if all_contained {
                Comparison::pass(got, expectation_to_string(e))
            } else {
                Comparison::fail(got, format!("[{}]", marked_cols.join("; ")))
            }
        }
        // Shape mismatch between got and expectation
        _ => Comparison::fail(
            got,
            format!("{} (type mismatch)", expectation_to_string(e)),
        ),
    }
}

// ---------------------------------------------------------------------------
// Serialized forms
// ---------------------------------------------------------------------------

/// Interval as plain data: bounds stored as f64 bit patterns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializedInterval {
    pub kind: FpKind,
    pub begin_bits: u64,
    pub end_bits: u64,
}

impl SerializedInterval {
    pub fn from_interval(i: &FpInterval) -> Self {
        SerializedInterval {
            kind: i.kind(),
            begin_bits: i.begin().to_bits(),
            end_bits: i.end().to_bits(),
        }
    }

    pub fn to_interval(&self) -> FpInterval {
        FpInterval::new(
            self.kind,
            f64::from_bits(self.begin_bits),
            f64::from_bits(self.end_bits),
        )
    }
}

/// Plain-data mirror of [`Expectation`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SerializedExpectation {
    Scalar(SerializedInterval),
    Vector(Vec<SerializedInterval>),
    /// Column-major.
    Matrix(Vec<Vec<SerializedInterval>>),
}

/// Plain-data mirror of [`Comparator`], for persisting generated cases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SerializedComparator {
    Value(SerializedValue),
    Interval(SerializedExpectation),
    AnyOf(Vec<SerializedComparator>),
    SkipUndefined(Option<Box<SerializedComparator>>),
    AlwaysPass(String),
}

impl Comparator {
    pub fn to_serialized(&self) -> SerializedComparator {
        match self {
            Comparator::Value(v) => SerializedComparator::Value(v.to_serialized()),
            Comparator::Interval(e) => SerializedComparator::Interval(match e {
                Expectation::Scalar(i) => {
                    SerializedExpectation::Scalar(SerializedInterval::from_interval(i))
                }
                Expectation::Vector(v) => SerializedExpectation::Vector(
                    v.elements()
                        .iter()
                        .map(SerializedInterval::from_interval)
                        .collect(),
                ),
                Expectation::Matrix(m) => SerializedExpectation::Matrix(
                    m.columns()
                        .iter()
                        .map(|c| c.iter().map(SerializedInterval::from_interval).collect())
                        .collect(),
                ),
            }),
            Comparator::AnyOf(alts) => {
                SerializedComparator::AnyOf(alts.iter().map(|a| a.to_serialized()).collect())
            }
            Comparator::SkipUndefined(inner) => SerializedComparator::SkipUndefined(
                inner.as_ref().map(|c| Box::new(c.to_serialized())),
            ),
            Comparator::AlwaysPass(msg) => SerializedComparator::AlwaysPass(msg.clone()),
        }
    }
}

impl SerializedComparator {
    pub fn to_comparator(&self) -> Comparator {
        match self {
            SerializedComparator::Value(v) => Comparator::Value(v.to_value()),
            SerializedComparator::Interval(e) => Comparator::Interval(match e {
                SerializedExpectation::Scalar(i) => Expectation::Scalar(i.to_interval()),
                SerializedExpectation::Vector(v) => Expectation::Vector(FpVector::new(
                    v.iter().map(|i| i.to_interval()).collect(),
                )),
                SerializedExpectation::Matrix(m) => Expectation::Matrix(FpMatrix::new(
                    m.iter()
                        .map(|c| c.iter().map(|i| i.to_interval()).collect())
                        .collect(),
                )),
            }),
            SerializedComparator::AnyOf(alts) => {
                Comparator::AnyOf(alts.iter().map(|a| a.to_comparator()).collect())
            }
            SerializedComparator::SkipUndefined(inner) => Comparator::SkipUndefined(
                inner.as_ref().map(|c| Box::new(c.to_comparator())),
            ),
            SerializedComparator::AlwaysPass(msg) => Comparator::AlwaysPass(msg.clone()),
        }
    }
}
