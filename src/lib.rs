//! # fpbounds
//!
//! Acceptance-interval engine for floating-point conformance testing.
//!
//! For every operation a shading language defines (arithmetic,
//! transcendental, vector, matrix), this crate computes a rigorous closed
//! interval of results a conforming implementation is allowed to produce,
//! accounting for round-to-nearest-even at the target precision, permitted
//! subnormal flushing, and the specification's error bounds (ULP-based or
//! absolute). Test suites generate `{input, expected}` cases from raw input
//! ranges and later judge runtime values against the expectation.
//!
//! ## Quick start
//!
//! ```
//! use fpbounds::{compare, Comparator, Expectation, FpKind, Value};
//!
//! // 1.0 + 2.0 is exactly representable at f32, so the acceptance
//! // interval is the single point 3.0.
//! let interval = FpKind::F32.addition_interval(1.0, 2.0).unwrap();
//! assert!(interval.contains_value(3.0));
//! assert!(interval.is_point());
//!
//! // Judge a runtime value against the expectation.
//! let got = Value::scalar(FpKind::F32, 3.0);
//! let verdict = compare(&got, &Comparator::Interval(Expectation::Scalar(interval)));
//! assert!(verdict.matched);
//! ```
//!
//! ## Modules
//!
//! - [`bits`] — bit-level primitives per width: successor/predecessor
//!   representable values, subnormal predicates, f16 via the `half` crate.
//! - [`kind`] — [`FpKind`] precision selector and its capability surface:
//!   constants, quantization, correct rounding, flushing, one-ULP.
//! - [`interval`] — [`FpInterval`] and the vector/matrix aggregates, with
//!   span/containment/finiteness queries.
//! - [`value`] — runtime [`Value`] (scalar/vector/matrix tagged with its
//!   precision) and its bit-pattern serialized form.
//! - [`compare`] — [`Comparator`] tagged union and the
//!   [`compare`](compare::compare()) entry point producing
//!   `{matched, got, expected}` diagnostics.
//! - [`ops`] — the operation-interval library: one interval-valued
//!   implementation per language operation, with domain guards and extrema
//!   handling at discontinuities.
//! - [`cases`] — case generation over raw input ranges, finite filtering,
//!   and the per-run [`CaseCache`](cases::CaseCache).

pub mod bits;
pub mod cases;
pub mod compare;
pub mod interval;
pub mod kind;
pub mod ops;
pub mod value;

pub use cases::{Case, CaseCache, CaseFilter, CaseKey, SerializedCase};
pub use compare::{compare, Comparator, Comparison, Expectation, SerializedComparator};
pub use interval::{span_intervals, FpInterval, FpMatrix, FpVector, IntoInterval};
pub use kind::{FpConstants, FpKind};
pub use ops::OpError;
pub use value::{SerializedValue, Value};
