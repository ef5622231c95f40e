//! Runtime values exchanged with the test harness.
//!
//! A [`Value`] is a scalar, vector, or matrix of numbers tagged with the
//! precision kind that produced it. The shape is an explicit variant, never
//! probed structurally. Payloads travel as f64 quantized to the kind;
//! the serialized mirror stores raw bit patterns (`u64`) so cached cases
//! survive a round trip byte-for-byte, with no decimal-text rounding loss.

use serde::{Deserialize, Serialize};

use crate::kind::FpKind;

/// A runtime scalar, vector, or matrix value.
///
/// # Examples
///
/// ```
/// use fpbounds::{FpKind, Value};
///
/// let v = Value::scalar(FpKind::F32, 0.1);
/// // Construction quantizes to the kind's precision
/// assert_eq!(v.as_scalar().unwrap(), 0.1f32 as f64);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar { kind: FpKind, value: f64 },
    Vector { kind: FpKind, elements: Vec<f64> },
    /// Column-major, like the interval matrices.
    Matrix { kind: FpKind, cols: Vec<Vec<f64>> },
}

impl Value {
    /// Scalar value, quantized to `kind`.
    pub fn scalar(kind: FpKind, value: f64) -> Self {
        Value::Scalar {
            kind,
            value: kind.quantize(value),
        }
    }

    /// Vector value, each element quantized to `kind`.
    ///
    /// # Panics
    ///
    /// Panics if the length is outside 2..=4.
    pub fn vector(kind: FpKind, elements: &[f64]) -> Self {
        assert!(
            (2..=4).contains(&elements.len()),
            "Value::vector: length {} outside 2..=4",
            elements.len()
        );
        Value::Vector {
            kind,
            elements: elements.iter().map(|&e| kind.quantize(e)).collect(),
        }
    }

    /// Column-major matrix value, each element quantized to `kind`.
    ///
    /// # Panics
    ///
    /// Panics if a dimension is outside 2..=4 or the columns are ragged.
    pub fn matrix(kind: FpKind, cols: &[Vec<f64>]) -> Self {
        assert!(
            (2..=4).contains(&cols.len()),
            "Value::matrix: {} columns outside 2..=4",
            cols.len()
        );
        let rows = cols[0].len();
        assert!(
            (2..=4).contains(&rows),
            "Value::matrix: {rows} rows outside 2..=4"
        );
        assert!(
            cols.iter().all(|c| c.len() == rows),
            "Value::matrix: ragged columns"
        );
        Value::Matrix {
            kind,
            cols: cols
                .iter()
                .map(|c| c.iter().map(|&e| kind.quantize(e)).collect())
                .collect(),
        }
    }

    /// Precision kind of the value.
    pub fn kind(&self) -> FpKind {
        match self {
            Value::Scalar { kind, .. } | Value::Vector { kind, .. } | Value::Matrix { kind, .. } => {
                *kind
            }
        }
    }

    /// The scalar payload, if this is a scalar.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// The serialized, plain-data form of this value.
    pub fn to_serialized(&self) -> SerializedValue {
        match self {
            Value::Scalar { kind, value } => SerializedValue::Scalar {
                kind: *kind,
                bits: value.to_bits(),
            },
            Value::Vector { kind, elements } => SerializedValue::Vector {
                kind: *kind,
                bits: elements.iter().map(|e| e.to_bits()).collect(),
            },
            Value::Matrix { kind, cols } => SerializedValue::Matrix {
                kind: *kind,
                cols: cols
                    .iter()
                    .map(|c| c.iter().map(|e| e.to_bits()).collect())
                    .collect(),
            },
        }
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Scalar { kind, value } => write!(f, "{kind}({value:?})"),
            Value::Vector { kind, elements } => {
                write!(f, "{kind}(")?;
                for (i, e) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{e:?}")?;
                }
                write!(f, ")")
            }
            Value::Matrix { kind, cols } => {
                write!(f, "{kind}[")?;
                for (i, c) in cols.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    for (j, e) in c.iter().enumerate() {
                        if j > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{e:?}")?;
                    }
                }
                write!(f, "]")
            }
        }
    }
}

/// Plain-data mirror of [`Value`] with payloads as f64 bit patterns.
///
/// `Eq`/`Hash` are exact bit comparisons, so serialized values are
/// equality-testable across process boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SerializedValue {
    Scalar { kind: FpKind, bits: u64 },
    Vector { kind: FpKind, bits: Vec<u64> },
    Matrix { kind: FpKind, cols: Vec<Vec<u64>> },
}

impl SerializedValue {
    /// Rebuild the runtime value. The payload is used verbatim, it was
    /// quantized when the value was first constructed.
    pub fn to_value(&self) -> Value {
        match self {
            SerializedValue::Scalar { kind, bits } => Value::Scalar {
                kind: *kind,
                value: f64::from_bits(*bits),
            },
            SerializedValue::Vector { kind, bits } => Value::Vector {
                kind: *kind,
                elements: bits.iter().map(|&b| f64::from_bits(b)).collect(),
            },
            SerializedValue::Matrix { kind, cols } => Value::Matrix {
                kind: *kind,
                cols: cols
                    .iter()
                    .map(|c| c.iter().map(|&b| f64::from_bits(b)).collect())
                    .collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_quantizes() {
        let v = Value::scalar(FpKind::F16, 0.1);
        assert_eq!(v.as_scalar().unwrap(), FpKind::F16.quantize(0.1));
        let v = Value::vector(FpKind::F32, &[0.1, 0.2]);
        match v {
            Value::Vector { elements, .. } => {
                assert_eq!(elements[0], 0.1f32 as f64);
                assert_eq!(elements[1], 0.2f32 as f64);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn serialized_round_trip_is_bit_exact() {
        // Negative zero and subnormals must survive; decimal text would
        // lose them.
        let sub = FpKind::F32.constants().positive_subnormal_min;
        for v in [
            Value::scalar(FpKind::F32, -0.0),
            Value::scalar(FpKind::F32, sub),
            Value::vector(FpKind::F16, &[1.0, -0.0, 0.5]),
            Value::matrix(FpKind::Abstract, &[vec![1.0, 2.0], vec![3.0, 4.0]]),
        ] {
            let s = v.to_serialized();
            assert_eq!(s.to_value(), v);
            assert_eq!(s.to_value().to_serialized(), s);
        }
    }

    #[test]
    fn negative_zero_distinct_in_serialized_form() {
        let pos = Value::scalar(FpKind::F32, 0.0).to_serialized();
        let neg = Value::scalar(FpKind::F32, -0.0).to_serialized();
        assert_ne!(pos, neg);
    }

    #[test]
    fn display_is_printable() {
        let v = Value::vector(FpKind::F32, &[1.0, 2.5]);
        assert_eq!(format!("{v}"), "f32(1.0, 2.5)");
        let s = Value::scalar(FpKind::F16, 1.0);
        assert_eq!(format!("{s}"), "f16(1.0)");
    }

    #[test]
    #[should_panic(expected = "outside 2..=4")]
    fn oversized_vector_panics() {
        Value::vector(FpKind::F32, &[1.0; 5]);
    }
}
