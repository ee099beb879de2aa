//! Scalar label values.
//!
//! Annotators label instances with arbitrary scalars: class names, integer
//! ratings, booleans, sometimes floats. `Label` keeps all of them in one type
//! with a total order, so that the normalizer can enumerate a label space
//! deterministically regardless of where the labels came from.
//!
//! # Ordering
//!
//! Labels order first by kind (`Bool < number < Text`), then by value.
//! Integers and floats share one numeric order: `Int(2)` and `Float(2.0)` are
//! the same label, as are `Float(0.0)` and `Float(-0.0)`. Tables exported from
//! dataframes turn integer columns with gaps into floats, and those labels
//! must still match their integer counterparts. Non-integral floats order by
//! value among the integers; NaNs follow IEEE 754 total ordering.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};

/// A single label value assigned by an annotator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    /// Boolean label (yes/no tasks)
    Bool(bool),
    /// Integer label (ratings, class ids)
    Int(i64),
    /// Floating point label
    Float(f64),
    /// Free text label (class names)
    Text(String),
}

impl Label {
    fn rank(&self) -> u8 {
        match self {
            Label::Bool(_) => 0,
            Label::Int(_) | Label::Float(_) => 1,
            Label::Text(_) => 2,
        }
    }

    /// Numeric view: integral floats collapse onto the integer they equal.
    fn number(&self) -> Option<Number> {
        match self {
            Label::Int(i) => Some(Number::Int(*i)),
            Label::Float(f) => Some(match integral(*f) {
                Some(i) => Number::Int(i),
                None => Number::Float(*f),
            }),
            _ => None,
        }
    }

    /// Whether this value is a missing-data sentinel rather than a label.
    ///
    /// Only a float NaN qualifies. Tables exported from dataframe libraries
    /// often mark missing cells with NaN.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Label::Float(f) if f.is_nan())
    }

    /// Numeric view of the label, if it has one.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Label::Int(i) => Some(*i as f64),
            Label::Float(f) => Some(*f),
            Label::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Label::Text(_) => None,
        }
    }

    /// Convert one JSON cell into an optional label.
    ///
    /// `null` is the absent marker. Arrays and objects are not scalar labels
    /// and are rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<Option<Label>> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(Label::Bool(*b))),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Some(Label::Int(i)))
                } else if let Some(f) = n.as_f64() {
                    Ok(Some(Label::Float(f)))
                } else {
                    Err(Error::invalid_input_kind(format!(
                        "number {} is not representable as a label",
                        n
                    )))
                }
            }
            Value::String(s) => Ok(Some(Label::Text(s.clone()))),
            Value::Array(_) => Err(Error::invalid_input_kind(
                "table cells must be scalars, found an array",
            )),
            Value::Object(_) => Err(Error::invalid_input_kind(
                "table cells must be scalars, found an object",
            )),
        }
    }
}

/// Lower bound of `i64` as a float, exactly `-2^63`.
const I64_MIN_F: f64 = -9_223_372_036_854_775_808.0;

/// The integer an integral float in `i64` range equals. `-0.0` maps to `0`.
fn integral(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f >= I64_MIN_F && f < -I64_MIN_F {
        Some(f as i64)
    } else {
        None
    }
}

/// A numeric label after collapsing integral floats.
#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    /// Non-integral, out of `i64` range, infinite or NaN
    Float(f64),
}

impl Number {
    fn cmp(self, other: Number) -> Ordering {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a.cmp(&b),
            (Number::Float(a), Number::Float(b)) => a.total_cmp(&b),
            (Number::Int(i), Number::Float(f)) => cmp_int_float(i, f),
            (Number::Float(f), Number::Int(i)) => cmp_int_float(i, f).reverse(),
        }
    }
}

/// Order an integer against a float that is never integral in `i64` range,
/// so the two are never equal.
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    if f.is_nan() {
        // total_cmp puts negative NaN below every number, positive NaN above
        return if f.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if f >= -I64_MIN_F {
        return Ordering::Less;
    }
    if f < I64_MIN_F {
        return Ordering::Greater;
    }
    // f is non-integral inside the i64 range, so its floor is exact
    if i <= f.floor() as i64 {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Label {}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Label::Bool(a), Label::Bool(b)) => a.cmp(b),
            (Label::Text(a), Label::Text(b)) => a.cmp(b),
            _ => match (self.number(), other.number()) {
                (Some(a), Some(b)) => a.cmp(b),
                _ => self.rank().cmp(&other.rank()),
            },
        }
    }
}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Label::Bool(b) => b.hash(state),
            Label::Text(s) => s.hash(state),
            Label::Int(_) | Label::Float(_) => match self.number() {
                Some(Number::Int(i)) => i.hash(state),
                // total_cmp equality is bitwise equality
                Some(Number::Float(f)) => f.to_bits().hash(state),
                None => {}
            },
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Bool(b) => write!(f, "{}", b),
            Label::Int(i) => write!(f, "{}", i),
            Label::Float(x) => write!(f, "{}", x),
            Label::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Label {
    fn from(b: bool) -> Self {
        Label::Bool(b)
    }
}

impl From<i64> for Label {
    fn from(i: i64) -> Self {
        Label::Int(i)
    }
}

impl From<f64> for Label {
    fn from(f: f64) -> Self {
        Label::Float(f)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::Text(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_kind_ordering() {
        let mut labels = vec![
            Label::from("b"),
            Label::from(2.5),
            Label::from(3),
            Label::from(true),
            Label::from("a"),
            Label::from(-1),
        ];
        labels.sort();
        assert_eq!(
            labels,
            vec![
                Label::Bool(true),
                Label::Int(-1),
                Label::Float(2.5),
                Label::Int(3),
                Label::from("a"),
                Label::from("b"),
            ]
        );
    }

    #[test]
    fn test_integral_float_equals_int() {
        assert_eq!(Label::Int(2), Label::Float(2.0));
        assert_eq!(Label::Float(0.0), Label::Float(-0.0));
        assert_eq!(Label::Int(0), Label::Float(-0.0));
        assert_ne!(Label::Int(2), Label::Float(2.5));

        let set: HashSet<Label> = [Label::Int(2), Label::Float(2.0), Label::Float(-0.0), Label::Int(0)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_numeric_order_interleaves_kinds() {
        assert!(Label::Int(2) < Label::Float(2.5));
        assert!(Label::Float(2.5) < Label::Int(3));
        assert!(Label::Float(-0.5) < Label::Int(0));
        assert!(Label::Int(-1) < Label::Float(-0.5));
        assert!(Label::Int(i64::MAX) < Label::Float(9.3e18));
        assert!(Label::Float(f64::NEG_INFINITY) < Label::Int(i64::MIN));
        assert!(Label::Int(i64::MAX) < Label::Float(f64::NAN));
        assert!(Label::Float(1e300) > Label::Int(7));
    }

    #[test]
    fn test_nan_is_missing() {
        assert!(Label::Float(f64::NAN).is_missing());
        assert!(!Label::Float(0.0).is_missing());
        assert!(!Label::Int(0).is_missing());
    }

    #[test]
    fn test_from_json_scalars() {
        use serde_json::json;

        assert_eq!(Label::from_json(&json!(null)).unwrap(), None);
        assert_eq!(Label::from_json(&json!(0)).unwrap(), Some(Label::Int(0)));
        assert_eq!(Label::from_json(&json!(1.5)).unwrap(), Some(Label::Float(1.5)));
        assert_eq!(Label::from_json(&json!("pos")).unwrap(), Some(Label::from("pos")));
        assert_eq!(Label::from_json(&json!(false)).unwrap(), Some(Label::Bool(false)));
    }

    #[test]
    fn test_from_json_rejects_containers() {
        use serde_json::json;

        assert!(matches!(
            Label::from_json(&json!([1, 2])),
            Err(Error::InvalidInputKind(_))
        ));
        assert!(matches!(
            Label::from_json(&json!({"a": 1})),
            Err(Error::InvalidInputKind(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Label::from("neg").to_string(), "neg");
        assert_eq!(Label::from(3).to_string(), "3");
    }
}
