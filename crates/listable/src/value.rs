//! Runtime value types for field matching and ordering.
//!
//! [`Value`] is what a [`Record`](crate::Record) hands to the pipeline for a
//! single field. [`Scalar`] is its owned counterpart, used for row storage
//! and filter targets.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Field value borrowed from a record.
///
/// ```
/// use listable::{Number, Value};
///
/// assert_eq!(Value::String(" 42 ").to_number(), Some(Number::I64(42)));
/// assert_eq!(Value::String("forty-two").to_number(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    String(&'a str),
    Number(Number),
    /// Absent, null, or a type that cannot be listed (bool, array, object).
    None,
}

impl Value<'_> {
    /// Reads the value as a number, parsing numeric text.
    pub fn to_number(&self) -> Option<Number> {
        match *self {
            Value::Number(n) => Some(n),
            Value::String(text) => Number::parse(text),
            Value::None => None,
        }
    }
}

/// A number as read from a row or a filter.
///
/// Comparisons are exact across variants: an integer is never rounded to
/// `f64` to be compared with a float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

/// 2^64 as `f64`. Every float at or beyond it is larger than any `u64`.
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

impl Number {
    pub fn is_nan(self) -> bool {
        matches!(self, Number::F64(n) if n.is_nan())
    }

    /// Numeric comparison across variants. `None` if either side is NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        use Number::*;

        match (self, other) {
            (I64(a), I64(b)) => Some(a.cmp(&b)),
            (U64(a), U64(b)) => Some(a.cmp(&b)),
            (I64(a), U64(b)) => Some(i128::from(a).cmp(&i128::from(b))),
            (U64(a), I64(b)) => Some(i128::from(a).cmp(&i128::from(b))),
            (F64(a), F64(b)) => a.partial_cmp(&b),
            (I64(a), F64(b)) => compare_int_float(a.into(), b),
            (U64(a), F64(b)) => compare_int_float(a.into(), b),
            (F64(a), I64(b)) => compare_int_float(b.into(), a).map(Ordering::reverse),
            (F64(a), U64(b)) => compare_int_float(b.into(), a).map(Ordering::reverse),
        }
    }

    /// `true` when both sides denote the same value (`5 == 5.0`).
    pub fn numeric_eq(self, other: Number) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }

    /// Parses numeric text such as `"100"`, `"-3"` or `"2.5e3"`.
    ///
    /// Surrounding whitespace is ignored. Infinities and NaN are rejected.
    pub fn parse(text: &str) -> Option<Number> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Ok(n) = text.parse::<i64>() {
            return Some(Number::I64(n));
        }
        if let Ok(n) = text.parse::<u64>() {
            return Some(Number::U64(n));
        }
        // `f64::from_str` also accepts "inf" and "nan"; only plain decimals count.
        let decimal = text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'));
        if !decimal {
            return None;
        }
        text.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Number::F64)
    }
}

/// Compares an integer with a float without rounding either.
fn compare_int_float(int: i128, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    // Integers here fit in (-2^64, 2^64); this also covers the infinities
    if float >= TWO_POW_64 {
        return Some(Ordering::Less);
    }
    if float < -TWO_POW_64 {
        return Some(Ordering::Greater);
    }
    let whole = float.trunc();
    // Exact: `whole` is integral and within i128 range
    let ordering = int.cmp(&(whole as i128)).then_with(|| {
        let fraction = float - whole;
        if fraction > 0.0 {
            Ordering::Less
        } else if fraction < 0.0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    });
    Some(ordering)
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => fmt::Display::fmt(n, f),
            Number::U64(n) => fmt::Display::fmt(n, f),
            Number::F64(n) => fmt::Display::fmt(n, f),
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::I64(n)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::U64(n)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}

/// Owned scalar: a row cell or a filter target.
///
/// Serializes as a bare JSON string or number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Number(Number),
}

impl Scalar {
    /// Borrows this scalar as a [`Value`].
    pub fn as_value(&self) -> Value<'_> {
        match self {
            Scalar::String(s) => Value::String(s),
            Scalar::Number(n) => Value::Number(*n),
        }
    }

    /// Coerces the scalar to a number, parsing numeric text.
    pub fn to_number(&self) -> Option<Number> {
        self.as_value().to_number()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Number(n) => fmt::Display::fmt(n, f),
        }
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_owned())
    }
}

impl From<Number> for Scalar {
    fn from(n: Number) -> Self {
        Scalar::Number(n)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Number(Number::I64(n.into()))
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(Number::I64(n))
    }
}

impl From<u64> for Scalar {
    fn from(n: u64) -> Self {
        Scalar::Number(Number::U64(n))
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(Number::F64(n))
    }
}
