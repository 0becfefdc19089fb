//! Per-field filters and the matcher that applies them.
//!
//! A [`FilterSpec`] is either a scalar target or an inclusive numeric range:
//!
//! | Field value | Scalar target                               | Range            |
//! |-------------|---------------------------------------------|------------------|
//! | String      | case-insensitive substring of the target    | parsed as number |
//! | Number      | numeric equality with the coerced target    | `from <= v <= to`|
//! | None        | never matches                               | never matches    |
//!
//! Anything that cannot be compared (non-numeric text against a range, a
//! bound that is not a number) is a non-match, never an error.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::value::{Number, Scalar, Value};

/// Filters keyed by field name. `None` entries impose no constraint.
pub type Filters = IndexMap<String, Option<FilterSpec>>;

/// Filter applied to a single field.
///
/// Deserializes from a bare string or number (scalar), or from an object
/// with optional `from` and `to` keys (range).
///
/// ```
/// use listable::FilterSpec;
///
/// let spec: FilterSpec = serde_json::from_str(r#"{"from": 97, "to": "99"}"#).unwrap();
/// assert!(spec.is_range());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterSpec {
    /// Substring match for text fields, numeric equality for numbers.
    Scalar(Scalar),
    /// Inclusive numeric bounds. A missing bound is open on that side.
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<Scalar>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<Scalar>,
    },
}

impl FilterSpec {
    /// Creates a scalar filter.
    pub fn scalar(value: impl Into<Scalar>) -> Self {
        FilterSpec::Scalar(value.into())
    }

    /// Creates a range filter with optional bounds.
    pub fn range(from: Option<Scalar>, to: Option<Scalar>) -> Self {
        FilterSpec::Range { from, to }
    }

    /// Creates a range filter bounded on both sides.
    pub fn between(from: impl Into<Scalar>, to: impl Into<Scalar>) -> Self {
        FilterSpec::range(Some(from.into()), Some(to.into()))
    }

    /// Returns `true` if this is a range filter.
    pub fn is_range(&self) -> bool {
        matches!(self, FilterSpec::Range { .. })
    }

    /// Evaluates this filter against a field value.
    pub fn matches(&self, value: &Value<'_>) -> bool {
        Matcher::new(self).matches(value)
    }
}

impl From<Scalar> for FilterSpec {
    fn from(value: Scalar) -> Self {
        FilterSpec::Scalar(value)
    }
}

impl From<&str> for FilterSpec {
    fn from(value: &str) -> Self {
        FilterSpec::scalar(value)
    }
}

impl From<String> for FilterSpec {
    fn from(value: String) -> Self {
        FilterSpec::scalar(value)
    }
}

impl From<i64> for FilterSpec {
    fn from(value: i64) -> Self {
        FilterSpec::scalar(value)
    }
}

impl From<f64> for FilterSpec {
    fn from(value: f64) -> Self {
        FilterSpec::scalar(value)
    }
}

/// Filters ready for repeated matching.
///
/// Preparing does the per-filter work once (case-folding scalar text,
/// parsing numbers and range bounds), so matching a row only reads and
/// compares its field values. Built once per pipeline run.
#[derive(Debug, Clone)]
pub struct PreparedFilters<'f> {
    fields: Vec<(&'f str, Matcher)>,
}

impl<'f> PreparedFilters<'f> {
    /// Prepares every non-`None` filter, keeping field order.
    pub fn new(filters: &'f Filters) -> Self {
        let fields = filters
            .iter()
            .filter_map(|(field, spec)| Some((field.as_str(), Matcher::new(spec.as_ref()?))))
            .collect();
        Self { fields }
    }

    /// Number of filters that constrain rows.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no filter constrains rows.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Tests a record against every filter (logical AND).
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.fields
            .iter()
            .all(|(field, matcher)| matcher.matches(&record.field_value(field)))
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Scalar {
        folded: String,
        number: Option<Number>,
    },
    Range {
        from: Bound,
        to: Bound,
    },
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Open,
    At(Number),
    /// Not a number: nothing satisfies it.
    Malformed,
}

impl Bound {
    fn new(bound: Option<&Scalar>) -> Self {
        match bound.map(Scalar::to_number) {
            None => Bound::Open,
            Some(Some(n)) => Bound::At(n),
            Some(None) => Bound::Malformed,
        }
    }

    fn admits(self, n: Number, accept: fn(Ordering) -> bool) -> bool {
        match self {
            Bound::Open => true,
            Bound::At(bound) => n.compare(bound).is_some_and(accept),
            Bound::Malformed => false,
        }
    }
}

impl Matcher {
    fn new(spec: &FilterSpec) -> Self {
        match spec {
            FilterSpec::Scalar(target) => Matcher::Scalar {
                folded: target.to_string().to_lowercase(),
                number: target.to_number(),
            },
            FilterSpec::Range { from, to } => Matcher::Range {
                from: Bound::new(from.as_ref()),
                to: Bound::new(to.as_ref()),
            },
        }
    }

    fn matches(&self, value: &Value<'_>) -> bool {
        match self {
            Matcher::Scalar { folded, number } => match value {
                Value::String(s) => s.to_lowercase().contains(folded.as_str()),
                Value::Number(n) => number.is_some_and(|t| n.numeric_eq(t)),
                Value::None => false,
            },
            Matcher::Range { from, to } => value.to_number().is_some_and(|n| {
                from.admits(n, Ordering::is_ge) && to.admits(n, Ordering::is_le)
            }),
        }
    }
}

/// Tests a record against every filter (logical AND).
///
/// Fields whose filter is `None` are skipped. A field missing from the
/// record fails its filter. To test many records, prepare the filters once
/// with [`PreparedFilters::new`].
pub fn matches<R: Record + ?Sized>(record: &R, filters: &Filters) -> bool {
    PreparedFilters::new(filters).matches(record)
}
