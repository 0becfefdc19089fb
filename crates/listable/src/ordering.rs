//! Sort directions and the multi-key record comparator.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ListableError;
use crate::record::Record;
use crate::value::Value;

/// Sort directions keyed by field name. Insertion order is key precedence.
pub type Sorter = IndexMap<String, Dir>;

/// Direction of one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    #[default]
    Asc,
    Desc,
}

impl Dir {
    /// Orients an ascending comparison for this direction.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        if self == Dir::Desc {
            ordering.reverse()
        } else {
            ordering
        }
    }

    /// Lowercase name, as written in request parameters and config.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dir {
    type Err = ListableError;

    /// Accepts `asc`/`ascending` and `desc`/`descending`, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Dir::Asc),
            "desc" | "descending" => Ok(Dir::Desc),
            _ => Err(ListableError::InvalidParam {
                name: "dir".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl Serialize for Dir {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Dir {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Compares two field values.
///
/// Strings compare byte-wise, numbers numerically. Numbers sort before
/// strings and missing values sort after everything else, so the result
/// is a total order a sort can rely on. NaN sorts above every number,
/// whatever its sign bit.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a
            .compare(*b)
            .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan())),

        (Value::None, Value::None) => Ordering::Equal,
        (Value::None, _) => Ordering::Greater,
        (_, Value::None) => Ordering::Less,

        (Value::Number(_), Value::String(_)) => Ordering::Less,
        (Value::String(_), Value::Number(_)) => Ordering::Greater,
    }
}

/// Compares two records by each sorter key in turn.
///
/// The first key whose values differ decides. Returns `Equal` when every
/// key ties, so a stable sort keeps such records in their original order.
pub fn compare<R: Record + ?Sized>(a: &R, b: &R, sorter: &Sorter) -> Ordering {
    for (field, dir) in sorter {
        let ordering = dir.apply(compare_values(&a.field_value(field), &b.field_value(field)));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Stable-sorts records in place by the sorter. An empty sorter is a no-op.
pub fn sort<R: Record>(records: &mut [&R], sorter: &Sorter) {
    if sorter.is_empty() {
        return;
    }
    records.sort_by(|a, b| compare(*a, *b, sorter));
}
