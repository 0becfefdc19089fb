//! Field access for listed items.
//!
//! The pipeline never inspects items directly: it asks them for field values
//! through the [`Record`] trait. It is implemented for [`Row`], the crate's
//! own map-based row type, and for `serde_json` objects.

use indexmap::IndexMap;

use crate::value::{Number, Scalar, Value};

/// A row: field name to scalar, in insertion order.
pub type Row = IndexMap<String, Scalar>;

/// Field access for anything the pipeline lists.
///
/// Implement it for your own structs to list them without converting to
/// [`Row`]:
///
/// ```
/// use listable::{Number, Record, Value};
///
/// struct Invoice {
///     customer: String,
///     amount_cents: u64,
/// }
///
/// impl Record for Invoice {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "customer" => Value::String(&self.customer),
///             "amount" => Value::Number(Number::U64(self.amount_cents)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of a field for matching and ordering.
    ///
    /// Returns [`Value::None`] if the field doesn't exist or holds something
    /// that is neither text nor a number.
    fn field_value(&self, field: &str) -> Value<'_>;
}

impl Record for Row {
    fn field_value(&self, field: &str) -> Value<'_> {
        self.get(field).map_or(Value::None, Scalar::as_value)
    }
}

impl Record for serde_json::Map<String, serde_json::Value> {
    fn field_value(&self, field: &str) -> Value<'_> {
        self.get(field).map_or(Value::None, json_value)
    }
}

impl Record for serde_json::Value {
    fn field_value(&self, field: &str) -> Value<'_> {
        match self {
            serde_json::Value::Object(map) => map.field_value(field),
            _ => Value::None,
        }
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field_value(&self, field: &str) -> Value<'_> {
        (**self).field_value(field)
    }
}

fn json_value(value: &serde_json::Value) -> Value<'_> {
    match value {
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Number(n) => json_number(n).map_or(Value::None, Value::Number),
        _ => Value::None,
    }
}

fn json_number(n: &serde_json::Number) -> Option<Number> {
    if let Some(i) = n.as_i64() {
        Some(Number::I64(i))
    } else if let Some(u) = n.as_u64() {
        Some(Number::U64(u))
    } else {
        n.as_f64().map(Number::F64)
    }
}
