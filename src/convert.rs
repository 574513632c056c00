//! JSON <-> dynexpr Value conversion

use crate::{Record, Value};

/// Convert a JSON document to a Value. Objects become [`Record`]s.
pub fn from_json(v: serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Sequence(arr.into_iter().map(from_json).collect()),
        serde_json::Value::Object(obj) => obj
            .into_iter()
            .map(|(k, v)| (k, from_json(v)))
            .collect::<Record>()
            .into(),
    }
}

/// Convert a Value to JSON.
///
/// Date-times and durations become their text form, non-finite numbers `null`.
/// Host objects other than records are written as their text.
pub fn to_json(v: &Value) -> serde_json::Value {
    match v {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::DateTime(_) | Value::Duration(_) => serde_json::Value::String(v.to_text()),
        Value::Sequence(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Opaque(host) => match host.downcast_ref::<Record>() {
            Some(record) => serde_json::Value::Object(
                record
                    .iter()
                    .map(|(k, v)| (k.clone(), to_json(v)))
                    .collect(),
            ),
            None => serde_json::Value::String(host.to_text()),
        },
    }
}

/// Integral values are written without a fraction.
fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return serde_json::Value::Number((n as i64).into());
    }
    serde_json::Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}
