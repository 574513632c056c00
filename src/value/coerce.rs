//! Coercion rules: the total conversion functions every operator builds on,
//! and the three-way comparison behind `==`, `!=`, `<`, `<=`, `>`, `>=`.

use std::borrow::Cow;
use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use super::{Value, duration};

impl Value {
    /// Numeric view of any value; never fails.
    ///
    /// Date-times count milliseconds since the Unix epoch, durations their total
    /// milliseconds. Unparseable text and non-scalar values give `NaN`.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Number(n) => *n,
            Value::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::String(s) => parse_number(s).unwrap_or(f64::NAN),
            Value::DateTime(dt) => dt.timestamp_micros() as f64 / 1000.0,
            Value::Duration(d) => duration::total_milliseconds(d),
            Value::Sequence(_) | Value::Opaque(_) => f64::NAN,
        }
    }

    /// `to_number` truncated toward zero. Saturates out of range, `NaN` gives 0.
    pub fn to_i64(&self) -> i64 {
        self.to_number().trunc() as i64
    }

    /// `to_number` truncated toward zero. Saturates out of range, `NaN` gives 0.
    pub fn to_i32(&self) -> i32 {
        self.to_number().trunc() as i32
    }

    /// Truthiness: null, `false`, zero and the empty string are false,
    /// everything else (host objects included) is true.
    pub fn to_boolean(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Canonical text form. Null is the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Number(n) => format_number(*n),
            Value::Boolean(b) => b.to_string(),
            Value::String(s) => s.clone(),
            Value::DateTime(dt) => dt.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true),
            Value::Duration(d) => duration::format_duration(d),
            Value::Sequence(items) => {
                let parts: Vec<String> = items.iter().map(Value::to_text).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Opaque(host) => host.to_text(),
        }
    }

    /// Date-time view: date-times, RFC 3339 or `YYYY-MM-DD` text, and numbers
    /// as epoch milliseconds.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            Value::String(s) => parse_datetime(s.trim()),
            Value::Number(n) if n.is_finite() => {
                DateTime::from_timestamp_micros((n * 1000.0).trunc() as i64)
            }
            _ => None,
        }
    }

    /// Duration view: durations, `[-][d.]hh:mm[:ss[.fffffff]]` text, and
    /// numbers as milliseconds.
    pub fn to_duration(&self) -> Option<TimeDelta> {
        match self {
            Value::Duration(d) => Some(*d),
            Value::String(s) => duration::parse_duration(s.trim()),
            Value::Number(n) if n.is_finite() => {
                Some(TimeDelta::microseconds((n * 1000.0).trunc() as i64))
            }
            _ => None,
        }
    }
}

/// Parses text as a double, ignoring surrounding whitespace.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        n.to_string()
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn identical(x: &Value, y: &Value) -> bool {
    match (x, y) {
        (Value::Null, Value::Null) => true,
        (Value::Opaque(a), Value::Opaque(b)) => a.ptr_eq(b),
        _ => false,
    }
}

/// Booleans, date-times and durations compare as their numeric form.
fn comparable_form(v: &Value) -> Cow<'_, Value> {
    match v {
        Value::Boolean(_) | Value::DateTime(_) | Value::Duration(_) => {
            Cow::Owned(Value::Number(v.to_number()))
        }
        _ => Cow::Borrowed(v),
    }
}

/// Three-way comparison. `None` means the values are incomparable: every
/// relational operator is then false and `!=` is true.
///
/// 1. Identical values are equal.
/// 2. Booleans, date-times and durations are compared as numbers.
/// 3. Sequences order by length, then element by element.
/// 4. Strings, and host objects with a natural order, use that order.
/// 5. Numbers compare numerically, also against numeric text.
/// 6. Anything else is equal only when structurally equal.
pub fn compare(x: &Value, y: &Value) -> Option<Ordering> {
    if identical(x, y) {
        return Some(Ordering::Equal);
    }

    let x = comparable_form(x);
    let y = comparable_form(y);

    match (x.as_ref(), y.as_ref()) {
        (Value::Sequence(a), Value::Sequence(b)) => {
            if a.len() != b.len() {
                return Some(a.len().cmp(&b.len()));
            }
            for (left, right) in a.iter().zip(b.iter()) {
                match compare(left, right) {
                    Some(Ordering::Equal) => continue,
                    other => return other,
                }
            }
            Some(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (x, y) => natural_order(x, y).or_else(|| numeric_or_structural(x, y)),
    }
}

/// A host object's own ordering, asked from whichever side is a host object.
fn natural_order(x: &Value, y: &Value) -> Option<Ordering> {
    if let Value::Opaque(host) = x
        && let Some(ordering) = host.natural_cmp(y)
    {
        return Some(ordering);
    }
    if let Value::Opaque(host) = y
        && let Some(ordering) = host.natural_cmp(x)
    {
        return Some(ordering.reverse());
    }
    None
}

fn numeric_or_structural(x: &Value, y: &Value) -> Option<Ordering> {
    match (x, y) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::Number(a), Value::String(s)) => parse_number(s).and_then(|b| a.partial_cmp(&b)),
        (Value::String(s), Value::Number(b)) => parse_number(s).and_then(|a| a.partial_cmp(b)),
        (Value::Number(_), _) | (_, Value::Number(_)) => None,
        (x, y) if x == y => Some(Ordering::Equal),
        _ => None,
    }
}

/// Language equality (`==`).
pub fn loose_eq(x: &Value, y: &Value) -> bool {
    compare(x, y) == Some(Ordering::Equal)
}
