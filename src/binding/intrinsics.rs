//! Built-in members and methods of non-host values.
//!
//! Names follow the host conventions expressions are written against
//! (`Length`, `ToUpper()`, `AddDays(n)`, ...). Every value also answers
//! `ToString()`.

use chrono::{DateTime, Datelike, TimeDelta, Timelike, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use super::{Method, dispatch};
use crate::error::EvalError;
use crate::value::duration::total_milliseconds;
use crate::value::ops::shift_datetime;
use crate::value::{Value, loose_eq};

/// Built-in property of `value`, if it has one called `name`.
pub fn member(value: &Value, name: &str) -> Option<Value> {
    match value {
        Value::String(s) => string_member(s, name),
        Value::Sequence(items) => sequence_member(items, name),
        Value::DateTime(dt) => datetime_member(dt, name),
        Value::Duration(d) => duration_member(d, name),
        _ => None,
    }
}

/// Built-in method of `value`. `None` when no method matches name and arity.
pub fn invoke(value: &Value, name: &str, args: &[Value]) -> Option<Result<Value, EvalError>> {
    let found = match value {
        Value::String(s) => dispatch(s.as_str(), STRING_METHODS, name, args),
        Value::Number(n) => dispatch(n, NUMBER_METHODS, name, args),
        Value::Sequence(items) => dispatch(items.as_slice(), SEQUENCE_METHODS, name, args),
        Value::DateTime(dt) => dispatch(dt, DATETIME_METHODS, name, args),
        Value::Duration(d) => dispatch(d, DURATION_METHODS, name, args),
        _ => None,
    };
    found.or_else(|| dispatch(value, COMMON_METHODS, name, args))
}

// ========================================
// Argument helpers
// ========================================

fn text_arg(args: &[Value], i: usize) -> String {
    args.get(i).map(Value::to_text).unwrap_or_default()
}

fn int_arg(args: &[Value], i: usize) -> i32 {
    args.get(i).map_or(0, Value::to_i32)
}

fn number_arg(args: &[Value], i: usize) -> f64 {
    args.get(i).map_or(0.0, Value::to_number)
}

/// Char-based index of the first occurrence, or -1.
fn char_index_of(haystack: &str, needle: &str) -> i64 {
    haystack
        .find(needle)
        .map_or(-1, |byte| haystack[..byte].chars().count() as i64)
}

// ========================================
// Common Methods
// ========================================

static COMMON_METHODS: &[Method<Value>] = &[Method {
    name: "ToString",
    arity: 0,
    call: common_to_string,
}];

/// .ToString() - canonical text of any value
fn common_to_string(value: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::String(value.to_text()))
}

// ========================================
// String Members
// ========================================

fn string_member(s: &str, name: &str) -> Option<Value> {
    match name {
        "Length" => Some(Value::from(s.chars().count())),
        _ => None,
    }
}

static STRING_METHODS: &[Method<str>] = &[
    Method { name: "ToUpper", arity: 0, call: string_to_upper },
    Method { name: "ToLower", arity: 0, call: string_to_lower },
    Method { name: "Trim", arity: 0, call: string_trim },
    Method { name: "Contains", arity: 1, call: string_contains },
    Method { name: "StartsWith", arity: 1, call: string_starts_with },
    Method { name: "EndsWith", arity: 1, call: string_ends_with },
    Method { name: "IndexOf", arity: 1, call: string_index_of },
    Method { name: "Substring", arity: 1, call: string_substring },
    Method { name: "Substring", arity: 2, call: string_substring },
    Method { name: "Replace", arity: 2, call: string_replace },
    Method { name: "Split", arity: 1, call: string_split },
    Method { name: "IsMatch", arity: 1, call: string_is_match },
];

fn string_to_upper(s: &str, _args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::String(s.to_uppercase()))
}

fn string_to_lower(s: &str, _args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::String(s.to_lowercase()))
}

fn string_trim(s: &str, _args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::from(s.trim()))
}

fn string_contains(s: &str, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Boolean(s.contains(text_arg(args, 0).as_str())))
}

fn string_starts_with(s: &str, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Boolean(s.starts_with(text_arg(args, 0).as_str())))
}

fn string_ends_with(s: &str, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Boolean(s.ends_with(text_arg(args, 0).as_str())))
}

fn string_index_of(s: &str, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::from(char_index_of(s, &text_arg(args, 0))))
}

/// .Substring(start) / .Substring(start, length) - counted in characters
fn string_substring(s: &str, args: &[Value]) -> Result<Value, EvalError> {
    let len = s.chars().count();
    let start = int_arg(args, 0);
    let Some(start) = usize::try_from(start).ok().filter(|&i| i <= len) else {
        return Err(EvalError::IndexOutOfRange { index: start as i64, len });
    };

    let take = match args.get(1) {
        Some(count) => {
            let count = count.to_i32();
            match usize::try_from(count).ok().filter(|&n| start + n <= len) {
                Some(n) => n,
                None => {
                    return Err(EvalError::InvalidArgument(format!(
                        "Substring length {} exceeds the end of a string of length {}",
                        count, len
                    )));
                }
            }
        }
        None => len - start,
    };

    Ok(Value::String(s.chars().skip(start).take(take).collect()))
}

fn string_replace(s: &str, args: &[Value]) -> Result<Value, EvalError> {
    let from = text_arg(args, 0);
    if from.is_empty() {
        return Err(EvalError::InvalidArgument(
            "Replace() requires a non-empty search string".to_string(),
        ));
    }
    Ok(Value::String(s.replace(&from, &text_arg(args, 1))))
}

fn string_split(s: &str, args: &[Value]) -> Result<Value, EvalError> {
    let separator = text_arg(args, 0);
    let parts = if separator.is_empty() {
        vec![Value::from(s)]
    } else {
        s.split(separator.as_str()).map(Value::from).collect()
    };
    Ok(Value::Sequence(parts))
}

/// .IsMatch(pattern) - regular expression search anywhere in the string
fn string_is_match(s: &str, args: &[Value]) -> Result<Value, EvalError> {
    let pattern = text_arg(args, 0);
    let re = Regex::new(&pattern)
        .map_err(|e| EvalError::InvalidArgument(format!("invalid regex: {e}")))?;
    Ok(Value::Boolean(re.is_match(s)))
}

// ========================================
// Number Methods
// ========================================

static NUMBER_METHODS: &[Method<f64>] = &[
    Method { name: "Round", arity: 0, call: number_round },
    Method { name: "Round", arity: 1, call: number_round },
    Method { name: "Floor", arity: 0, call: number_floor },
    Method { name: "Ceiling", arity: 0, call: number_ceiling },
    Method { name: "Abs", arity: 0, call: number_abs },
];

/// .Round() / .Round(digits) - decimal rounding, halves to even
fn number_round(n: &f64, args: &[Value]) -> Result<Value, EvalError> {
    let digits = int_arg(args, 0);
    let Ok(digits) = u32::try_from(digits) else {
        return Err(EvalError::InvalidArgument(format!(
            "Round() digits must not be negative, got {}",
            digits
        )));
    };
    // Infinities, NaN and magnitudes beyond the decimal range have no fraction to round.
    let Some(decimal) = Decimal::from_f64(*n) else {
        return Ok(Value::Number(*n));
    };
    let rounded = decimal.round_dp(digits);
    Ok(Value::Number(rounded.to_f64().unwrap_or(*n)))
}

fn number_floor(n: &f64, _args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Number(n.floor()))
}

fn number_ceiling(n: &f64, _args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Number(n.ceil()))
}

fn number_abs(n: &f64, _args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Number(n.abs()))
}

// ========================================
// Sequence Members
// ========================================

fn sequence_member(items: &[Value], name: &str) -> Option<Value> {
    match name {
        "Count" | "Length" => Some(Value::from(items.len())),
        _ => None,
    }
}

static SEQUENCE_METHODS: &[Method<[Value]>] = &[
    Method { name: "Contains", arity: 1, call: sequence_contains },
    Method { name: "IndexOf", arity: 1, call: sequence_index_of },
];

/// .Contains(item) - membership under `==`
fn sequence_contains(items: &[Value], args: &[Value]) -> Result<Value, EvalError> {
    let needle = args.first().cloned().unwrap_or(Value::Null);
    Ok(Value::Boolean(items.iter().any(|item| loose_eq(item, &needle))))
}

fn sequence_index_of(items: &[Value], args: &[Value]) -> Result<Value, EvalError> {
    let needle = args.first().cloned().unwrap_or(Value::Null);
    let index = items
        .iter()
        .position(|item| loose_eq(item, &needle))
        .map_or(-1, |i| i as i64);
    Ok(Value::from(index))
}

// ========================================
// DateTime Members
// ========================================

fn datetime_member(dt: &DateTime<Utc>, name: &str) -> Option<Value> {
    let value = match name {
        "Year" => dt.year() as f64,
        "Month" => dt.month() as f64,
        "Day" => dt.day() as f64,
        "Hour" => dt.hour() as f64,
        "Minute" => dt.minute() as f64,
        "Second" => dt.second() as f64,
        "Millisecond" => (dt.timestamp_subsec_millis() % 1000) as f64,
        // Sunday is 0
        "DayOfWeek" => dt.weekday().num_days_from_sunday() as f64,
        "DayOfYear" => dt.ordinal() as f64,
        _ => return None,
    };
    Some(Value::Number(value))
}

static DATETIME_METHODS: &[Method<DateTime<Utc>>] = &[
    Method { name: "AddDays", arity: 1, call: datetime_add_days },
    Method { name: "AddHours", arity: 1, call: datetime_add_hours },
    Method { name: "AddMinutes", arity: 1, call: datetime_add_minutes },
    Method { name: "AddSeconds", arity: 1, call: datetime_add_seconds },
    Method { name: "AddMilliseconds", arity: 1, call: datetime_add_milliseconds },
    Method { name: "Add", arity: 1, call: datetime_add },
];

/// Shifts by `amount * unit_ms` milliseconds, fractions kept to the microsecond.
fn add_scaled(dt: &DateTime<Utc>, amount: f64, unit_ms: f64) -> Result<Value, EvalError> {
    let micros = amount * unit_ms * 1000.0;
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return Err(EvalError::Overflow { op: "+" });
    }
    shift_datetime(dt, TimeDelta::microseconds(micros.trunc() as i64))
}

fn datetime_add_days(dt: &DateTime<Utc>, args: &[Value]) -> Result<Value, EvalError> {
    add_scaled(dt, number_arg(args, 0), 86_400_000.0)
}

fn datetime_add_hours(dt: &DateTime<Utc>, args: &[Value]) -> Result<Value, EvalError> {
    add_scaled(dt, number_arg(args, 0), 3_600_000.0)
}

fn datetime_add_minutes(dt: &DateTime<Utc>, args: &[Value]) -> Result<Value, EvalError> {
    add_scaled(dt, number_arg(args, 0), 60_000.0)
}

fn datetime_add_seconds(dt: &DateTime<Utc>, args: &[Value]) -> Result<Value, EvalError> {
    add_scaled(dt, number_arg(args, 0), 1_000.0)
}

fn datetime_add_milliseconds(dt: &DateTime<Utc>, args: &[Value]) -> Result<Value, EvalError> {
    add_scaled(dt, number_arg(args, 0), 1.0)
}

/// .Add(duration) - accepts a duration or its text form
fn datetime_add(dt: &DateTime<Utc>, args: &[Value]) -> Result<Value, EvalError> {
    let arg = args.first().cloned().unwrap_or(Value::Null);
    match arg.to_duration() {
        Some(d) => shift_datetime(dt, d),
        None => Err(EvalError::InvalidArgument(format!(
            "Add() expects a duration, got {}",
            arg.type_name()
        ))),
    }
}

// ========================================
// Duration Members
// ========================================

fn duration_member(d: &TimeDelta, name: &str) -> Option<Value> {
    let total_ms = total_milliseconds(d);
    let value = match name {
        // Components truncate toward zero and share the sign of the duration.
        "Days" => d.num_days() as f64,
        "Hours" => (d.num_hours() % 24) as f64,
        "Minutes" => (d.num_minutes() % 60) as f64,
        "Seconds" => (d.num_seconds() % 60) as f64,
        "Milliseconds" => (d.num_milliseconds() % 1000) as f64,
        "TotalDays" => total_ms / 86_400_000.0,
        "TotalHours" => total_ms / 3_600_000.0,
        "TotalMinutes" => total_ms / 60_000.0,
        "TotalSeconds" => total_ms / 1_000.0,
        "TotalMilliseconds" => total_ms,
        _ => return None,
    };
    Some(Value::Number(value))
}

static DURATION_METHODS: &[Method<TimeDelta>] = &[
    Method { name: "Negate", arity: 0, call: duration_negate },
    Method { name: "Duration", arity: 0, call: duration_abs },
];

fn duration_negate(d: &TimeDelta, _args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Duration(-*d))
}

/// .Duration() - absolute length
fn duration_abs(d: &TimeDelta, _args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Duration(if *d < TimeDelta::zero() { -*d } else { *d }))
}
