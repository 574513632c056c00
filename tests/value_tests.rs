// tests/value_tests.rs

use std::cmp::Ordering;

use chrono::TimeDelta;
use dynexpr::ast::{BinOp, UnaryOp};
use dynexpr::convert::{from_json, to_json};
use dynexpr::value::duration::{format_duration, parse_duration, total_milliseconds};
use dynexpr::value::ops::{binary, unary};
use dynexpr::{EvalError, Record, Value, compare};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use serde_json::json;

fn num(n: f64) -> Value {
    Value::Number(n)
}

// ============================================================================
// Conversions
// ============================================================================

#[test]
fn test_to_number_rules() {
    assert_eq!(Value::Null.to_number(), 0.0);
    assert_eq!(Value::Boolean(true).to_number(), 1.0);
    assert_eq!(Value::from(" 2.5 ").to_number(), 2.5);
    assert!(Value::from("abc").to_number().is_nan());
    assert!(Value::Sequence(vec![]).to_number().is_nan());
    assert_eq!(Value::Duration(TimeDelta::seconds(2)).to_number(), 2000.0);
}

#[test]
fn test_integer_truncation() {
    assert_eq!(num(100.8).to_i64(), 100);
    assert_eq!(num(-3.9).to_i64(), -3);
    assert_eq!(num(f64::NAN).to_i32(), 0);
    assert_eq!(num(1e20).to_i32(), i32::MAX);
}

#[test]
fn test_to_boolean_rules() {
    assert!(!Value::Null.to_boolean());
    assert!(!num(0.0).to_boolean());
    assert!(num(-10.0).to_boolean());
    assert!(!Value::from("").to_boolean());
    assert!(Value::from("abc").to_boolean());
    assert!(Value::Sequence(vec![]).to_boolean());
}

#[test]
fn test_datetime_parsing() {
    let dt = Value::from("2024-03-01").to_datetime().unwrap();
    assert_eq!(dt.to_rfc3339(), "2024-03-01T00:00:00+00:00");
    assert!(Value::from("yesterday").to_datetime().is_none());
}

#[test]
fn test_decimal_bridge() {
    let decimal = Decimal::try_from(&num(12.25)).unwrap();
    assert_eq!(decimal, Decimal::new(1225, 2));
    assert_eq!(Value::from(decimal), num(12.25));
    assert!(matches!(
        Decimal::try_from(&num(1e30)),
        Err(EvalError::InvalidArgument(_))
    ));
}

// ============================================================================
// Comparison
// ============================================================================

#[test]
fn test_compare_coerces_booleans() {
    assert_eq!(compare(&Value::Boolean(true), &num(1.0)), Some(Ordering::Equal));
    assert_eq!(compare(&Value::Boolean(false), &Value::Boolean(true)), Some(Ordering::Less));
}

#[test]
fn test_compare_numeric_text() {
    assert_eq!(compare(&num(10.0), &Value::from("9")), Some(Ordering::Greater));
    assert_eq!(compare(&Value::from("abc"), &num(1.0)), None);
}

#[test]
fn test_compare_sequences() {
    let short = Value::from(vec![Value::from(9)]);
    let long = Value::from(vec![Value::from(1), Value::from(2)]);
    assert_eq!(compare(&short, &long), Some(Ordering::Less));

    let other = Value::from(vec![Value::from(1), Value::from(3)]);
    assert_eq!(compare(&long, &other), Some(Ordering::Less));
    assert_eq!(compare(&long, &long.clone()), Some(Ordering::Equal));
}

#[test]
fn test_null_only_equals_null() {
    assert_eq!(compare(&Value::Null, &Value::Null), Some(Ordering::Equal));
    assert_eq!(compare(&Value::Null, &num(0.0)), None);
    assert_eq!(compare(&Value::Null, &Value::from("")), None);
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_complement() {
    assert_eq!(unary(UnaryOp::Complement, &num(100.0)).unwrap(), num(-101.0));
    assert!(unary(UnaryOp::Complement, &Value::Sequence(vec![])).is_err());
}

#[test]
fn test_bitwise_truncates_operands() {
    let test_cases = vec![
        (BinOp::ShiftLeft, 100.8, 2.0, 400.0),
        (BinOp::BitOr, 10.0, 3.0, 11.0),
        (BinOp::BitXor, 10.0, 3.0, 9.0),
        (BinOp::BitAnd, 10.0, 3.0, 2.0),
    ];

    for (op, left, right, expected) in test_cases {
        assert_eq!(binary(op, &num(left), &num(right)).unwrap(), num(expected), "Failed for {}", op);
    }
}

#[test]
fn test_add_concatenates_with_text() {
    let result = binary(BinOp::Add, &Value::from("n="), &num(3.0)).unwrap();
    assert_eq!(result, Value::from("n=3"));
}

#[test]
fn test_arithmetic_rejects_text() {
    let err = binary(BinOp::Multiply, &Value::from("2"), &num(3.0)).unwrap_err();
    assert!(matches!(err, EvalError::UnsupportedOperator { op: "*", .. }));
}

#[test]
fn test_modulo_keeps_fraction() {
    assert_eq!(binary(BinOp::Modulo, &num(3.5), &num(7.0)).unwrap(), num(3.5));
}

#[test]
fn test_incomparable_relations_are_false() {
    let text = Value::from("abc");
    for op in [BinOp::LessThan, BinOp::LessEqual, BinOp::GreaterThan, BinOp::GreaterEqual] {
        assert_eq!(binary(op, &text, &num(1.0)).unwrap(), Value::Boolean(false));
    }
    assert_eq!(binary(BinOp::NotEqual, &text, &num(1.0)).unwrap(), Value::Boolean(true));
}

// ============================================================================
// Durations
// ============================================================================

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(&TimeDelta::seconds(90)), "00:01:30");
    assert_eq!(format_duration(&TimeDelta::hours(26)), "1.02:00:00");
    assert_eq!(format_duration(&TimeDelta::milliseconds(-1500)), "-00:00:01.5000000");
}

#[test]
fn test_parse_duration() {
    assert_eq!(parse_duration("00:01:30"), Some(TimeDelta::seconds(90)));
    assert_eq!(parse_duration("1.02:00"), Some(TimeDelta::hours(26)));
    assert_eq!(parse_duration("-00:00:01.5"), Some(TimeDelta::milliseconds(-1500)));
    assert_eq!(parse_duration("25:00:00"), None);
    assert_eq!(parse_duration("soon"), None);
}

#[test]
fn test_total_milliseconds_keeps_fraction() {
    assert_eq!(total_milliseconds(&TimeDelta::microseconds(1500)), 1.5);
    assert_eq!(total_milliseconds(&TimeDelta::milliseconds(-250)), -250.0);
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn test_json_objects_become_records() {
    let value = from_json(json!({"name": "Ada", "tags": ["a", "b"]}));
    let record = value.downcast_ref::<Record>().unwrap();
    assert_eq!(record.get("name"), Some(&Value::from("Ada")));
    assert_eq!(to_json(&value), json!({"name": "Ada", "tags": ["a", "b"]}));
}

#[test]
fn test_json_numbers() {
    assert_eq!(to_json(&num(3.0)), json!(3));
    assert_eq!(to_json(&num(2.5)), json!(2.5));
    assert_eq!(to_json(&num(f64::NAN)), json!(null));
}
