//! Operator semantics over [`Value`]s.
//!
//! `&&` and `||` short-circuit in the evaluator; the versions here assume both
//! operands are already evaluated.

use std::cmp::Ordering;

use chrono::{DateTime, TimeDelta, Utc};

use super::coerce::parse_number;
use super::{Value, compare, loose_eq};
use crate::ast::{BinOp, UnaryOp};
use crate::error::EvalError;

pub fn unary(op: UnaryOp, operand: &Value) -> Result<Value, EvalError> {
    match op {
        UnaryOp::Not => Ok(Value::Boolean(!operand.to_boolean())),
        UnaryOp::Negate => match operand {
            Value::Number(n) => Ok(Value::Number(-n)),
            Value::Duration(d) => Ok(Value::Duration(-*d)),
            _ => Err(EvalError::unsupported_unary(op.symbol(), operand)),
        },
        UnaryOp::Complement => {
            if !is_integral(operand) {
                return Err(EvalError::unsupported_unary(op.symbol(), operand));
            }
            Ok(Value::Number(!operand.to_i64() as f64))
        }
    }
}

pub fn binary(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match op {
        BinOp::Add => add(left, right),
        BinOp::Subtract => subtract(left, right),
        BinOp::Multiply | BinOp::Divide | BinOp::Modulo => arithmetic(op, left, right),

        BinOp::ShiftLeft | BinOp::ShiftRight | BinOp::BitAnd | BinOp::BitXor | BinOp::BitOr => {
            bitwise(op, left, right)
        }

        BinOp::Equal => Ok(Value::Boolean(loose_eq(left, right))),
        BinOp::NotEqual => Ok(Value::Boolean(!loose_eq(left, right))),
        BinOp::LessThan => Ok(relation(left, right, |o| o == Ordering::Less)),
        BinOp::LessEqual => Ok(relation(left, right, |o| o != Ordering::Greater)),
        BinOp::GreaterThan => Ok(relation(left, right, |o| o == Ordering::Greater)),
        BinOp::GreaterEqual => Ok(relation(left, right, |o| o != Ordering::Less)),

        BinOp::And => Ok(Value::Boolean(left.to_boolean() && right.to_boolean())),
        BinOp::Or => Ok(Value::Boolean(left.to_boolean() || right.to_boolean())),
    }
}

/// Incomparable operands make every relational operator false.
fn relation(left: &Value, right: &Value, holds: impl Fn(Ordering) -> bool) -> Value {
    Value::Boolean(compare(left, right).is_some_and(holds))
}

fn add(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::String(_), _) | (_, Value::String(_)) => {
            Ok(Value::String(left.to_text() + &right.to_text()))
        }
        (Value::DateTime(dt), Value::Duration(d)) | (Value::Duration(d), Value::DateTime(dt)) => {
            shift_datetime(dt, *d)
        }
        (Value::Duration(a), Value::Duration(b)) => a
            .checked_add(b)
            .map(Value::Duration)
            .ok_or(EvalError::Overflow { op: "+" }),
        _ => Err(EvalError::unsupported_binary("+", left, right)),
    }
}

fn subtract(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
        (Value::DateTime(a), Value::DateTime(b)) => Ok(Value::Duration(a.signed_duration_since(*b))),
        (Value::DateTime(dt), Value::Duration(d)) => dt
            .checked_sub_signed(*d)
            .map(Value::DateTime)
            .ok_or(EvalError::Overflow { op: "-" }),
        (Value::Duration(a), Value::Duration(b)) => a
            .checked_sub(b)
            .map(Value::Duration)
            .ok_or(EvalError::Overflow { op: "-" }),
        _ => Err(EvalError::unsupported_binary("-", left, right)),
    }
}

/// `*`, `/` and `%` follow IEEE 754: division by zero gives an infinity or `NaN`.
fn arithmetic(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (Value::Number(a), Value::Number(b)) = (left, right) else {
        return Err(EvalError::unsupported_binary(op.symbol(), left, right));
    };
    let result = match op {
        BinOp::Multiply => a * b,
        BinOp::Divide => a / b,
        _ => a % b,
    };
    Ok(Value::Number(result))
}

fn bitwise(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    if !is_integral(left) || !is_integral(right) {
        return Err(EvalError::unsupported_binary(op.symbol(), left, right));
    }
    let a = left.to_i64();
    let b = right.to_i64();

    let result = match op {
        // Shift counts wrap modulo 64.
        BinOp::ShiftLeft => a.wrapping_shl(right.to_i32() as u32),
        BinOp::ShiftRight => a.wrapping_shr(right.to_i32() as u32),
        BinOp::BitAnd => a & b,
        BinOp::BitXor => a ^ b,
        _ => a | b,
    };
    Ok(Value::Number(result as f64))
}

/// Operands accepted by `~`, the shifts and the bitwise operators.
fn is_integral(v: &Value) -> bool {
    match v {
        Value::Number(_) | Value::Boolean(_) | Value::Null => true,
        Value::String(s) => parse_number(s).is_some(),
        _ => false,
    }
}

/// Moves a date-time by a signed duration.
pub(crate) fn shift_datetime(dt: &DateTime<Utc>, by: TimeDelta) -> Result<Value, EvalError> {
    dt.checked_add_signed(by)
        .map(Value::DateTime)
        .ok_or(EvalError::Overflow { op: "+" })
}
