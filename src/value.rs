use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use crate::binding::{HostObject, HostRef};
use crate::error::EvalError;

pub mod coerce;
pub mod duration;
pub mod ops;

pub use coerce::{compare, loose_eq};

/// A dynamically typed value: every literal, intermediate result and host
/// member value during evaluation.
///
/// Values are immutable once built. Equality between values as the language
/// sees it (`==`, ordering) is defined by [`compare`], not by `PartialEq`;
/// `PartialEq` is structural and exists for hosts and tests.
///
/// # Examples
///
/// ```
/// use dynexpr::Value;
///
/// let null = Value::Null;
/// let number = Value::from(42);
/// let text = Value::from("hello");
/// let list = Value::from(vec![Value::from(1), Value::from(2)]);
///
/// assert_eq!(number, Value::Number(42.0));
/// assert_eq!(list.type_name(), "sequence");
/// assert!(null.is_null());
/// assert_eq!(text.to_text(), "hello");
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent value
    Null,

    /// Every number is a double
    Number(f64),

    Boolean(bool),

    /// UTF-8 text
    String(String),

    /// Absolute instant
    DateTime(DateTime<Utc>),

    /// Signed time span
    Duration(TimeDelta),

    /// Ordered, indexable collection (host lists)
    Sequence(Vec<Value>),

    /// Any other host object, carried through unevaluated
    Opaque(HostRef),
}

impl Value {
    /// Wraps a host object.
    pub fn object<T: HostObject>(object: T) -> Self {
        Value::Opaque(HostRef::new(object))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Human-readable type name for diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::Duration(_) => "duration",
            Value::Sequence(_) => "sequence",
            Value::Opaque(host) => host.type_name(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Downcasts an opaque value to a concrete host type.
    pub fn downcast_ref<T: HostObject>(&self) -> Option<&T> {
        match self {
            Value::Opaque(host) => host.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Source text that parses and evaluates back to this value.
    ///
    /// Only null, booleans, numbers and strings have one. Negative and
    /// non-finite numbers are written as parenthesised expressions, since the
    /// grammar has no signed or infinite literals.
    pub fn to_literal(&self) -> Option<String> {
        match self {
            Value::Null => Some("null".to_string()),
            Value::Boolean(b) => Some(b.to_string()),
            Value::Number(n) if n.is_nan() => Some("(0 / 0)".to_string()),
            Value::Number(n) if n.is_infinite() => Some(
                if *n > 0.0 { "(1 / 0)" } else { "(-1 / 0)" }.to_string(),
            ),
            Value::Number(n) if n.is_sign_negative() => Some(format!("(-{})", -n)),
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(format!("\"{}\"", s.replace('"', "\"\""))),
            _ => None,
        }
    }
}

/// Structural equality; opaque values compare by identity, then by the host's
/// own structural equality.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<TimeDelta> for Value {
    fn from(d: TimeDelta) -> Self {
        Value::Duration(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<HostRef> for Value {
    fn from(host: HostRef) -> Self {
        Value::Opaque(host)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Host decimals become doubles; precision beyond `f64` is lost.
impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Number(d.to_f64().unwrap_or(f64::NAN))
    }
}

/// Exact decimal view of a numeric value, for host methods that need one.
impl TryFrom<&Value> for Decimal {
    type Error = EvalError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let n = value.to_number();
        Decimal::from_f64(n).ok_or_else(|| {
            EvalError::InvalidArgument(format!("{} is not representable as a decimal", value))
        })
    }
}
