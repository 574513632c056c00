//! Error types for dynexpr.
//!
//! Both kinds are terminal: the engine never retries or recovers, and never
//! produces a partial result.

use thiserror::Error;

/// Malformed expression text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A specific token was required here.
    #[error("Expected token {expected}, but {found} at position {position}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: usize,
    },

    /// The token cannot start an operand (including unknown characters).
    #[error("Invalid token {text} at position {position}")]
    InvalidToken { text: String, position: usize },

    /// A number literal that does not parse as a floating point value.
    #[error("Invalid number literal {text} at position {position}")]
    InvalidNumber { text: String, position: usize },

    /// `.` not followed by a member name.
    #[error("Cannot parse .{found} at position {position}")]
    IdentifierExpected { found: String, position: usize },

    /// Nesting exceeded the configured bound.
    #[error("Expression nesting exceeds the limit of {limit}")]
    TooDeep { limit: usize },
}

/// A well-formed expression that failed while evaluating.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// No operator rule matches the operand types.
    #[error("Cannot do {operands} for operator {op}")]
    UnsupportedOperator { op: &'static str, operands: String },

    /// No property or field with that name.
    #[error("Cannot get property {name} from {type_name}")]
    UnknownMember { type_name: String, name: String },

    /// No method with that name takes this many arguments.
    #[error("Cannot invoke method {name} with {arity} argument(s) on {type_name}")]
    UnknownMethod {
        type_name: String,
        name: String,
        arity: usize,
    },

    /// The target defines no indexer for these arguments.
    #[error("Cannot get index value from {type_name}")]
    NoIndexer { type_name: String },

    #[error("Index {index} is out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("Key '{key}' not found")]
    KeyNotFound { key: String },

    /// Member, index or call on `null`.
    #[error("Cannot {access} on null")]
    NullReference { access: String },

    /// Date or duration arithmetic left the representable range.
    #[error("Arithmetic overflow in {op}")]
    Overflow { op: &'static str },

    /// A host or built-in method rejected an argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failure raised by host code.
    #[error("{0}")]
    Host(String),
}

impl EvalError {
    pub fn unsupported_unary(op: &'static str, operand: &crate::Value) -> Self {
        EvalError::UnsupportedOperator {
            op,
            operands: format!("{}{}", op, operand.type_name()),
        }
    }

    pub fn unsupported_binary(op: &'static str, left: &crate::Value, right: &crate::Value) -> Self {
        EvalError::UnsupportedOperator {
            op,
            operands: format!("{} {} {}", left.type_name(), op, right.type_name()),
        }
    }
}

/// Either failure of [`evaluate`](crate::evaluate).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Evaluation error: {0}")]
    Evaluate(#[from] EvalError),
}
