use std::fmt;

use crate::ast::{BinOp, UnaryOp};
use crate::value::Value;

/// Abstract Syntax Tree node representing a parsed expression.
///
/// Every node owns its children. A tree is built once per evaluation and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal number, string, boolean or null
    ///
    /// # Examples
    /// ```text
    /// 42
    /// .5
    /// "hello"
    /// true
    /// null
    /// ```
    Literal(Value),

    /// The evaluation context's root object.
    ///
    /// Never written in source: a bare identifier `name` parses to
    /// `Member { target: Root, name }`.
    Root,

    /// Property or field access
    ///
    /// # Examples
    /// ```text
    /// Name
    /// order.customer.Name
    /// ```
    Member { target: Box<Expr>, name: String },

    /// Indexer access with one or more arguments
    ///
    /// # Examples
    /// ```text
    /// items[0]
    /// matrix[1, 2]
    /// prices["EUR"]
    /// ```
    Index { target: Box<Expr>, args: Vec<Expr> },

    /// Method call, resolved by name and argument count
    ///
    /// # Examples
    /// ```text
    /// name.ToUpper()
    /// text.Substring(1, 3)
    /// ```
    Call {
        target: Box<Expr>,
        name: String,
        args: Vec<Expr>,
    },

    /// Prefix operation (`-x`, `!x`, `~x`)
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Binary operation (arithmetic, shift, comparison, bitwise, logical)
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Conditional (`cond ? then : else`); exactly one branch is evaluated
    Conditional {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
}

impl Expr {
    pub fn number(n: f64) -> Self {
        Expr::Literal(Value::Number(n))
    }

    /// Bare identifier, i.e. a member of the implicit root.
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Member {
            target: Box::new(Expr::Root),
            name: name.into(),
        }
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Numeric value of a constant number literal.
    pub fn as_number_literal(&self) -> Option<f64> {
        match self {
            Expr::Literal(Value::Number(n)) => Some(*n),
            _ => None,
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Expr]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

/// Renders fully parenthesised source text that parses back to an equivalent tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => match value.to_literal() {
                Some(text) => f.write_str(&text),
                None => write!(f, "\"{}\"", value.to_text().replace('"', "\"\"")),
            },
            Expr::Root => f.write_str("<root>"),
            Expr::Member { target, name } => match target.as_ref() {
                Expr::Root => f.write_str(name),
                target => write!(f, "{}.{}", target, name),
            },
            Expr::Index { target, args } => {
                write!(f, "{}[", target)?;
                write_args(f, args)?;
                f.write_str("]")
            }
            Expr::Call { target, name, args } => {
                write!(f, "{}.{}(", target, name)?;
                write_args(f, args)?;
                f.write_str(")")
            }
            Expr::Unary { op, operand } => write!(f, "({}{})", op, operand),
            Expr::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
            } => write!(f, "({} ? {} : {})", condition, then_branch, else_branch),
        }
    }
}
