pub mod ast;
pub mod binding;
pub mod cli;
pub mod convert;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::{BinOp, Expr, Token, TokenKind, UnaryOp};
pub use binding::{HostBinding, HostObject, HostRef, Method, ObjectBinding, Record, dispatch};
pub use error::{Error, EvalError, ParseError};
pub use evaluator::{EvalContext, EvalOptions, Evaluator, evaluate};
pub use lexer::Lexer;
pub use parser::Parser;
pub use value::{Value, compare, loose_eq};
