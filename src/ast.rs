//! # dynexpr - Abstract Syntax Tree
//!
//! This module defines the tokens and the expression tree for dynexpr, a small
//! embeddable expression language evaluated against a host-supplied root object.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (literals, member access, calls, operations)
//! - **[operators]** - Unary and binary operators
//!
//! ## Quick Start
//!
//! ```text
//! c[2] + d.items[4] * 2 > 10 ? a.Name : "none"
//! ```
//!
//! Bare identifiers (`c`, `d`, `a`) are members of the root object handed to
//! the evaluator. Everything else is ordinary operator syntax.
//!
//! ## Precedence
//!
//! From lowest to highest; every binary level is left-associative and the
//! conditional is right-recursive:
//!
//! ```text
//! ?:   ||   &&   |   ^   &   == !=   < <= > >=   << >>   + -   * / %   unary   postfix
//! ```
//!
//! ## Examples
//!
//! ### Arithmetic
//!
//! ```text
//! (1 + (3 - 1) * 4) / 3
//! ```
//!
//! ### Member chains, indexers and calls
//!
//! ```text
//! order.lines[0].Product.Name.ToUpper()
//! ```
//!
//! ### Conditions
//!
//! ```text
//! age >= 18 && country == "NL" ? "adult" : "minor"
//! ```
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::Expr;
pub use operators::{BinOp, UnaryOp};
pub use tokens::{Token, TokenKind};
