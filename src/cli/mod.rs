//! CLI support for dynexpr
//!
//! Programmatic access to the `dynexpr` binary's commands, for embedding in
//! other tools and for testing without a process boundary.

mod check;

pub use check::{CheckOptions, CheckResult, execute_check, token_listing};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Evaluation error: {0}")]
    Eval(#[from] crate::EvalError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<crate::Error> for CliError {
    fn from(e: crate::Error) -> Self {
        match e {
            crate::Error::Parse(e) => CliError::Parse(e),
            crate::Error::Evaluate(e) => CliError::Eval(e),
        }
    }
}
