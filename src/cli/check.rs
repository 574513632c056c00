//! Evaluate or validate dynexpr expressions against JSON input

use super::CliError;
use crate::convert::{from_json, to_json};
use crate::{EvalOptions, Evaluator, Lexer, Parser, Value};

/// Options for the `eval` and `check` commands
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The expression to evaluate
    pub expression: String,
    /// JSON root object; evaluation runs against `null` without one
    pub input: Option<String>,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
    pub eval: EvalOptions,
}

/// Result of a check operation
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Syntax is valid; carries the fully parenthesised tree
    SyntaxValid(String),
    /// Expression evaluated successfully with JSON output
    Success(serde_json::Value),
}

/// Execute an eval or check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    if options.syntax_only {
        // Validation is strict: trailing input is an error here.
        let expr = Parser::new(Lexer::new(&options.expression))
            .with_max_depth(options.eval.max_depth)
            .with_max_height(options.eval.max_height)
            .parse_to_end()?;
        return Ok(CheckResult::SyntaxValid(expr.to_string()));
    }

    let root = match &options.input {
        Some(json) => {
            let json_value: serde_json::Value = serde_json::from_str(json)?;
            from_json(json_value)
        }
        None => Value::Null,
    };

    let evaluator = Evaluator::new().with_options(options.eval);
    let result = evaluator.evaluate(&options.expression, &root)?;
    Ok(CheckResult::Success(to_json(&result)))
}

/// One line per token: position, kind and text.
pub fn token_listing(expression: &str) -> Vec<String> {
    Lexer::new(expression)
        .tokenize()
        .into_iter()
        .map(|token| format!("{:>4}  {:<12} {}", token.position, format!("{:?}", token.kind), token))
        .collect()
}
