// tests/cli_tests.rs

use dynexpr::cli::{CheckOptions, CheckResult, CliError, execute_check, token_listing};
use dynexpr::{EvalError, EvalOptions, ParseError};
use pretty_assertions::assert_eq;
use serde_json::json;

fn eval(expression: &str, input: Option<&str>) -> Result<CheckResult, CliError> {
    execute_check(&CheckOptions {
        expression: expression.to_string(),
        input: input.map(str::to_string),
        ..CheckOptions::default()
    })
}

fn check(expression: &str) -> Result<CheckResult, CliError> {
    execute_check(&CheckOptions {
        expression: expression.to_string(),
        syntax_only: true,
        ..CheckOptions::default()
    })
}

// ============================================================================
// eval
// ============================================================================

#[test]
fn test_eval_against_json_input() {
    let input = r#"{"a": {"b": [1, 2, 3]}, "name": "Ada"}"#;
    assert_eq!(eval("a.b[1] * 10", Some(input)).unwrap(), CheckResult::Success(json!(20)));
    assert_eq!(
        eval("name + \" \" + a.b.Count", Some(input)).unwrap(),
        CheckResult::Success(json!("Ada 3"))
    );
}

#[test]
fn test_eval_without_input() {
    assert_eq!(eval("1 + 2", None).unwrap(), CheckResult::Success(json!(3)));
    assert_eq!(eval("7 / 2", None).unwrap(), CheckResult::Success(json!(3.5)));
    assert_eq!(eval("0 / 0", None).unwrap(), CheckResult::Success(json!(null)));
}

#[test]
fn test_eval_returns_structured_json() {
    let input = r#"{"order": {"id": 7, "lines": [{"sku": "x"}]}}"#;
    assert_eq!(
        eval("order", Some(input)).unwrap(),
        CheckResult::Success(json!({"id": 7, "lines": [{"sku": "x"}]}))
    );
    assert_eq!(
        eval("order[\"lines\"][0].sku", Some(input)).unwrap(),
        CheckResult::Success(json!("x"))
    );
}

#[test]
fn test_eval_invalid_json() {
    assert!(matches!(eval("a", Some("{not json")), Err(CliError::Json(_))));
}

#[test]
fn test_eval_errors_are_reported() {
    assert!(matches!(
        eval("missing", Some("{}")),
        Err(CliError::Eval(EvalError::UnknownMember { .. }))
    ));
    assert!(matches!(
        eval("anything", None),
        Err(CliError::Eval(EvalError::NullReference { .. }))
    ));
    assert!(matches!(eval("(1 + ", None), Err(CliError::Parse(_))));
}

#[test]
fn test_eval_honours_max_depth() {
    let result = execute_check(&CheckOptions {
        expression: "((1))".to_string(),
        eval: EvalOptions {
            max_depth: 2,
            ..EvalOptions::default()
        },
        ..CheckOptions::default()
    });
    assert!(matches!(result, Err(CliError::Parse(ParseError::TooDeep { limit: 2 }))));
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_prints_tree() {
    assert_eq!(
        check("1 + 2 * 3").unwrap(),
        CheckResult::SyntaxValid("(1 + (2 * 3))".to_string())
    );
    assert_eq!(
        check("a.b[0] ? x : -y").unwrap(),
        CheckResult::SyntaxValid("(a.b[0] ? x : (-y))".to_string())
    );
}

#[test]
fn test_check_does_not_evaluate() {
    assert_eq!(
        check("missing.member").unwrap(),
        CheckResult::SyntaxValid("missing.member".to_string())
    );
}

#[test]
fn test_check_rejects_trailing_input() {
    assert!(matches!(
        check("1 2"),
        Err(CliError::Parse(ParseError::UnexpectedToken { position: 2, .. }))
    ));
}

#[test]
fn test_cli_error_messages() {
    let err = check("1 +").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Parse error: Invalid token end of input at position 3"
    );
}

// ============================================================================
// tokens
// ============================================================================

#[test]
fn test_token_listing() {
    assert_eq!(
        token_listing("a + \"x\""),
        vec![
            "   0  Identifier   a",
            "   2  Plus         +",
            "   4  String       \"x\"",
        ]
    );
}

#[test]
fn test_token_listing_empty() {
    assert!(token_listing("   ").is_empty());
}

#[test]
fn test_check_honours_max_height() {
    let result = execute_check(&CheckOptions {
        expression: "1 + 2 + 3 + 4".to_string(),
        syntax_only: true,
        eval: EvalOptions {
            max_height: 3,
            ..EvalOptions::default()
        },
        ..CheckOptions::default()
    });
    assert!(matches!(result, Err(CliError::Parse(ParseError::TooDeep { limit: 3 }))));
}
