//! Property-based tests for the parser, evaluator and coercion rules.

use dynexpr::parser;
use dynexpr::{Value, compare, evaluate, loose_eq};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Values with a literal form.
fn arb_literal() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Boolean),
        any::<f64>().prop_map(Value::Number),
        "\\PC{0,20}".prop_map(Value::String),
    ]
}

/// Scalars that exercise the mixed-type comparison rules.
fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Boolean),
        (-1000.0f64..1000.0).prop_map(Value::Number),
        (-50i32..50).prop_map(Value::from),
        "[0-9a-z. ]{0,5}".prop_map(Value::String),
    ]
}

fn arb_ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}".prop_filter("keywords are literals", |s| {
        !matches!(s.as_str(), "true" | "false" | "null")
    })
}

fn arb_binop() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("+"),
        Just("-"),
        Just("*"),
        Just("/"),
        Just("%"),
        Just("<<"),
        Just("&"),
        Just("^"),
        Just("=="),
        Just("<"),
        Just(">="),
        Just("&&"),
        Just("||"),
    ]
}

/// Syntactically valid expression text.
fn arb_expr() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (0u32..1000).prop_map(|n| n.to_string()),
        "[a-zA-Z0-9 ]{0,8}".prop_map(|s| format!("\"{}\"", s)),
        arb_ident(),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), arb_binop(), inner.clone())
                .prop_map(|(l, op, r)| format!("{} {} {}", l, op, r)),
            inner.clone().prop_map(|e| format!("({})", e)),
            inner.clone().prop_map(|e| format!("-{}", e)),
            inner.clone().prop_map(|e| format!("!{}", e)),
            (inner.clone(), arb_ident()).prop_map(|(e, m)| format!("({}).{}", e, m)),
            (inner.clone(), inner.clone()).prop_map(|(e, i)| format!("({})[{}]", e, i)),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(c, t, e)| format!("{} ? {} : {}", c, t, e)),
            (arb_ident(), inner).prop_map(|(m, a)| format!("x.{}({})", m, a)),
        ]
    })
}

fn same(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_nan() => y.is_nan(),
        _ => a == b,
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// A literal's text evaluates back to the same value.
    #[test]
    fn literal_round_trip(value in arb_literal()) {
        let text = value.to_literal().expect("scalar values have a literal form");
        let result = evaluate(&text, &Value::Null).expect("literal text evaluates");
        prop_assert!(same(&result, &value), "{} gave {:?}, expected {:?}", text, result, value);
    }

    /// Parsing arbitrary text either succeeds or reports an error.
    #[test]
    fn parser_never_panics(input in "\\PC{0,40}") {
        let _ = parser::parse(&input);
        let _ = evaluate(&input, &Value::Null);
    }

    /// The printed tree parses back to the same tree.
    #[test]
    fn printed_tree_reparses(text in arb_expr()) {
        let expr = parser::parse_to_end(&text).expect("generated text is valid");
        let printed = expr.to_string();
        let reparsed = parser::parse_to_end(&printed).expect("printed tree is valid");
        prop_assert_eq!(reparsed, expr, "printed as {}", printed);
    }

    /// Swapping the operands reverses the ordering.
    #[test]
    fn compare_is_antisymmetric(a in arb_scalar(), b in arb_scalar()) {
        prop_assert_eq!(compare(&a, &b), compare(&b, &a).map(|o| o.reverse()));
    }

    #[test]
    fn equality_is_symmetric(a in arb_scalar(), b in arb_scalar()) {
        prop_assert_eq!(loose_eq(&a, &b), loose_eq(&b, &a));
    }

    /// `!=` is always the negation of `==`, even for incomparable values.
    #[test]
    fn not_equal_negates_equal(a in arb_scalar(), b in arb_scalar()) {
        let root: Value = dynexpr::Record::new().with("a", a).with("b", b).into();
        let eq = evaluate("a == b", &root).expect("== is total");
        let ne = evaluate("a != b", &root).expect("!= is total");
        prop_assert_eq!(eq.to_boolean(), !ne.to_boolean());
    }

    /// Double negation yields the truthiness of any value.
    #[test]
    fn double_negation_is_truthiness(value in arb_scalar()) {
        let root: Value = dynexpr::Record::new().with("v", value.clone()).into();
        prop_assert_eq!(evaluate("!!v", &root), Ok(Value::Boolean(value.to_boolean())));
    }
}
