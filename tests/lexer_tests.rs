// tests/lexer_tests.rs

use dynexpr::ast::{Token, TokenKind};
use dynexpr::lexer::{EOI, Lexer};

fn kinds(input: &str) -> Vec<TokenKind> {
    Lexer::new(input).tokenize().into_iter().map(|t| t.kind).collect()
}

fn texts(input: &str) -> Vec<String> {
    Lexer::new(input).tokenize().into_iter().map(|t| t.text).collect()
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        (".", TokenKind::Dot),
        ("(", TokenKind::LParen),
        (")", TokenKind::RParen),
        ("[", TokenKind::LBracket),
        ("]", TokenKind::RBracket),
        (",", TokenKind::Comma),
        ("+", TokenKind::Plus),
        ("-", TokenKind::Minus),
        ("*", TokenKind::Star),
        ("/", TokenKind::Slash),
        ("%", TokenKind::Percent),
        ("=", TokenKind::Assign),
        ("<", TokenKind::Lt),
        (">", TokenKind::Gt),
        ("&", TokenKind::Amp),
        ("|", TokenKind::Pipe),
        ("^", TokenKind::Caret),
        ("!", TokenKind::Bang),
        ("~", TokenKind::Tilde),
        ("?", TokenKind::Question),
        (":", TokenKind::Colon),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        assert!(lexer.move_next(), "no token for {:?}", input);
        assert_eq!(lexer.token().kind, expected, "Failed for input: {}", input);
        assert!(!lexer.move_next());
    }
}

#[test]
fn test_double_char_tokens() {
    let test_cases = vec![
        ("==", TokenKind::EqEq),
        ("!=", TokenKind::NotEq),
        ("<=", TokenKind::LtEq),
        (">=", TokenKind::GtEq),
        ("<<", TokenKind::Shl),
        (">>", TokenKind::Shr),
        ("&&", TokenKind::AmpAmp),
        ("||", TokenKind::PipePipe),
    ];

    for (input, expected) in test_cases {
        assert_eq!(kinds(input), vec![expected], "Failed for input: {}", input);
    }
}

#[test]
fn test_operators_without_spaces() {
    assert_eq!(
        kinds("a<=b<<2"),
        vec![
            TokenKind::Identifier,
            TokenKind::LtEq,
            TokenKind::Identifier,
            TokenKind::Shl,
            TokenKind::Number,
        ]
    );
    assert_eq!(kinds("!!x"), vec![TokenKind::Bang, TokenKind::Bang, TokenKind::Identifier]);
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_number_literals() {
    assert_eq!(texts("42"), vec!["42"]);
    assert_eq!(texts("3.25"), vec!["3.25"]);
    assert_eq!(texts("1e3"), vec!["1e3"]);
    assert_eq!(texts("2.5E-3"), vec!["2.5E-3"]);
    assert_eq!(texts("7e+2"), vec!["7e+2"]);
}

#[test]
fn test_exponent_requires_digits() {
    assert_eq!(kinds("1e"), vec![TokenKind::Number, TokenKind::Identifier]);
    assert_eq!(texts("1e+"), vec!["1", "e", "+"]);
}

#[test]
fn test_leading_dot_is_separate_token() {
    assert_eq!(kinds(".5"), vec![TokenKind::Dot, TokenKind::Number]);
}

#[test]
fn test_dot_before_identifier_ends_number() {
    assert_eq!(
        kinds("1.ToString()"),
        vec![
            TokenKind::Number,
            TokenKind::Dot,
            TokenKind::Identifier,
            TokenKind::LParen,
            TokenKind::RParen,
        ]
    );
}

#[test]
fn test_minus_is_never_part_of_number() {
    assert_eq!(kinds("-5"), vec![TokenKind::Minus, TokenKind::Number]);
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_literal() {
    let tokens = Lexer::new(r#""hello world""#).tokenize();
    assert_eq!(tokens, vec![Token::new(TokenKind::String, "hello world", 0)]);
}

#[test]
fn test_doubled_quote_escape() {
    assert_eq!(texts(r#""say ""hi""""#), vec![r#"say "hi""#]);
}

#[test]
fn test_empty_string() {
    let tokens = Lexer::new(r#""""#).tokenize();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].text, "");
}

#[test]
fn test_unterminated_string_runs_to_end() {
    assert_eq!(texts(r#""abc + 1"#), vec!["abc + 1"]);
}

// ============================================================================
// Positions and lookahead
// ============================================================================

#[test]
fn test_token_positions() {
    let positions: Vec<usize> = Lexer::new("ab + \"x\" >= 10")
        .tokenize()
        .iter()
        .map(|t| t.position)
        .collect();
    assert_eq!(positions, vec![0, 3, 5, 9, 12]);
}

#[test]
fn test_unknown_character() {
    let tokens = Lexer::new("a # b").tokenize();
    assert_eq!(tokens[1], Token::new(TokenKind::Unknown, "#", 2));
}

#[test]
fn test_eof_is_sticky() {
    let mut lexer = Lexer::new("x");
    assert!(lexer.move_next());
    assert!(!lexer.move_next());
    assert!(!lexer.move_next());
    assert_eq!(lexer.token().kind, TokenKind::Eof);
}

#[test]
fn test_peek_token_does_not_consume() {
    let mut lexer = Lexer::new("a.b(1)");
    lexer.move_next(); // a
    lexer.move_next(); // .
    lexer.move_next(); // b

    assert_eq!(lexer.peek_token(0).text, "b");
    assert_eq!(lexer.peek_token(1).kind, TokenKind::LParen);
    assert_eq!(lexer.peek_token(2).kind, TokenKind::Number);
    assert_eq!(lexer.peek_token(10).kind, TokenKind::Eof);

    assert!(lexer.move_next());
    assert_eq!(lexer.token().kind, TokenKind::LParen);
}

#[test]
fn test_peek_char_relative_to_last_read() {
    let mut lexer = Lexer::new("x+");
    lexer.move_next();
    assert_eq!(lexer.peek_char(0), 'x');
    assert_eq!(lexer.peek_char(1), '+');
    assert_eq!(lexer.peek_char(-1), EOI);
    assert_eq!(lexer.peek_char(2), EOI);
}

#[test]
fn test_peek_char_before_first_read() {
    let lexer = Lexer::new("ab");
    assert_eq!(lexer.peek_char(0), EOI);
    assert_eq!(lexer.peek_char(1), 'a');
    assert_eq!(lexer.peek_char(2), 'b');
    assert_eq!(lexer.peek_char(3), EOI);
}

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn test_keywords_are_identifiers() {
    let tokens = Lexer::new("true false null").tokenize();
    assert_eq!(texts("true false null"), vec!["true", "false", "null"]);
    assert!(tokens.iter().all(|t| t.is(TokenKind::Identifier)));
}

#[test]
fn test_member_chain() {
    assert_eq!(
        kinds("d.items[4] >= 2"),
        vec![
            TokenKind::Identifier,
            TokenKind::Dot,
            TokenKind::Identifier,
            TokenKind::LBracket,
            TokenKind::Number,
            TokenKind::RBracket,
            TokenKind::GtEq,
            TokenKind::Number,
        ]
    );
}
