use std::fmt;

/// The closed set of token kinds produced by the [`Lexer`](crate::lexer::Lexer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of input. Also the lexer's token before the first `move_next`.
    Eof,

    /// A character no rule recognises. The parser rejects it.
    Unknown,

    // Literals and names
    /// Number literal
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.14
    /// 6.02e23
    /// ```
    Number,

    /// String literal enclosed in double quotes; `""` inside is a literal quote
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// "say ""hi"""
    /// ```
    String,

    /// Member name, method name or keyword (`true`, `false`, `null`)
    ///
    /// Starts with a letter or underscore, continues with letters, digits or underscores.
    Identifier,

    // Delimiters
    /// Member access or the start of a fractional literal (`.5`)
    Dot,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,

    // Arithmetic
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,

    // Comparison
    /// `=`, lexed but never valid in an expression
    Assign,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,

    // Bitwise and logical
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `&`
    Amp,
    /// `&&`
    AmpAmp,
    /// `|`
    Pipe,
    /// `||`
    PipePipe,
    /// `^`
    Caret,
    /// `!`
    Bang,
    /// `~`
    Tilde,

    // Conditional
    /// `?`
    Question,
    /// `:`
    Colon,
}

impl TokenKind {
    /// Fixed source text of punctuation tokens.
    pub fn symbol(self) -> Option<&'static str> {
        use TokenKind::*;
        let s = match self {
            Dot => ".",
            LParen => "(",
            RParen => ")",
            LBracket => "[",
            RBracket => "]",
            Comma => ",",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            Assign => "=",
            EqEq => "==",
            NotEq => "!=",
            Lt => "<",
            LtEq => "<=",
            Gt => ">",
            GtEq => ">=",
            Shl => "<<",
            Shr => ">>",
            Amp => "&",
            AmpAmp => "&&",
            Pipe => "|",
            PipePipe => "||",
            Caret => "^",
            Bang => "!",
            Tilde => "~",
            Question => "?",
            Colon => ":",
            Eof | Unknown | Number | String | Identifier => return None,
        };
        Some(s)
    }
}

/// A lexical token: its kind, its text and the char offset it starts at.
///
/// For string literals `text` holds the unescaped contents without quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Punctuation token whose text is its fixed symbol.
    pub fn punct(kind: TokenKind, position: usize) -> Self {
        Token::new(kind, kind.symbol().unwrap_or_default(), position)
    }

    pub fn eof(position: usize) -> Self {
        Token::new(TokenKind::Eof, "", position)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::String => write!(f, "\"{}\"", self.text.replace('"', "\"\"")),
            _ => write!(f, "{}", self.text),
        }
    }
}
