use crate::ast::{Token, TokenKind};

/// Character returned for any position outside the input.
pub const EOI: char = '\0';

/// Pull-based tokenizer.
///
/// The lexer does not scan ahead: each [`move_next`](Lexer::move_next) scans exactly
/// one token starting at the cursor. The cursor is the index of the next unread
/// character, so `0` means nothing has been read yet and `input.len()` means the
/// input is exhausted. It only moves backwards when [`peek_token`](Lexer::peek_token)
/// restores a snapshot.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    token: Token,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            token: Token::eof(0),
        }
    }

    /// The current token. `Eof` before the first `move_next`.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Index of the next unread character.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Advances to the next token. Returns `false` once the end of input is reached.
    pub fn move_next(&mut self) -> bool {
        self.token = self.next_token();
        !self.token.is(TokenKind::Eof)
    }

    /// Character `delta` places from the last consumed one; `peek_char(1)` is the
    /// next unread character. Returns [`EOI`] outside the input.
    pub fn peek_char(&self, delta: isize) -> char {
        let index = self.position as isize - 1 + delta;
        if index < 0 {
            EOI
        } else {
            self.char_at(index as usize)
        }
    }

    /// Looks `delta` tokens ahead without consuming anything.
    ///
    /// `peek_token(0)` is the current token. Scanning stops early at end of input.
    pub fn peek_token(&mut self, delta: usize) -> Token {
        let saved = self.position;
        let mut token = self.token.clone();
        for _ in 0..delta {
            if token.is(TokenKind::Eof) {
                break;
            }
            token = self.next_token();
        }
        self.position = saved;
        token
    }

    /// Scans the remaining input into a vector, without the final `Eof`.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while self.move_next() {
            tokens.push(self.token.clone());
        }
        tokens
    }

    fn char_at(&self, index: usize) -> char {
        self.input.get(index).copied().unwrap_or(EOI)
    }

    fn current_char(&self) -> char {
        self.char_at(self.position)
    }

    fn lookahead(&self, offset: usize) -> char {
        self.char_at(self.position + offset)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while !self.is_eof() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    fn slice(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        if self.is_eof() {
            return Token::eof(self.input.len());
        }

        let start = self.position;
        let ch = self.current_char();

        if is_identifier_start(ch) {
            return self.read_identifier(start);
        }
        if ch.is_ascii_digit() {
            return self.read_number(start);
        }
        if ch == '"' {
            return self.read_string(start);
        }

        let kind = match ch {
            '.' => TokenKind::Dot,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '^' => TokenKind::Caret,
            '~' => TokenKind::Tilde,
            '?' => TokenKind::Question,
            ':' => TokenKind::Colon,
            '=' => self.pair('=', TokenKind::EqEq, TokenKind::Assign),
            '!' => self.pair('=', TokenKind::NotEq, TokenKind::Bang),
            '&' => self.pair('&', TokenKind::AmpAmp, TokenKind::Amp),
            '|' => self.pair('|', TokenKind::PipePipe, TokenKind::Pipe),
            '<' => match self.lookahead(1) {
                '=' => self.pair('=', TokenKind::LtEq, TokenKind::Lt),
                _ => self.pair('<', TokenKind::Shl, TokenKind::Lt),
            },
            '>' => match self.lookahead(1) {
                '=' => self.pair('=', TokenKind::GtEq, TokenKind::Gt),
                _ => self.pair('>', TokenKind::Shr, TokenKind::Gt),
            },
            other => {
                self.advance();
                return Token::new(TokenKind::Unknown, other.to_string(), start);
            }
        };

        self.advance();
        Token::punct(kind, start)
    }

    /// Merges the current character with `second` when it follows immediately.
    /// Leaves the cursor on the last character of the operator.
    fn pair(&mut self, second: char, double: TokenKind, single: TokenKind) -> TokenKind {
        if self.lookahead(1) == second {
            self.advance();
            double
        } else {
            single
        }
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while is_identifier_part(self.current_char()) {
            self.advance();
        }
        Token::new(TokenKind::Identifier, self.slice(start), start)
    }

    fn consume_digits(&mut self) {
        while self.current_char().is_ascii_digit() {
            self.advance();
        }
    }

    fn read_number(&mut self, start: usize) -> Token {
        self.consume_digits();

        // `1.5` but not `1.ToString()`
        if self.current_char() == '.' && self.lookahead(1).is_ascii_digit() {
            self.advance();
            self.consume_digits();
        }

        if matches!(self.current_char(), 'e' | 'E') {
            let signed = matches!(self.lookahead(1), '+' | '-');
            let digit_offset = if signed { 2 } else { 1 };
            if self.lookahead(digit_offset).is_ascii_digit() {
                self.position += digit_offset;
                self.consume_digits();
            }
        }

        Token::new(TokenKind::Number, self.slice(start), start)
    }

    fn read_string(&mut self, start: usize) -> Token {
        self.advance(); // opening quote
        let mut text = String::new();

        while !self.is_eof() {
            let ch = self.current_char();
            self.advance();
            if ch == '"' {
                if self.current_char() == '"' && !self.is_eof() {
                    text.push('"');
                    self.advance();
                } else {
                    return Token::new(TokenKind::String, text, start);
                }
            } else {
                text.push(ch);
            }
        }

        // Unterminated: the literal runs to the end of input.
        Token::new(TokenKind::String, text, start)
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_identifier_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
