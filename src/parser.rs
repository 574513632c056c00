use crate::{
    ast::{BinOp, Expr, Token, TokenKind, UnaryOp},
    error::ParseError,
    lexer::Lexer,
    value::Value,
};

/// Recursive-descent parser over a pull-based [`Lexer`].
///
/// Grammar, lowest precedence first:
///
/// ```text
/// expression  := conditional
/// conditional := or ( "?" expression ":" expression )?
/// or          := and ( "||" and )*
/// and         := bitor ( "&&" bitor )*
/// bitor       := bitxor ( "|" bitxor )*
/// bitxor      := bitand ( "^" bitand )*
/// bitand      := equality ( "&" equality )*
/// equality    := relational ( ( "==" | "!=" ) relational )*
/// relational  := shift ( ( "<" | "<=" | ">" | ">=" ) shift )*
/// shift       := additive ( ( "<<" | ">>" ) additive )*
/// additive    := multiplicative ( ( "+" | "-" ) multiplicative )*
/// multiplicative := unary ( ( "*" | "/" | "%" ) unary )*
/// unary       := ( "-" | "+" | "!" | "~" ) unary | postfix
/// postfix     := primary ( "." identifier ( "(" args ")" )? | "[" args "]" )*
/// primary     := number | "." number | string | "true" | "false" | "null"
///              | identifier | "(" expression ")"
/// ```
pub struct Parser {
    lexer: Lexer,
    depth: usize,
    max_depth: usize,
    max_height: usize,
}

/// A parsed subtree with its height, so the parser can refuse trees that
/// would be too tall to walk.
struct Node {
    expr: Expr,
    height: usize,
}

type Parsed = Result<Node, ParseError>;

impl Parser {
    pub const DEFAULT_MAX_DEPTH: usize = 64;
    pub const DEFAULT_MAX_HEIGHT: usize = 256;

    pub fn new(mut lexer: Lexer) -> Self {
        lexer.move_next();
        Parser {
            lexer,
            depth: 0,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_height: Self::DEFAULT_MAX_HEIGHT,
        }
    }

    /// Bounds nesting of parentheses, argument lists, conditional branches and
    /// prefix operators.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Bounds the height of the tree, which grows with every operator,
    /// member access, index and call, including the ones in long
    /// left-associative chains such as `1 + 1 + 1` or `a.b.c`.
    pub fn with_max_height(mut self, max_height: usize) -> Self {
        self.max_height = max_height;
        self
    }

    fn current(&self) -> &Token {
        self.lexer.token()
    }

    fn advance(&mut self) {
        self.lexer.move_next();
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().is(kind)
    }

    fn expect(&mut self, expected: TokenKind) -> Result<(), ParseError> {
        if !self.check(expected) {
            return Err(ParseError::UnexpectedToken {
                expected: expected.symbol().unwrap_or("end of input").to_string(),
                found: self.current().to_string(),
                position: self.current().position,
            });
        }
        self.advance();
        Ok(())
    }

    fn invalid_token(&self) -> ParseError {
        ParseError::InvalidToken {
            text: self.current().to_string(),
            position: self.current().position,
        }
    }

    /// Runs `rule` one nesting level deeper.
    fn nested(&mut self, rule: fn(&mut Self) -> Parsed) -> Parsed {
        if self.depth >= self.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    fn node(&self, expr: Expr, height: usize) -> Parsed {
        if height > self.max_height {
            return Err(ParseError::TooDeep {
                limit: self.max_height,
            });
        }
        Ok(Node { expr, height })
    }

    fn leaf(expr: Expr) -> Parsed {
        Ok(Node { expr, height: 1 })
    }

    fn fold(&self, op: BinOp, left: Node, right: Node) -> Parsed {
        let height = 1 + left.height.max(right.height);
        self.node(Expr::binary(op, left.expr, right.expr), height)
    }

    /// Parse primary expressions: literals, identifiers and parenthesised groups
    fn parse_primary(&mut self) -> Parsed {
        let token = self.current().clone();

        match token.kind {
            TokenKind::Number => {
                self.advance();
                Self::leaf(Expr::number(parse_number(&token.text, token.position)?))
            }

            // `.5`: the lexer never starts a number with a dot
            TokenKind::Dot => {
                self.advance();
                if !self.check(TokenKind::Number) {
                    return Err(ParseError::InvalidToken {
                        text: token.to_string(),
                        position: token.position,
                    });
                }
                let fraction = format!("0.{}", self.current().text);
                self.advance();
                Self::leaf(Expr::number(parse_number(&fraction, token.position)?))
            }

            TokenKind::String => {
                self.advance();
                Self::leaf(Expr::Literal(Value::String(token.text)))
            }

            TokenKind::Identifier => {
                self.advance();
                Self::leaf(match token.text.as_str() {
                    "true" => Expr::Literal(Value::Boolean(true)),
                    "false" => Expr::Literal(Value::Boolean(false)),
                    "null" => Expr::Literal(Value::Null),
                    _ => Expr::ident(token.text),
                })
            }

            TokenKind::LParen => {
                self.advance();
                let node = self.expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(node)
            }

            _ => Err(self.invalid_token()),
        }
    }

    /// Comma-separated expressions between `open` and `close`, with the
    /// height of the tallest one. No trailing comma.
    fn parse_arguments(
        &mut self,
        open: TokenKind,
        close: TokenKind,
    ) -> Result<(Vec<Expr>, usize), ParseError> {
        self.expect(open)?;

        let mut args = Vec::new();
        let mut height = 0;
        if self.check(close) {
            self.advance();
            return Ok((args, height));
        }

        loop {
            let arg = self.expression()?;
            height = height.max(arg.height);
            args.push(arg.expr);
            if self.check(TokenKind::Comma) {
                self.advance();
                continue;
            }
            self.expect(close)?;
            return Ok((args, height));
        }
    }

    fn parse_postfix(&mut self) -> Parsed {
        let mut node = self.parse_primary()?;

        loop {
            if self.check(TokenKind::Dot) {
                let dot = self.current().position;
                self.advance(); // consume '.'

                if !self.check(TokenKind::Identifier) {
                    return Err(ParseError::IdentifierExpected {
                        found: self.current().to_string(),
                        position: dot,
                    });
                }
                let name = self.current().text.clone();

                if self.lexer.peek_token(1).is(TokenKind::LParen) {
                    self.advance(); // consume name, now on '('
                    let (args, height) =
                        self.parse_arguments(TokenKind::LParen, TokenKind::RParen)?;
                    let call = Expr::Call {
                        target: Box::new(node.expr),
                        name,
                        args,
                    };
                    node = self.node(call, 1 + node.height.max(height))?;
                } else {
                    self.advance();
                    let member = Expr::Member {
                        target: Box::new(node.expr),
                        name,
                    };
                    node = self.node(member, node.height + 1)?;
                }
            } else if self.check(TokenKind::LBracket) {
                let (args, height) =
                    self.parse_arguments(TokenKind::LBracket, TokenKind::RBracket)?;
                let index = Expr::Index {
                    target: Box::new(node.expr),
                    args,
                };
                node = self.node(index, 1 + node.height.max(height))?;
            } else {
                break;
            }
        }
        Ok(node)
    }

    fn parse_unary(&mut self) -> Parsed {
        let op = match self.current().kind {
            TokenKind::Minus => UnaryOp::Negate,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Tilde => UnaryOp::Complement,
            // Unary plus is a no-op
            TokenKind::Plus => {
                self.advance();
                return self.nested(Self::parse_unary);
            }
            _ => return self.parse_postfix(),
        };

        self.advance();
        let operand = self.nested(Self::parse_unary)?;
        self.node(Expr::unary(op, operand.expr), operand.height + 1)
    }

    fn parse_multiplicative(&mut self) -> Parsed {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinOp::Multiply,
                TokenKind::Slash => BinOp::Divide,
                TokenKind::Percent => BinOp::Modulo,
                _ => break,
            };

            self.advance();
            let right = self.parse_unary()?;
            left = self.fold(op, left, right)?;
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Parsed {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Subtract,
                _ => break,
            };

            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.fold(op, left, right)?;
        }
        Ok(left)
    }

    fn parse_shift(&mut self) -> Parsed {
        let mut left = self.parse_additive()?;

        loop {
            let op = match self.current().kind {
                TokenKind::Shl => BinOp::ShiftLeft,
                TokenKind::Shr => BinOp::ShiftRight,
                _ => break,
            };

            self.advance();
            let mut right = self.parse_additive()?;

            // A constant shift count is narrowed to its integer value here.
            if let Some(count) = right.expr.as_number_literal() {
                right.expr = Expr::number(Value::Number(count).to_i32() as f64);
            }
            left = self.fold(op, left, right)?;
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Parsed {
        let mut left = self.parse_shift()?;

        loop {
            let op = match self.current().kind {
                TokenKind::Lt => BinOp::LessThan,
                TokenKind::LtEq => BinOp::LessEqual,
                TokenKind::Gt => BinOp::GreaterThan,
                TokenKind::GtEq => BinOp::GreaterEqual,
                _ => break,
            };

            self.advance();
            let right = self.parse_shift()?;
            left = self.fold(op, left, right)?;
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Parsed {
        let mut left = self.parse_relational()?;

        loop {
            let op = match self.current().kind {
                TokenKind::EqEq => BinOp::Equal,
                TokenKind::NotEq => BinOp::NotEqual,
                _ => break,
            };

            self.advance();
            let right = self.parse_relational()?;
            left = self.fold(op, left, right)?;
        }
        Ok(left)
    }

    fn parse_bit_and(&mut self) -> Parsed {
        let mut left = self.parse_equality()?;

        while self.check(TokenKind::Amp) {
            self.advance();
            let right = self.parse_equality()?;
            left = self.fold(BinOp::BitAnd, left, right)?;
        }
        Ok(left)
    }

    fn parse_bit_xor(&mut self) -> Parsed {
        let mut left = self.parse_bit_and()?;

        while self.check(TokenKind::Caret) {
            self.advance();
            let right = self.parse_bit_and()?;
            left = self.fold(BinOp::BitXor, left, right)?;
        }
        Ok(left)
    }

    fn parse_bit_or(&mut self) -> Parsed {
        let mut left = self.parse_bit_xor()?;

        while self.check(TokenKind::Pipe) {
            self.advance();
            let right = self.parse_bit_xor()?;
            left = self.fold(BinOp::BitOr, left, right)?;
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Parsed {
        let mut left = self.parse_bit_or()?;

        while self.check(TokenKind::AmpAmp) {
            self.advance();
            let right = self.parse_bit_or()?;
            left = self.fold(BinOp::And, left, right)?;
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Parsed {
        let mut left = self.parse_and()?;

        while self.check(TokenKind::PipePipe) {
            self.advance();
            let right = self.parse_and()?;
            left = self.fold(BinOp::Or, left, right)?;
        }
        Ok(left)
    }

    fn parse_conditional(&mut self) -> Parsed {
        let condition = self.parse_or()?;

        if !self.check(TokenKind::Question) {
            return Ok(condition);
        }
        self.advance();
        let then_branch = self.expression()?;
        self.expect(TokenKind::Colon)?;
        let else_branch = self.expression()?;

        let height = 1 + condition
            .height
            .max(then_branch.height)
            .max(else_branch.height);
        let conditional = Expr::Conditional {
            condition: Box::new(condition.expr),
            then_branch: Box::new(then_branch.expr),
            else_branch: Box::new(else_branch.expr),
        };
        self.node(conditional, height)
    }

    fn expression(&mut self) -> Parsed {
        self.nested(Self::parse_conditional)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.expression().map(|node| node.expr)
    }

    /// Parses one expression and stops; anything after it is left unread.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        self.parse_expression()
    }

    /// Parses one expression and requires the input to end there.
    pub fn parse_to_end(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Eof)?;
        Ok(expr)
    }

    /// The token the parser stopped on.
    pub fn current_token(&self) -> &Token {
        self.current()
    }
}

fn parse_number(text: &str, position: usize) -> Result<f64, ParseError> {
    text.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
        text: text.to_string(),
        position,
    })
}

/// Parses `text` with default limits, ignoring anything after the first
/// complete expression.
pub fn parse(text: &str) -> Result<Expr, ParseError> {
    Parser::new(Lexer::new(text)).parse()
}

/// Parses `text` with default limits, rejecting trailing input.
pub fn parse_to_end(text: &str) -> Result<Expr, ParseError> {
    Parser::new(Lexer::new(text)).parse_to_end()
}
