//! Recursive-descent parser for QLab scripts.

use crate::ast::{BinOp, Expr, Program, Stmt, UnaryOp};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse a QLab script source string into a [`Program`].
pub fn parse(source: &str) -> ParseResult<Program> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()
}

/// Parser state.
struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    /// Byte offsets where each source line starts, for error reporting.
    line_starts: Vec<usize>,
}

impl Parser {
    /// Create a new parser from source.
    fn new(source: &str) -> ParseResult<Self> {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }

        let token_results = tokenize(source);
        let mut tokens = Vec::new();

        for result in token_results {
            match result {
                Ok(t) => tokens.push(t),
                Err((span, msg)) => {
                    return Err(ParseError::LexerError {
                        line: line_of(&line_starts, span.start),
                        message: msg,
                    });
                }
            }
        }

        Ok(Self {
            tokens,
            pos: 0,
            line_starts,
        })
    }

    /// Line number of the current token (1-based).
    fn line(&self) -> usize {
        let offset = self
            .tokens
            .get(self.pos.min(self.tokens.len().saturating_sub(1)))
            .map_or(0, |t| t.span.start);
        line_of(&self.line_starts, offset)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Peek at the current token.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Peek one token past the current one.
    fn peek_second(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1).map(|t| &t.token)
    }

    /// Advance and return the current token.
    fn advance(&mut self) -> Option<Token> {
        if self.is_eof() {
            return None;
        }
        let token = self.tokens[self.pos].token.clone();
        self.pos += 1;
        Some(token)
    }

    /// Expect a specific token.
    fn expect(&mut self, expected: &Token) -> ParseResult<()> {
        let line = self.line();
        let found = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof(format!("expected {expected}")))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(expected) {
            return Err(ParseError::UnexpectedToken {
                line,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    /// Check if the current token matches.
    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume the current token if it matches.
    fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect an identifier and return its name.
    fn expect_identifier(&mut self) -> ParseResult<String> {
        let line = self.line();
        match self.advance() {
            Some(Token::Identifier(name)) => Ok(name),
            Some(other) => Err(ParseError::UnexpectedToken {
                line,
                expected: "identifier".to_string(),
                found: other.to_string(),
            }),
            None => Err(ParseError::UnexpectedEof("expected identifier".to_string())),
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_program(&mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();
        while !self.is_eof() {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        match self.peek() {
            Some(Token::Let) => self.parse_let(),
            Some(Token::If) => self.parse_if(),
            Some(Token::For) => self.parse_for(),
            Some(Token::Identifier(_)) if matches!(self.peek_second(), Some(Token::Eq)) => {
                self.parse_assign()
            }
            _ => {
                let expr = self.parse_expr()?;
                self.expect(&Token::Semicolon)?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    fn parse_let(&mut self) -> ParseResult<Stmt> {
        self.expect(&Token::Let)?;
        let name = self.expect_identifier()?;
        self.expect(&Token::Eq)?;
        let value = self.parse_expr()?;
        self.expect(&Token::Semicolon)?;
        Ok(Stmt::Let { name, value })
    }

    fn parse_assign(&mut self) -> ParseResult<Stmt> {
        let name = self.expect_identifier()?;
        self.expect(&Token::Eq)?;
        let value = self.parse_expr()?;
        self.expect(&Token::Semicolon)?;
        Ok(Stmt::Assign { name, value })
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        self.expect(&Token::If)?;
        let condition = self.parse_expr()?;
        let then_body = self.parse_block()?;

        let else_body = if self.consume(&Token::Else) {
            if self.check(&Token::If) {
                // `else if` chains nest as a single-statement else body.
                Some(vec![self.parse_if()?])
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_body,
            else_body,
        })
    }

    fn parse_for(&mut self) -> ParseResult<Stmt> {
        self.expect(&Token::For)?;
        let variable = self.expect_identifier()?;
        self.expect(&Token::In)?;
        let start = self.parse_expr()?;
        self.expect(&Token::DotDot)?;
        let end = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(Stmt::For {
            variable,
            start,
            end,
            body,
        })
    }

    fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        self.expect(&Token::LBrace)?;
        let mut statements = Vec::new();
        while !self.check(&Token::RBrace) {
            if self.is_eof() {
                return Err(ParseError::UnexpectedEof("expected }".to_string()));
            }
            statements.push(self.parse_statement()?);
        }
        self.expect(&Token::RBrace)?;
        Ok(statements)
    }

    // =========================================================================
    // Expressions (precedence climbing)
    // =========================================================================

    fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_and()?;
        while self.consume(&Token::Or) {
            let rhs = self.parse_and()?;
            lhs = binary(BinOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_equality()?;
        while self.consume(&Token::And) {
            let rhs = self.parse_equality()?;
            lhs = binary(BinOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_comparison()?;
        loop {
            let op = if self.consume(&Token::EqEq) {
                BinOp::Eq
            } else if self.consume(&Token::NotEq) {
                BinOp::NotEq
            } else {
                break;
            };
            let rhs = self.parse_comparison()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = if self.consume(&Token::Lt) {
                BinOp::Lt
            } else if self.consume(&Token::LtEq) {
                BinOp::LtEq
            } else if self.consume(&Token::Gt) {
                BinOp::Gt
            } else if self.consume(&Token::GtEq) {
                BinOp::GtEq
            } else {
                break;
            };
            let rhs = self.parse_term()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_factor()?;
        loop {
            let op = if self.consume(&Token::Plus) {
                BinOp::Add
            } else if self.consume(&Token::Minus) {
                BinOp::Sub
            } else {
                break;
            };
            let rhs = self.parse_factor()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_factor(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = if self.consume(&Token::Star) {
                BinOp::Mul
            } else if self.consume(&Token::Slash) {
                BinOp::Div
            } else if self.consume(&Token::Percent) {
                BinOp::Rem
            } else {
                break;
            };
            let rhs = self.parse_unary()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if self.consume(&Token::Minus) {
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
            });
        }
        if self.consume(&Token::Not) {
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> ParseResult<Expr> {
        let lhs = self.parse_postfix()?;
        if self.consume(&Token::Power) {
            // Right-associative: 2 ** 3 ** 2 == 2 ** (3 ** 2)
            let rhs = self.parse_unary()?;
            return Ok(binary(BinOp::Pow, lhs, rhs));
        }
        Ok(lhs)
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.consume(&Token::Dot) {
                let method = self.expect_identifier()?;
                self.expect(&Token::LParen)?;
                let args = self.parse_args()?;
                expr = Expr::MethodCall {
                    receiver: Box::new(expr),
                    method,
                    args,
                };
            } else if self.consume(&Token::LBracket) {
                let index = self.parse_expr()?;
                self.expect(&Token::RBracket)?;
                expr = Expr::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let line = self.line();
        let token = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof("expected expression".to_string()))?;

        match token {
            Token::IntLiteral(v) => Ok(Expr::Number(v as f64)),
            Token::FloatLiteral(v) => Ok(Expr::Number(v)),
            Token::StringLiteral(s) => Ok(Expr::Str(s)),
            Token::True => Ok(Expr::Bool(true)),
            Token::False => Ok(Expr::Bool(false)),
            Token::Pi => Ok(Expr::Pi),
            Token::Identifier(name) => {
                if self.consume(&Token::LParen) {
                    let args = self.parse_args()?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Ident(name))
                }
            }
            Token::LParen => {
                let expr = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            Token::LBracket => {
                let mut elements = Vec::new();
                if !self.check(&Token::RBracket) {
                    elements.push(self.parse_expr()?);
                    while self.consume(&Token::Comma) {
                        elements.push(self.parse_expr()?);
                    }
                }
                self.expect(&Token::RBracket)?;
                Ok(Expr::Array(elements))
            }
            other => Err(ParseError::UnexpectedToken {
                line,
                expected: "expression".to_string(),
                found: other.to_string(),
            }),
        }
    }

    /// Parse a comma-separated argument list; the opening paren is consumed.
    fn parse_args(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check(&Token::RParen) {
            args.push(self.parse_expr()?);
            while self.consume(&Token::Comma) {
                args.push(self.parse_expr()?);
            }
        }
        self.expect(&Token::RParen)?;
        Ok(args)
    }
}

fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

/// 1-based line number for a byte offset.
fn line_of(line_starts: &[usize], offset: usize) -> usize {
    line_starts.partition_point(|&start| start <= offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_let_and_print() {
        let program = parse("let x = 1 + 2; print(x);").unwrap();
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(&program.statements[0], Stmt::Let { name, .. } if name == "x"));
        assert!(matches!(
            &program.statements[1],
            Stmt::Expr(Expr::Call { name, .. }) if name == "print"
        ));
    }

    #[test]
    fn test_method_chain() {
        let program = parse("c.h(0); c.cx(0, 1);").unwrap();
        let Stmt::Expr(Expr::MethodCall { method, args, .. }) = &program.statements[1] else {
            panic!("expected method call");
        };
        assert_eq!(method, "cx");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_precedence() {
        let program = parse("let x = 1 + 2 * 3;").unwrap();
        let Stmt::Let { value, .. } = &program.statements[0] else {
            panic!("expected let");
        };
        // Should parse as 1 + (2 * 3)
        let Expr::Binary {
            op: BinOp::Add,
            rhs,
            ..
        } = value
        else {
            panic!("expected top-level add, got {value:?}");
        };
        assert!(matches!(**rhs, Expr::Binary { op: BinOp::Mul, .. }));
    }

    #[test]
    fn test_power_right_assoc() {
        let program = parse("let x = 2 ** 3 ** 2;").unwrap();
        let Stmt::Let { value, .. } = &program.statements[0] else {
            panic!("expected let");
        };
        let Expr::Binary {
            op: BinOp::Pow,
            rhs,
            ..
        } = value
        else {
            panic!("expected pow");
        };
        assert!(matches!(**rhs, Expr::Binary { op: BinOp::Pow, .. }));
    }

    #[test]
    fn test_for_loop() {
        let program = parse("for i in 0..4 { c.h(i); }").unwrap();
        let Stmt::For { variable, body, .. } = &program.statements[0] else {
            panic!("expected for");
        };
        assert_eq!(variable, "i");
        assert_eq!(body.len(), 1);
    }

    #[test]
    fn test_if_else_chain() {
        let program = parse("if x > 1 { print(1); } else if x > 0 { print(2); } else { print(3); }")
            .unwrap();
        let Stmt::If { else_body, .. } = &program.statements[0] else {
            panic!("expected if");
        };
        assert!(matches!(
            else_body.as_deref(),
            Some([Stmt::If { .. }])
        ));
    }

    #[test]
    fn test_array_and_index() {
        let program = parse("let a = [1, 2, 3]; let b = a[1];").unwrap();
        assert!(matches!(
            &program.statements[1],
            Stmt::Let { value: Expr::Index { .. }, .. }
        ));
    }

    #[test]
    fn test_missing_semicolon_is_error() {
        let err = parse("let x = 1").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));
    }

    #[test]
    fn test_error_reports_line() {
        let err = parse("let x = 1;\nlet y = ;").unwrap_err();
        match err {
            ParseError::UnexpectedToken { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_assignment_vs_equality() {
        let program = parse("x = 1; y == 1;").unwrap();
        assert!(matches!(&program.statements[0], Stmt::Assign { .. }));
        assert!(matches!(
            &program.statements[1],
            Stmt::Expr(Expr::Binary { op: BinOp::Eq, .. })
        ));
    }
}
