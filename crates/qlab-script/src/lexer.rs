//! Lexer for QLab scripts.

use logos::Logos;

/// Tokens of the QLab scripting language.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
pub enum Token {
    // Keywords
    #[token("let")]
    Let,

    #[token("if")]
    If,

    #[token("else")]
    Else,

    #[token("for")]
    For,

    #[token("in")]
    In,

    // Constants
    #[token("pi")]
    Pi,

    #[token("true")]
    True,

    #[token("false")]
    False,

    // Literals. Floats require a digit after the dot so that `0..10`
    // lexes as int, range, int.
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatLiteral(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    IntLiteral(u64),

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        Some(s[1..s.len()-1].to_string())
    })]
    StringLiteral(String),

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Operators and punctuation
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("**")]
    Power,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("==")]
    EqEq,

    #[token("!=")]
    NotEq,

    #[token("<=")]
    LtEq,

    #[token("<")]
    Lt,

    #[token(">=")]
    GtEq,

    #[token(">")]
    Gt,

    #[token("&&")]
    And,

    #[token("||")]
    Or,

    #[token("!")]
    Not,

    #[token("=")]
    Eq,

    #[token("..")]
    DotDot,

    #[token(".")]
    Dot,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Let => write!(f, "let"),
            Token::If => write!(f, "if"),
            Token::Else => write!(f, "else"),
            Token::For => write!(f, "for"),
            Token::In => write!(f, "in"),
            Token::Pi => write!(f, "pi"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::FloatLiteral(v) => write!(f, "{v}"),
            Token::IntLiteral(v) => write!(f, "{v}"),
            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::Identifier(s) => write!(f, "{s}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Power => write!(f, "**"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::EqEq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::LtEq => write!(f, "<="),
            Token::Lt => write!(f, "<"),
            Token::GtEq => write!(f, ">="),
            Token::Gt => write!(f, ">"),
            Token::And => write!(f, "&&"),
            Token::Or => write!(f, "||"),
            Token::Not => write!(f, "!"),
            Token::Eq => write!(f, "="),
            Token::DotDot => write!(f, ".."),
            Token::Dot => write!(f, "."),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
        }
    }
}

/// A token with its source span.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: std::ops::Range<usize>,
}

/// Tokenize a QLab script source string.
pub fn tokenize(source: &str) -> Vec<Result<SpannedToken, (std::ops::Range<usize>, String)>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        if let Ok(token) = result {
            tokens.push(Ok(SpannedToken { token, span }));
        } else {
            let slice = &source[span.clone()];
            tokens.push(Err((span, format!("Invalid token: '{slice}'"))));
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        tokenize(source)
            .into_iter()
            .filter_map(Result::ok)
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_let_statement() {
        let tokens = lex("let x = 2;");
        assert_eq!(tokens[0], Token::Let);
        assert!(matches!(tokens[1], Token::Identifier(ref s) if s == "x"));
        assert_eq!(tokens[2], Token::Eq);
        assert!(matches!(tokens[3], Token::IntLiteral(2)));
        assert_eq!(tokens[4], Token::Semicolon);
    }

    #[test]
    fn test_method_call() {
        let tokens = lex("c.h(0);");
        assert!(matches!(tokens[0], Token::Identifier(ref s) if s == "c"));
        assert_eq!(tokens[1], Token::Dot);
        assert!(matches!(tokens[2], Token::Identifier(ref s) if s == "h"));
        assert_eq!(tokens[3], Token::LParen);
    }

    #[test]
    fn test_range_vs_dot() {
        let tokens = lex("0..10");
        assert!(matches!(tokens[0], Token::IntLiteral(0)));
        assert_eq!(tokens[1], Token::DotDot);
        assert!(matches!(tokens[2], Token::IntLiteral(10)));
    }

    #[test]
    fn test_power_vs_star() {
        let tokens = lex("2 ** 3 * 4");
        assert_eq!(tokens[1], Token::Power);
        assert_eq!(tokens[3], Token::Star);
    }

    #[test]
    fn test_string_literal() {
        let tokens = lex(r#"print("hi");"#);
        assert!(matches!(tokens[2], Token::StringLiteral(ref s) if s == "hi"));
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = lex("// line comment\nlet x = 1; /* block */ let y = 2;");
        assert_eq!(tokens.iter().filter(|t| **t == Token::Let).count(), 2);
    }

    #[test]
    fn test_invalid_token_reported() {
        let results = tokenize("let x = @;");
        assert!(results.iter().any(Result::is_err));
    }
}
