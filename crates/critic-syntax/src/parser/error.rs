//! Parse error types

use crate::token::{Span, Token};
use thiserror::Error;

/// A parse error with location and contextual information.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}:{}: {message}", span.line, span.column)]
pub struct ParseError {
    /// The kind of error that occurred
    pub kind: ParseErrorKind,

    /// Source location of the error
    pub span: Span,

    /// Human-readable error message
    pub message: String,
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Unexpected token found
    UnexpectedToken { expected: Vec<Token>, found: Token },

    /// Unexpected end of file
    UnexpectedEof { expected: Vec<Token> },

    /// Invalid syntax
    InvalidSyntax { reason: String },
}

fn describe(expected: &[Token]) -> String {
    expected
        .iter()
        .map(|tok| match tok {
            Token::Ident(_) => "identifier".to_string(),
            Token::Str(_) => "string literal".to_string(),
            other => format!("'{}'", other),
        })
        .collect::<Vec<_>>()
        .join(" or ")
}

impl ParseError {
    /// Create an "unexpected token" error.
    pub fn unexpected_token(expected: Vec<Token>, found: Token, span: Span) -> Self {
        let message = format!("expected {}, found '{}'", describe(&expected), found);
        Self {
            kind: ParseErrorKind::UnexpectedToken { expected, found },
            span,
            message,
        }
    }

    /// Create an "unexpected EOF" error.
    pub fn unexpected_eof(expected: Vec<Token>, span: Span) -> Self {
        let message = format!("unexpected end of file, expected {}", describe(&expected));
        Self {
            kind: ParseErrorKind::UnexpectedEof { expected },
            span,
            message,
        }
    }

    /// Create an "invalid syntax" error.
    pub fn invalid_syntax(reason: impl Into<String>, span: Span) -> Self {
        let reason = reason.into();
        Self {
            message: reason.clone(),
            kind: ParseErrorKind::InvalidSyntax { reason },
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_position() {
        let err = ParseError::unexpected_token(
            vec![Token::LBrace],
            Token::Ident("x".into()),
            Span::new(10, 11, 2, 7),
        );
        assert_eq!(err.to_string(), "2:7: expected '{', found 'x'");
    }

    #[test]
    fn test_describe_identifier() {
        let err = ParseError::unexpected_eof(vec![Token::Ident(String::new())], Span::default());
        assert_eq!(err.message, "unexpected end of file, expected identifier");
    }
}
