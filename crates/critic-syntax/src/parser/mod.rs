//! Recursive-descent parser
//!
//! Transforms the token stream from the lexer into a [`File`]. Errors are
//! accumulated and the parser resynchronizes at statement and declaration
//! boundaries so that one run reports as many problems as possible.

pub mod decl;
pub mod error;
pub mod expr;
pub mod recovery;
pub mod stmt;
pub mod types;

use crate::ast::*;
use crate::token::{Span, Token};

pub use error::{ParseError, ParseErrorKind};

pub struct Parser {
    /// Pre-tokenized input, always terminated by `Eof`
    tokens: Vec<(Token, Span)>,

    /// Current position in token stream
    pos: usize,

    /// Accumulated parse errors
    errors: Vec<ParseError>,

    /// Next node id to hand out
    next_id: u32,

    /// Negative inside control clauses, where `T{` is not a composite literal
    expr_level: i32,
}

impl Parser {
    pub fn new(mut tokens: Vec<(Token, Span)>) -> Self {
        if !matches!(tokens.last(), Some((Token::Eof, _))) {
            let end = tokens.last().map(|(_, span)| *span).unwrap_or_default();
            tokens.push((Token::Eof, Span::new(end.end, end.end, end.line, end.column)));
        }
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
            next_id: 0,
            expr_level: 0,
        }
    }

    /// Parse an entire source file.
    pub fn parse_file(mut self) -> Result<File, Vec<ParseError>> {
        let file = decl::parse_file(&mut self);
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        file.map_err(|err| vec![err])
    }

    /// Parse a single expression, for tests and tools.
    pub fn parse_expr_only(mut self) -> Result<Expr, Vec<ParseError>> {
        let expr = expr::parse_expr(&mut self).map_err(|err| vec![err])?;
        if !matches!(self.current(), Token::Semicolon | Token::Eof) {
            return Err(vec![self.unexpected(&[Token::Eof])]);
        }
        Ok(expr)
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    #[inline]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.tokens[self.pos].1
    }

    #[inline]
    pub fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos + 1)
            .map_or(&Token::Eof, |(tok, _)| tok)
    }

    /// Span of the most recently consumed token.
    pub fn prev_span(&self) -> Span {
        if self.pos == 0 {
            return self.current_span();
        }
        self.tokens[self.pos - 1].1
    }

    /// Advance to the next token, returning the previous current token.
    pub fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].0.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    #[inline]
    pub fn check(&self, expected: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(expected)
    }

    #[inline]
    pub fn at_eof(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    /// Consume the current token if it is `expected`.
    pub fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, expected: Token) -> Result<Span, ParseError> {
        if self.check(&expected) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(self.unexpected(&[expected]))
        }
    }

    /// Expect a statement terminator. A semicolon may be omitted before a
    /// closing `)` or `}`.
    pub fn expect_semi(&mut self) -> Result<(), ParseError> {
        match self.current() {
            Token::Semicolon => {
                self.advance();
                Ok(())
            }
            Token::RParen | Token::RBrace | Token::Eof => Ok(()),
            _ => Err(self.unexpected(&[Token::Semicolon])),
        }
    }

    pub fn parse_ident(&mut self) -> Result<Ident, ParseError> {
        match self.current().clone() {
            Token::Ident(name) => {
                let span = self.current_span();
                self.advance();
                Ok(Ident {
                    id: self.node_id(),
                    name,
                    span,
                })
            }
            _ => Err(self.unexpected(&[Token::Ident(String::new())])),
        }
    }

    pub fn parse_ident_list(&mut self) -> Result<Vec<Ident>, ParseError> {
        let mut idents = vec![self.parse_ident()?];
        while self.eat(&Token::Comma) {
            idents.push(self.parse_ident()?);
        }
        Ok(idents)
    }

    pub fn node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: Span) -> Span {
        start.to(&self.prev_span())
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    pub fn record(&mut self, err: ParseError) {
        tracing::trace!(error = %err, "parse error");
        self.errors.push(err);
    }

    pub fn unexpected(&self, expected: &[Token]) -> ParseError {
        let span = self.current_span();
        if self.at_eof() {
            ParseError::unexpected_eof(expected.to_vec(), span)
        } else {
            ParseError::unexpected_token(expected.to_vec(), self.current().clone(), span)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parser(source: &str) -> Parser {
        Parser::new(tokenize(source).unwrap().tokens)
    }

    #[test]
    fn test_parser_advance() {
        let mut p = parser("package main");
        assert!(matches!(p.current(), Token::Package));
        let tok = p.advance();
        assert!(matches!(tok, Token::Package));
        assert!(matches!(p.current(), Token::Ident(_)));
    }

    #[test]
    fn test_advance_stops_at_eof() {
        let mut p = parser("x");
        p.advance();
        p.advance();
        p.advance();
        assert!(p.at_eof());
    }

    #[test]
    fn test_node_ids_are_unique() {
        let mut p = parser("a, b, c");
        let idents = p.parse_ident_list().unwrap();
        assert_eq!(idents.len(), 3);
        assert_ne!(idents[0].id, idents[1].id);
        assert_ne!(idents[1].id, idents[2].id);
    }

    #[test]
    fn test_parse_file_reports_errors() {
        let errors = parser("package p\nfunc {").parse_file().unwrap_err();
        assert!(!errors.is_empty());
    }
}
