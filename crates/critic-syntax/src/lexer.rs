//! Lexer built on logos.
//!
//! Produces the token stream with automatic semicolon insertion (a newline
//! after an identifier, literal, `break`/`continue`/`fallthrough`/`return`,
//! `++`/`--` or a closing bracket terminates the statement) and collects
//! comments so that file-level comment groups can be inspected later.

use crate::source::LineIndex;
use crate::token::{Span, Token};
use logos::Logos;
use thiserror::Error;

#[derive(Logos, Debug, Clone, PartialEq)]
enum RawToken {
    #[regex(r"[ \t\r\x0C]+", logos::skip)]
    Whitespace,

    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", lex_block_comment)]
    BlockComment,

    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*")]
    Ident,

    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[bB][01_]+")]
    #[regex(r"0[oO][0-7_]+")]
    Int,

    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+")]
    Float,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9]+)?i")]
    Imag,

    #[regex(r"'(\\.|[^'\\\n])+'")]
    Char,

    #[regex(r#""(\\.|[^"\\\n])*""#)]
    #[regex(r"`[^`]*`")]
    Str,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&^")]
    AndNot,
    #[token("=")]
    Assign,
    #[token(":=")]
    Define,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("%=")]
    PercentAssign,
    #[token("&=")]
    AmpAssign,
    #[token("|=")]
    PipeAssign,
    #[token("^=")]
    CaretAssign,
    #[token("<<=")]
    ShlAssign,
    #[token(">>=")]
    ShrAssign,
    #[token("&^=")]
    AndNotAssign,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("<-")]
    Arrow,
    #[token("++")]
    Inc,
    #[token("--")]
    Dec,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("!")]
    Not,
    #[token("~")]
    Tilde,
    #[token("...")]
    Ellipsis,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
}

fn lex_block_comment(lex: &mut logos::Lexer<RawToken>) -> bool {
    // "/*" is already consumed
    let remainder = lex.remainder();
    match remainder.find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(remainder.len());
            false
        }
    }
}

/// Lexer errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("{}:{}: unexpected character {ch:?}", span.line, span.column)]
    UnexpectedCharacter { ch: char, span: Span },

    #[error("{}:{}: comment not terminated", span.line, span.column)]
    UnterminatedComment { span: Span },

    #[error("{}:{}: string literal not terminated", span.line, span.column)]
    UnterminatedString { span: Span },
}

/// A single `//` or `/* */` comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

/// A run of comments with no blank line or token between them.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentGroup {
    pub comments: Vec<Comment>,
}

impl CommentGroup {
    pub fn span(&self) -> Span {
        match (self.comments.first(), self.comments.last()) {
            (Some(first), Some(last)) => first.span.to(&last.span),
            _ => Span::default(),
        }
    }

    /// Comment text with the comment markers removed, one line per line of
    /// comment text.
    pub fn text(&self) -> String {
        let mut lines: Vec<&str> = Vec::new();
        for comment in &self.comments {
            let raw = comment.text.as_str();
            if let Some(body) = raw.strip_prefix("//") {
                lines.push(body.strip_prefix(' ').unwrap_or(body).trim_end());
            } else {
                let body = raw
                    .strip_prefix("/*")
                    .and_then(|b| b.strip_suffix("*/"))
                    .unwrap_or(raw);
                lines.extend(body.lines().map(str::trim));
            }
        }
        while lines.first().is_some_and(|l| l.is_empty()) {
            lines.remove(0);
        }
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        let mut out = lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

/// Output of a successful lex.
#[derive(Debug, Clone)]
pub struct Lexed {
    pub tokens: Vec<(Token, Span)>,
    pub comments: Vec<CommentGroup>,
}

pub struct Lexer<'a> {
    source: &'a str,
    lines: &'a LineIndex,
    tokens: Vec<(Token, Span)>,
    groups: Vec<CommentGroup>,
    errors: Vec<LexError>,
    /// Number of source tokens seen, excluding inserted semicolons.
    scanned: usize,
    scanned_at_comment: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, lines: &'a LineIndex) -> Self {
        Self {
            source,
            lines,
            tokens: Vec::new(),
            groups: Vec::new(),
            errors: Vec::new(),
            scanned: 0,
            scanned_at_comment: 0,
        }
    }

    fn span(&self, start: usize, end: usize) -> Span {
        let (line, column) = self.lines.line_col(start);
        Span::new(start, end, line, column)
    }

    fn needs_semicolon(&self) -> bool {
        self.tokens
            .last()
            .is_some_and(|(tok, _)| tok.ends_statement())
    }

    fn insert_semicolon(&mut self, at: usize, end: usize) {
        if self.needs_semicolon() {
            let span = self.span(at, end);
            self.tokens.push((Token::Semicolon, span));
        }
    }

    fn push_comment(&mut self, text: &str, span: Span) {
        let comment = Comment {
            text: text.to_string(),
            span,
        };
        // A comment joins the previous group when no token and at most one
        // newline separate them.
        if let Some(group) = self.groups.last_mut() {
            if let Some(last) = group.comments.last() {
                let gap = self.source.get(last.span.end..span.start).unwrap_or("");
                if self.scanned == self.scanned_at_comment && gap.matches('\n').count() <= 1 {
                    group.comments.push(comment);
                    return;
                }
            }
        }
        self.groups.push(CommentGroup {
            comments: vec![comment],
        });
        self.scanned_at_comment = self.scanned;
    }

    pub fn tokenize(mut self) -> Result<Lexed, Vec<LexError>> {
        let mut lex = RawToken::lexer(self.source);

        while let Some(result) = lex.next() {
            let range = lex.span();
            let text = lex.slice();
            let span = self.span(range.start, range.end);

            let raw = match result {
                Ok(raw) => raw,
                Err(()) => {
                    let error = if text.starts_with("/*") {
                        LexError::UnterminatedComment { span }
                    } else if text.starts_with('"') || text.starts_with('`') {
                        LexError::UnterminatedString { span }
                    } else {
                        LexError::UnexpectedCharacter {
                            ch: text.chars().next().unwrap_or('\0'),
                            span,
                        }
                    };
                    self.errors.push(error);
                    continue;
                }
            };

            let tok = match raw {
                RawToken::Whitespace => continue,
                RawToken::Newline => {
                    self.insert_semicolon(range.start, range.end);
                    continue;
                }
                RawToken::LineComment => {
                    self.push_comment(text, span);
                    continue;
                }
                RawToken::BlockComment => {
                    if text.contains('\n') {
                        self.insert_semicolon(range.start, range.start);
                    }
                    self.push_comment(text, span);
                    continue;
                }
                RawToken::Ident => {
                    Token::keyword(text).unwrap_or_else(|| Token::Ident(text.to_string()))
                }
                RawToken::Int => Token::Int(text.to_string()),
                RawToken::Float => Token::Float(text.to_string()),
                RawToken::Imag => Token::Imag(text.to_string()),
                RawToken::Char => Token::Char(text.to_string()),
                RawToken::Str => Token::Str(text.to_string()),
                RawToken::Plus => Token::Plus,
                RawToken::Minus => Token::Minus,
                RawToken::Star => Token::Star,
                RawToken::Slash => Token::Slash,
                RawToken::Percent => Token::Percent,
                RawToken::Amp => Token::Amp,
                RawToken::Pipe => Token::Pipe,
                RawToken::Caret => Token::Caret,
                RawToken::Shl => Token::Shl,
                RawToken::Shr => Token::Shr,
                RawToken::AndNot => Token::AndNot,
                RawToken::Assign => Token::Assign,
                RawToken::Define => Token::Define,
                RawToken::PlusAssign => Token::PlusAssign,
                RawToken::MinusAssign => Token::MinusAssign,
                RawToken::StarAssign => Token::StarAssign,
                RawToken::SlashAssign => Token::SlashAssign,
                RawToken::PercentAssign => Token::PercentAssign,
                RawToken::AmpAssign => Token::AmpAssign,
                RawToken::PipeAssign => Token::PipeAssign,
                RawToken::CaretAssign => Token::CaretAssign,
                RawToken::ShlAssign => Token::ShlAssign,
                RawToken::ShrAssign => Token::ShrAssign,
                RawToken::AndNotAssign => Token::AndNotAssign,
                RawToken::AndAnd => Token::AndAnd,
                RawToken::OrOr => Token::OrOr,
                RawToken::Arrow => Token::Arrow,
                RawToken::Inc => Token::Inc,
                RawToken::Dec => Token::Dec,
                RawToken::EqEq => Token::EqEq,
                RawToken::NotEq => Token::NotEq,
                RawToken::Lt => Token::Lt,
                RawToken::LtEq => Token::LtEq,
                RawToken::Gt => Token::Gt,
                RawToken::GtEq => Token::GtEq,
                RawToken::Not => Token::Not,
                RawToken::Tilde => Token::Tilde,
                RawToken::Ellipsis => Token::Ellipsis,
                RawToken::Dot => Token::Dot,
                RawToken::Colon => Token::Colon,
                RawToken::Comma => Token::Comma,
                RawToken::Semicolon => Token::Semicolon,
                RawToken::LParen => Token::LParen,
                RawToken::RParen => Token::RParen,
                RawToken::LBrace => Token::LBrace,
                RawToken::RBrace => Token::RBrace,
                RawToken::LBracket => Token::LBracket,
                RawToken::RBracket => Token::RBracket,
            };
            self.scanned += 1;
            self.tokens.push((tok, span));
        }

        let end = self.source.len();
        self.insert_semicolon(end, end);
        let eof = self.span(end, end);
        self.tokens.push((Token::Eof, eof));

        if !self.errors.is_empty() {
            return Err(self.errors);
        }

        tracing::trace!(tokens = self.tokens.len(), comments = self.groups.len(), "lexed source");

        Ok(Lexed {
            tokens: self.tokens,
            comments: self.groups,
        })
    }
}

/// Convenience wrapper: lex `source` with a fresh line index.
pub fn tokenize(source: &str) -> Result<Lexed, Vec<LexError>> {
    let lines = LineIndex::new(source);
    Lexer::new(source, &lines).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .tokens
            .into_iter()
            .map(|(tok, _)| tok)
            .collect()
    }

    #[test]
    fn test_semicolon_insertion() {
        assert_eq!(
            kinds("x := 1\ny++\n"),
            vec![
                Token::Ident("x".into()),
                Token::Define,
                Token::Int("1".into()),
                Token::Semicolon,
                Token::Ident("y".into()),
                Token::Inc,
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_no_semicolon_after_operator() {
        assert_eq!(
            kinds("a +\nb"),
            vec![
                Token::Ident("a".into()),
                Token::Plus,
                Token::Ident("b".into()),
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_and_literals() {
        assert_eq!(
            kinds(r#"return "hi", 'c', 1.5, 0x1F, 2i"#),
            vec![
                Token::Return,
                Token::Str("\"hi\"".into()),
                Token::Comma,
                Token::Char("'c'".into()),
                Token::Comma,
                Token::Float("1.5".into()),
                Token::Comma,
                Token::Int("0x1F".into()),
                Token::Comma,
                Token::Imag("2i".into()),
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_comment_groups() {
        let lexed = tokenize("// a\n// b\n\n// c\npackage p\n").unwrap();
        assert_eq!(lexed.comments.len(), 2);
        assert_eq!(lexed.comments[0].text(), "a\nb\n");
        assert_eq!(lexed.comments[1].text(), "c\n");
    }

    #[test]
    fn test_block_comment_with_newline_ends_statement() {
        assert_eq!(
            kinds("x /*\n*/ y"),
            vec![
                Token::Ident("x".into()),
                Token::Semicolon,
                Token::Ident("y".into()),
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_comment() {
        let errors = tokenize("x /* never closed").unwrap_err();
        assert!(matches!(errors[0], LexError::UnterminatedComment { .. }));
    }

    #[test]
    fn test_span_positions() {
        let lexed = tokenize("package p\n\nfunc f() {}\n").unwrap();
        let (tok, span) = &lexed.tokens[3];
        assert_eq!(tok, &Token::Func);
        assert_eq!((span.line, span.column), (3, 1));
    }
}
