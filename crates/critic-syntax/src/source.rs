//! Source files: text, line table, comments and the parsed tree

use crate::ast::File;
use crate::lexer::{tokenize, CommentGroup, LexError};
use crate::parser::{ParseError, Parser};
use thiserror::Error;

/// Byte offsets of line starts, for offset to line/column conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    /// 1-based line and byte column of `offset`. A newline belongs to the
    /// line it ends.
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        let line = self.line_starts.partition_point(|&start| start <= offset).max(1);
        let column = offset - self.line_starts[line - 1] + 1;
        (line as u32, column as u32)
    }

    pub fn line_of(&self, offset: usize) -> u32 {
        self.line_col(offset).0
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("{}", join(.0))]
    Lex(Vec<LexError>),

    #[error("{}", join(.0))]
    Parse(Vec<ParseError>),
}

fn join<E: std::fmt::Display>(errors: &[E]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// A parsed source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub text: String,
    pub file: File,
    pub comments: Vec<CommentGroup>,
    pub lines: LineIndex,
}

impl SourceFile {
    pub fn parse(path: impl Into<String>, text: impl Into<String>) -> Result<Self, SyntaxError> {
        let path = path.into();
        let text = text.into();
        let lines = LineIndex::new(&text);
        let lexed = tokenize(&text).map_err(SyntaxError::Lex)?;
        let file = Parser::new(lexed.tokens)
            .parse_file()
            .map_err(SyntaxError::Parse)?;
        tracing::debug!(path = %path, decls = file.decls.len(), "parsed source file");
        Ok(Self {
            path,
            text,
            file,
            comments: lexed.comments,
            lines,
        })
    }

    /// Doc comment of the package clause: the group ending on the line just
    /// above `package`.
    pub fn doc(&self) -> Option<&CommentGroup> {
        let package_line = self.file.package_span.line;
        self.comments
            .iter()
            .take_while(|group| group.span().start < self.file.package_span.start)
            .filter(|group| {
                let last_line = self.lines.line_of(group.span().end.saturating_sub(1));
                last_line + 1 == package_line
            })
            .last()
    }

    /// Returns true if the first comment of the file carries a generated
    /// code marker.
    pub fn is_generated(&self) -> bool {
        self.comments.first().is_some_and(|group| {
            let text = group.text();
            text.contains("Code generated by") || text.contains("DO NOT EDIT")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let index = LineIndex::new("ab\ncd\n\nx");
        assert_eq!(index.line_col(0), (1, 1));
        assert_eq!(index.line_col(2), (1, 3));
        assert_eq!(index.line_col(3), (2, 1));
        assert_eq!(index.line_col(7), (4, 1));
        assert_eq!(index.line_count(), 4);
    }

    #[test]
    fn test_package_doc() {
        let src = "// Copyright\n\n// Package p does things.\npackage p\n";
        let file = SourceFile::parse("p.go", src).unwrap();
        assert_eq!(file.doc().unwrap().text(), "Package p does things.\n");
    }

    #[test]
    fn test_no_package_doc_after_blank_line() {
        let src = "// Package p does things.\n\npackage p\n";
        let file = SourceFile::parse("p.go", src).unwrap();
        assert!(file.doc().is_none());
    }

    #[test]
    fn test_generated_marker() {
        let src = "// Code generated by stringer. DO NOT EDIT.\n\npackage p\n";
        assert!(SourceFile::parse("p.go", src).unwrap().is_generated());
        assert!(!SourceFile::parse("p.go", "package p\n").unwrap().is_generated());
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let err = SourceFile::parse("p.go", "package p\nfunc {").unwrap_err();
        assert!(matches!(err, SyntaxError::Parse(_)));
    }
}
