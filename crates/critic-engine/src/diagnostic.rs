//! Diagnostics and suggested fixes

use std::fmt;

use critic_syntax::Span;
use serde::{Deserialize, Serialize};

use crate::error::FixError;

/// Severity of a diagnostic, derived from the reporting checker's tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Style suggestions
    Info,
    /// Likely bugs and performance problems
    Warning,
    /// Security findings
    Error,
}

impl Severity {
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        let has = |name: &str| tags.iter().any(|tag| tag.as_ref() == name);
        if has("security") {
            Severity::Error
        } else if has("diagnostic") || has("performance") {
            Severity::Warning
        } else {
            Severity::Info
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// File position of a diagnostic: 1-based line and column plus the byte
/// offset of the start.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub path: String,
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}

/// Replacement of the byte range `start..end` of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl Fix {
    /// Replace the text covered by `span`.
    pub fn new(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            start: span.start,
            end: span.end,
            replacement: replacement.into(),
        }
    }

    fn check(&self, source: &str) -> Result<(), FixError> {
        let valid = self.start <= self.end
            && self.end <= source.len()
            && source.is_char_boundary(self.start)
            && source.is_char_boundary(self.end);
        if valid {
            Ok(())
        } else {
            Err(FixError::OutOfBounds {
                start: self.start,
                end: self.end,
                len: source.len(),
            })
        }
    }

    /// Apply this fix alone.
    pub fn apply(&self, source: &str) -> Result<String, FixError> {
        Self::apply_all(source, std::slice::from_ref(self))
    }

    /// Apply every fix, highest offset first. Overlapping fixes are
    /// rejected and nothing is applied.
    pub fn apply_all(source: &str, fixes: &[Fix]) -> Result<String, FixError> {
        let mut sorted: Vec<&Fix> = fixes.iter().collect();
        sorted.sort_by_key(|fix| (fix.start, fix.end));
        for fix in &sorted {
            fix.check(source)?;
        }
        for pair in sorted.windows(2) {
            let (first, second) = (pair[0], pair[1]);
            // Two insertions at one offset would have no defined order.
            let collides = first.end > second.start
                || (first.start == second.start && first.start == first.end);
            if collides {
                return Err(FixError::Overlap {
                    first_start: first.start,
                    first_end: first.end,
                    second_start: second.start,
                    second_end: second.end,
                });
            }
        }

        let mut out = source.to_string();
        for fix in sorted.iter().rev() {
            out.replace_range(fix.start..fix.end, &fix.replacement);
        }
        Ok(out)
    }
}

/// A positioned finding reported by a checker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Name of the reporting checker
    pub checker: String,
    pub position: Position,
    pub span: Span,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}: {}",
            self.position, self.severity, self.checker, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(start: usize, end: usize, replacement: &str) -> Fix {
        Fix {
            start,
            end,
            replacement: replacement.to_string(),
        }
    }

    #[test]
    fn test_severity_from_tags() {
        assert_eq!(Severity::from_tags(&["style", "experimental"]), Severity::Info);
        assert_eq!(Severity::from_tags(&["performance"]), Severity::Warning);
        assert_eq!(Severity::from_tags(&["diagnostic"]), Severity::Warning);
        assert_eq!(Severity::from_tags(&["security", "style"]), Severity::Error);
    }

    #[test]
    fn test_apply_all_highest_offset_first() {
        let source = "a == nil && nil == b";
        let fixes = vec![fix(12, 20, "b == nil"), fix(0, 8, "a != nil")];
        assert_eq!(Fix::apply_all(source, &fixes).unwrap(), "a != nil && b == nil");
    }

    #[test]
    fn test_replacement_may_change_length() {
        let source = "x = f()";
        assert_eq!(fix(2, 3, ":=").apply(source).unwrap(), "x := f()");
    }

    #[test]
    fn test_overlapping_fixes_rejected() {
        let source = "abcdef";
        let err = Fix::apply_all(source, &[fix(0, 3, "x"), fix(2, 4, "y")]).unwrap_err();
        assert!(matches!(err, FixError::Overlap { .. }));
    }

    #[test]
    fn test_adjacent_fixes_allowed() {
        let source = "abcdef";
        let out = Fix::apply_all(source, &[fix(0, 3, "x"), fix(3, 6, "y")]).unwrap();
        assert_eq!(out, "xy");
    }

    #[test]
    fn test_out_of_bounds_fix_rejected() {
        let err = fix(4, 10, "").apply("abc").unwrap_err();
        assert_eq!(
            err,
            FixError::OutOfBounds {
                start: 4,
                end: 10,
                len: 3
            }
        );
    }

    #[test]
    fn test_position_display() {
        let position = Position {
            path: "a.go".to_string(),
            line: 3,
            column: 7,
            offset: 40,
        };
        assert_eq!(position.to_string(), "a.go:3:7");
    }
}
