//! Checker: badStringsCall (diagnostic)
//!
//! Flags `strings.Replace` and `strings.SplitN` called with a constant count
//! of zero. Both then do nothing useful; `-1` (all) was almost certainly
//! meant.

use critic_engine::{query, Checker, CheckerContext, CheckerInfo, Fix, InitContext, WalkKind};
use critic_syntax::ast::{Expr, Spanned};

pub const NAME: &str = "badStringsCall";

/// Functions and the index of their count argument.
const COUNTED_CALLS: &[(&str, usize)] = &[("strings.Replace", 3), ("strings.SplitN", 2)];

pub fn info() -> CheckerInfo {
    CheckerInfo::new(NAME, "Detects suspicious strings function calls")
        .tags(&["diagnostic"])
        .example(
            "strings.Replace(s, \"a\", \"b\", 0)",
            "strings.Replace(s, \"a\", \"b\", -1)",
        )
}

pub fn create(_cx: &InitContext<'_>) -> Box<dyn Checker> {
    Box::new(BadStringsCall)
}

pub struct BadStringsCall;

impl Checker for BadStringsCall {
    fn kinds(&self) -> &[WalkKind] {
        &[WalkKind::LocalExpr]
    }

    fn visit_local_expr(&mut self, expr: &Expr, cx: &mut CheckerContext<'_, '_>) {
        let Expr::Call(call) = expr else {
            return;
        };
        let program = cx.program();
        let Some(name) = query::call_name(program, call) else {
            return;
        };
        let Some(&(_, index)) = COUNTED_CALLS.iter().find(|(func, _)| *func == name) else {
            return;
        };
        let Some(count) = call.args.get(index) else {
            return;
        };
        if query::expr_to_int(program, count) == Some(0) {
            cx.warn_with_fix(
                count,
                format!("{}: suspicious arg 0, probably meant -1", name),
                Fix::new(count.span(), "-1"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{apply_fixes, lint};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_zero_count_flagged() {
        let source = r#"package p

import "strings"

func f(s string) []string {
	s = strings.Replace(s, "a", "b", 0)
	return strings.SplitN(s, ",", 0)
}
"#;
        let diags = lint(NAME, source);
        let messages: Vec<&str> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "strings.Replace: suspicious arg 0, probably meant -1",
                "strings.SplitN: suspicious arg 0, probably meant -1",
            ]
        );
        assert_eq!(diags[0].position.line, 6);
        let fixed = apply_fixes(source, &diags);
        assert!(fixed.contains("strings.Replace(s, \"a\", \"b\", -1)"));
        assert!(fixed.contains("strings.SplitN(s, \",\", -1)"));
    }

    #[test]
    fn test_constant_zero_flagged() {
        let source = r#"package p

import "strings"

const none = 0

func f(s string) string {
	return strings.Replace(s, "a", "b", none)
}
"#;
        assert_eq!(lint(NAME, source).len(), 1);
    }

    #[test]
    fn test_other_counts_ok() {
        let source = r#"package p

import "strings"

func f(s string, n int) string {
	s = strings.Replace(s, "a", "b", -1)
	s = strings.Replace(s, "a", "b", n)
	_ = strings.SplitN(s, ",", 2)
	return strings.ToUpper(s)
}
"#;
        assert!(lint(NAME, source).is_empty());
    }

    #[test]
    fn test_local_function_with_same_name_ignored() {
        let source = r#"package p

func Replace(s, old, new string, n int) string { return s }

func f(s string) string {
	return Replace(s, "a", "b", 0)
}
"#;
        assert!(lint(NAME, source).is_empty());
    }
}
