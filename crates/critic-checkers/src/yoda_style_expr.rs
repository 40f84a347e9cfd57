//! Checker: yodaStyleExpr (style, experimental)
//!
//! Flags equality comparisons with the constant on the left, such as
//! `nil != ptr` or `0 == n`, and suggests the operands be swapped.

use critic_engine::{query, Checker, CheckerContext, CheckerInfo, Fix, InitContext, WalkKind};
use critic_syntax::ast::{BinaryOp, Expr, Spanned};

pub const NAME: &str = "yodaStyleExpr";

pub fn info() -> CheckerInfo {
    CheckerInfo::new(NAME, "Detects Yoda style expressions and suggests to replace them")
        .tags(&["style", "experimental"])
        .example("return nil != ptr", "return ptr != nil")
}

pub fn create(_cx: &InitContext<'_>) -> Box<dyn Checker> {
    Box::new(YodaStyleExpr)
}

pub struct YodaStyleExpr;

/// `nil` or a literal, as written.
fn is_const_expr(expr: &Expr) -> bool {
    query::is_ident(expr, "nil") || query::is_basic_lit(expr)
}

fn is_yoda(expr: &Expr) -> bool {
    match expr {
        Expr::Binary(binary) => {
            matches!(binary.op, BinaryOp::Eql | BinaryOp::Neq)
                && is_const_expr(&binary.x)
                && !is_const_expr(&binary.y)
        }
        _ => false,
    }
}

impl Checker for YodaStyleExpr {
    fn kinds(&self) -> &[WalkKind] {
        &[WalkKind::LocalExpr]
    }

    fn visit_local_expr(&mut self, expr: &Expr, cx: &mut CheckerContext<'_, '_>) {
        let Expr::Binary(binary) = expr else {
            return;
        };
        if !is_yoda(expr) {
            return;
        }
        let mut swapped = binary.clone();
        std::mem::swap(&mut swapped.x, &mut swapped.y);
        let rendered = cx.program().render_expr(&Expr::Binary(swapped));
        let message = format!("consider to change order in expression to {}", rendered);
        // The operand's own fix would overlap this one.
        if is_yoda(binary.y.unparen()) {
            cx.warn(expr, message);
        } else {
            cx.warn_with_fix(expr, message, Fix::new(expr.span(), rendered));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{apply_fixes, lint};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nil_on_left_flagged() {
        let source = "package p\n\nfunc f(ptr *int) bool {\n\treturn nil != ptr\n}\n";
        let diags = lint(NAME, source);
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].message,
            "consider to change order in expression to ptr != nil"
        );
        assert_eq!(
            apply_fixes(source, &diags),
            "package p\n\nfunc f(ptr *int) bool {\n\treturn ptr != nil\n}\n"
        );
    }

    #[test]
    fn test_literal_on_left_flagged() {
        let source = r#"package p

func f(n int, s string) bool {
	return 0 == n+1 || "" != s
}
"#;
        let diags = lint(NAME, source);
        let messages: Vec<&str> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "consider to change order in expression to n+1 == 0",
                "consider to change order in expression to s != \"\"",
            ]
        );
        assert!(apply_fixes(source, &diags).contains("return n+1 == 0 || s != \"\""));
    }

    #[test]
    fn test_nested_comparison_fixes_converge() {
        let source = "package p\n\nfunc f(p *int) bool {\n\treturn nil == (nil == p)\n}\n";
        let diags = lint(NAME, source);
        assert_eq!(diags.len(), 2);
        assert!(diags[0].fix.is_none());
        assert!(diags[1].fix.is_some());

        let fixed = apply_fixes(source, &diags);
        assert!(fixed.contains("return nil == (p == nil)"));
        let diags = lint(NAME, &fixed);
        assert_eq!(diags.len(), 1);
        let fixed = apply_fixes(&fixed, &diags);
        assert!(lint(NAME, &fixed).is_empty());
    }

    #[test]
    fn test_regular_order_ok() {
        let source = "package p\n\nfunc f(p *int, n int) bool {\n\treturn p != nil && n == 0 && 1 == 2\n}\n";
        assert!(lint(NAME, source).is_empty());
    }

    #[test]
    fn test_ordering_comparisons_ignored() {
        let source = "package p\n\nfunc f(n int) bool {\n\treturn 0 < n\n}\n";
        assert!(lint(NAME, source).is_empty());
    }

    #[test]
    fn test_package_level_expressions_ignored() {
        let source = "package p\n\nvar p *int\n\nvar isNil = nil == p\n";
        assert!(lint(NAME, source).is_empty());
    }
}
