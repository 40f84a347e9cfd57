//! Checker: boolLiteralCompare (style)
//!
//! Flags comparisons of a boolean expression against a boolean constant,
//! such as `ok == true` or `done != true`, and suggests `ok` and `!done`.
//! Constants of defined boolean types are left alone.

use critic_engine::{query, Checker, CheckerContext, CheckerInfo, Fix, InitContext, WalkKind};
use critic_syntax::ast::{BinaryOp, Expr, Spanned};

pub const NAME: &str = "boolLiteralCompare";

pub fn info() -> CheckerInfo {
    CheckerInfo::new(NAME, "Detects comparisons against boolean constants")
        .tags(&["style"])
        .example("if ok == true {}", "if ok {}")
}

pub fn create(_cx: &InitContext<'_>) -> Box<dyn Checker> {
    Box::new(BoolLiteralCompare)
}

pub struct BoolLiteralCompare;

impl Checker for BoolLiteralCompare {
    fn kinds(&self) -> &[WalkKind] {
        &[WalkKind::LocalExpr]
    }

    fn visit_local_expr(&mut self, expr: &Expr, cx: &mut CheckerContext<'_, '_>) {
        let Expr::Binary(binary) = expr else {
            return;
        };
        if !matches!(binary.op, BinaryOp::Eql | BinaryOp::Neq) {
            return;
        }
        let program = cx.program();
        let (operand, literal) = match (
            query::bool_const(program, &binary.x),
            query::bool_const(program, &binary.y),
        ) {
            (None, Some(value)) => (&binary.x, value),
            (Some(value), None) => (&binary.y, value),
            _ => return,
        };
        // `x == true` and `x != false` keep the operand as is.
        let keep = (binary.op == BinaryOp::Eql) == literal;
        let rendered = program.render_expr(operand);
        let suggestion = if keep {
            rendered
        } else if matches!(**operand, Expr::Binary(_)) {
            format!("!({})", rendered)
        } else {
            format!("!{}", rendered)
        };
        cx.warn_with_fix(
            expr,
            format!("omit bool literal in expression, use `{}`", suggestion),
            Fix::new(expr.span(), suggestion),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{apply_fixes, lint};
    use pretty_assertions::assert_eq;

    fn messages(source: &str) -> Vec<String> {
        lint(NAME, source).into_iter().map(|d| d.message).collect()
    }

    #[test]
    fn test_comparisons_simplified() {
        let source = r#"package p

func f(ok bool, n int) {
	println(ok == true)
	println(ok != false)
	println(false == ok)
	println(ok != true)
	println(n > 0 == false)
}
"#;
        assert_eq!(
            messages(source),
            vec![
                "omit bool literal in expression, use `ok`",
                "omit bool literal in expression, use `ok`",
                "omit bool literal in expression, use `!ok`",
                "omit bool literal in expression, use `!ok`",
                "omit bool literal in expression, use `!(n > 0)`",
            ]
        );
        let fixed = apply_fixes(source, &lint(NAME, source));
        assert!(fixed.contains("\tprintln(ok)\n\tprintln(ok)\n\tprintln(!ok)\n\tprintln(!ok)\n"));
        assert!(fixed.contains("println(!(n > 0))"));
    }

    #[test]
    fn test_named_bool_constants_count() {
        let source = r#"package p

const enabled = true

const strict bool = false

func f(ok bool) bool {
	return ok == enabled || ok == strict
}
"#;
        assert_eq!(
            messages(source),
            vec![
                "omit bool literal in expression, use `ok`",
                "omit bool literal in expression, use `!ok`",
            ]
        );
    }

    #[test]
    fn test_defined_bool_type_ignored() {
        let source = r#"package p

type Mode bool

const Fast Mode = true

func f(m Mode) bool {
	return m == Fast
}
"#;
        assert!(messages(source).is_empty());
    }

    #[test]
    fn test_constant_pairs_and_variables_ignored() {
        let source = r#"package p

func f(a, b bool) bool {
	return a == b || true == false
}
"#;
        assert!(messages(source).is_empty());
    }
}
