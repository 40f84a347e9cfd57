//! Checker: sloppyReassign (diagnostic, experimental)
//!
//! Flags `if x = f(); x != nil { return x }`: the if-init re-assigns an
//! existing variable only to test and return it, which a `:=` would scope to
//! the if statement. Only the single-assignment, return-only form is
//! recognised.

use critic_engine::{query, Checker, CheckerContext, CheckerInfo, Fix, InitContext, WalkKind};
use critic_syntax::ast::{AssignOp, AssignStmt, BinaryOp, Expr, Stmt};

pub const NAME: &str = "sloppyReassign";

pub fn info() -> CheckerInfo {
    CheckerInfo::new(NAME, "Detects suspicious/confusing re-assignments")
        .tags(&["diagnostic", "experimental"])
        .example(
            "if err = f(); err != nil { return err }",
            "if err := f(); err != nil { return err }",
        )
}

pub fn create(_cx: &InitContext<'_>) -> Box<dyn Checker> {
    Box::new(SloppyReassign)
}

pub struct SloppyReassign;

impl SloppyReassign {
    fn warn(assign: &AssignStmt, name: &str, cx: &mut CheckerContext<'_, '_>) {
        let suggest = AssignStmt {
            tok: AssignOp::Define,
            ..assign.clone()
        };
        let rendered = cx.program().render_stmt(&Stmt::Assign(suggest));
        cx.warn_with_fix(
            assign,
            format!(
                "re-assignment to `{}` can be replaced with `{}`",
                name, rendered
            ),
            Fix::new(assign.span, rendered),
        );
    }
}

/// Returns true if `cond` is exactly `name != nil`.
fn is_not_nil_check(cond: &Expr, name: &str) -> bool {
    match cond {
        Expr::Binary(binary) => {
            binary.op == BinaryOp::Neq
                && query::is_ident(&binary.x, name)
                && query::is_ident(&binary.y, "nil")
        }
        _ => false,
    }
}

impl Checker for SloppyReassign {
    fn kinds(&self) -> &[WalkKind] {
        &[WalkKind::Stmt]
    }

    fn visit_stmt(&mut self, stmt: &Stmt, cx: &mut CheckerContext<'_, '_>) {
        let Stmt::If(if_stmt) = stmt else {
            return;
        };
        let Some(Stmt::Assign(assign)) = if_stmt.init.as_deref() else {
            return;
        };
        if assign.tok != AssignOp::Assign || assign.lhs.len() != 1 || assign.rhs.len() != 1 {
            return;
        }
        let [body] = if_stmt.body.stmts.as_slice() else {
            return;
        };
        let Expr::Ident(reassigned) = &assign.lhs[0] else {
            return;
        };
        if !is_not_nil_check(&if_stmt.cond, &reassigned.name) {
            return;
        }
        let Stmt::Return(ret) = body else {
            return;
        };
        if ret
            .results
            .iter()
            .any(|result| query::is_ident(result, &reassigned.name))
        {
            Self::warn(assign, &reassigned.name, cx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{apply_fixes, has_checker, lint};
    use pretty_assertions::assert_eq;

    fn wrap(body: &str) -> String {
        format!(
            "package p\n\nfunc f() error {{\n\treturn nil\n}}\n\nfunc g() error {{\n\tvar err error\n{}\n\treturn err\n}}\n",
            body
        )
    }

    #[test]
    fn test_reassign_in_if_init_flagged() {
        let source = wrap("\tif err = f(); err != nil {\n\t\treturn err\n\t}");
        let diags = lint(NAME, &source);
        assert_eq!(diags.len(), 1, "got: {:?}", diags);
        assert_eq!(
            diags[0].message,
            "re-assignment to `err` can be replaced with `err := f()`"
        );
        assert_eq!(diags[0].position.line, 9);
        assert_eq!(diags[0].position.column, 5);
        let fixed = apply_fixes(&source, &diags);
        assert!(fixed.contains("if err := f(); err != nil {"));
    }

    #[test]
    fn test_define_is_ok() {
        let source = wrap("\tif err := f(); err != nil {\n\t\treturn err\n\t}");
        assert!(!has_checker(&lint(NAME, &source), NAME));
    }

    #[test]
    fn test_other_conditions_ignored() {
        let source = wrap("\tif err = f(); err == nil {\n\t\treturn err\n\t}");
        assert!(lint(NAME, &source).is_empty());
        let source = wrap("\tif err = f(); nil != err {\n\t\treturn err\n\t}");
        assert!(lint(NAME, &source).is_empty());
    }

    #[test]
    fn test_body_must_return_variable() {
        let source = wrap("\tif err = f(); err != nil {\n\t\treturn nil\n\t}");
        assert!(lint(NAME, &source).is_empty());
        let source = wrap("\tif err = f(); err != nil {\n\t\tprintln(err)\n\t\treturn err\n\t}");
        assert!(lint(NAME, &source).is_empty());
    }

    #[test]
    fn test_multi_value_assignment_ignored() {
        let source = r#"package p

func two() (int, error) { return 0, nil }

func g() error {
	var n int
	var err error
	if n, err = two(); err != nil {
		return err
	}
	_ = n
	return nil
}
"#;
        assert!(lint(NAME, source).is_empty());
    }
}
