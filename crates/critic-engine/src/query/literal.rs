//! Literal and constant classification

use critic_syntax::ast::{Expr, LitKind};
use critic_syntax::types::{BasicKind, ConstValue, Type};
use critic_syntax::ObjectKind;

use crate::model::Program;

/// Returns true if `expr` is the predeclared `nil`.
pub fn is_nil(program: &Program<'_>, expr: &Expr) -> bool {
    program.semantics().is_nil(expr.id())
}

/// Returns true if `expr` is the identifier `name`.
pub fn is_ident(expr: &Expr, name: &str) -> bool {
    matches!(expr, Expr::Ident(ident) if ident.name == name)
}

/// Returns true if `expr` is the blank identifier `_`.
pub fn is_blank(expr: &Expr) -> bool {
    is_ident(expr, "_")
}

pub fn is_basic_lit(expr: &Expr) -> bool {
    matches!(expr, Expr::BasicLit(_))
}

/// Returns true if `expr` is an integer literal spelled exactly `literal`.
pub fn is_int_literal(expr: &Expr, literal: &str) -> bool {
    matches!(expr, Expr::BasicLit(lit) if lit.kind == LitKind::Int && lit.value == literal)
}

/// Returns true for the literal `0`.
pub fn is_zero(expr: &Expr) -> bool {
    is_int_literal(expr, "0")
}

pub fn is_string_literal(expr: &Expr) -> bool {
    matches!(expr, Expr::BasicLit(lit) if lit.kind == LitKind::String)
}

/// Integer constant value of `expr`, if it has one that fits in an `i64`.
pub fn expr_to_int(program: &Program<'_>, expr: &Expr) -> Option<i64> {
    match program.const_value(expr)? {
        ConstValue::Int(value) => i64::try_from(*value).ok(),
        _ => None,
    }
}

/// String constant value of `expr`.
pub fn expr_to_string<'a>(program: &Program<'a>, expr: &Expr) -> Option<&'a str> {
    match program.const_value(expr)? {
        ConstValue::String(value) => Some(value.as_str()),
        _ => None,
    }
}

/// Returns true if `expr` names a boolean constant.
///
/// Only constants of type untyped bool or exactly `bool` qualify. Constants
/// of defined types with a boolean underlying type are excluded: such types
/// usually act as two-valued enums that are meant to be compared
/// explicitly.
pub fn is_bool_const(program: &Program<'_>, expr: &Expr) -> bool {
    let Expr::Ident(ident) = expr else {
        return false;
    };
    let Some(obj) = program.object_of(ident) else {
        return false;
    };
    if !matches!(obj.kind, ObjectKind::Const(_)) {
        return false;
    }
    matches!(
        program.types().get(obj.ty),
        Type::Basic(BasicKind::UntypedBool | BasicKind::Bool)
    )
}

/// Value of a boolean constant accepted by [`is_bool_const`].
pub fn bool_const(program: &Program<'_>, expr: &Expr) -> Option<bool> {
    if !is_bool_const(program, expr) {
        return None;
    }
    let Expr::Ident(ident) = expr else {
        return None;
    };
    program.object_of(ident)?.const_value()?.as_bool()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixture::Loaded;
    use critic_syntax::ast::Stmt;

    const SRC: &str = r#"package q

type Flag bool

const (
	On       Flag = true
	Enabled       = true
	Strict   bool = false
	Limit         = 1 << 10
	Greeting      = "hi"
)

var dynamic = true

func f() {
	_ = On
	_ = Enabled
	_ = Strict
	_ = dynamic
	_ = true
	_ = Limit
	_ = Greeting
	_ = nil
	_ = 0
	_ = 0x0
}
"#;

    #[test]
    fn test_bool_const_boundary() {
        let loaded = Loaded::new(SRC);
        let program = loaded.program();
        assert!(!is_bool_const(&program, loaded.expr("f", 0)), "named bool type is excluded");
        assert!(is_bool_const(&program, loaded.expr("f", 1)));
        assert!(is_bool_const(&program, loaded.expr("f", 2)));
        assert!(!is_bool_const(&program, loaded.expr("f", 3)), "variables are not constants");
        assert!(is_bool_const(&program, loaded.expr("f", 4)));
    }

    #[test]
    fn test_bool_const_value() {
        let loaded = Loaded::new(SRC);
        let program = loaded.program();
        assert_eq!(bool_const(&program, loaded.expr("f", 1)), Some(true));
        assert_eq!(bool_const(&program, loaded.expr("f", 2)), Some(false));
        assert_eq!(bool_const(&program, loaded.expr("f", 0)), None);
    }

    #[test]
    fn test_constant_values() {
        let loaded = Loaded::new(SRC);
        let program = loaded.program();
        assert_eq!(expr_to_int(&program, loaded.expr("f", 5)), Some(1024));
        assert_eq!(expr_to_string(&program, loaded.expr("f", 6)), Some("hi"));
        assert_eq!(expr_to_int(&program, loaded.expr("f", 6)), None);
        assert_eq!(expr_to_string(&program, loaded.expr("f", 3)), None);
    }

    #[test]
    fn test_literal_shapes() {
        let loaded = Loaded::new(SRC);
        let program = loaded.program();
        assert!(is_nil(&program, loaded.expr("f", 7)));
        assert!(is_ident(loaded.expr("f", 7), "nil"));
        assert!(is_zero(loaded.expr("f", 8)));
        assert!(!is_zero(loaded.expr("f", 9)), "zero is matched by spelling");
        assert!(is_int_literal(loaded.expr("f", 9), "0x0"));
        assert!(is_basic_lit(loaded.expr("f", 9)));
        assert!(!is_string_literal(loaded.expr("f", 9)));
        let Stmt::Assign(assign) = &loaded.body("f")[0] else {
            panic!("expected assignment");
        };
        assert!(is_blank(&assign.lhs[0]));
    }
}
