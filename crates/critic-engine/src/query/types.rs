//! Type shape queries

use critic_syntax::ast::Expr;
use critic_syntax::types::{BasicKind, Type, TypeArena, TypeId};

use crate::model::Program;

/// Returns true if values of `ty` are references: pointers, maps, channels,
/// interfaces and `unsafe.Pointer`.
pub fn is_pointer_like(types: &TypeArena, ty: TypeId) -> bool {
    match types.get(types.underlying(ty)) {
        Type::Interface(_) | Type::Chan { .. } | Type::Map { .. } | Type::Pointer(_) => true,
        Type::Basic(kind) => *kind == BasicKind::UnsafePointer,
        _ => false,
    }
}

/// Strip one level of pointer.
pub fn dereference(types: &TypeArena, ty: TypeId) -> TypeId {
    types.pointer_elem(ty).unwrap_or(ty)
}

/// Strip every level of pointer.
pub fn dereference_r(types: &TypeArena, ty: TypeId) -> TypeId {
    let mut current = ty;
    // Pointer chains are finite but a cyclic defined type could loop.
    for _ in 0..64 {
        match types.pointer_elem(current) {
            Some(elem) => current = elem,
            None => break,
        }
    }
    current
}

/// Returns true if the qualified rendering of `ty` is exactly `name`.
pub fn is_type(types: &TypeArena, ty: TypeId, name: &str) -> bool {
    types.type_string(ty) == name
}

/// Returns true if `expr` has a known type rendered as `name`.
pub fn is_of_type(program: &Program<'_>, expr: &Expr, name: &str) -> bool {
    program
        .type_of(expr)
        .is_some_and(|ty| is_type(program.types(), ty, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixture::Loaded;

    const SRC: &str = r#"package kv

import "unsafe"

type Handle *int

type Table struct{ rows []int }

var (
	tp   *Table
	tpp  **Table
	m    map[string]int
	ch   chan int
	err  error
	up   unsafe.Pointer
	h    Handle
	tab  Table
	n    int
	rows []int
)

func f() {
	_ = tp
	_ = n
}
"#;

    fn var_type(loaded: &Loaded, name: &str) -> TypeId {
        loaded
            .info
            .objects
            .iter()
            .find(|obj| obj.name == name)
            .unwrap()
            .ty
    }

    #[test]
    fn test_pointer_like() {
        let loaded = Loaded::new(SRC);
        let types = &loaded.info.types;
        for name in ["tp", "m", "ch", "err", "up", "h"] {
            assert!(is_pointer_like(types, var_type(&loaded, name)), "{}", name);
        }
        for name in ["tab", "n", "rows"] {
            assert!(!is_pointer_like(types, var_type(&loaded, name)), "{}", name);
        }
    }

    #[test]
    fn test_dereference() {
        let loaded = Loaded::new(SRC);
        let types = &loaded.info.types;
        let table = var_type(&loaded, "tab");
        assert_eq!(dereference(types, var_type(&loaded, "tp")), table);
        assert_eq!(dereference(types, table), table);
        let once = dereference(types, var_type(&loaded, "tpp"));
        assert!(is_type(types, once, "*kv.Table"));
        assert_eq!(dereference_r(types, var_type(&loaded, "tpp")), table);
    }

    #[test]
    fn test_is_of_type() {
        let loaded = Loaded::new(SRC);
        let program = loaded.program();
        assert!(is_of_type(&program, loaded.expr("f", 0), "*kv.Table"));
        assert!(is_of_type(&program, loaded.expr("f", 1), "int"));
        assert!(!is_of_type(&program, loaded.expr("f", 1), "int64"));
    }
}
