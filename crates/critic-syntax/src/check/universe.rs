//! Predeclared identifiers

use super::object::{Object, ObjectKind};
use crate::token::Span;
use crate::types::{BasicKind, ConstValue, InterfaceMethod, Signature, Type, TypeArena};

pub const BUILTINS: &[&str] = &[
    "append", "cap", "clear", "close", "complex", "copy", "delete", "imag", "len", "make", "max",
    "min", "new", "panic", "print", "println", "real", "recover",
];

fn object(name: &str, kind: ObjectKind, ty: crate::types::TypeId) -> Object {
    Object {
        name: name.to_string(),
        kind,
        ty,
        pkg: None,
        span: Span::default(),
        recv: None,
    }
}

/// Build the universe objects in declaration order.
pub fn universe(types: &mut TypeArena) -> Vec<Object> {
    let mut objects = Vec::new();

    for kind in BasicKind::ALL {
        if kind == BasicKind::Invalid || kind.is_untyped() || kind == BasicKind::UnsafePointer {
            continue;
        }
        objects.push(object(kind.name(), ObjectKind::TypeName, TypeArena::basic(kind)));
    }
    objects.push(object(
        "byte",
        ObjectKind::TypeName,
        TypeArena::basic(BasicKind::Uint8),
    ));
    objects.push(object(
        "rune",
        ObjectKind::TypeName,
        TypeArena::basic(BasicKind::Int32),
    ));

    let any = types.intern(Type::Interface(Vec::new()));
    objects.push(object("any", ObjectKind::TypeName, any));

    let string = TypeArena::basic(BasicKind::String);
    let error_sig = types.intern(Type::Signature(Signature {
        params: Vec::new(),
        results: vec![string],
        variadic: false,
    }));
    let error_iface = types.intern(Type::Interface(vec![InterfaceMethod {
        name: "Error".to_string(),
        sig: error_sig,
    }]));
    let error = types.new_named("error", "");
    types.set_underlying(error, error_iface);
    objects.push(object("error", ObjectKind::TypeName, error));

    let untyped_bool = TypeArena::basic(BasicKind::UntypedBool);
    objects.push(object(
        "true",
        ObjectKind::Const(Some(ConstValue::Bool(true))),
        untyped_bool,
    ));
    objects.push(object(
        "false",
        ObjectKind::Const(Some(ConstValue::Bool(false))),
        untyped_bool,
    ));
    objects.push(object(
        "iota",
        ObjectKind::Const(None),
        TypeArena::basic(BasicKind::UntypedInt),
    ));
    objects.push(object(
        "nil",
        ObjectKind::Nil,
        TypeArena::basic(BasicKind::UntypedNil),
    ));

    for name in BUILTINS {
        objects.push(object(name, ObjectKind::Builtin, TypeArena::invalid()));
    }

    objects
}
