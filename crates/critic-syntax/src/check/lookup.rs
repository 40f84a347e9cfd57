//! Field and method lookup, including promotion through embedded fields

use super::object::{Object, ObjectId};
use crate::types::{Type, TypeArena, TypeId};

/// Embedding depth searched before giving up.
const MAX_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Found {
    Field {
        ty: TypeId,
        indirect: bool,
    },
    /// `obj` is None for interface methods
    Method {
        obj: Option<ObjectId>,
        ty: TypeId,
        indirect: bool,
    },
}

/// Find the field or method `name` on values of type `ty`. Shallower
/// declarations win over promoted ones.
pub fn lookup_field_or_method(
    types: &TypeArena,
    objects: &[Object],
    ty: TypeId,
    name: &str,
) -> Option<Found> {
    search(types, objects, ty, name, false, 0)
}

fn search(
    types: &TypeArena,
    objects: &[Object],
    ty: TypeId,
    name: &str,
    indirect: bool,
    depth: usize,
) -> Option<Found> {
    if depth > MAX_DEPTH {
        return None;
    }
    let (base, is_ptr) = match types.get(ty) {
        Type::Pointer(elem) => (*elem, true),
        _ => (ty, false),
    };
    let indirect = indirect || is_ptr;

    for &method in types.methods(base) {
        if let Some(obj) = objects.get(method.0 as usize) {
            if obj.name == name {
                return Some(Found::Method {
                    obj: Some(method),
                    ty: obj.ty,
                    indirect,
                });
            }
        }
    }

    match types.get(types.underlying(base)) {
        Type::Struct(fields) => {
            if let Some(field) = fields.iter().find(|f| f.name == name) {
                return Some(Found::Field {
                    ty: field.ty,
                    indirect,
                });
            }
            fields
                .iter()
                .filter(|f| f.embedded)
                .find_map(|f| search(types, objects, f.ty, name, indirect, depth + 1))
        }
        Type::Interface(methods) if !is_ptr => methods
            .iter()
            .find(|m| m.name == name)
            .map(|m| Found::Method {
                obj: None,
                ty: m.sig,
                indirect,
            }),
        _ => None,
    }
}
