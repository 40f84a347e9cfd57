//! Type representation, interning and layout
//!
//! Structural types are interned so that identical types share a
//! [`TypeId`]; each defined (named) type is unique.

pub mod constant;
pub mod sizes;
mod ty;

pub use constant::ConstValue;
pub use sizes::Sizes;
pub use ty::*;

use crate::check::ObjectId;
use rustc_hash::FxHashMap;

static INVALID: Type = Type::Basic(BasicKind::Invalid);

/// Per-named-type data that is filled in after the type is created.
#[derive(Debug, Clone, Default)]
struct NamedInfo {
    underlying: Option<TypeId>,
    methods: Vec<ObjectId>,
}

#[derive(Debug, Clone)]
pub struct TypeArena {
    /// Storage for all types, indexed by TypeId
    types: Vec<Type>,

    /// Reverse mapping from Type to TypeId for interning
    type_to_id: FxHashMap<Type, TypeId>,

    named: FxHashMap<TypeId, NamedInfo>,
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeArena {
    pub fn new() -> Self {
        let mut arena = TypeArena {
            types: Vec::new(),
            type_to_id: FxHashMap::default(),
            named: FxHashMap::default(),
        };
        for kind in BasicKind::ALL {
            arena.intern(Type::Basic(kind));
        }
        arena
    }

    pub fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.type_to_id.get(&ty) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty.clone());
        self.type_to_id.insert(ty, id);
        id
    }

    /// Get a type by id; unknown ids read as the invalid type.
    pub fn get(&self, id: TypeId) -> &Type {
        self.types.get(id.0 as usize).unwrap_or(&INVALID)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Id of a pre-interned basic type.
    pub fn basic(kind: BasicKind) -> TypeId {
        TypeId(kind as u32)
    }

    pub fn invalid() -> TypeId {
        Self::basic(BasicKind::Invalid)
    }

    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        self.intern(Type::Pointer(elem))
    }

    pub fn slice(&mut self, elem: TypeId) -> TypeId {
        self.intern(Type::Slice(elem))
    }

    pub fn tuple(&mut self, elems: Vec<TypeId>) -> TypeId {
        self.intern(Type::Tuple(elems))
    }

    /// Create a fresh defined type; its underlying type is set later.
    pub fn new_named(&mut self, name: &str, pkg: &str) -> TypeId {
        let key = NamedKey {
            name: name.to_string(),
            pkg: pkg.to_string(),
            serial: self.named.len() as u32,
        };
        let id = self.intern(Type::Named(key));
        self.named.insert(id, NamedInfo::default());
        id
    }

    /// Record the type a defined type was declared with. It may itself be
    /// a defined type; [`TypeArena::underlying`] follows the chain.
    pub fn set_underlying(&mut self, named: TypeId, underlying: TypeId) {
        if let Some(info) = self.named.get_mut(&named) {
            info.underlying = Some(underlying);
        }
    }

    pub fn add_method(&mut self, named: TypeId, method: ObjectId) {
        if let Some(info) = self.named.get_mut(&named) {
            info.methods.push(method);
        }
    }

    /// Declared methods of a defined type.
    pub fn methods(&self, named: TypeId) -> &[ObjectId] {
        self.named
            .get(&named)
            .map_or(&[][..], |info| info.methods.as_slice())
    }

    /// Underlying type: the type itself for everything except defined types.
    pub fn underlying(&self, id: TypeId) -> TypeId {
        let mut current = id;
        // Bounded to survive ill-formed cycles like `type A B; type B A`.
        for _ in 0..32 {
            match self.get(current) {
                Type::Named(_) => match self.named.get(&current).and_then(|i| i.underlying) {
                    Some(next) => current = next,
                    None => return Self::invalid(),
                },
                _ => return current,
            }
        }
        Self::invalid()
    }

    pub fn basic_kind(&self, id: TypeId) -> Option<BasicKind> {
        match self.get(id) {
            Type::Basic(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn underlying_basic(&self, id: TypeId) -> Option<BasicKind> {
        self.basic_kind(self.underlying(id))
    }

    pub fn is_named(&self, id: TypeId) -> bool {
        matches!(self.get(id), Type::Named(_))
    }

    pub fn is_interface(&self, id: TypeId) -> bool {
        matches!(self.get(self.underlying(id)), Type::Interface(_))
    }

    pub fn is_invalid(&self, id: TypeId) -> bool {
        id == Self::invalid()
    }

    /// Element type of a pointer.
    pub fn pointer_elem(&self, id: TypeId) -> Option<TypeId> {
        match self.get(self.underlying(id)) {
            Type::Pointer(elem) => Some(*elem),
            _ => None,
        }
    }

    pub fn signature(&self, id: TypeId) -> Option<&Signature> {
        match self.get(self.underlying(id)) {
            Type::Signature(sig) => Some(sig),
            _ => None,
        }
    }

    /// Human-readable rendering, qualifying defined types with their
    /// package name.
    pub fn type_string(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, id, 0);
        out
    }

    fn write_type(&self, out: &mut String, id: TypeId, depth: usize) {
        if depth > 16 {
            out.push_str("...");
            return;
        }
        let list = |arena: &TypeArena, out: &mut String, ids: &[TypeId]| {
            for (i, t) in ids.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                arena.write_type(out, *t, depth + 1);
            }
        };
        match self.get(id) {
            Type::Basic(kind) => out.push_str(kind.name()),
            Type::Pointer(elem) => {
                out.push('*');
                self.write_type(out, *elem, depth + 1);
            }
            Type::Array { len, elem } => {
                out.push_str(&format!("[{}]", len));
                self.write_type(out, *elem, depth + 1);
            }
            Type::Slice(elem) => {
                out.push_str("[]");
                self.write_type(out, *elem, depth + 1);
            }
            Type::Map { key, value } => {
                out.push_str("map[");
                self.write_type(out, *key, depth + 1);
                out.push(']');
                self.write_type(out, *value, depth + 1);
            }
            Type::Chan { dir, elem } => {
                out.push_str(match dir {
                    crate::ast::ChanDir::Both => "chan ",
                    crate::ast::ChanDir::Send => "chan<- ",
                    crate::ast::ChanDir::Recv => "<-chan ",
                });
                self.write_type(out, *elem, depth + 1);
            }
            Type::Struct(fields) => {
                out.push_str("struct{");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    if !field.embedded {
                        out.push_str(&field.name);
                        out.push(' ');
                    }
                    self.write_type(out, field.ty, depth + 1);
                }
                out.push('}');
            }
            Type::Signature(sig) => {
                out.push_str("func(");
                list(self, out, &sig.params);
                out.push(')');
                match sig.results.len() {
                    0 => {}
                    1 => {
                        out.push(' ');
                        self.write_type(out, sig.results[0], depth + 1);
                    }
                    _ => {
                        out.push_str(" (");
                        list(self, out, &sig.results);
                        out.push(')');
                    }
                }
            }
            Type::Interface(methods) => {
                if methods.is_empty() {
                    out.push_str("interface{}");
                } else {
                    out.push_str("interface{");
                    let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
                    out.push_str(&names.join("; "));
                    out.push('}');
                }
            }
            Type::Tuple(elems) => {
                out.push('(');
                list(self, out, elems);
                out.push(')');
            }
            Type::Named(key) => {
                if !key.pkg.is_empty() {
                    out.push_str(&key.pkg);
                    out.push('.');
                }
                out.push_str(&key.name);
            }
        }
    }
}
