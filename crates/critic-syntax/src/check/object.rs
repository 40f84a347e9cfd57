//! Declared entities

use crate::token::Span;
use crate::types::{ConstValue, Type, TypeArena, TypeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Var,
    /// A constant; the value is None if it could not be folded
    Const(Option<ConstValue>),
    TypeName,
    Func,
    Builtin,
    /// An imported package
    PkgName { path: String },
    Nil,
    /// A member of an imported package whose declaration is not available
    External,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub name: String,
    pub kind: ObjectKind,
    pub ty: TypeId,
    /// Package path; None for universe objects
    pub pkg: Option<String>,
    pub span: Span,
    /// Receiver type for methods (`T` or `*T`)
    pub recv: Option<TypeId>,
}

impl Object {
    pub fn is_const(&self) -> bool {
        matches!(self.kind, ObjectKind::Const(_))
    }

    pub fn is_func(&self) -> bool {
        matches!(self.kind, ObjectKind::Func)
    }

    pub fn const_value(&self) -> Option<&ConstValue> {
        match &self.kind {
            ObjectKind::Const(value) => value.as_ref(),
            _ => None,
        }
    }

    /// Qualified name: `path.Name` for package members, `(path.T).M` or
    /// `(*path.T).M` for methods, the bare name for universe objects.
    pub fn full_name(&self, types: &TypeArena) -> String {
        if let Some(recv) = self.recv {
            return format!("({}).{}", types.type_string(recv), self.name);
        }
        match &self.pkg {
            Some(pkg) => format!("{}.{}", pkg, self.name),
            None => self.name.clone(),
        }
    }

    /// Receiver base type name for methods, dereferenced.
    pub fn recv_named(&self, types: &TypeArena) -> Option<TypeId> {
        let recv = self.recv?;
        match types.get(recv) {
            Type::Pointer(elem) => Some(*elem),
            _ => Some(recv),
        }
    }
}
