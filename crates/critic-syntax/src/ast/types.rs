//! Type expressions

use super::{Expr, Ident, Spanned};
use crate::token::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExprKind {
    /// `T`
    Name(Ident),
    /// `pkg.T`
    Qualified { pkg: Ident, name: Ident },
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `[N]T`; `len` is None for `[...]T`
    Array {
        len: Option<Box<Expr>>,
        elem: Box<TypeExpr>,
    },
    /// `[]T`
    Slice(Box<TypeExpr>),
    /// `map[K]V`
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// `chan T`, `chan<- T`, `<-chan T`
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    Func(FuncType),
    Interface(InterfaceType),
    Struct(StructType),
    /// `...T` in the last parameter position
    Ellipsis(Box<TypeExpr>),
    /// `(T)`
    Paren(Box<TypeExpr>),
}

impl TypeExpr {
    pub fn new(kind: TypeExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl Spanned for TypeExpr {
    fn span(&self) -> Span {
        self.span
    }
}

/// A parameter, result, receiver or struct field.
///
/// `names` is empty for anonymous parameters and embedded fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
    pub tag: Option<String>,
    pub span: Span,
}

impl Spanned for Field {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldList {
    pub fields: Vec<Field>,
    pub span: Span,
}

impl FieldList {
    /// Number of declared entries, counting each name separately.
    pub fn len(&self) -> usize {
        self.fields.iter().map(|f| f.names.len().max(1)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncType {
    pub params: FieldList,
    pub results: FieldList,
    pub span: Span,
}

impl FuncType {
    /// Returns true if the last parameter is variadic.
    pub fn is_variadic(&self) -> bool {
        self.params
            .fields
            .last()
            .is_some_and(|f| matches!(f.ty.kind, TypeExprKind::Ellipsis(_)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceElem {
    Method { name: Ident, ty: FuncType },
    Embedded(TypeExpr),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InterfaceType {
    pub elems: Vec<InterfaceElem>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructType {
    pub fields: Vec<Field>,
}
