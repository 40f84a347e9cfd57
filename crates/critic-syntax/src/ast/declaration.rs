//! Declaration nodes

use super::{BasicLit, Block, Expr, FieldList, FuncType, Ident, NodeId, Spanned, TypeExpr};
use crate::token::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Func(FuncDecl),
    Gen(GenDecl),
}

impl Spanned for Decl {
    fn span(&self) -> Span {
        match self {
            Decl::Func(d) => d.span,
            Decl::Gen(d) => d.span,
        }
    }
}

/// A function or method declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub id: NodeId,
    /// Receiver list for methods
    pub recv: Option<FieldList>,
    pub name: Ident,
    pub ty: FuncType,
    /// None for external (body-less) declarations
    pub body: Option<Block>,
    pub span: Span,
}

impl FuncDecl {
    pub fn is_method(&self) -> bool {
        self.recv.is_some()
    }
}

impl Spanned for FuncDecl {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Import,
    Const,
    Var,
    Type,
}

impl DeclKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Import => "import",
            DeclKind::Const => "const",
            DeclKind::Var => "var",
            DeclKind::Type => "type",
        }
    }
}

/// `import`, `const`, `var` or `type` declaration, possibly grouped.
#[derive(Debug, Clone, PartialEq)]
pub struct GenDecl {
    pub kind: DeclKind,
    pub specs: Vec<Spec>,
    /// Written with parentheses
    pub grouped: bool,
    pub span: Span,
}

impl Spanned for GenDecl {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

impl Spanned for Spec {
    fn span(&self) -> Span {
        match self {
            Spec::Import(s) => s.span,
            Spec::Value(s) => s.span,
            Spec::Type(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    /// Local name (`.`/`_` included) if given
    pub name: Option<Ident>,
    pub path: BasicLit,
    pub span: Span,
}

impl ImportSpec {
    /// The unquoted import path.
    pub fn path_value(&self) -> String {
        self.path.string_value().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<TypeExpr>,
    pub values: Vec<Expr>,
    /// Position within the enclosing declaration (the `iota` value for
    /// constants)
    pub index: usize,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: Ident,
    /// `type A = B`
    pub alias: bool,
    pub ty: TypeExpr,
    pub span: Span,
}
