//! Abstract syntax tree for the analysed language.
//!
//! Every expression, identifier and function carries a [`NodeId`] that is
//! unique within a parsed file; the type checker keys its tables by it.
//! Every node carries a [`Span`].

use crate::token::Span;

pub mod declaration;
pub mod expression;
pub mod statement;
pub mod types;
pub mod visitor;

pub use declaration::*;
pub use expression::*;
pub use statement::*;
pub use types::*;
pub use visitor::*;

/// Stable identity of an AST node within one parsed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Anything with a source location.
pub trait Spanned {
    fn span(&self) -> Span;
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

impl<T: Spanned> Spanned for Box<T> {
    fn span(&self) -> Span {
        (**self).span()
    }
}

impl<T: Spanned> Spanned for &T {
    fn span(&self) -> Span {
        (**self).span()
    }
}

/// Root node: one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    /// Package name from the `package` clause
    pub package: Ident,

    /// Span of the `package` keyword
    pub package_span: Span,

    /// Top-level declarations, imports first
    pub decls: Vec<Decl>,

    /// Span covering the entire file
    pub span: Span,
}

impl File {
    /// Iterate over all import specs in source order.
    pub fn imports(&self) -> impl Iterator<Item = &ImportSpec> {
        self.decls
            .iter()
            .filter_map(|decl| match decl {
                Decl::Gen(gen) if gen.kind == DeclKind::Import => Some(gen),
                _ => None,
            })
            .flat_map(|gen| gen.specs.iter())
            .filter_map(|spec| match spec {
                Spec::Import(import) => Some(import),
                _ => None,
            })
    }

    /// Iterate over top-level function declarations.
    pub fn funcs(&self) -> impl Iterator<Item = &FuncDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Func(func) => Some(func),
            Decl::Gen(_) => None,
        })
    }
}

impl Spanned for File {
    fn span(&self) -> Span {
        self.span
    }
}
