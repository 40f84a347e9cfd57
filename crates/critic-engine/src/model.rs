//! Program model adapter
//!
//! [`Program`] is the read-only view checkers get of the analysed file: the
//! syntax tree, semantic tables behind the [`Semantics`] trait, platform
//! sizes and an optional flow form. Any lookup that lacks information
//! answers `None`.

use critic_syntax::ast::{Expr, File, Ident, NodeId, Stmt, TypeExpr};
use critic_syntax::check::{Selection, TypeInfo};
use critic_syntax::types::{BasicKind, ConstValue, TypeArena, TypeId};
use critic_syntax::{printer, FlowProgram, Object, ObjectId, Sizes, SourceFile, Span};

use crate::diagnostic::Position;

/// Semantic tables produced by a type checker.
///
/// Implemented for the reference front-end's [`TypeInfo`]; other front-ends
/// plug in by implementing it over their own tables.
pub trait Semantics: Send + Sync {
    /// Static type of an expression.
    fn type_of(&self, id: NodeId) -> Option<TypeId>;

    /// Folded constant value of an expression.
    fn const_value(&self, id: NodeId) -> Option<&ConstValue>;

    /// Returns true if the expression is the predeclared `nil`.
    fn is_nil(&self, id: NodeId) -> bool;

    /// Object an identifier declares or refers to.
    fn object_of(&self, ident: NodeId) -> Option<ObjectId>;

    /// Field or method selection recorded for a selector expression.
    fn selection(&self, id: NodeId) -> Option<&Selection>;

    fn object(&self, id: ObjectId) -> Option<&Object>;

    fn types(&self) -> &TypeArena;

    fn package_path(&self) -> &str;

    fn package_name(&self) -> &str;
}

impl Semantics for TypeInfo {
    fn type_of(&self, id: NodeId) -> Option<TypeId> {
        TypeInfo::type_of(self, id)
    }

    fn const_value(&self, id: NodeId) -> Option<&ConstValue> {
        TypeInfo::const_value(self, id)
    }

    fn is_nil(&self, id: NodeId) -> bool {
        self.type_and_value(id)
            .is_some_and(|tv| self.types.basic_kind(tv.ty) == Some(BasicKind::UntypedNil))
    }

    fn object_of(&self, ident: NodeId) -> Option<ObjectId> {
        self.defs.get(&ident).or_else(|| self.uses.get(&ident)).copied()
    }

    fn selection(&self, id: NodeId) -> Option<&Selection> {
        TypeInfo::selection(self, id)
    }

    fn object(&self, id: ObjectId) -> Option<&Object> {
        TypeInfo::object(self, id)
    }

    fn types(&self) -> &TypeArena {
        &self.types
    }

    fn package_path(&self) -> &str {
        &self.package_path
    }

    fn package_name(&self) -> &str {
        &self.package_name
    }
}

/// Read-only view of one analysed file.
#[derive(Clone, Copy)]
pub struct Program<'a> {
    source: &'a SourceFile,
    semantics: &'a dyn Semantics,
    sizes: Sizes,
    flow: Option<&'a FlowProgram>,
}

impl<'a> Program<'a> {
    pub fn new(source: &'a SourceFile, semantics: &'a dyn Semantics) -> Self {
        Self {
            source,
            semantics,
            sizes: Sizes::default(),
            flow: None,
        }
    }

    /// Use a different target layout for [`size_of`](Self::size_of).
    pub fn with_sizes(mut self, sizes: Sizes) -> Self {
        self.sizes = sizes;
        self
    }

    /// Attach the lowered flow form of the file.
    pub fn with_flow(mut self, flow: &'a FlowProgram) -> Self {
        self.flow = Some(flow);
        self
    }

    pub fn path(&self) -> &'a str {
        &self.source.path
    }

    pub fn file(&self) -> &'a File {
        &self.source.file
    }

    pub fn source(&self) -> &'a SourceFile {
        self.source
    }

    pub fn text(&self) -> &'a str {
        &self.source.text
    }

    pub fn semantics(&self) -> &'a dyn Semantics {
        self.semantics
    }

    pub fn types(&self) -> &'a TypeArena {
        self.semantics.types()
    }

    pub fn flow(&self) -> Option<&'a FlowProgram> {
        self.flow
    }

    pub fn sizes(&self) -> Sizes {
        self.sizes
    }

    /// Source text covered by `span`.
    pub fn snippet(&self, span: Span) -> &'a str {
        span.slice(&self.source.text)
    }

    pub fn render_expr(&self, expr: &Expr) -> String {
        printer::expr(expr)
    }

    pub fn render_stmt(&self, stmt: &Stmt) -> String {
        printer::stmt(stmt)
    }

    pub fn render_type_expr(&self, ty: &TypeExpr) -> String {
        printer::type_expr(ty)
    }

    /// Render a resolved type, qualified by package path.
    pub fn render_type(&self, ty: TypeId) -> String {
        self.types().type_string(ty)
    }

    pub fn type_of(&self, expr: &Expr) -> Option<TypeId> {
        self.semantics.type_of(expr.id())
    }

    pub fn const_value(&self, expr: &Expr) -> Option<&'a ConstValue> {
        self.semantics.const_value(expr.id())
    }

    pub fn object_id(&self, ident: &Ident) -> Option<ObjectId> {
        self.semantics.object_of(ident.id)
    }

    /// Object an identifier declares or refers to.
    pub fn object_of(&self, ident: &Ident) -> Option<&'a Object> {
        self.object_id(ident)
            .and_then(|id| self.semantics.object(id))
    }

    pub fn object(&self, id: ObjectId) -> Option<&'a Object> {
        self.semantics.object(id)
    }

    /// Declared type of the object `ident` defines or uses.
    pub fn ident_type(&self, ident: &Ident) -> Option<TypeId> {
        self.object_of(ident)
            .map(|obj| obj.ty)
            .filter(|ty| !self.types().is_invalid(*ty))
    }

    pub fn selection(&self, id: NodeId) -> Option<&'a Selection> {
        self.semantics.selection(id)
    }

    /// Size of `ty` in bytes on the configured target.
    pub fn size_of(&self, ty: TypeId) -> Option<i64> {
        self.sizes.size_of(self.types(), ty)
    }

    pub fn line_of(&self, offset: usize) -> u32 {
        self.source.lines.line_of(offset)
    }

    pub fn position(&self, span: Span) -> Position {
        let (line, column) = self.source.lines.line_col(span.start);
        Position {
            path: self.source.path.clone(),
            line,
            column,
            offset: span.start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use critic_syntax::ast::{Decl, Spanned, Spec};
    use critic_syntax::{check_file, CheckConfig};

    fn load(src: &str) -> (SourceFile, TypeInfo) {
        let file = SourceFile::parse("m.go", src).unwrap();
        let info = check_file(&file.file, &CheckConfig::default());
        (file, info)
    }

    fn var_value<'f>(file: &'f SourceFile, name: &str) -> &'f Expr {
        file.file
            .decls
            .iter()
            .filter_map(|decl| match decl {
                Decl::Gen(gen) => Some(gen),
                Decl::Func(_) => None,
            })
            .flat_map(|gen| &gen.specs)
            .find_map(|spec| match spec {
                Spec::Value(value) if value.names[0].name == name => value.values.first(),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_nil_and_constants() {
        let (file, info) = load("package m\nvar p *int = nil\nconst n = 2 + 3\nvar s = \"a\"\n");
        let program = Program::new(&file, &info);
        assert!(info.is_nil(var_value(&file, "p").id()));
        assert!(!info.is_nil(var_value(&file, "s").id()));
        let folded = critic_syntax::types::ConstValue::Int(5);
        let n = file.file.decls.iter().find_map(|decl| match decl {
            Decl::Gen(gen) => gen.specs.iter().find_map(|spec| match spec {
                Spec::Value(value) if value.names[0].name == "n" => Some(value),
                _ => None,
            }),
            Decl::Func(_) => None,
        });
        let n = n.unwrap();
        assert_eq!(program.const_value(&n.values[0]), Some(&folded));
        assert_eq!(program.object_of(&n.names[0]).unwrap().name, "n");
    }

    #[test]
    fn test_missing_information_is_none() {
        let (file, info) = load("package m\nimport \"os\"\nvar f = os.Open\n");
        let program = Program::new(&file, &info);
        assert_eq!(program.type_of(var_value(&file, "f")), None);
        assert!(program.flow().is_none());
    }

    #[test]
    fn test_position_and_snippet() {
        let (file, info) = load("package m\n\nvar answer = 42\n");
        let program = Program::new(&file, &info);
        let value = var_value(&file, "answer");
        let span = value.span();
        assert_eq!(program.snippet(span), "42");
        let position = program.position(span);
        assert_eq!((position.line, position.column), (3, 14));
        assert_eq!(position.path, "m.go");
        assert_eq!(program.line_of(span.start), 3);
    }

    #[test]
    fn test_sizes_are_configurable() {
        let (file, info) = load("package m\nvar xs [4]int\n");
        let obj = info.objects.iter().find(|obj| obj.name == "xs").unwrap();
        let program = Program::new(&file, &info);
        assert_eq!(program.size_of(obj.ty), Some(32));
        let program = program.with_sizes(Sizes::new(4));
        assert_eq!(program.size_of(obj.ty), Some(16));
    }
}
