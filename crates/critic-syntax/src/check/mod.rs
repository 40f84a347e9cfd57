//! Best-effort type checking
//!
//! Resolves identifiers to objects, computes expression types and folds
//! constants for a single file. Checking never fails: anything that cannot
//! be resolved (members of imported packages, ill-typed code) is recorded
//! with the invalid type and analysis carries on.

mod decl;
mod expr;
mod lookup;
mod object;
mod stmt;
mod universe;

pub use lookup::{lookup_field_or_method, Found};
pub use object::{Object, ObjectId, ObjectKind};

use crate::ast::{File, Ident, NodeId};
use crate::token::Span;
use crate::types::{ConstValue, TypeArena, TypeId};
use rustc_hash::FxHashMap;

/// How an expression may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Computed value
    Value,
    /// Addressable location
    Variable,
    /// Map index; may be used in comma-ok assignment
    MapIndex,
    /// Type assertion or receive; may be used in comma-ok assignment
    CommaOk,
    Constant,
    /// Names a type
    TypeExpr,
    Builtin,
    /// Call without results
    NoValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAndValue {
    pub mode: Mode,
    pub ty: TypeId,
    pub value: Option<ConstValue>,
}

impl TypeAndValue {
    pub fn is_type(&self) -> bool {
        self.mode == Mode::TypeExpr
    }

    pub fn is_value(&self) -> bool {
        !matches!(self.mode, Mode::TypeExpr | Mode::Builtin | Mode::NoValue)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// `x.f` naming a struct field
    FieldVal,
    /// `x.m` naming a method of a value
    MethodVal,
    /// `T.m` naming a method through its type
    MethodExpr,
}

/// Resolution of a selector expression `x.name`.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub kind: SelectionKind,
    /// Type of `x`
    pub recv: TypeId,
    pub name: String,
    /// Declared method; None for fields and interface methods
    pub obj: Option<ObjectId>,
    /// Type of the selected field or method
    pub ty: TypeId,
    /// A pointer was dereferenced on the way
    pub indirect: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CheckConfig {
    /// Import path of the checked package; defaults to the package name
    pub package_path: Option<String>,
}

/// Everything the checker learned about a file.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub package_name: String,
    pub package_path: String,
    pub types: TypeArena,
    pub objects: Vec<Object>,
    pub exprs: FxHashMap<NodeId, TypeAndValue>,
    /// Identifiers that declare an object
    pub defs: FxHashMap<NodeId, ObjectId>,
    /// Identifiers that refer to an object
    pub uses: FxHashMap<NodeId, ObjectId>,
    /// Objects declared implicitly, keyed by type switch clause
    pub implicits: FxHashMap<NodeId, ObjectId>,
    pub selections: FxHashMap<NodeId, Selection>,
}

impl TypeInfo {
    fn new(package_name: &str, package_path: &str) -> Self {
        Self {
            package_name: package_name.to_string(),
            package_path: package_path.to_string(),
            types: TypeArena::new(),
            objects: Vec::new(),
            exprs: FxHashMap::default(),
            defs: FxHashMap::default(),
            uses: FxHashMap::default(),
            implicits: FxHashMap::default(),
            selections: FxHashMap::default(),
        }
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0 as usize)
    }

    /// Object an identifier declares or refers to.
    pub fn object_of(&self, ident: &Ident) -> Option<ObjectId> {
        self.defs
            .get(&ident.id)
            .or_else(|| self.uses.get(&ident.id))
            .copied()
    }

    pub fn type_and_value(&self, id: NodeId) -> Option<&TypeAndValue> {
        self.exprs.get(&id)
    }

    /// Type of an expression; None if it was never recorded or is invalid.
    pub fn type_of(&self, id: NodeId) -> Option<TypeId> {
        self.exprs
            .get(&id)
            .map(|tv| tv.ty)
            .filter(|ty| !self.types.is_invalid(*ty))
    }

    pub fn const_value(&self, id: NodeId) -> Option<&ConstValue> {
        self.exprs.get(&id).and_then(|tv| tv.value.as_ref())
    }

    pub fn selection(&self, id: NodeId) -> Option<&Selection> {
        self.selections.get(&id)
    }

    pub fn full_name(&self, id: ObjectId) -> Option<String> {
        self.object(id).map(|obj| obj.full_name(&self.types))
    }
}

/// Type-check a parsed file.
pub fn check_file(file: &File, config: &CheckConfig) -> TypeInfo {
    let path = config
        .package_path
        .clone()
        .unwrap_or_else(|| file.package.name.clone());
    let mut checker = Checker::new(&file.package.name, &path);
    checker.check_package(file);
    tracing::debug!(
        package = %path,
        objects = checker.info.objects.len(),
        exprs = checker.info.exprs.len(),
        "type-checked file"
    );
    checker.info
}

/// Checker state. Scopes are a stack: universe, package, then one entry per
/// open function or block.
pub(crate) struct Checker {
    pub(crate) info: TypeInfo,
    scopes: Vec<FxHashMap<String, ObjectId>>,
    /// Members of imported packages, by (path, name)
    externals: FxHashMap<(String, String), ObjectId>,
    /// Result types of the enclosing functions
    results: Vec<Vec<TypeId>>,
    /// Value of `iota` inside a constant declaration
    iota: Option<i128>,
    /// Off while re-evaluating repeated constant expressions
    recording: bool,
}

impl Checker {
    fn new(package_name: &str, package_path: &str) -> Self {
        let mut info = TypeInfo::new(package_name, package_path);
        let mut universe = FxHashMap::default();
        for object in universe::universe(&mut info.types) {
            let id = ObjectId(info.objects.len() as u32);
            universe.insert(object.name.clone(), id);
            info.objects.push(object);
        }
        Self {
            info,
            scopes: vec![universe, FxHashMap::default()],
            externals: FxHashMap::default(),
            results: Vec::new(),
            iota: None,
            recording: true,
        }
    }

    pub(crate) fn new_object(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.info.objects.len() as u32);
        self.info.objects.push(object);
        id
    }

    pub(crate) fn obj(&self, id: ObjectId) -> &Object {
        &self.info.objects[id.0 as usize]
    }

    pub(crate) fn package_path(&self) -> String {
        self.info.package_path.clone()
    }

    /// Declare `ident` in the innermost scope. Blank identifiers get an
    /// object but are not bound.
    pub(crate) fn declare(&mut self, ident: &Ident, kind: ObjectKind, ty: TypeId) -> ObjectId {
        let pkg = Some(self.package_path());
        let id = self.new_object(Object {
            name: ident.name.clone(),
            kind,
            ty,
            pkg,
            span: ident.span,
            recv: None,
        });
        self.info.defs.insert(ident.id, id);
        if !ident.is_blank() {
            if let Some(scope) = self.scopes.last_mut() {
                scope.insert(ident.name.clone(), id);
            }
        }
        id
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<ObjectId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    /// Bound in the innermost scope only.
    pub(crate) fn lookup_local(&self, name: &str) -> Option<ObjectId> {
        self.scopes.last().and_then(|scope| scope.get(name).copied())
    }

    pub(crate) fn open_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    pub(crate) fn close_scope(&mut self) {
        // The universe and package scopes stay.
        if self.scopes.len() > 2 {
            self.scopes.pop();
        }
    }

    /// Object for `path.name` of an imported package, created on first use.
    pub(crate) fn external(&mut self, path: &str, name: &str, span: Span) -> ObjectId {
        let key = (path.to_string(), name.to_string());
        if let Some(&id) = self.externals.get(&key) {
            return id;
        }
        let ty = self.info.types.new_named(name, path);
        let id = self.new_object(Object {
            name: name.to_string(),
            kind: ObjectKind::External,
            ty,
            pkg: Some(path.to_string()),
            span,
            recv: None,
        });
        self.externals.insert(key, id);
        id
    }

    pub(crate) fn record(&mut self, id: NodeId, mode: Mode, ty: TypeId, value: Option<ConstValue>) {
        if !self.recording {
            return;
        }
        self.info.exprs.insert(id, TypeAndValue { mode, ty, value });
    }
}

#[cfg(test)]
mod tests;
