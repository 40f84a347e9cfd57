//! Declarations: package collection, type expressions and signatures

use super::object::{Object, ObjectId, ObjectKind};
use super::{Checker, Mode};
use crate::ast::*;
use crate::types::{
    BasicKind, ConstValue, InterfaceMethod, Signature, StructField, Type, TypeArena, TypeId,
};

impl Checker {
    /// Collect package-level objects, then check function bodies.
    ///
    /// Order: imports, type names, constants, type definitions, function
    /// signatures, variables, bodies. Later phases may refer to everything
    /// declared by earlier ones regardless of source order.
    pub(crate) fn check_package(&mut self, file: &File) {
        for import in file.imports() {
            self.declare_import(import);
        }

        let mut types = Vec::new();
        for gen in gen_decls(file, DeclKind::Type) {
            for spec in &gen.specs {
                if let Spec::Type(spec) = spec {
                    types.push((spec, self.declare_type_name(spec)));
                }
            }
        }

        for gen in gen_decls(file, DeclKind::Const) {
            self.const_decl(gen);
        }

        // Aliases first so that definitions see their targets.
        for (spec, obj) in types.iter().filter(|(spec, _)| spec.alias) {
            self.resolve_type_spec(spec, *obj);
        }
        for (spec, obj) in types.iter().filter(|(spec, _)| !spec.alias) {
            self.resolve_type_spec(spec, *obj);
        }

        let funcs: Vec<(&FuncDecl, ObjectId)> = file
            .funcs()
            .map(|func| (func, self.declare_func(func)))
            .collect();

        for gen in gen_decls(file, DeclKind::Var) {
            self.var_decl(gen);
        }

        for (func, obj) in funcs {
            if let Some(body) = &func.body {
                let sig = self.obj(obj).ty;
                let recv = func.recv.as_ref().map(|recv| (recv, self.obj(obj).recv));
                self.func_body(recv, &func.ty, body, sig);
            }
        }
    }

    fn declare_import(&mut self, import: &ImportSpec) {
        let path = import.path_value();
        let name = match &import.name {
            Some(name) if name.name == "." || name.is_blank() => return,
            Some(name) => name.clone(),
            None => {
                let last = path.rsplit('/').next().unwrap_or(&path).to_string();
                Ident {
                    id: import.path.id,
                    name: last,
                    span: import.path.span,
                }
            }
        };
        self.declare(&name, ObjectKind::PkgName { path }, TypeArena::invalid());
    }

    /// Declare a type name; definitions get a fresh named type whose
    /// underlying type is filled in by [`Checker::resolve_type_spec`].
    pub(crate) fn declare_type_name(&mut self, spec: &TypeSpec) -> ObjectId {
        let ty = if spec.alias {
            TypeArena::invalid()
        } else {
            let path = self.package_path();
            self.info.types.new_named(&spec.name.name, &path)
        };
        self.declare(&spec.name, ObjectKind::TypeName, ty)
    }

    pub(crate) fn resolve_type_spec(&mut self, spec: &TypeSpec, obj: ObjectId) {
        let resolved = self.resolve_type(&spec.ty);
        if spec.alias {
            self.info.objects[obj.0 as usize].ty = resolved;
        } else {
            let named = self.obj(obj).ty;
            self.info.types.set_underlying(named, resolved);
        }
    }

    fn declare_func(&mut self, func: &FuncDecl) -> ObjectId {
        let sig = self.signature(&func.ty);
        let Some(recv) = &func.recv else {
            if func.name.name == "init" {
                // `init` functions are not bound in the package scope.
                let id = self.new_object(Object {
                    name: func.name.name.clone(),
                    kind: ObjectKind::Func,
                    ty: sig,
                    pkg: Some(self.package_path()),
                    span: func.name.span,
                    recv: None,
                });
                self.info.defs.insert(func.name.id, id);
                return id;
            }
            return self.declare(&func.name, ObjectKind::Func, sig);
        };

        let recv_ty = recv
            .fields
            .first()
            .map_or(TypeArena::invalid(), |field| self.resolve_type(&field.ty));
        let id = self.new_object(Object {
            name: func.name.name.clone(),
            kind: ObjectKind::Func,
            ty: sig,
            pkg: Some(self.package_path()),
            span: func.name.span,
            recv: Some(recv_ty),
        });
        self.info.defs.insert(func.name.id, id);
        let base = self.info.types.pointer_elem(recv_ty).unwrap_or(recv_ty);
        if self.info.types.is_named(base) {
            self.info.types.add_method(base, id);
        }
        id
    }

    /// Check a function body with its receiver, parameters and named
    /// results in scope.
    pub(crate) fn func_body(
        &mut self,
        recv: Option<(&FieldList, Option<TypeId>)>,
        ty: &FuncType,
        body: &Block,
        sig: TypeId,
    ) {
        self.open_scope();
        if let Some((list, recv_ty)) = recv {
            for field in &list.fields {
                let field_ty = recv_ty.unwrap_or_else(TypeArena::invalid);
                for name in &field.names {
                    self.declare(name, ObjectKind::Var, field_ty);
                }
            }
        }
        self.declare_fields(&ty.params);
        self.declare_fields(&ty.results);
        let results = self
            .info
            .types
            .signature(sig)
            .map(|sig| sig.results.clone())
            .unwrap_or_default();
        self.results.push(results);
        self.stmts(&body.stmts);
        self.results.pop();
        self.close_scope();
    }

    fn declare_fields(&mut self, list: &FieldList) {
        for field in &list.fields {
            let ty = self.resolve_type(&field.ty);
            for name in &field.names {
                self.declare(name, ObjectKind::Var, ty);
            }
        }
    }

    /// Local `const`, `var` and `type` declarations.
    pub(crate) fn gen_decl(&mut self, gen: &GenDecl) {
        match gen.kind {
            DeclKind::Const => self.const_decl(gen),
            DeclKind::Var => self.var_decl(gen),
            DeclKind::Type => {
                for spec in &gen.specs {
                    if let Spec::Type(spec) = spec {
                        let obj = self.declare_type_name(spec);
                        self.resolve_type_spec(spec, obj);
                    }
                }
            }
            DeclKind::Import => {}
        }
    }

    /// Constants, with `iota` and implicit repetition of the previous
    /// non-empty spec.
    fn const_decl(&mut self, gen: &GenDecl) {
        let mut last: Option<&ValueSpec> = None;
        for spec in &gen.specs {
            let Spec::Value(spec) = spec else { continue };
            let repeated = spec.values.is_empty() && spec.ty.is_none();
            let source = match (repeated, last) {
                (true, Some(prev)) => prev,
                _ => {
                    last = Some(spec);
                    spec
                }
            };
            self.iota = Some(spec.index as i128);
            // Repeated expressions were already recorded for their own spec.
            let recording = std::mem::replace(&mut self.recording, !repeated);
            let declared = source.ty.as_ref().map(|ty| self.resolve_type(ty));
            let mut values = Vec::with_capacity(spec.names.len());
            for i in 0..spec.names.len() {
                let operand = match source.values.get(i) {
                    Some(expr) => {
                        let operand = self.expr(expr, declared);
                        if let Some(target) = declared {
                            self.update_untyped(expr, target);
                        }
                        operand
                    }
                    None => super::expr::Operand::invalid(),
                };
                let ty = declared.unwrap_or(operand.ty);
                let value = match (declared, operand.value) {
                    (Some(target), Some(value)) => self.convert_const(&value, target),
                    (_, value) => value,
                };
                values.push((ty, value));
            }
            self.recording = recording;
            self.iota = None;
            for (name, (ty, value)) in spec.names.iter().zip(values) {
                self.declare(name, ObjectKind::Const(value), ty);
            }
        }
    }

    fn var_decl(&mut self, gen: &GenDecl) {
        for spec in &gen.specs {
            let Spec::Value(spec) = spec else { continue };
            let declared = spec.ty.as_ref().map(|ty| self.resolve_type(ty));
            let types = if spec.values.is_empty() {
                vec![declared.unwrap_or_else(TypeArena::invalid); spec.names.len()]
            } else {
                let hints = vec![declared; spec.names.len()];
                self.rhs_types(&spec.values, spec.names.len(), &hints)
            };
            for (i, name) in spec.names.iter().enumerate() {
                let ty = declared.unwrap_or_else(|| {
                    let ty = types.get(i).copied().unwrap_or_else(TypeArena::invalid);
                    self.default_type(ty)
                });
                self.declare(name, ObjectKind::Var, ty);
            }
        }
    }

    pub(crate) fn signature(&mut self, ty: &FuncType) -> TypeId {
        let params = self.field_types(&ty.params);
        let results = self.field_types(&ty.results);
        self.info.types.intern(Type::Signature(Signature {
            params,
            results,
            variadic: ty.is_variadic(),
        }))
    }

    fn field_types(&mut self, list: &FieldList) -> Vec<TypeId> {
        let mut types = Vec::with_capacity(list.len());
        for field in &list.fields {
            let ty = self.resolve_type(&field.ty);
            types.extend(std::iter::repeat(ty).take(field.names.len().max(1)));
        }
        types
    }

    /// Resolve a type expression. Unknown names resolve to the invalid type.
    pub(crate) fn resolve_type(&mut self, ty: &TypeExpr) -> TypeId {
        match &ty.kind {
            TypeExprKind::Name(ident) => match self.lookup(&ident.name) {
                Some(id) => {
                    self.info.uses.insert(ident.id, id);
                    let obj = self.obj(id);
                    match obj.kind {
                        ObjectKind::TypeName => obj.ty,
                        _ => TypeArena::invalid(),
                    }
                }
                None => TypeArena::invalid(),
            },
            TypeExprKind::Qualified { pkg, name } => {
                let Some(path) = self.package_path_of(pkg) else {
                    return TypeArena::invalid();
                };
                if path == "unsafe" && name.name == "Pointer" {
                    return TypeArena::basic(BasicKind::UnsafePointer);
                }
                let obj = self.external(&path, &name.name, name.span);
                self.info.uses.insert(name.id, obj);
                self.obj(obj).ty
            }
            TypeExprKind::Pointer(elem) => {
                let elem = self.resolve_type(elem);
                self.info.types.pointer(elem)
            }
            TypeExprKind::Array { len, elem } => {
                let elem = self.resolve_type(elem);
                let len = len
                    .as_ref()
                    .and_then(|len| self.expr(len, None).value)
                    .and_then(|value| value.as_int())
                    .and_then(|n| u64::try_from(n).ok());
                match len {
                    Some(len) => self.info.types.intern(Type::Array { len, elem }),
                    None => TypeArena::invalid(),
                }
            }
            TypeExprKind::Slice(elem) | TypeExprKind::Ellipsis(elem) => {
                let elem = self.resolve_type(elem);
                self.info.types.slice(elem)
            }
            TypeExprKind::Map { key, value } => {
                let key = self.resolve_type(key);
                let value = self.resolve_type(value);
                self.info.types.intern(Type::Map { key, value })
            }
            TypeExprKind::Chan { dir, elem } => {
                let elem = self.resolve_type(elem);
                self.info.types.intern(Type::Chan { dir: *dir, elem })
            }
            TypeExprKind::Func(func) => self.signature(func),
            TypeExprKind::Interface(iface) => self.interface_type(iface),
            TypeExprKind::Struct(st) => self.struct_type(st),
            TypeExprKind::Paren(inner) => self.resolve_type(inner),
        }
    }

    fn struct_type(&mut self, st: &StructType) -> TypeId {
        let mut fields = Vec::new();
        for field in &st.fields {
            let ty = self.resolve_type(&field.ty);
            if field.names.is_empty() {
                fields.push(StructField {
                    name: embedded_name(&field.ty).unwrap_or_default(),
                    ty,
                    embedded: true,
                });
            }
            for name in &field.names {
                fields.push(StructField {
                    name: name.name.clone(),
                    ty,
                    embedded: false,
                });
            }
        }
        self.info.types.intern(Type::Struct(fields))
    }

    fn interface_type(&mut self, iface: &InterfaceType) -> TypeId {
        let mut methods: Vec<InterfaceMethod> = Vec::new();
        for elem in &iface.elems {
            match elem {
                InterfaceElem::Method { name, ty } => {
                    let sig = self.signature(ty);
                    methods.push(InterfaceMethod {
                        name: name.name.clone(),
                        sig,
                    });
                }
                InterfaceElem::Embedded(ty) => {
                    let embedded = self.resolve_type(ty);
                    let under = self.info.types.underlying(embedded);
                    if let Type::Interface(inner) = self.info.types.get(under) {
                        methods.extend(inner.iter().cloned());
                    }
                }
            }
        }
        methods.sort_by(|a, b| a.name.cmp(&b.name));
        methods.dedup_by(|a, b| a.name == b.name);
        self.info.types.intern(Type::Interface(methods))
    }

    /// Type named by an expression in type position (composite literal
    /// types, conversions, `make`/`new` arguments).
    pub(crate) fn type_expr_of(&mut self, expr: &Expr) -> TypeId {
        if let Expr::Selector(sel) = expr {
            if let Some(ident) = sel.x.as_ident() {
                if let Some(path) = self.package_path_of(ident) {
                    let ty = if path == "unsafe" && sel.sel.name == "Pointer" {
                        TypeArena::basic(BasicKind::UnsafePointer)
                    } else {
                        let obj = self.external(&path, &sel.sel.name, sel.sel.span);
                        self.info.uses.insert(sel.sel.id, obj);
                        self.obj(obj).ty
                    };
                    self.record(sel.id, Mode::TypeExpr, ty, None);
                    return ty;
                }
            }
        }
        let operand = self.expr(expr, None);
        if operand.mode == Mode::TypeExpr {
            operand.ty
        } else {
            TypeArena::invalid()
        }
    }

    /// Import path if `ident` names an imported package.
    pub(crate) fn package_path_of(&mut self, ident: &Ident) -> Option<String> {
        let id = self.lookup(&ident.name)?;
        let ObjectKind::PkgName { path } = &self.obj(id).kind else {
            return None;
        };
        let path = path.clone();
        self.info.uses.insert(ident.id, id);
        Some(path)
    }

    /// Type an untyped value takes when nothing else decides.
    pub(crate) fn default_type(&self, ty: TypeId) -> TypeId {
        match self.info.types.basic_kind(ty) {
            Some(BasicKind::UntypedNil) => TypeArena::invalid(),
            Some(kind) if kind.is_untyped() => TypeArena::basic(kind.default_kind()),
            _ => ty,
        }
    }

    /// Convert a constant to the representation of `target`.
    pub(crate) fn convert_const(&self, value: &ConstValue, target: TypeId) -> Option<ConstValue> {
        let Some(kind) = self.info.types.underlying_basic(target) else {
            return None;
        };
        if kind.is_integer() {
            value.as_int().map(ConstValue::Int)
        } else if kind.is_float() {
            value.as_float().map(ConstValue::Float)
        } else if kind.is_string() {
            match value {
                ConstValue::String(_) => Some(value.clone()),
                ConstValue::Int(code) => u32::try_from(*code)
                    .ok()
                    .and_then(char::from_u32)
                    .map(|c| ConstValue::String(c.to_string())),
                _ => None,
            }
        } else if kind.is_boolean() {
            value.as_bool().map(ConstValue::Bool)
        } else {
            None
        }
    }
}

fn gen_decls(file: &File, kind: DeclKind) -> impl Iterator<Item = &GenDecl> {
    file.decls.iter().filter_map(move |decl| match decl {
        Decl::Gen(gen) if gen.kind == kind => Some(gen),
        _ => None,
    })
}

/// Field name of an embedded field: the unqualified type name.
fn embedded_name(ty: &TypeExpr) -> Option<String> {
    match &ty.kind {
        TypeExprKind::Name(ident) => Some(ident.name.clone()),
        TypeExprKind::Qualified { name, .. } => Some(name.name.clone()),
        TypeExprKind::Pointer(inner) | TypeExprKind::Paren(inner) => embedded_name(inner),
        _ => None,
    }
}
