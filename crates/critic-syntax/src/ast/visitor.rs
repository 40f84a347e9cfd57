//! AST visitor for traversing the syntax tree
//!
//! Each `visit_*` method defaults to the matching `walk_*` function, which
//! visits the children in source order. Override a method and call the walk
//! function to keep descending.

use super::*;

pub trait Visitor: Sized {
    fn visit_file(&mut self, file: &File) {
        walk_file(self, file);
    }

    fn visit_decl(&mut self, decl: &Decl) {
        walk_decl(self, decl);
    }

    fn visit_func_decl(&mut self, decl: &FuncDecl) {
        walk_func_decl(self, decl);
    }

    fn visit_gen_decl(&mut self, decl: &GenDecl) {
        walk_gen_decl(self, decl);
    }

    fn visit_spec(&mut self, spec: &Spec) {
        walk_spec(self, spec);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_type_expr(&mut self, ty: &TypeExpr) {
        walk_type_expr(self, ty);
    }

    fn visit_func_type(&mut self, ty: &FuncType) {
        walk_func_type(self, ty);
    }

    fn visit_field_list(&mut self, list: &FieldList) {
        walk_field_list(self, list);
    }

    fn visit_ident(&mut self, _ident: &Ident) {}
}

pub fn walk_file<V: Visitor>(visitor: &mut V, file: &File) {
    visitor.visit_ident(&file.package);
    for decl in &file.decls {
        visitor.visit_decl(decl);
    }
}

pub fn walk_decl<V: Visitor>(visitor: &mut V, decl: &Decl) {
    match decl {
        Decl::Func(func) => visitor.visit_func_decl(func),
        Decl::Gen(gen) => visitor.visit_gen_decl(gen),
    }
}

pub fn walk_func_decl<V: Visitor>(visitor: &mut V, decl: &FuncDecl) {
    if let Some(recv) = &decl.recv {
        visitor.visit_field_list(recv);
    }
    visitor.visit_ident(&decl.name);
    visitor.visit_func_type(&decl.ty);
    if let Some(body) = &decl.body {
        visitor.visit_block(body);
    }
}

pub fn walk_gen_decl<V: Visitor>(visitor: &mut V, decl: &GenDecl) {
    for spec in &decl.specs {
        visitor.visit_spec(spec);
    }
}

pub fn walk_spec<V: Visitor>(visitor: &mut V, spec: &Spec) {
    match spec {
        Spec::Import(import) => {
            if let Some(name) = &import.name {
                visitor.visit_ident(name);
            }
        }
        Spec::Value(value) => {
            for name in &value.names {
                visitor.visit_ident(name);
            }
            if let Some(ty) = &value.ty {
                visitor.visit_type_expr(ty);
            }
            for expr in &value.values {
                visitor.visit_expr(expr);
            }
        }
        Spec::Type(ty) => {
            visitor.visit_ident(&ty.name);
            visitor.visit_type_expr(&ty.ty);
        }
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &Block) {
    for stmt in &block.stmts {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: Visitor>(visitor: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::Decl(decl) => visitor.visit_gen_decl(decl),
        Stmt::Empty(_) => {}
        Stmt::Labeled(s) => {
            visitor.visit_ident(&s.label);
            visitor.visit_stmt(&s.stmt);
        }
        Stmt::Expr(s) => visitor.visit_expr(&s.x),
        Stmt::Send(s) => {
            visitor.visit_expr(&s.chan);
            visitor.visit_expr(&s.value);
        }
        Stmt::IncDec(s) => visitor.visit_expr(&s.x),
        Stmt::Assign(s) => {
            for expr in &s.lhs {
                visitor.visit_expr(expr);
            }
            for expr in &s.rhs {
                visitor.visit_expr(expr);
            }
        }
        Stmt::Go(s) => visitor.visit_expr(&s.call),
        Stmt::Defer(s) => visitor.visit_expr(&s.call),
        Stmt::Return(s) => {
            for expr in &s.results {
                visitor.visit_expr(expr);
            }
        }
        Stmt::Branch(s) => {
            if let Some(label) = &s.label {
                visitor.visit_ident(label);
            }
        }
        Stmt::Block(block) => visitor.visit_block(block),
        Stmt::If(s) => {
            if let Some(init) = &s.init {
                visitor.visit_stmt(init);
            }
            visitor.visit_expr(&s.cond);
            visitor.visit_block(&s.body);
            if let Some(else_branch) = &s.else_branch {
                visitor.visit_stmt(else_branch);
            }
        }
        Stmt::Switch(s) => {
            if let Some(init) = &s.init {
                visitor.visit_stmt(init);
            }
            if let Some(tag) = &s.tag {
                visitor.visit_expr(tag);
            }
            for clause in &s.clauses {
                for expr in &clause.list {
                    visitor.visit_expr(expr);
                }
                for stmt in &clause.body {
                    visitor.visit_stmt(stmt);
                }
            }
        }
        Stmt::TypeSwitch(s) => {
            if let Some(init) = &s.init {
                visitor.visit_stmt(init);
            }
            if let Some(binding) = &s.binding {
                visitor.visit_ident(binding);
            }
            visitor.visit_expr(&s.guard);
            for clause in &s.clauses {
                for ty in &clause.types {
                    visitor.visit_type_expr(ty);
                }
                for stmt in &clause.body {
                    visitor.visit_stmt(stmt);
                }
            }
        }
        Stmt::For(s) => {
            if let Some(init) = &s.init {
                visitor.visit_stmt(init);
            }
            if let Some(cond) = &s.cond {
                visitor.visit_expr(cond);
            }
            if let Some(post) = &s.post {
                visitor.visit_stmt(post);
            }
            visitor.visit_block(&s.body);
        }
        Stmt::Range(s) => {
            if let Some(key) = &s.key {
                visitor.visit_expr(key);
            }
            if let Some(value) = &s.value {
                visitor.visit_expr(value);
            }
            visitor.visit_expr(&s.x);
            visitor.visit_block(&s.body);
        }
    }
}

pub fn walk_expr<V: Visitor>(visitor: &mut V, expr: &Expr) {
    match expr {
        Expr::Ident(ident) => visitor.visit_ident(ident),
        Expr::BasicLit(_) => {}
        Expr::CompositeLit(lit) => {
            if let Some(ty) = &lit.ty {
                visitor.visit_expr(ty);
            }
            for elt in &lit.elts {
                visitor.visit_expr(elt);
            }
        }
        Expr::FuncLit(lit) => {
            visitor.visit_func_type(&lit.ty);
            visitor.visit_block(&lit.body);
        }
        Expr::Paren(e) => visitor.visit_expr(&e.x),
        Expr::Selector(e) => {
            visitor.visit_expr(&e.x);
            visitor.visit_ident(&e.sel);
        }
        Expr::Index(e) => {
            visitor.visit_expr(&e.x);
            visitor.visit_expr(&e.index);
        }
        Expr::Slice(e) => {
            visitor.visit_expr(&e.x);
            for part in [&e.low, &e.high, &e.max].into_iter().flatten() {
                visitor.visit_expr(part);
            }
        }
        Expr::TypeAssert(e) => {
            visitor.visit_expr(&e.x);
            if let Some(ty) = &e.ty {
                visitor.visit_type_expr(ty);
            }
        }
        Expr::Call(e) => {
            visitor.visit_expr(&e.fun);
            for arg in &e.args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Star(e) => visitor.visit_expr(&e.x),
        Expr::Unary(e) => visitor.visit_expr(&e.x),
        Expr::Binary(e) => {
            visitor.visit_expr(&e.x);
            visitor.visit_expr(&e.y);
        }
        Expr::KeyValue(e) => {
            visitor.visit_expr(&e.key);
            visitor.visit_expr(&e.value);
        }
        Expr::Type(operand) => visitor.visit_type_expr(&operand.ty),
    }
}

pub fn walk_type_expr<V: Visitor>(visitor: &mut V, ty: &TypeExpr) {
    match &ty.kind {
        TypeExprKind::Name(ident) => visitor.visit_ident(ident),
        TypeExprKind::Qualified { pkg, name } => {
            visitor.visit_ident(pkg);
            visitor.visit_ident(name);
        }
        TypeExprKind::Pointer(elem)
        | TypeExprKind::Slice(elem)
        | TypeExprKind::Ellipsis(elem)
        | TypeExprKind::Paren(elem) => visitor.visit_type_expr(elem),
        TypeExprKind::Array { len, elem } => {
            if let Some(len) = len {
                visitor.visit_expr(len);
            }
            visitor.visit_type_expr(elem);
        }
        TypeExprKind::Map { key, value } => {
            visitor.visit_type_expr(key);
            visitor.visit_type_expr(value);
        }
        TypeExprKind::Chan { elem, .. } => visitor.visit_type_expr(elem),
        TypeExprKind::Func(func) => visitor.visit_func_type(func),
        TypeExprKind::Interface(iface) => {
            for elem in &iface.elems {
                match elem {
                    InterfaceElem::Method { name, ty } => {
                        visitor.visit_ident(name);
                        visitor.visit_func_type(ty);
                    }
                    InterfaceElem::Embedded(ty) => visitor.visit_type_expr(ty),
                }
            }
        }
        TypeExprKind::Struct(st) => {
            for field in &st.fields {
                for name in &field.names {
                    visitor.visit_ident(name);
                }
                visitor.visit_type_expr(&field.ty);
            }
        }
    }
}

pub fn walk_func_type<V: Visitor>(visitor: &mut V, ty: &FuncType) {
    visitor.visit_field_list(&ty.params);
    visitor.visit_field_list(&ty.results);
}

pub fn walk_field_list<V: Visitor>(visitor: &mut V, list: &FieldList) {
    for field in &list.fields {
        for name in &field.names {
            visitor.visit_ident(name);
        }
        visitor.visit_type_expr(&field.ty);
    }
}
