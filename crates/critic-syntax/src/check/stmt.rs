//! Statement checking and local scopes

use super::object::{Object, ObjectKind};
use super::{Checker, Mode};
use crate::ast::*;
use crate::types::{BasicKind, Type, TypeArena, TypeId};

impl Checker {
    pub(crate) fn stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn block(&mut self, block: &Block) {
        self.open_scope();
        self.stmts(&block.stmts);
        self.close_scope();
    }

    fn opt_stmt(&mut self, stmt: &Option<Box<Stmt>>) {
        if let Some(stmt) = stmt {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Decl(gen) => self.gen_decl(gen),
            Stmt::Empty(_) | Stmt::Branch(_) => {}
            Stmt::Labeled(labeled) => self.stmt(&labeled.stmt),
            Stmt::Expr(expr) => {
                self.expr(&expr.x, None);
            }
            Stmt::Send(send) => {
                let chan = self.expr(&send.chan, None);
                let elem = match self.info.types.get(self.info.types.underlying(chan.ty)) {
                    Type::Chan { elem, .. } => Some(*elem),
                    _ => None,
                };
                self.expr(&send.value, elem);
                if let Some(elem) = elem {
                    self.update_untyped(&send.value, elem);
                }
            }
            Stmt::IncDec(inc) => {
                self.expr(&inc.x, None);
            }
            Stmt::Assign(assign) => self.assign(assign),
            Stmt::Go(go) => {
                self.expr(&go.call, None);
            }
            Stmt::Defer(defer) => {
                self.expr(&defer.call, None);
            }
            Stmt::Return(ret) => {
                let results = self.results.last().cloned().unwrap_or_default();
                let hints: Vec<Option<TypeId>> = results.iter().copied().map(Some).collect();
                self.rhs_types(&ret.results, results.len().max(ret.results.len()), &hints);
            }
            Stmt::Block(block) => self.block(block),
            Stmt::If(stmt) => {
                self.open_scope();
                self.opt_stmt(&stmt.init);
                self.expr(&stmt.cond, None);
                self.block(&stmt.body);
                self.opt_stmt(&stmt.else_branch);
                self.close_scope();
            }
            Stmt::Switch(switch) => {
                self.open_scope();
                self.opt_stmt(&switch.init);
                let tag = switch.tag.as_ref().map(|tag| self.expr(tag, None).ty);
                for clause in &switch.clauses {
                    for expr in &clause.list {
                        self.expr(expr, tag);
                        if let Some(tag) = tag {
                            self.update_untyped(expr, tag);
                        }
                    }
                    self.open_scope();
                    self.stmts(&clause.body);
                    self.close_scope();
                }
                self.close_scope();
            }
            Stmt::TypeSwitch(switch) => self.type_switch(switch),
            Stmt::For(stmt) => {
                self.open_scope();
                self.opt_stmt(&stmt.init);
                if let Some(cond) = &stmt.cond {
                    self.expr(cond, None);
                }
                self.opt_stmt(&stmt.post);
                self.block(&stmt.body);
                self.close_scope();
            }
            Stmt::Range(range) => self.range(range),
        }
    }

    fn type_switch(&mut self, switch: &TypeSwitchStmt) {
        self.open_scope();
        self.opt_stmt(&switch.init);
        let x = match &switch.guard {
            Expr::TypeAssert(assert) => self.expr(&assert.x, None).ty,
            other => self.expr(other, None).ty,
        };
        for clause in &switch.clauses {
            let types: Vec<TypeId> = clause
                .types
                .iter()
                .map(|ty| self.resolve_type(ty))
                .collect();
            self.open_scope();
            if let Some(binding) = &switch.binding {
                let ty = match types.as_slice() {
                    [single] if !self.info.types.is_invalid(*single) => *single,
                    _ => x,
                };
                let obj = self.new_object(Object {
                    name: binding.name.clone(),
                    kind: ObjectKind::Var,
                    ty,
                    pkg: Some(self.package_path()),
                    span: binding.span,
                    recv: None,
                });
                self.info.implicits.insert(clause.id, obj);
                if !binding.is_blank() {
                    if let Some(scope) = self.scopes.last_mut() {
                        scope.insert(binding.name.clone(), obj);
                    }
                }
            }
            self.stmts(&clause.body);
            self.close_scope();
        }
        self.close_scope();
    }

    fn range(&mut self, range: &RangeStmt) {
        self.open_scope();
        let x = self.expr(&range.x, None);
        let int = TypeArena::basic(BasicKind::Int);
        let under = self.info.types.underlying(x.ty);
        let under = self.info.types.pointer_elem(under).unwrap_or(under);
        let (key, value) = match self.info.types.get(self.info.types.underlying(under)) {
            Type::Basic(kind) if kind.is_string() => (int, TypeArena::basic(BasicKind::Int32)),
            Type::Basic(kind) if kind.is_integer() => (self.default_type(x.ty), TypeArena::invalid()),
            Type::Array { elem, .. } | Type::Slice(elem) => (int, *elem),
            Type::Map { key, value } => (*key, *value),
            Type::Chan { elem, .. } => (*elem, TypeArena::invalid()),
            _ => (TypeArena::invalid(), TypeArena::invalid()),
        };
        for (expr, ty) in [(&range.key, key), (&range.value, value)] {
            let Some(expr) = expr else { continue };
            match expr {
                Expr::Ident(ident) if range.define => {
                    self.declare(ident, ObjectKind::Var, ty);
                    self.record(ident.id, Mode::Variable, ty, None);
                }
                _ => {
                    self.expr(expr, None);
                }
            }
        }
        self.block(&range.body);
        self.close_scope();
    }

    fn assign(&mut self, assign: &AssignStmt) {
        match assign.tok {
            AssignOp::Define => {
                let hints = vec![None; assign.lhs.len()];
                let types = self.rhs_types(&assign.rhs, assign.lhs.len(), &hints);
                for (i, lhs) in assign.lhs.iter().enumerate() {
                    let Expr::Ident(ident) = lhs else {
                        self.expr(lhs, None);
                        continue;
                    };
                    if ident.is_blank() {
                        continue;
                    }
                    // Redeclared names in a `:=` are plain assignments.
                    if let Some(existing) = self.lookup_local(&ident.name) {
                        self.info.uses.insert(ident.id, existing);
                        let ty = self.obj(existing).ty;
                        self.record(ident.id, Mode::Variable, ty, None);
                        continue;
                    }
                    let ty = types.get(i).copied().unwrap_or_else(TypeArena::invalid);
                    let ty = self.default_type(ty);
                    self.declare(ident, ObjectKind::Var, ty);
                    self.record(ident.id, Mode::Variable, ty, None);
                }
            }
            AssignOp::Assign => {
                let hints: Vec<Option<TypeId>> = assign
                    .lhs
                    .iter()
                    .map(|lhs| {
                        let operand = self.expr(lhs, None);
                        Some(operand.ty).filter(|ty| !self.info.types.is_invalid(*ty))
                    })
                    .collect();
                self.rhs_types(&assign.rhs, assign.lhs.len(), &hints);
            }
            _ => {
                let lhs = assign.lhs.first().map(|lhs| self.expr(lhs, None).ty);
                for rhs in &assign.rhs {
                    self.expr(rhs, lhs);
                    if let Some(lhs) = lhs {
                        self.update_untyped(rhs, lhs);
                    }
                }
            }
        }
    }

    /// Types of the right-hand side of an `n`-value assignment, unpacking
    /// multi-value calls and comma-ok forms. Untyped values take the hinted
    /// type.
    pub(crate) fn rhs_types(
        &mut self,
        rhs: &[Expr],
        n: usize,
        hints: &[Option<TypeId>],
    ) -> Vec<TypeId> {
        if let [single] = rhs {
            if n > 1 {
                let operand = self.expr(single, None);
                if let Type::Tuple(elems) = self.info.types.get(operand.ty) {
                    return elems.clone();
                }
                if matches!(operand.mode, Mode::MapIndex | Mode::CommaOk) {
                    return vec![operand.ty, TypeArena::basic(BasicKind::UntypedBool)];
                }
                return vec![TypeArena::invalid(); n];
            }
        }
        rhs.iter()
            .enumerate()
            .map(|(i, expr)| {
                let hint = hints.get(i).copied().flatten();
                let operand = self.expr(expr, hint);
                match hint {
                    Some(hint) => {
                        self.update_untyped(expr, hint);
                        if self.is_untyped(operand.ty) {
                            hint
                        } else {
                            operand.ty
                        }
                    }
                    None => operand.ty,
                }
            })
            .collect()
    }
}
