//! AST to flow form lowering

use super::{BasicBlock, CallInstr, Callee, FlowFunction, FlowProgram, Instruction};
use crate::ast::*;
use crate::check::{ObjectKind, SelectionKind, TypeInfo};
use crate::token::Span;

/// Lower every function body of `file`.
pub fn build(file: &File, info: &TypeInfo) -> FlowProgram {
    let mut functions = Vec::new();
    for func in file.funcs() {
        let Some(body) = &func.body else { continue };
        let object = info.object_of(&func.name);
        let name = object
            .and_then(|obj| info.full_name(obj))
            .unwrap_or_else(|| func.name.name.clone());
        let mut lowerer = Lowerer::new(info, name);
        lowerer.stmts(&body.stmts);
        functions.extend(lowerer.finish(object, func.id, func.span, body.span));
    }
    tracing::debug!(functions = functions.len(), "built flow form");
    FlowProgram { functions }
}

/// Destination of `break`/`continue` for an enclosing loop or switch.
struct Target {
    label: Option<String>,
    break_to: usize,
    /// None for switches
    continue_to: Option<usize>,
}

struct Lowerer<'a> {
    info: &'a TypeInfo,
    name: String,
    blocks: Vec<BasicBlock>,
    current: usize,
    targets: Vec<Target>,
    /// Label of the statement being lowered, consumed by loops and switches
    pending_label: Option<String>,
    /// Body of the next switch clause, for `fallthrough`
    fallthrough: Option<usize>,
    literals: Vec<FlowFunction>,
    literal_count: usize,
}

impl<'a> Lowerer<'a> {
    fn new(info: &'a TypeInfo, name: String) -> Self {
        let mut lowerer = Self {
            info,
            name,
            blocks: Vec::new(),
            current: 0,
            targets: Vec::new(),
            pending_label: None,
            fallthrough: None,
            literals: Vec::new(),
            literal_count: 0,
        };
        lowerer.current = lowerer.new_block();
        lowerer
    }

    fn new_block(&mut self) -> usize {
        let index = self.blocks.len();
        self.blocks.push(BasicBlock {
            index,
            instrs: Vec::new(),
            succs: Vec::new(),
            preds: Vec::new(),
        });
        index
    }

    fn emit(&mut self, instr: Instruction) {
        self.blocks[self.current].instrs.push(instr);
    }

    fn edge(&mut self, from: usize, to: usize) {
        self.blocks[from].succs.push(to);
        self.blocks[to].preds.push(from);
    }

    fn terminated(&self) -> bool {
        self.blocks[self.current].control().is_some()
    }

    /// Jump to `to` unless the current block already ended.
    fn jump_to(&mut self, to: usize, span: Span) {
        if self.terminated() {
            return;
        }
        self.emit(Instruction::Jump { span });
        let from = self.current;
        self.edge(from, to);
    }

    fn branch(&mut self, cond: NodeId, span: Span, then: usize, otherwise: usize) {
        self.emit(Instruction::If { cond, span });
        let from = self.current;
        self.edge(from, then);
        self.edge(from, otherwise);
    }

    /// Code after an unconditional transfer goes to a fresh block with no
    /// predecessors.
    fn unreachable(&mut self) {
        self.current = self.new_block();
    }

    /// Close the function with an implicit return and drop unreachable
    /// blocks. Returns the function followed by its nested literals.
    fn finish(
        mut self,
        object: Option<crate::check::ObjectId>,
        decl: NodeId,
        span: Span,
        body: Span,
    ) -> Vec<FlowFunction> {
        if !self.terminated() {
            let end = Span::new(body.end.saturating_sub(1), body.end, body.line, body.column);
            self.emit(Instruction::Return { span: end });
        }
        let blocks = prune(std::mem::take(&mut self.blocks));
        let mut functions = vec![FlowFunction {
            name: self.name,
            object,
            decl,
            span,
            blocks,
        }];
        functions.append(&mut self.literals);
        functions
    }

    fn stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Decl(gen) => {
                for spec in &gen.specs {
                    if let Spec::Value(spec) = spec {
                        if gen.kind == DeclKind::Var && !spec.values.is_empty() {
                            self.exprs(&spec.values);
                            self.emit(Instruction::Assign { span: spec.span });
                        }
                    }
                }
            }
            Stmt::Empty(_) => {}
            Stmt::Labeled(labeled) => {
                self.pending_label = Some(labeled.label.name.clone());
                self.stmt(&labeled.stmt);
                self.pending_label = None;
            }
            Stmt::Expr(stmt) => self.expr(&stmt.x),
            Stmt::Send(send) => {
                self.expr(&send.chan);
                self.expr(&send.value);
                self.emit(Instruction::Send { span: send.span });
            }
            Stmt::IncDec(stmt) => {
                self.expr(&stmt.x);
                self.emit(Instruction::Assign { span: stmt.span });
            }
            Stmt::Assign(assign) => {
                self.exprs(&assign.rhs);
                for lhs in &assign.lhs {
                    if !matches!(lhs, Expr::Ident(_)) {
                        self.expr(lhs);
                    }
                }
                self.emit(Instruction::Assign { span: assign.span });
            }
            Stmt::Go(stmt) => self.deferred(&stmt.call, true),
            Stmt::Defer(stmt) => self.deferred(&stmt.call, false),
            Stmt::Return(ret) => {
                self.exprs(&ret.results);
                self.emit(Instruction::Return { span: ret.span });
                self.unreachable();
            }
            Stmt::Branch(branch) => self.branch_stmt(branch),
            Stmt::Block(block) => self.stmts(&block.stmts),
            Stmt::If(stmt) => self.if_stmt(stmt),
            Stmt::Switch(switch) => {
                let label = self.pending_label.take();
                if let Some(init) = &switch.init {
                    self.stmt(init);
                }
                if let Some(tag) = &switch.tag {
                    self.expr(tag);
                }
                let tests: Vec<(Option<NodeId>, bool, &[Stmt], Span)> = switch
                    .clauses
                    .iter()
                    .map(|clause| {
                        (
                            clause.list.first().map(Expr::id),
                            clause.is_default,
                            clause.body.as_slice(),
                            clause.span,
                        )
                    })
                    .collect();
                let lists: Vec<&[Expr]> = switch.clauses.iter().map(|c| c.list.as_slice()).collect();
                self.clauses(label, &tests, &lists, switch.span);
            }
            Stmt::TypeSwitch(switch) => {
                let label = self.pending_label.take();
                if let Some(init) = &switch.init {
                    self.stmt(init);
                }
                match &switch.guard {
                    Expr::TypeAssert(assert) => self.expr(&assert.x),
                    other => self.expr(other),
                }
                let tests: Vec<(Option<NodeId>, bool, &[Stmt], Span)> = switch
                    .clauses
                    .iter()
                    .map(|clause| {
                        (
                            Some(clause.id),
                            clause.is_default,
                            clause.body.as_slice(),
                            clause.span,
                        )
                    })
                    .collect();
                let lists = vec![&[][..]; switch.clauses.len()];
                self.clauses(label, &tests, &lists, switch.span);
            }
            Stmt::For(stmt) => self.for_stmt(stmt),
            Stmt::Range(stmt) => self.range(stmt),
        }
    }

    fn if_stmt(&mut self, stmt: &IfStmt) {
        if let Some(init) = &stmt.init {
            self.stmt(init);
        }
        self.expr(&stmt.cond);
        let then = self.new_block();
        let done = self.new_block();
        let otherwise = match stmt.else_branch {
            Some(_) => self.new_block(),
            None => done,
        };
        self.branch(stmt.cond.id(), stmt.cond.span(), then, otherwise);

        self.current = then;
        self.stmts(&stmt.body.stmts);
        self.jump_to(done, stmt.body.span);

        if let Some(else_branch) = &stmt.else_branch {
            self.current = otherwise;
            self.stmt(else_branch);
            self.jump_to(done, else_branch.span());
        }
        self.current = done;
    }

    /// Switch clauses: a chain of tests followed by the clause bodies.
    fn clauses(
        &mut self,
        label: Option<String>,
        tests: &[(Option<NodeId>, bool, &[Stmt], Span)],
        lists: &[&[Expr]],
        span: Span,
    ) {
        let done = self.new_block();
        let bodies: Vec<usize> = tests.iter().map(|_| self.new_block()).collect();
        let mut default = None;
        for (i, (cond, is_default, _, clause_span)) in tests.iter().enumerate() {
            if *is_default {
                default = Some(bodies[i]);
                continue;
            }
            let Some(cond) = cond else { continue };
            if let Some(list) = lists.get(i) {
                self.exprs(list);
            }
            let next = self.new_block();
            self.branch(*cond, *clause_span, bodies[i], next);
            self.current = next;
        }
        self.jump_to(default.unwrap_or(done), span);

        self.targets.push(Target {
            label,
            break_to: done,
            continue_to: None,
        });
        for (i, (_, _, body, clause_span)) in tests.iter().enumerate() {
            self.current = bodies[i];
            self.fallthrough = bodies.get(i + 1).copied();
            self.stmts(body);
            self.jump_to(done, *clause_span);
        }
        self.fallthrough = None;
        self.targets.pop();
        self.current = done;
    }

    fn for_stmt(&mut self, stmt: &ForStmt) {
        let label = self.pending_label.take();
        if let Some(init) = &stmt.init {
            self.stmt(init);
        }
        let header = self.new_block();
        let body = self.new_block();
        let done = self.new_block();
        let post = match stmt.post {
            Some(_) => self.new_block(),
            None => header,
        };
        self.jump_to(header, stmt.span);

        self.current = header;
        match &stmt.cond {
            Some(cond) => {
                self.expr(cond);
                self.branch(cond.id(), cond.span(), body, done);
            }
            None => self.jump_to(body, stmt.span),
        }

        self.targets.push(Target {
            label,
            break_to: done,
            continue_to: Some(post),
        });
        self.current = body;
        self.stmts(&stmt.body.stmts);
        self.jump_to(post, stmt.body.span);
        self.targets.pop();

        if let Some(post_stmt) = &stmt.post {
            self.current = post;
            self.stmt(post_stmt);
            self.jump_to(header, post_stmt.span());
        }
        self.current = done;
    }

    fn range(&mut self, stmt: &RangeStmt) {
        let label = self.pending_label.take();
        self.expr(&stmt.x);
        let header = self.new_block();
        let body = self.new_block();
        let done = self.new_block();
        self.jump_to(header, stmt.span);

        self.current = header;
        self.branch(stmt.x.id(), stmt.x.span(), body, done);

        self.targets.push(Target {
            label,
            break_to: done,
            continue_to: Some(header),
        });
        self.current = body;
        if stmt.key.is_some() {
            self.emit(Instruction::Assign { span: stmt.span });
        }
        self.stmts(&stmt.body.stmts);
        self.jump_to(header, stmt.body.span);
        self.targets.pop();
        self.current = done;
    }

    fn branch_stmt(&mut self, branch: &BranchStmt) {
        let label = branch.label.as_ref().map(|l| l.name.as_str());
        let matches = |target: &&Target| label.is_none() || target.label.as_deref() == label;
        let to = match branch.kind {
            BranchKind::Break => self.targets.iter().rev().find(matches).map(|t| t.break_to),
            BranchKind::Continue => self
                .targets
                .iter()
                .rev()
                .filter(|t| t.continue_to.is_some())
                .find(matches)
                .and_then(|t| t.continue_to),
            BranchKind::Fallthrough => self.fallthrough,
            // Jump targets of goto are not modelled.
            BranchKind::Goto => None,
        };
        self.emit(Instruction::Jump { span: branch.span });
        if let Some(to) = to {
            let from = self.current;
            self.edge(from, to);
        }
        self.unreachable();
    }

    fn deferred(&mut self, call: &Expr, go: bool) {
        let Expr::Call(call) = call.unparen() else {
            self.expr(call);
            return;
        };
        self.expr(&call.fun);
        self.exprs(&call.args);
        let instr = CallInstr {
            callee: self.callee(&call.fun),
            call: call.id,
            span: call.span,
        };
        self.emit(if go {
            Instruction::Go(instr)
        } else {
            Instruction::Defer(instr)
        });
    }

    fn exprs(&mut self, exprs: &[Expr]) {
        for expr in exprs {
            self.expr(expr);
        }
    }

    /// Lower the evaluation of `expr`, operands first.
    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => {
                let Some(&object) = self.info.uses.get(&ident.id) else {
                    return;
                };
                let is_var = self
                    .info
                    .object(object)
                    .is_some_and(|obj| obj.kind == ObjectKind::Var);
                if is_var {
                    self.emit(Instruction::DebugRef {
                        expr: ident.id,
                        object,
                        span: ident.span,
                    });
                }
            }
            Expr::BasicLit(_) | Expr::Type(_) => {}
            Expr::CompositeLit(lit) => self.exprs(&lit.elts),
            Expr::FuncLit(lit) => self.func_lit(lit),
            Expr::Paren(paren) => self.expr(&paren.x),
            Expr::Selector(sel) => self.expr(&sel.x),
            Expr::Index(index) => {
                self.expr(&index.x);
                self.expr(&index.index);
            }
            Expr::Slice(slice) => {
                self.expr(&slice.x);
                for bound in [&slice.low, &slice.high, &slice.max].into_iter().flatten() {
                    self.expr(bound);
                }
            }
            Expr::TypeAssert(assert) => self.expr(&assert.x),
            Expr::Call(call) => self.call(call),
            Expr::Star(star) => self.expr(&star.x),
            Expr::Unary(unary) => self.expr(&unary.x),
            Expr::Binary(binary) if matches!(binary.op, BinaryOp::LAnd | BinaryOp::LOr) => {
                // The right operand is only evaluated on one branch.
                self.expr(&binary.x);
                let rhs = self.new_block();
                let done = self.new_block();
                if binary.op == BinaryOp::LAnd {
                    self.branch(binary.x.id(), binary.x.span(), rhs, done);
                } else {
                    self.branch(binary.x.id(), binary.x.span(), done, rhs);
                }
                self.current = rhs;
                self.expr(&binary.y);
                self.jump_to(done, binary.y.span());
                self.current = done;
            }
            Expr::Binary(binary) => {
                self.expr(&binary.x);
                self.expr(&binary.y);
            }
            Expr::KeyValue(kv) => {
                self.expr(&kv.key);
                self.expr(&kv.value);
            }
        }
    }

    fn call(&mut self, call: &CallExpr) {
        let is_conversion = self
            .info
            .type_and_value(call.fun.id())
            .is_some_and(|tv| tv.is_type());
        if is_conversion {
            self.exprs(&call.args);
            return;
        }
        self.expr(&call.fun);
        self.exprs(&call.args);
        let callee = self.callee(&call.fun);
        if matches!(&callee, Callee::Builtin(name) if name == "panic") {
            self.emit(Instruction::Panic { span: call.span });
            self.unreachable();
            return;
        }
        self.emit(Instruction::Call(CallInstr {
            callee,
            call: call.id,
            span: call.span,
        }));
    }

    fn callee(&self, fun: &Expr) -> Callee {
        let info = self.info;
        match fun.unparen() {
            Expr::Ident(ident) => {
                let Some(&id) = info.uses.get(&ident.id) else {
                    return Callee::Value;
                };
                match info.object(id).map(|obj| &obj.kind) {
                    Some(ObjectKind::Func | ObjectKind::External) => Callee::Function(id),
                    Some(ObjectKind::Builtin) => Callee::Builtin(ident.name.clone()),
                    _ => Callee::Value,
                }
            }
            Expr::Selector(sel) => match info.selection(sel.id) {
                Some(selection) => match selection.kind {
                    SelectionKind::MethodVal if info.types.is_interface(selection.recv) => {
                        Callee::Invoke {
                            method: selection.name.clone(),
                        }
                    }
                    SelectionKind::MethodVal | SelectionKind::MethodExpr => {
                        selection.obj.map_or(Callee::Value, Callee::Function)
                    }
                    SelectionKind::FieldVal => Callee::Value,
                },
                None => match info.uses.get(&sel.sel.id) {
                    Some(&id) => Callee::Function(id),
                    None => Callee::Value,
                },
            },
            _ => Callee::Value,
        }
    }

    fn func_lit(&mut self, lit: &FuncLit) {
        self.literal_count += 1;
        let name = format!("{}${}", self.name, self.literal_count);
        let mut inner = Lowerer::new(self.info, name);
        inner.stmts(&lit.body.stmts);
        let functions = inner.finish(None, lit.id, lit.span, lit.body.span);
        self.literals.extend(functions);
    }
}

/// Drop blocks unreachable from the entry and renumber the rest.
fn prune(blocks: Vec<BasicBlock>) -> Vec<BasicBlock> {
    let mut reachable = vec![false; blocks.len()];
    let mut stack = vec![0];
    while let Some(index) = stack.pop() {
        if index >= blocks.len() || reachable[index] {
            continue;
        }
        reachable[index] = true;
        stack.extend(blocks[index].succs.iter().copied());
    }

    let mut remap = vec![None; blocks.len()];
    let mut next = 0;
    for (index, live) in reachable.iter().enumerate() {
        if *live {
            remap[index] = Some(next);
            next += 1;
        }
    }

    blocks
        .into_iter()
        .filter(|block| reachable[block.index])
        .map(|mut block| {
            block.index = remap[block.index].unwrap_or_default();
            block.succs = block.succs.iter().filter_map(|s| remap[*s]).collect();
            block.preds = block.preds.iter().filter_map(|p| remap[*p]).collect();
            block
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{check_file, CheckConfig};
    use crate::source::SourceFile;

    fn lower(src: &str) -> FlowProgram {
        let file = SourceFile::parse("test.go", src).unwrap();
        let info = check_file(&file.file, &CheckConfig::default());
        build(&file.file, &info)
    }

    fn calls(block: &BasicBlock) -> Vec<&CallInstr> {
        block.instrs.iter().filter_map(Instruction::call).collect()
    }

    #[test]
    fn test_straight_line_function() {
        let flow = lower("package p\nfunc g() {}\nfunc f() {\n\tg()\n\tg()\n}\n");
        let f = &flow.functions[1];
        assert_eq!(f.name, "p.f");
        assert_eq!(f.blocks.len(), 1);
        assert_eq!(calls(&f.blocks[0]).len(), 2);
        assert!(matches!(
            f.blocks[0].control(),
            Some(Instruction::Return { .. })
        ));
    }

    #[test]
    fn test_if_creates_diamond() {
        let flow = lower("package p\nfunc f(b bool) int {\n\tif b {\n\t\treturn 1\n\t}\n\treturn 2\n}\n");
        let f = &flow.functions[0];
        assert!(matches!(f.blocks[0].control(), Some(Instruction::If { .. })));
        assert_eq!(f.blocks[0].succs.len(), 2);
        assert_eq!(f.blocks.len(), 3);
    }

    #[test]
    fn test_self_call_in_entry_block() {
        let flow = lower("package p\nfunc f(n int) int {\n\treturn f(n - 1)\n}\n");
        let f = &flow.functions[0];
        let entry = calls(&f.blocks[0]);
        assert_eq!(entry.len(), 1);
        assert_eq!(entry[0].callee, Callee::Function(f.object.unwrap()));
    }

    #[test]
    fn test_short_circuit_moves_call_out_of_entry() {
        let flow = lower("package p\nfunc f(n int) bool {\n\treturn n > 0 && f(n-1)\n}\n");
        let f = &flow.functions[0];
        assert!(calls(&f.blocks[0]).is_empty());
        assert_eq!(f.blocks.len(), 3);
    }

    #[test]
    fn test_infinite_loop_has_no_exit() {
        let flow = lower("package p\nfunc f() {\n\tfor {\n\t}\n}\n");
        let f = &flow.functions[0];
        assert!(f
            .blocks
            .iter()
            .all(|b| !matches!(b.control(), Some(Instruction::Return { .. }))));
    }

    #[test]
    fn test_panic_terminates_block() {
        let flow = lower("package p\nfunc f() {\n\tpanic(\"x\")\n}\n");
        let f = &flow.functions[0];
        assert_eq!(f.blocks.len(), 1);
        assert!(matches!(f.blocks[0].control(), Some(Instruction::Panic { .. })));
    }

    #[test]
    fn test_interface_call_is_invoke() {
        let flow = lower("package p\ntype I interface{ M() }\nfunc f(i I) {\n\ti.M()\n}\n");
        let f = &flow.functions[0];
        let entry = calls(&f.blocks[0]);
        assert!(entry[0].is_invoke());
    }

    #[test]
    fn test_func_literal_is_separate_function() {
        let flow = lower("package p\nfunc f() {\n\tg := func() {}\n\tg()\n}\n");
        assert_eq!(flow.functions.len(), 2);
        assert_eq!(flow.functions[1].name, "p.f$1");
        assert!(flow.functions[1].object.is_none());
        let entry = calls(&flow.functions[0].blocks[0]);
        assert_eq!(entry[0].callee, Callee::Value);
    }

    #[test]
    fn test_debug_refs_for_locals() {
        let flow = lower("package p\nfunc f(x int) int {\n\treturn x\n}\n");
        let entry = &flow.functions[0].blocks[0];
        assert!(matches!(entry.instrs[0], Instruction::DebugRef { .. }));
    }
}
