//! Dispatcher: one traversal feeding every selected checker.
//!
//! Checkers declare which node kinds they want. The dispatcher groups them
//! by kind once per run, then walks the file a single time: the file group
//! first, then one pass over the syntax tree, then one pass over the flow
//! form. Each handler sees each node of its kind exactly once, so a run
//! costs one traversal no matter how many checkers are selected.

use std::sync::Arc;

use critic_syntax::ast::visitor::{self, Visitor};
use critic_syntax::ast::{
    DeclKind, Expr, FieldList, File, FuncDecl, FuncType, GenDecl, Stmt, TypeExpr,
};
use critic_syntax::{BasicBlock, FlowFunction, Instruction};

use crate::context::{AnalysisContext, CheckerContext};
use crate::diagnostic::{Diagnostic, Severity};
use crate::model::Program;
use crate::registry::CheckerInfo;

/// Node kinds a checker can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WalkKind {
    /// The whole file, once
    File,
    /// Every function declaration
    FuncDecl,
    /// Every statement inside a function body
    Stmt,
    /// Every expression inside a function body, type expressions aside
    LocalExpr,
    /// Every basic block of the flow form
    FlowBlock,
    /// Every flow instruction
    FlowInstr,
}

impl WalkKind {
    pub const ALL: [WalkKind; 6] = [
        WalkKind::File,
        WalkKind::FuncDecl,
        WalkKind::Stmt,
        WalkKind::LocalExpr,
        WalkKind::FlowBlock,
        WalkKind::FlowInstr,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Kinds gated by [`Checker::enter_func`].
    fn is_func_scoped(self) -> bool {
        matches!(self, WalkKind::FuncDecl | WalkKind::Stmt | WalkKind::LocalExpr)
    }
}

/// A checker instance for one run.
///
/// Only the hooks for the kinds returned by [`kinds`](Checker::kinds) are
/// called; the others default to doing nothing.
pub trait Checker {
    /// Node kinds this checker handles.
    fn kinds(&self) -> &[WalkKind];

    /// Called before a function declaration is visited. Returning false
    /// skips the declaration and its body for this checker.
    fn enter_func(&mut self, _decl: &FuncDecl, _cx: &mut CheckerContext<'_, '_>) -> bool {
        true
    }

    fn visit_file(&mut self, _file: &File, _cx: &mut CheckerContext<'_, '_>) {}

    fn visit_func_decl(&mut self, _decl: &FuncDecl, _cx: &mut CheckerContext<'_, '_>) {}

    fn visit_stmt(&mut self, _stmt: &Stmt, _cx: &mut CheckerContext<'_, '_>) {}

    fn visit_local_expr(&mut self, _expr: &Expr, _cx: &mut CheckerContext<'_, '_>) {}

    fn visit_flow_block(
        &mut self,
        _func: &FlowFunction,
        _block: &BasicBlock,
        _cx: &mut CheckerContext<'_, '_>,
    ) {
    }

    fn visit_flow_instr(
        &mut self,
        _func: &FlowFunction,
        _instr: &Instruction,
        _cx: &mut CheckerContext<'_, '_>,
    ) {
    }
}

/// Counters collected during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Checkers selected for the run
    pub checkers: usize,
    pub func_decls: usize,
    pub stmts: usize,
    pub local_exprs: usize,
    pub flow_blocks: usize,
    pub flow_instrs: usize,
    /// Total handler invocations across all kinds
    pub handler_calls: usize,
}

/// A checker together with the metadata its diagnostics carry.
pub struct Slot {
    pub checker: Box<dyn Checker>,
    pub info: Arc<CheckerInfo>,
    pub severity: Severity,
}

impl Slot {
    pub fn new(checker: Box<dyn Checker>, info: Arc<CheckerInfo>) -> Self {
        let severity = info.severity();
        Self {
            checker,
            info,
            severity,
        }
    }
}

/// Runs a set of checkers over one program.
pub struct Dispatcher<'p, 'a> {
    analysis: AnalysisContext<'p, 'a>,
    slots: Vec<Slot>,
    /// Slot indices per kind, in selection order
    groups: [Vec<usize>; 6],
    /// Per slot: whether the current function was entered
    active: Vec<bool>,
    in_body: bool,
    stats: RunStats,
}

impl<'p, 'a> Dispatcher<'p, 'a> {
    pub fn new(program: &'p Program<'a>, slots: Vec<Slot>) -> Self {
        let mut groups: [Vec<usize>; 6] = Default::default();
        for (i, slot) in slots.iter().enumerate() {
            let kinds = slot.checker.kinds();
            if kinds.is_empty() {
                tracing::warn!(
                    checker = %slot.info.name,
                    "selected checker handles no node kinds"
                );
            }
            for kind in WalkKind::ALL {
                if kinds.contains(&kind) {
                    groups[kind.index()].push(i);
                }
            }
        }
        for kind in WalkKind::ALL {
            tracing::trace!(
                kind = ?kind,
                handlers = groups[kind.index()].len(),
                "built handler group"
            );
        }
        let active = vec![true; slots.len()];
        let stats = RunStats {
            checkers: slots.len(),
            ..RunStats::default()
        };
        Self {
            analysis: AnalysisContext::new(program),
            slots,
            groups,
            active,
            in_body: false,
            stats,
        }
    }

    fn has(&self, kind: WalkKind) -> bool {
        !self.groups[kind.index()].is_empty()
    }

    /// Call `f` for every active checker in the `kind` group.
    fn fire<F>(&mut self, kind: WalkKind, mut f: F)
    where
        F: FnMut(&mut dyn Checker, &mut CheckerContext<'_, '_>),
    {
        let program = self.analysis.program;
        let gated = kind.is_func_scoped();
        for &i in &self.groups[kind.index()] {
            if gated && !self.active[i] {
                continue;
            }
            let slot = &mut self.slots[i];
            let diagnostics = &mut self.analysis.diagnostics;
            let mut cx = CheckerContext::new(program, &slot.info, slot.severity, diagnostics);
            f(slot.checker.as_mut(), &mut cx);
            self.stats.handler_calls += 1;
        }
    }

    /// Traverse the program, returning the diagnostics in report order.
    pub fn run(mut self) -> (Vec<Diagnostic>, RunStats) {
        let program = self.analysis.program;
        let file = program.file();

        if self.has(WalkKind::File) {
            self.fire(WalkKind::File, |checker, cx| checker.visit_file(file, cx));
        }

        let wants_ast = [WalkKind::FuncDecl, WalkKind::Stmt, WalkKind::LocalExpr]
            .into_iter()
            .any(|kind| self.has(kind));
        if wants_ast {
            self.visit_file(file);
        }

        let wants_flow = self.has(WalkKind::FlowBlock) || self.has(WalkKind::FlowInstr);
        if let Some(flow) = program.flow().filter(|_| wants_flow) {
            for func in &flow.functions {
                for block in &func.blocks {
                    self.stats.flow_blocks += 1;
                    self.fire(WalkKind::FlowBlock, |checker, cx| {
                        checker.visit_flow_block(func, block, cx)
                    });
                    for instr in &block.instrs {
                        self.stats.flow_instrs += 1;
                        self.fire(WalkKind::FlowInstr, |checker, cx| {
                            checker.visit_flow_instr(func, instr, cx)
                        });
                    }
                }
            }
        }

        (self.analysis.finish(), self.stats)
    }

    /// Ask every function-scoped checker whether to enter `decl`.
    fn enter_func(&mut self, decl: &FuncDecl) {
        let program = self.analysis.program;
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let scoped = slot.checker.kinds().iter().any(|kind| kind.is_func_scoped());
            self.active[i] = !scoped || {
                let diagnostics = &mut self.analysis.diagnostics;
                let mut cx = CheckerContext::new(program, &slot.info, slot.severity, diagnostics);
                slot.checker.enter_func(decl, &mut cx)
            };
        }
    }
}

impl Visitor for Dispatcher<'_, '_> {
    fn visit_func_decl(&mut self, decl: &FuncDecl) {
        self.enter_func(decl);
        self.stats.func_decls += 1;
        self.fire(WalkKind::FuncDecl, |checker, cx| checker.visit_func_decl(decl, cx));
        if let Some(body) = &decl.body {
            self.in_body = true;
            self.visit_block(body);
            self.in_body = false;
        }
    }

    fn visit_gen_decl(&mut self, decl: &GenDecl) {
        // Package-level initializers are not local; local type
        // declarations hold no expressions of interest.
        if self.in_body && decl.kind != DeclKind::Type {
            visitor::walk_gen_decl(self, decl);
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        self.stats.stmts += 1;
        self.fire(WalkKind::Stmt, |checker, cx| checker.visit_stmt(stmt, cx));
        visitor::walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        self.stats.local_exprs += 1;
        self.fire(WalkKind::LocalExpr, |checker, cx| checker.visit_local_expr(expr, cx));
        visitor::walk_expr(self, expr);
    }

    fn visit_type_expr(&mut self, _ty: &TypeExpr) {}

    fn visit_func_type(&mut self, _ty: &FuncType) {}

    fn visit_field_list(&mut self, _list: &FieldList) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use critic_syntax::ast::Spanned;
    use critic_syntax::{check_file, flow, CheckConfig, FlowProgram, SourceFile, TypeInfo};

    type Log = Rc<RefCell<Vec<(WalkKind, usize, usize)>>>;

    /// Records every node it is handed, by kind and byte range.
    struct Recorder {
        kinds: Vec<WalkKind>,
        log: Log,
        skip: Option<&'static str>,
    }

    impl Checker for Recorder {
        fn kinds(&self) -> &[WalkKind] {
            &self.kinds
        }

        fn enter_func(&mut self, decl: &FuncDecl, _cx: &mut CheckerContext<'_, '_>) -> bool {
            self.skip != Some(decl.name.name.as_str())
        }

        fn visit_file(&mut self, file: &File, _cx: &mut CheckerContext<'_, '_>) {
            let span = file.span();
            self.log.borrow_mut().push((WalkKind::File, span.start, span.end));
        }

        fn visit_func_decl(&mut self, decl: &FuncDecl, _cx: &mut CheckerContext<'_, '_>) {
            self.log
                .borrow_mut()
                .push((WalkKind::FuncDecl, decl.span.start, decl.span.end));
        }

        fn visit_stmt(&mut self, stmt: &Stmt, _cx: &mut CheckerContext<'_, '_>) {
            let span = stmt.span();
            self.log.borrow_mut().push((WalkKind::Stmt, span.start, span.end));
        }

        fn visit_local_expr(&mut self, expr: &Expr, _cx: &mut CheckerContext<'_, '_>) {
            let span = expr.span();
            self.log.borrow_mut().push((WalkKind::LocalExpr, span.start, span.end));
        }

        fn visit_flow_block(
            &mut self,
            func: &FlowFunction,
            block: &BasicBlock,
            _cx: &mut CheckerContext<'_, '_>,
        ) {
            self.log
                .borrow_mut()
                .push((WalkKind::FlowBlock, func.span.start, block.index));
        }

        fn visit_flow_instr(
            &mut self,
            _func: &FlowFunction,
            instr: &Instruction,
            _cx: &mut CheckerContext<'_, '_>,
        ) {
            let span = instr.span();
            self.log.borrow_mut().push((WalkKind::FlowInstr, span.start, span.end));
        }
    }

    const SRC: &str = r#"package d

var global = compute(1)

func compute(n int) int {
	type local struct{ a [4]int }
	var v = n + 1
	f := func() int { return v }
	return f()
}

func skipped() {
	_ = 1
}
"#;

    struct Loaded {
        file: SourceFile,
        info: TypeInfo,
        flow: FlowProgram,
    }

    fn load() -> Loaded {
        let file = SourceFile::parse("d.go", SRC).unwrap();
        let info = check_file(&file.file, &CheckConfig::default());
        let flow = flow::build(&file.file, &info);
        Loaded { file, info, flow }
    }

    fn run(loaded: &Loaded, kinds: &[WalkKind], skip: Option<&'static str>) -> (Log, RunStats) {
        let program = Program::new(&loaded.file, &loaded.info).with_flow(&loaded.flow);
        let log = Log::default();
        let recorder = Recorder {
            kinds: kinds.to_vec(),
            log: Rc::clone(&log),
            skip,
        };
        let info = Arc::new(CheckerInfo::new("recorder", "records visits"));
        let (diagnostics, stats) =
            Dispatcher::new(&program, vec![Slot::new(Box::new(recorder), info)]).run();
        assert!(diagnostics.is_empty());
        (log, stats)
    }

    fn count(log: &Log, kind: WalkKind) -> usize {
        log.borrow().iter().filter(|(k, _, _)| *k == kind).count()
    }

    #[test]
    fn test_every_node_visited_once() {
        let loaded = load();
        let (log, stats) = run(&loaded, &WalkKind::ALL, None);
        let mut seen = log.borrow().clone();
        let total = seen.len();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), total, "a node was visited twice");
        assert_eq!(stats.handler_calls, total);

        assert_eq!(count(&log, WalkKind::File), 1);
        assert_eq!(count(&log, WalkKind::FuncDecl), 2);
        // compute: 4 statements plus the literal's return; skipped: 1
        assert_eq!(count(&log, WalkKind::Stmt), 6);
        // n + 1, n, 1, f, func literal, v, f(), f, _, 1
        assert_eq!(count(&log, WalkKind::LocalExpr), 10);
        let blocks: usize = loaded.flow.functions.iter().map(|f| f.blocks.len()).sum();
        assert_eq!(count(&log, WalkKind::FlowBlock), blocks);
        assert_eq!(count(&log, WalkKind::FlowInstr), loaded.flow.instruction_count());
    }

    #[test]
    fn test_package_initializers_are_not_local() {
        let loaded = load();
        let (log, _) = run(&loaded, &[WalkKind::LocalExpr], None);
        let compute_start = loaded.file.text.find("func compute").unwrap();
        assert!(log.borrow().iter().all(|(_, start, _)| *start > compute_start));
    }

    #[test]
    fn test_enter_func_skips_declaration_and_body() {
        let loaded = load();
        let (log, _) = run(
            &loaded,
            &[WalkKind::FuncDecl, WalkKind::Stmt, WalkKind::LocalExpr],
            Some("skipped"),
        );
        assert_eq!(count(&log, WalkKind::FuncDecl), 1);
        assert_eq!(count(&log, WalkKind::Stmt), 5);
        assert_eq!(count(&log, WalkKind::LocalExpr), 8);
    }

    #[test]
    fn test_unsubscribed_kinds_are_not_walked() {
        let loaded = load();
        let (log, stats) = run(&loaded, &[WalkKind::File], None);
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(stats.stmts, 0);
        assert_eq!(stats.flow_blocks, 0);
    }

    #[test]
    fn test_checker_without_kinds_sees_nothing() {
        let loaded = load();
        let (log, stats) = run(&loaded, &[], None);
        assert!(log.borrow().is_empty());
        assert_eq!(stats.handler_calls, 0);
    }
}
