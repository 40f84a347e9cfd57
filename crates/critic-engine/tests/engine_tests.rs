//! Integration tests for the checker engine: registration, selection,
//! dispatch, diagnostics and fixes, driven by small checkers defined here.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use critic_engine::query;
use critic_engine::testutil::Fixture;
use critic_engine::{
    Checker, CheckerContext, CheckerInfo, ConfigError, Fix, Registry, RunConfig, Selection,
    Severity, WalkKind,
};
use critic_syntax::ast::{BinaryOp, Decl, Expr, Spanned};
use critic_syntax::{FlowFunction, Instruction};
use pretty_assertions::assert_eq;

// ============================================================================
// Test checkers
// ============================================================================

/// Reports `nil == x` and `nil != x`, suggesting the operands be swapped.
struct NilFirst;

impl Checker for NilFirst {
    fn kinds(&self) -> &[WalkKind] {
        &[WalkKind::LocalExpr]
    }

    fn visit_local_expr(&mut self, expr: &Expr, cx: &mut CheckerContext<'_, '_>) {
        let Expr::Binary(binary) = expr else {
            return;
        };
        if !matches!(binary.op, BinaryOp::Eql | BinaryOp::Neq) {
            return;
        }
        let program = cx.program();
        if !query::is_nil(program, &binary.x) || query::is_nil(program, &binary.y) {
            return;
        }
        let swapped = format!(
            "{} {} {}",
            program.render_expr(&binary.y),
            binary.op.as_str(),
            program.render_expr(&binary.x)
        );
        cx.warn_with_fix(
            expr,
            format!("put nil on the right: {}", swapped),
            Fix::new(expr.span(), swapped),
        );
    }
}

/// Reports every statically named call in the flow form.
struct Calls;

impl Checker for Calls {
    fn kinds(&self) -> &[WalkKind] {
        &[WalkKind::FlowInstr]
    }

    fn visit_flow_instr(
        &mut self,
        _func: &FlowFunction,
        instr: &Instruction,
        cx: &mut CheckerContext<'_, '_>,
    ) {
        let Some(call) = instr.call() else {
            return;
        };
        if let Some(name) = query::flow_call_name(cx.program(), call) {
            cx.warn(&call.span, format!("calls {}", name));
        }
    }
}

/// Reports the file once.
struct FileMarker;

impl Checker for FileMarker {
    fn kinds(&self) -> &[WalkKind] {
        &[WalkKind::File]
    }

    fn visit_file(&mut self, file: &critic_syntax::ast::File, cx: &mut CheckerContext<'_, '_>) {
        cx.warn(&file.package, format!("package {}", file.package.name));
    }
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register(
            CheckerInfo::new("nilFirst", "Detects nil on the left of a comparison")
                .tags(&["style"])
                .example("nil == p", "p == nil"),
            |_| Box::new(NilFirst),
        )
        .unwrap();
    registry
        .register(
            CheckerInfo::new("calls", "Lists static calls").tags(&["diagnostic", "experimental"]),
            |_| Box::new(Calls),
        )
        .unwrap();
    registry
        .register(
            CheckerInfo::new("fileMarker", "Marks the file")
                .tags(&["security"])
                .param("label", "file", "label to print"),
            |_| Box::new(FileMarker),
        )
        .unwrap();
    registry
}

const SOURCE: &str = r#"package sample

import "strings"

func check(p *int, s string) bool {
	if nil == p {
		return false
	}
	return strings.HasPrefix(s, "x") && nil != p
}
"#;

fn checkers(result: &critic_engine::AnalysisResult) -> Vec<&str> {
    result.diagnostics.iter().map(|d| d.checker.as_str()).collect()
}

// ============================================================================
// Registration and selection
// ============================================================================

#[test]
fn test_factory_runs_once_per_selected_checker() {
    let created = Arc::new(AtomicUsize::new(0));
    let mut registry = Registry::new();
    let counter = Arc::clone(&created);
    registry
        .register(CheckerInfo::new("nilFirst", "x").tags(&["style"]), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::new(NilFirst)
        })
        .unwrap();
    let err = registry
        .register(CheckerInfo::new("nilFirst", "again"), |_| Box::new(NilFirst))
        .unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateChecker { .. }));

    let fixture = Fixture::parse("sample.go", SOURCE).unwrap();
    fixture.analyze(&registry, &Selection::all()).unwrap();
    assert_eq!(created.load(Ordering::SeqCst), 1);
    fixture.analyze(&registry, &Selection::default()).unwrap();
    assert_eq!(created.load(Ordering::SeqCst), 1, "unselected checkers are not built");
}

#[test]
fn test_empty_selection_reports_nothing() {
    let fixture = Fixture::parse("sample.go", SOURCE).unwrap();
    let result = fixture.analyze(&registry(), &Selection::default()).unwrap();
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.stats.checkers, 0);
    assert_eq!(result.stats.handler_calls, 0);
}

#[test]
fn test_tag_selection() {
    let fixture = Fixture::parse("sample.go", SOURCE).unwrap();
    let registry = registry();

    let result = fixture.analyze(&registry, &Selection::tags(&["style"])).unwrap();
    assert_eq!(checkers(&result), vec!["nilFirst", "nilFirst"]);

    let selection = Selection::all().disable_tag("experimental").disable("nilFirst");
    let result = fixture.analyze(&registry, &selection).unwrap();
    assert_eq!(checkers(&result), vec!["fileMarker"]);
    assert_eq!(result.diagnostics[0].severity, Severity::Error);
}

#[test]
fn test_override_validation_happens_before_traversal() {
    let fixture = Fixture::parse("sample.go", SOURCE).unwrap();
    let registry = registry();

    let selection = Selection::all().set_param("fileMarker.label", 3);
    assert!(matches!(
        fixture.analyze(&registry, &selection),
        Err(ConfigError::ParamType { .. })
    ));
    let selection = Selection::all().set_param("nilFirst.label", "x");
    assert!(matches!(
        fixture.analyze(&registry, &selection),
        Err(ConfigError::UnknownParam { .. })
    ));
    let selection = Selection::names(&["nilFirst", "missing"]);
    assert_eq!(
        fixture.analyze(&registry, &selection).unwrap_err(),
        ConfigError::UnknownChecker {
            name: "missing".to_string()
        }
    );
}

// ============================================================================
// Dispatch and diagnostics
// ============================================================================

#[test]
fn test_diagnostics_in_traversal_order() {
    let fixture = Fixture::parse("sample.go", SOURCE).unwrap();
    let result = fixture.analyze(&registry(), &Selection::all()).unwrap();

    let summary: Vec<(String, u32, String)> = result
        .diagnostics
        .iter()
        .map(|d| (d.checker.clone(), d.position.line, d.message.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("fileMarker".to_string(), 1, "package sample".to_string()),
            ("nilFirst".to_string(), 6, "put nil on the right: p == nil".to_string()),
            ("nilFirst".to_string(), 9, "put nil on the right: p != nil".to_string()),
            ("calls".to_string(), 9, "calls strings.HasPrefix".to_string()),
        ]
    );
    assert_eq!(result.diagnostics[1].position.column, 5);
    assert_eq!(result.fixable_count(), 2);
}

#[test]
fn test_runs_are_idempotent() {
    let fixture = Fixture::parse("sample.go", SOURCE).unwrap();
    let registry = registry();
    let first = fixture.analyze(&registry, &Selection::all()).unwrap();
    let second = fixture.analyze(&registry, &Selection::all()).unwrap();
    assert_eq!(first.diagnostics, second.diagnostics);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn test_fixes_reparse_and_converge() {
    let fixture = Fixture::parse("sample.go", SOURCE).unwrap();
    let registry = registry();
    let selection = Selection::names(&["nilFirst"]);
    let result = fixture.analyze(&registry, &selection).unwrap();
    let fixes: Vec<Fix> = result.fixes().cloned().collect();
    let fixed = Fix::apply_all(&fixture.source.text, &fixes).unwrap();

    assert!(fixed.contains("if p == nil {"));
    assert!(fixed.contains("&& p != nil"));
    let refixture = Fixture::parse("sample.go", &fixed).unwrap();
    let again = refixture.analyze(&registry, &selection).unwrap();
    assert!(again.diagnostics.is_empty());
}

#[test]
fn test_diagnostic_serializes() {
    let fixture = Fixture::parse("sample.go", SOURCE).unwrap();
    let result = fixture
        .analyze(&registry(), &Selection::names(&["nilFirst"]))
        .unwrap();
    let json = serde_json::to_value(&result.diagnostics[0]).unwrap();
    assert_eq!(json["checker"], "nilFirst");
    assert_eq!(json["severity"], "info");
    assert_eq!(json["position"]["line"], 6);
    assert_eq!(json["fix"]["replacement"], "p == nil");

    let marker = fixture
        .analyze(&registry(), &Selection::names(&["fileMarker"]))
        .unwrap();
    let json = serde_json::to_value(&marker.diagnostics[0]).unwrap();
    assert!(json.get("fix").is_none());
}

// ============================================================================
// Run configuration
// ============================================================================

#[test]
fn test_generated_files_are_skipped() {
    let text = format!("// Code generated by gen. DO NOT EDIT.\n\n{}", SOURCE);
    let fixture = Fixture::parse("sample.go", &text).unwrap();
    let registry = registry();
    let config: RunConfig = serde_json::from_str(r#"{"enable": ["all"]}"#).unwrap();

    let result = fixture.analyze_config(&registry, &config).unwrap();
    assert!(result.skipped);
    assert!(result.diagnostics.is_empty());

    let config = RunConfig {
        skip_generated: false,
        ..config
    };
    let result = fixture.analyze_config(&registry, &config).unwrap();
    assert!(!result.skipped);
    assert_eq!(result.diagnostics.len(), 4);
}

#[test]
fn test_test_files_skipped_on_request() {
    let fixture = Fixture::parse("sample_test.go", SOURCE).unwrap();
    let registry = registry();
    let mut config = RunConfig::new();
    config.enable_tags = vec!["style".to_string()];

    assert_eq!(fixture.analyze_config(&registry, &config).unwrap().diagnostics.len(), 2);
    config.skip_tests = true;
    assert!(fixture.analyze_config(&registry, &config).unwrap().skipped);

    config.enable_tags = vec!["nonexistent".to_string()];
    assert!(matches!(
        fixture.analyze_config(&registry, &config),
        Err(ConfigError::UnknownTag { .. })
    ));
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_runs_share_registry() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let registry = registry();
    let expected = Fixture::parse("sample.go", SOURCE)
        .unwrap()
        .analyze(&registry, &Selection::all())
        .unwrap()
        .diagnostics;

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let fixture = Fixture::parse("sample.go", SOURCE).unwrap();
                    fixture.analyze(&registry, &Selection::all()).unwrap().diagnostics
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

// ============================================================================
// Queries on whole files
// ============================================================================

#[test]
fn test_group_specs_lines_one_two_four() {
    let text = "package p\n\nconst (\n\tA = 1\n\tB = 2\n\n\tC = 3\n)\n";
    let fixture = Fixture::parse("p.go", text).unwrap();
    let program = fixture.program();
    let Some(Decl::Gen(gen)) = program.file().decls.first() else {
        panic!("expected a const declaration");
    };
    let lines: Vec<u32> = gen
        .specs
        .iter()
        .map(|spec| program.line_of(spec.span().start) - 3)
        .collect();
    assert_eq!(lines, vec![1, 2, 4]);

    let groups = query::group_specs(&program, &gen.specs);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(groups[1].len(), 1);
}

#[test]
fn test_bool_const_boundary() {
    let text = r#"package p

type Switch bool

const (
	Off  Switch = false
	Done        = true
)

func f(b bool) bool {
	return b == Done || Switch(b) == Off
}
"#;
    let fixture = Fixture::parse("p.go", text).unwrap();
    let program = fixture.program();
    let func = program.file().funcs().next().unwrap();
    let critic_syntax::ast::Stmt::Return(ret) = &func.body.as_ref().unwrap().stmts[0] else {
        panic!("expected return");
    };
    let Expr::Binary(or) = &ret.results[0] else {
        panic!("expected ||");
    };
    let (Expr::Binary(left), Expr::Binary(right)) = (or.x.as_ref(), or.y.as_ref()) else {
        panic!("expected comparisons");
    };
    assert!(query::is_bool_const(&program, &left.y));
    assert_eq!(query::bool_const(&program, &left.y), Some(true));
    assert!(!query::is_bool_const(&program, &right.y));
}
