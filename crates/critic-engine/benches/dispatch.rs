use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use critic_engine::testutil::Fixture;
use critic_engine::{Checker, CheckerContext, CheckerInfo, Registry, Selection, WalkKind};
use critic_syntax::ast::{Expr, Stmt};

/// Counts nodes without reporting, so the bench measures dispatch alone.
struct Counter {
    nodes: usize,
}

impl Checker for Counter {
    fn kinds(&self) -> &[WalkKind] {
        &[WalkKind::Stmt, WalkKind::LocalExpr]
    }

    fn visit_stmt(&mut self, _stmt: &Stmt, _cx: &mut CheckerContext<'_, '_>) {
        self.nodes += 1;
    }

    fn visit_local_expr(&mut self, _expr: &Expr, _cx: &mut CheckerContext<'_, '_>) {
        self.nodes += 1;
    }
}

fn registry(checkers: usize) -> Registry {
    let mut registry = Registry::new();
    for i in 0..checkers {
        let info = CheckerInfo::new(&format!("counter{}", i), "counts nodes").tags(&["style"]);
        registry
            .register(info, |_| Box::new(Counter { nodes: 0 }))
            .unwrap();
    }
    registry
}

fn source(functions: usize) -> String {
    let mut source = String::from("package bench\n\n");
    for i in 0..functions {
        source.push_str(&format!(
            "func f{i}(xs []int, n int) int {{\n\
             \ttotal := 0\n\
             \tfor _, x := range xs {{\n\
             \t\tif x > n && x != 0 {{\n\
             \t\t\ttotal += x * 2\n\
             \t\t}}\n\
             \t}}\n\
             \treturn total\n\
             }}\n\n"
        ));
    }
    source
}

fn bench_checker_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("checker_scaling");
    let fixture = Fixture::parse("bench.go", &source(50)).unwrap();

    for checkers in [1, 8, 32] {
        let registry = registry(checkers);
        group.throughput(Throughput::Elements(checkers as u64));
        group.bench_with_input(
            BenchmarkId::new("checkers", checkers),
            &registry,
            |b, registry| {
                b.iter(|| {
                    fixture
                        .analyze(black_box(registry), &Selection::all())
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

fn bench_file_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_scaling");
    let registry = registry(8);

    for functions in [10, 100, 500] {
        let text = source(functions);
        let fixture = Fixture::parse("bench.go", &text).unwrap();
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("functions", functions),
            &fixture,
            |b, fixture| {
                b.iter(|| fixture.analyze(&registry, black_box(&Selection::all())).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_checker_scaling, bench_file_scaling);
criterion_main!(benches);
