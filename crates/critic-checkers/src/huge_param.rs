//! Checker: hugeParam (performance)
//!
//! Flags receivers and parameters passed by value whose type is at least
//! `sizeThreshold` bytes, suggesting a pointer instead. The fix rewrites the
//! declared type `T` as `*T`; for a field declaring several names it is
//! attached to the first name only, since they share one type.

use critic_engine::{Checker, CheckerContext, CheckerInfo, Fix, InitContext, WalkKind};
use critic_syntax::ast::{Field, FieldList, FuncDecl, Spanned, TypeExprKind};

pub const NAME: &str = "hugeParam";

const DEFAULT_THRESHOLD: i64 = 80;

pub fn info() -> CheckerInfo {
    CheckerInfo::new(NAME, "Detects params that incur excessive amount of copying")
        .tags(&["performance"])
        .example("func f(x [1024]int) {}", "func f(x *[1024]int) {}")
        .param(
            "sizeThreshold",
            DEFAULT_THRESHOLD,
            "size in bytes that makes the warning trigger",
        )
}

pub fn create(cx: &InitContext<'_>) -> Box<dyn Checker> {
    Box::new(HugeParam {
        size_threshold: cx.params.int("sizeThreshold").unwrap_or(DEFAULT_THRESHOLD),
    })
}

pub struct HugeParam {
    size_threshold: i64,
}

impl HugeParam {
    fn check_params(&self, list: &FieldList, cx: &mut CheckerContext<'_, '_>) {
        for field in &list.fields {
            self.check_field(field, cx);
        }
    }

    fn check_field(&self, field: &Field, cx: &mut CheckerContext<'_, '_>) {
        let program = cx.program();
        for (i, name) in field.names.iter().enumerate() {
            let Some(size) = program.ident_type(name).and_then(|ty| program.size_of(ty)) else {
                continue;
            };
            if size < self.size_threshold {
                continue;
            }
            let message = format!(
                "{} is heavy ({} bytes); consider passing it by pointer",
                name.name, size
            );
            let variadic = matches!(field.ty.kind, TypeExprKind::Ellipsis(_));
            if i == 0 && !variadic {
                let pointer = format!("*{}", program.render_type_expr(&field.ty));
                cx.warn_with_fix(name, message, Fix::new(field.ty.span(), pointer));
            } else {
                cx.warn(name, message);
            }
        }
    }
}

impl Checker for HugeParam {
    fn kinds(&self) -> &[WalkKind] {
        &[WalkKind::FuncDecl]
    }

    fn visit_func_decl(&mut self, decl: &FuncDecl, cx: &mut CheckerContext<'_, '_>) {
        if let Some(recv) = &decl.recv {
            self.check_params(recv, cx);
        }
        self.check_params(&decl.ty.params, cx);
    }
}
