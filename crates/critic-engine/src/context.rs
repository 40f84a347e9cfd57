//! Per-run state and the handle checkers report through.

use critic_syntax::ast::Spanned;

use crate::diagnostic::{Diagnostic, Fix, Severity};
use crate::model::Program;
use crate::registry::CheckerInfo;

/// State owned by one run: the program under analysis and the
/// diagnostics reported so far, in report order.
pub struct AnalysisContext<'p, 'a> {
    pub program: &'p Program<'a>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'p, 'a> AnalysisContext<'p, 'a> {
    pub fn new(program: &'p Program<'a>) -> Self {
        Self {
            program,
            diagnostics: Vec::new(),
        }
    }

    /// Reporting handle for one checker.
    pub fn checker<'c>(
        &'c mut self,
        info: &'c CheckerInfo,
        severity: Severity,
    ) -> CheckerContext<'c, 'a> {
        CheckerContext::new(self.program, info, severity, &mut self.diagnostics)
    }

    /// Finish the run, yielding the diagnostics.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// What a checker handler sees: the program and a way to report.
///
/// Every `warn*` call appends exactly one diagnostic; nothing is merged or
/// filtered.
pub struct CheckerContext<'c, 'a> {
    program: &'c Program<'a>,
    info: &'c CheckerInfo,
    severity: Severity,
    diagnostics: &'c mut Vec<Diagnostic>,
}

impl<'c, 'a> CheckerContext<'c, 'a> {
    pub(crate) fn new(
        program: &'c Program<'a>,
        info: &'c CheckerInfo,
        severity: Severity,
        diagnostics: &'c mut Vec<Diagnostic>,
    ) -> Self {
        Self {
            program,
            info,
            severity,
            diagnostics,
        }
    }

    /// The analysed program. The reference outlives the context borrow, so
    /// it can be held across calls to [`warn`](Self::warn).
    pub fn program(&self) -> &'c Program<'a> {
        self.program
    }

    pub fn info(&self) -> &'c CheckerInfo {
        self.info
    }

    /// Report `message` at `node`.
    pub fn warn(&mut self, node: &impl Spanned, message: impl Into<String>) {
        self.push(node, message.into(), None);
    }

    /// Report `message` at `node` with a suggested rewrite.
    pub fn warn_with_fix(&mut self, node: &impl Spanned, message: impl Into<String>, fix: Fix) {
        self.push(node, message.into(), Some(fix));
    }

    fn push(&mut self, node: &impl Spanned, message: String, fix: Option<Fix>) {
        let span = node.span();
        self.diagnostics.push(Diagnostic {
            checker: self.info.name.clone(),
            position: self.program.position(span),
            span,
            message,
            severity: self.severity,
            fix,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use critic_syntax::{check_file, CheckConfig, SourceFile};

    #[test]
    fn test_warn_appends_in_call_order() {
        let file = SourceFile::parse("w.go", "package w\n\nvar x = 1\n").unwrap();
        let info = check_file(&file.file, &CheckConfig::default());
        let program = Program::new(&file, &info);
        let checker = CheckerInfo::new("demo", "test checker").tags(&["diagnostic"]);
        let mut analysis = AnalysisContext::new(&program);
        {
            let mut cx = analysis.checker(&checker, checker.severity());
            let decl = &cx.program().file().decls[0];
            cx.warn(decl, "first");
            cx.warn(decl, "first");
            cx.warn_with_fix(decl, "second", Fix::new(decl.span(), "var x = 2"));
        }
        let diagnostics = analysis.finish();
        assert_eq!(diagnostics.len(), 3, "identical reports are not merged");
        assert_eq!(diagnostics[0].message, "first");
        assert_eq!(diagnostics[2].message, "second");
        assert_eq!(diagnostics[0].checker, "demo");
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].position.line, 3);
        assert!(diagnostics[2].fix.is_some());
    }
}
