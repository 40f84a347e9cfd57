//! Critic Checkers
//!
//! Checker plug-ins for the critic engine. Each module holds one checker:
//! its metadata (`info`), a factory (`create`) and the [`Checker`]
//! implementation. [`register_all`] adds every checker to a registry.
//!
//! # Example
//!
//! ```ignore
//! use critic_engine::{Analyzer, Selection};
//!
//! let registry = critic_checkers::default_registry()?;
//! let result = Analyzer::new(&registry).run(&program, &Selection::all())?;
//! ```
//!
//! [`Checker`]: critic_engine::Checker

pub mod bad_strings_call;
pub mod bool_literal_compare;
pub mod dup_import;
pub mod huge_param;
pub mod self_recursion;
pub mod sloppy_reassign;
pub mod yoda_style_expr;

use critic_engine::{ConfigError, Registry};

/// Register every checker in this crate.
pub fn register_all(registry: &mut Registry) -> Result<(), ConfigError> {
    // Diagnostic
    registry.register(sloppy_reassign::info(), sloppy_reassign::create)?;
    registry.register(dup_import::info(), dup_import::create)?;
    registry.register(bad_strings_call::info(), bad_strings_call::create)?;
    registry.register(self_recursion::info(), self_recursion::create)?;
    // Performance
    registry.register(huge_param::info(), huge_param::create)?;
    // Style
    registry.register(yoda_style_expr::info(), yoda_style_expr::create)?;
    registry.register(bool_literal_compare::info(), bool_literal_compare::create)?;
    tracing::debug!(checkers = registry.len(), "registered builtin checkers");
    Ok(())
}

/// A registry holding every checker in this crate.
pub fn default_registry() -> Result<Registry, ConfigError> {
    let mut registry = Registry::new();
    register_all(&mut registry)?;
    Ok(registry)
}

#[cfg(test)]
pub(crate) mod testing {
    use critic_engine::testutil::Fixture;
    use critic_engine::{Diagnostic, Fix, Selection};

    /// Run one checker with default parameters over `source`.
    pub fn lint(checker: &str, source: &str) -> Vec<Diagnostic> {
        lint_with(Selection::names(&[checker]), source)
    }

    pub fn lint_with(selection: Selection, source: &str) -> Vec<Diagnostic> {
        let registry = super::default_registry().unwrap();
        let fixture = Fixture::parse("test.go", source).unwrap();
        fixture.analyze(&registry, &selection).unwrap().diagnostics
    }

    pub fn has_checker(diags: &[Diagnostic], name: &str) -> bool {
        diags.iter().any(|d| d.checker == name)
    }

    /// Apply every fix and return the rewritten source.
    pub fn apply_fixes(source: &str, diags: &[Diagnostic]) -> String {
        let fixes: Vec<Fix> = diags.iter().filter_map(|d| d.fix.clone()).collect();
        Fix::apply_all(source, &fixes).unwrap()
    }
}
