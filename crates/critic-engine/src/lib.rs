//! Critic Engine
//!
//! A pluggable static-analysis core. Checkers register with a
//! [`Registry`]; an [`Analyzer`] runs a selection of them over one
//! type-checked [`Program`] in a single traversal and returns positioned
//! [`Diagnostic`]s, each optionally carrying a [`Fix`].
//!
//! # Architecture
//!
//! - [`model`]: the read-only program view and the [`Semantics`] seam
//!   front-ends implement.
//! - [`query`]: semantic helpers shared by checkers.
//! - [`registry`]: checker metadata, parameters and selection.
//! - [`dispatch`]: the [`Checker`] trait and the single-pass dispatcher.
//! - [`diagnostic`]: diagnostics, severities and fixes.
//!
//! # Example
//!
//! ```ignore
//! use critic_engine::{Analyzer, Program, Registry, Selection};
//!
//! let mut registry = Registry::new();
//! critic_checkers::register_all(&mut registry)?;
//! let program = Program::new(&source, &type_info);
//! let result = Analyzer::new(&registry).run(&program, &Selection::all())?;
//! for diagnostic in &result.diagnostics {
//!     println!("{}", diagnostic);
//! }
//! ```

pub mod config;
pub mod context;
pub mod diagnostic;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod query;
pub mod registry;
#[cfg(feature = "testutil")]
pub mod testutil;

pub use config::RunConfig;
pub use context::{AnalysisContext, CheckerContext};
pub use diagnostic::{Diagnostic, Fix, Position, Severity};
pub use dispatch::{Checker, RunStats, WalkKind};
pub use error::{ConfigError, FixError};
pub use model::{Program, Semantics};
pub use registry::{
    CheckerInfo, CheckerParams, Enable, InitContext, ParamSpec, ParamValue, Registry,
    ResolvedChecker, Selection,
};

use dispatch::{Dispatcher, Slot};

/// Result of analysing one file.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    /// Diagnostics in report order.
    pub diagnostics: Vec<Diagnostic>,
    pub stats: RunStats,
    /// The file was skipped (generated or test code) and not analysed.
    pub skipped: bool,
}

impl AnalysisResult {
    /// Number of diagnostics that carry a fix.
    pub fn fixable_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.fix.is_some()).count()
    }

    /// Fixes of every diagnostic, in report order.
    pub fn fixes(&self) -> impl Iterator<Item = &Fix> {
        self.diagnostics.iter().filter_map(|d| d.fix.as_ref())
    }
}

/// Runs checkers from a registry over programs.
///
/// An analyzer borrows the registry read-only, so any number of analyzers
/// on any number of threads may share one registry.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'r> {
    registry: &'r Registry,
}

impl<'r> Analyzer<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Run the selected checkers over `program`.
    ///
    /// Selection errors are reported before any traversal starts.
    pub fn run(
        &self,
        program: &Program<'_>,
        selection: &Selection,
    ) -> Result<AnalysisResult, ConfigError> {
        let resolved = self.registry.resolve(selection)?;
        tracing::debug!(
            path = %program.path(),
            checkers = resolved.len(),
            "starting analysis"
        );
        let slots: Vec<Slot> = resolved
            .iter()
            .map(|checker| Slot::new(self.registry.instantiate(checker), checker.info.clone()))
            .collect();
        let (diagnostics, stats) = Dispatcher::new(program, slots).run();
        tracing::debug!(
            path = %program.path(),
            diagnostics = diagnostics.len(),
            handler_calls = stats.handler_calls,
            "finished analysis"
        );
        Ok(AnalysisResult {
            diagnostics,
            stats,
            skipped: false,
        })
    }

    /// Run with a [`RunConfig`], honouring its file skipping rules.
    pub fn run_config(
        &self,
        program: &Program<'_>,
        config: &RunConfig,
    ) -> Result<AnalysisResult, ConfigError> {
        let selection = config.to_selection();
        let skip = (config.skip_generated && query::is_generated(program.source()))
            || (config.skip_tests && query::is_in_test(program));
        if skip {
            // Still validate the selection so configuration errors surface.
            self.registry.resolve(&selection)?;
            tracing::debug!(path = %program.path(), "skipping file");
            return Ok(AnalysisResult {
                skipped: true,
                ..AnalysisResult::default()
            });
        }
        self.run(program, &selection)
    }
}
