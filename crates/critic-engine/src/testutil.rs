//! Helpers for testing checkers against source text.
//!
//! A [`Fixture`] runs the reference front-end over a snippet (parse, type
//! check, flow lowering) and keeps the results alive so a [`Program`] can
//! borrow them.

use critic_syntax::{check_file, flow, CheckConfig, FlowProgram, SourceFile, SyntaxError, TypeInfo};

use crate::error::ConfigError;
use crate::model::Program;
use crate::registry::{Registry, Selection};
use crate::{AnalysisResult, Analyzer, RunConfig};

/// A parsed and checked source file.
pub struct Fixture {
    pub source: SourceFile,
    pub info: TypeInfo,
    pub flow: FlowProgram,
}

impl Fixture {
    pub fn parse(path: &str, text: &str) -> Result<Self, SyntaxError> {
        let source = SourceFile::parse(path, text)?;
        let info = check_file(&source.file, &CheckConfig::default());
        let flow = flow::build(&source.file, &info);
        Ok(Self { source, info, flow })
    }

    /// Program view including the flow form.
    pub fn program(&self) -> Program<'_> {
        Program::new(&self.source, &self.info).with_flow(&self.flow)
    }

    pub fn analyze(
        &self,
        registry: &Registry,
        selection: &Selection,
    ) -> Result<AnalysisResult, ConfigError> {
        Analyzer::new(registry).run(&self.program(), selection)
    }

    pub fn analyze_config(
        &self,
        registry: &Registry,
        config: &RunConfig,
    ) -> Result<AnalysisResult, ConfigError> {
        Analyzer::new(registry).run_config(&self.program(), config)
    }
}
