//! Engine errors

use thiserror::Error;

/// Errors raised while registering checkers or resolving a selection.
///
/// These are fatal to setting up a run; traversal never starts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Two checkers registered under one name
    #[error("checker '{name}' is already registered")]
    DuplicateChecker {
        /// Colliding name
        name: String,
    },

    /// Selection names a checker that is not registered
    #[error("unknown checker '{name}'")]
    UnknownChecker {
        /// Requested name
        name: String,
    },

    /// Selection names a tag no registered checker carries
    #[error("unknown tag '{tag}'")]
    UnknownTag {
        /// Requested tag
        tag: String,
    },

    /// Override for a parameter the checker does not declare
    #[error("checker '{checker}' has no parameter '{param}'")]
    UnknownParam {
        /// Checker name
        checker: String,
        /// Parameter name
        param: String,
    },

    /// Override value of the wrong type
    #[error("parameter '{checker}.{param}' expects {expected}, got {found}")]
    ParamType {
        /// Checker name
        checker: String,
        /// Parameter name
        param: String,
        /// Declared type
        expected: &'static str,
        /// Type of the override
        found: &'static str,
    },

    /// Override key not of the form `checker.param`
    #[error("invalid parameter override '{key}', expected 'checker.param'")]
    InvalidOverride {
        /// Offending key
        key: String,
    },
}

/// Errors raised while applying fixes to source text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FixError {
    /// Two fixes claim intersecting ranges
    #[error("fix {first_start}..{first_end} overlaps fix {second_start}..{second_end}")]
    Overlap {
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },

    /// Fix range outside the source or not on a character boundary
    #[error("fix range {start}..{end} is invalid for a source of {len} bytes")]
    OutOfBounds { start: usize, end: usize, len: usize },
}
