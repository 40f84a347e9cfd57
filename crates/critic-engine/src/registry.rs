//! Checker registry: metadata, factories and selection.
//!
//! Checkers register once with a [`CheckerInfo`] and a factory. A run
//! resolves a [`Selection`] against the registry, validating names, tags and
//! parameter overrides, and instantiates a fresh checker per run.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::dispatch::Checker;
use crate::diagnostic::Severity;
use crate::error::ConfigError;

/// Value of a checker parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Bool(bool),
    Str(String),
}

impl ParamValue {
    /// Name of the value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Int(_) => "int",
            ParamValue::Bool(_) => "bool",
            ParamValue::Str(_) => "string",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Str(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(i64::from(v))
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

/// A parameter a checker declares, with its default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSpec {
    pub name: String,
    pub default: ParamValue,
    /// One-line description
    pub usage: String,
}

/// Static description of a checker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckerInfo {
    /// Unique checker name, e.g. "hugeParam"
    pub name: String,
    /// Classification tags, e.g. "style", "performance"
    pub tags: Vec<String>,
    /// One-line description
    pub summary: String,
    /// Example code the checker reports
    pub before: String,
    /// The same example after applying the suggestion
    pub after: String,
    pub params: Vec<ParamSpec>,
}

impl CheckerInfo {
    pub fn new(name: &str, summary: &str) -> Self {
        Self {
            name: name.to_string(),
            tags: Vec::new(),
            summary: summary.to_string(),
            before: String::new(),
            after: String::new(),
            params: Vec::new(),
        }
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn example(mut self, before: &str, after: &str) -> Self {
        self.before = before.to_string();
        self.after = after.to_string();
        self
    }

    /// Declare a parameter with its default value.
    pub fn param(mut self, name: &str, default: impl Into<ParamValue>, usage: &str) -> Self {
        self.params.push(ParamSpec {
            name: name.to_string(),
            default: default.into(),
            usage: usage.to_string(),
        });
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Severity of diagnostics this checker reports.
    pub fn severity(&self) -> Severity {
        Severity::from_tags(&self.tags)
    }

    fn param_spec(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Resolved parameter values of one checker: defaults with overrides
/// applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckerParams {
    values: FxHashMap<String, ParamValue>,
}

impl CheckerParams {
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ParamValue::as_int)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ParamValue::as_bool)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }
}

/// What a factory receives when creating a checker for a run.
pub struct InitContext<'a> {
    pub info: &'a CheckerInfo,
    pub params: &'a CheckerParams,
}

/// Creates a checker instance for one run.
pub type Factory = Box<dyn Fn(&InitContext<'_>) -> Box<dyn Checker> + Send + Sync>;

struct Entry {
    info: Arc<CheckerInfo>,
    factory: Factory,
}

/// Which checkers to enable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enable {
    All,
    Names(Vec<String>),
    Tags(Vec<String>),
}

/// A request for a set of checkers and their parameters.
///
/// The default selection enables nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Union of these sets is enabled
    pub enable: Vec<Enable>,
    /// Checkers removed after enabling
    pub disable: Vec<String>,
    /// Checkers carrying any of these tags are removed after enabling
    pub disable_tags: Vec<String>,
    /// Overrides keyed `checker.param`
    pub params: Vec<(String, ParamValue)>,
}

impl Selection {
    /// Select every registered checker.
    pub fn all() -> Self {
        Self {
            enable: vec![Enable::All],
            ..Self::default()
        }
    }

    pub fn names(names: &[&str]) -> Self {
        Self {
            enable: vec![Enable::Names(names.iter().map(|n| n.to_string()).collect())],
            ..Self::default()
        }
    }

    pub fn tags(tags: &[&str]) -> Self {
        Self {
            enable: vec![Enable::Tags(tags.iter().map(|t| t.to_string()).collect())],
            ..Self::default()
        }
    }

    pub fn disable(mut self, name: &str) -> Self {
        self.disable.push(name.to_string());
        self
    }

    pub fn disable_tag(mut self, tag: &str) -> Self {
        self.disable_tags.push(tag.to_string());
        self
    }

    /// Override a parameter; `key` is `checker.param`.
    pub fn set_param(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }
}

/// A selected checker with its resolved parameters.
#[derive(Debug, Clone)]
pub struct ResolvedChecker {
    pub info: Arc<CheckerInfo>,
    pub params: CheckerParams,
    index: usize,
}

/// Registered checkers, in registration order.
///
/// Shared read-only by any number of concurrent runs once populated.
#[derive(Default)]
pub struct Registry {
    entries: Vec<Entry>,
    index: FxHashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a checker. Names are unique.
    pub fn register<F>(&mut self, info: CheckerInfo, factory: F) -> Result<(), ConfigError>
    where
        F: Fn(&InitContext<'_>) -> Box<dyn Checker> + Send + Sync + 'static,
    {
        if self.index.contains_key(&info.name) {
            return Err(ConfigError::DuplicateChecker { name: info.name });
        }
        tracing::trace!(checker = %info.name, tags = ?info.tags, "registered checker");
        self.index.insert(info.name.clone(), self.entries.len());
        self.entries.push(Entry {
            info: Arc::new(info),
            factory: Box::new(factory),
        });
        Ok(())
    }

    /// Metadata of every checker, in registration order.
    pub fn infos(&self) -> impl Iterator<Item = &CheckerInfo> {
        self.entries.iter().map(|entry| entry.info.as_ref())
    }

    pub fn get(&self, name: &str) -> Option<&CheckerInfo> {
        self.index.get(name).map(|&i| self.entries[i].info.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_tag(&self, tag: &str) -> Result<(), ConfigError> {
        if self.infos().any(|info| info.has_tag(tag)) {
            Ok(())
        } else {
            Err(ConfigError::UnknownTag {
                tag: tag.to_string(),
            })
        }
    }

    fn lookup(&self, name: &str) -> Result<usize, ConfigError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownChecker {
                name: name.to_string(),
            })
    }

    /// Resolve a selection into the checkers to run, in registration order.
    ///
    /// Every name, tag and override is validated, including those that end
    /// up not affecting the result.
    pub fn resolve(&self, selection: &Selection) -> Result<Vec<ResolvedChecker>, ConfigError> {
        let mut enabled = vec![false; self.entries.len()];
        for enable in &selection.enable {
            match enable {
                Enable::All => enabled.iter_mut().for_each(|e| *e = true),
                Enable::Names(names) => {
                    for name in names {
                        enabled[self.lookup(name)?] = true;
                    }
                }
                Enable::Tags(tags) => {
                    for tag in tags {
                        self.check_tag(tag)?;
                        for (i, entry) in self.entries.iter().enumerate() {
                            if entry.info.has_tag(tag) {
                                enabled[i] = true;
                            }
                        }
                    }
                }
            }
        }
        for name in &selection.disable {
            enabled[self.lookup(name)?] = false;
        }
        for tag in &selection.disable_tags {
            self.check_tag(tag)?;
            for (i, entry) in self.entries.iter().enumerate() {
                if entry.info.has_tag(tag) {
                    enabled[i] = false;
                }
            }
        }

        let mut overrides: FxHashMap<usize, Vec<(&str, &ParamValue)>> = FxHashMap::default();
        for (key, value) in &selection.params {
            let (checker, param) = key
                .split_once('.')
                .filter(|(c, p)| !c.is_empty() && !p.is_empty())
                .ok_or_else(|| ConfigError::InvalidOverride { key: key.clone() })?;
            let index = self.lookup(checker)?;
            let info = &self.entries[index].info;
            let spec = info
                .param_spec(param)
                .ok_or_else(|| ConfigError::UnknownParam {
                    checker: checker.to_string(),
                    param: param.to_string(),
                })?;
            if spec.default.type_name() != value.type_name() {
                return Err(ConfigError::ParamType {
                    checker: checker.to_string(),
                    param: param.to_string(),
                    expected: spec.default.type_name(),
                    found: value.type_name(),
                });
            }
            overrides.entry(index).or_default().push((param, value));
        }

        let resolved: Vec<ResolvedChecker> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(i, _)| enabled[*i])
            .map(|(i, entry)| {
                let mut values: FxHashMap<String, ParamValue> = entry
                    .info
                    .params
                    .iter()
                    .map(|p| (p.name.clone(), p.default.clone()))
                    .collect();
                for (param, value) in overrides.get(&i).into_iter().flatten() {
                    values.insert(param.to_string(), (*value).clone());
                }
                ResolvedChecker {
                    info: Arc::clone(&entry.info),
                    params: CheckerParams { values },
                    index: i,
                }
            })
            .collect();
        tracing::debug!(
            selected = resolved.len(),
            registered = self.entries.len(),
            "resolved checker selection"
        );
        Ok(resolved)
    }

    /// Create a fresh instance of a resolved checker.
    pub fn instantiate(&self, checker: &ResolvedChecker) -> Box<dyn Checker> {
        let entry = &self.entries[checker.index];
        let cx = InitContext {
            info: &checker.info,
            params: &checker.params,
        };
        (entry.factory)(&cx)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| &e.info.name))
            .finish()
    }
}
