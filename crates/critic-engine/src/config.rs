//! Run configuration: which checkers to enable and how to set them up.
//!
//! Loading the configuration from disk is the host's job; this is the
//! deserialized form.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::registry::{Enable, ParamValue, Selection};

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Checker names to enable; `"all"` enables every checker.
    pub enable: Vec<String>,
    /// Enable every checker carrying one of these tags.
    pub enable_tags: Vec<String>,
    /// Checker names to disable after enabling.
    pub disable: Vec<String>,
    /// Disable every checker carrying one of these tags.
    pub disable_tags: Vec<String>,
    /// Parameter overrides keyed `checker.param`.
    pub params: BTreeMap<String, ParamValue>,
    /// Report nothing for files carrying a generated-code marker.
    pub skip_generated: bool,
    /// Report nothing for test files.
    pub skip_tests: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            enable: Vec::new(),
            enable_tags: Vec::new(),
            disable: Vec::new(),
            disable_tags: Vec::new(),
            params: BTreeMap::new(),
            skip_generated: true,
            skip_tests: false,
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The checker selection this configuration describes.
    pub fn to_selection(&self) -> Selection {
        let mut enable = Vec::new();
        if self.enable.iter().any(|name| name == "all") {
            enable.push(Enable::All);
        }
        // Names listed next to "all" are still validated.
        let names: Vec<String> = self
            .enable
            .iter()
            .filter(|name| name.as_str() != "all")
            .cloned()
            .collect();
        if !names.is_empty() {
            enable.push(Enable::Names(names));
        }
        if !self.enable_tags.is_empty() {
            enable.push(Enable::Tags(self.enable_tags.clone()));
        }
        Selection {
            enable,
            disable: self.disable.clone(),
            disable_tags: self.disable_tags.clone(),
            params: self
                .params
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }
}
