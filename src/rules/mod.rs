//! Rule sets and per-document classification.
//!
//! A [`RuleSet`] bundles the ordered steps applied to one class of
//! document, and a [`FileMatcher`] decides which documents belong to it.
//! The [`RuleRegistry`] picks the rule set for each input path.
//!
//! # Example
//!
//! ```
//! use amendoc::rules::RuleRegistry;
//! use std::path::Path;
//!
//! let registry = RuleRegistry::with_defaults();
//! let rule_set = registry.classify(Path::new("contracts/contract3.docx")).unwrap();
//! assert_eq!(rule_set.name, "contract3");
//! assert!(registry.classify(Path::new("notes.docx")).is_none());
//! ```

pub mod presets;
mod registry;

pub use registry::RuleRegistry;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::locate::PatternSpec;
use crate::transform::TransformRule;

/// Decides whether a rule set applies to an input path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileMatcher {
    /// File name contains the substring
    NameContains(String),

    /// File extension equals the value (case-insensitive, no dot)
    Extension(String),

    /// Every file
    #[default]
    Any,
}

impl FileMatcher {
    /// Match on a file name substring.
    pub fn name_contains(needle: impl Into<String>) -> Self {
        FileMatcher::NameContains(needle.into())
    }

    /// Match on a file extension.
    pub fn extension(ext: impl Into<String>) -> Self {
        FileMatcher::Extension(ext.into())
    }

    /// Check a path.
    pub fn matches(&self, path: &Path) -> bool {
        match self {
            FileMatcher::NameContains(needle) => path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.contains(needle.as_str())),
            FileMatcher::Extension(ext) => path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ext.trim_start_matches('.'))),
            FileMatcher::Any => true,
        }
    }
}

/// One step of a rule set: where to apply, and what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleStep {
    /// Pattern located before the rule runs; `None` for rules that need
    /// no anchor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<PatternSpec>,

    /// The edit
    pub rule: TransformRule,
}

impl RuleStep {
    /// Step applied at the anchor `pattern` locates.
    pub fn new(pattern: PatternSpec, rule: TransformRule) -> Self {
        Self {
            pattern: Some(pattern),
            rule,
        }
    }

    /// Step without an anchor.
    pub fn unanchored(rule: TransformRule) -> Self {
        Self {
            pattern: None,
            rule,
        }
    }
}

/// Ordered steps for one class of documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Rule set name, reported per document
    pub name: String,

    /// Which documents the rule set accepts
    #[serde(default)]
    pub matcher: FileMatcher,

    /// Steps, applied in order
    pub steps: Vec<RuleStep>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new(name: impl Into<String>, matcher: FileMatcher) -> Self {
        Self {
            name: name.into(),
            matcher,
            steps: Vec::new(),
        }
    }

    /// Add a step.
    pub fn step(mut self, step: RuleStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Same steps, different matcher.
    pub fn with_matcher(mut self, matcher: FileMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Check whether the rule set accepts `path`.
    pub fn accepts(&self, path: &Path) -> bool {
        self.matcher.matches(path)
    }
}
