//! Batch options.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::transform::{EngineOptions, TextLayout};

/// Directory amended documents are written to by default.
pub const DEFAULT_OUTPUT_DIR: &str = "amended";

/// What the batch does after a document fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and continue with the next document
    #[default]
    Isolate,

    /// Stop the batch at the first failure
    AbortOnFirst,
}

/// Options for a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Output directory, created before the first document
    pub output_dir: PathBuf,

    /// Failure handling
    pub failure_policy: FailurePolicy,

    /// Transform engine options
    pub engine: EngineOptions,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            failure_policy: FailurePolicy::default(),
            engine: EngineOptions::default(),
        }
    }
}

impl BatchOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Stop at the first failed document.
    pub fn abort_on_first(self) -> Self {
        self.with_failure_policy(FailurePolicy::AbortOnFirst)
    }

    /// Set the replace-range layout.
    pub fn with_text_layout(mut self, layout: TextLayout) -> Self {
        self.engine = self.engine.with_text_layout(layout);
        self
    }

    /// Set all engine options.
    pub fn with_engine_options(mut self, engine: EngineOptions) -> Self {
        self.engine = engine;
        self
    }
}
