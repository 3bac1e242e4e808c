//! Batch orchestration: classify, amend and write a list of documents.
//!
//! Documents are processed one at a time, in input order. Each document is
//! read, matched to a rule set, transformed and written to the output
//! directory under its own file name. Documents no rule set accepts are
//! copied unchanged. An input whose output file name was already written
//! earlier in the batch fails with [`Error::Config`] instead of overwriting
//! it.
//!
//! # Example
//!
//! ```no_run
//! use amendoc::batch::{Batch, BatchOptions};
//! use amendoc::Clauses;
//!
//! fn main() -> amendoc::Result<()> {
//!     let clauses = Clauses::new().with("liability", "Liability clause text...");
//!     let batch = Batch::with_defaults().with_options(BatchOptions::new().with_output_dir("out"));
//!
//!     let report = batch.run(&["contracts/contract1.docx", "contracts/contract2.docx"], &clauses)?;
//!     for outcome in &report.outcomes {
//!         println!("{} -> {:?}", outcome.input.display(), outcome.output);
//!     }
//!     Ok(())
//! }
//! ```

mod options;
mod report;

pub use options::{BatchOptions, FailurePolicy, DEFAULT_OUTPUT_DIR};
pub use report::{BatchReport, DocumentFailure, DocumentOutcome};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::clauses::Clauses;
use crate::error::{Error, Result};
use crate::format::FormatRegistry;
use crate::model::Metadata;
use crate::observe::{LogObserver, PipelineEvent, PipelineObserver};
use crate::rules::{RuleRegistry, RuleSet};
use crate::style::resolve_default;
use crate::transform::Engine;

/// Batch orchestrator.
pub struct Batch {
    rules: RuleRegistry,
    formats: FormatRegistry,
    options: BatchOptions,
}

impl Batch {
    /// Create a batch with the given rule sets and default formats.
    pub fn new(rules: RuleRegistry) -> Self {
        Self {
            rules,
            formats: FormatRegistry::with_defaults(),
            options: BatchOptions::default(),
        }
    }

    /// Create a batch with the contract presets.
    pub fn with_defaults() -> Self {
        Self::new(RuleRegistry::with_defaults())
    }

    /// Set batch options.
    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the format registry.
    pub fn with_formats(mut self, formats: FormatRegistry) -> Self {
        self.formats = formats;
        self
    }

    /// Batch options.
    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Rule sets used for classification.
    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    /// Process `paths`, logging events through [`LogObserver`].
    ///
    /// Fails only when the output directory cannot be created; document
    /// failures are reported per document.
    pub fn run<P: AsRef<Path>>(&self, paths: &[P], clauses: &Clauses) -> Result<BatchReport> {
        self.run_with_observer(paths, clauses, &mut LogObserver)
    }

    /// Process `paths`, reporting events to `observer`.
    pub fn run_with_observer<P: AsRef<Path>>(
        &self,
        paths: &[P],
        clauses: &Clauses,
        observer: &mut dyn PipelineObserver,
    ) -> Result<BatchReport> {
        std::fs::create_dir_all(&self.options.output_dir)?;
        observer.on_event(&PipelineEvent::BatchStarted {
            documents: paths.len(),
            output_dir: &self.options.output_dir,
        });

        let mut report = BatchReport::new();
        let mut written = HashSet::new();
        for path in paths {
            let path = path.as_ref();
            let rule_set = self.rules.classify(path);
            let result = self.process_document(path, rule_set, &written, clauses, observer);
            if let Ok(output) = &result {
                written.insert(output.clone());
            }
            if !self.record(&mut report, path, rule_set, result, observer) {
                break;
            }
        }

        self.finish(&report, observer);
        Ok(report)
    }

    /// Process `paths` with asynchronous file I/O.
    ///
    /// Each document's read, transform and write complete before the next
    /// document starts.
    #[cfg(feature = "async")]
    pub async fn run_async<P: AsRef<Path>>(
        &self,
        paths: &[P],
        clauses: &Clauses,
    ) -> Result<BatchReport> {
        self.run_async_with_observer(paths, clauses, &mut LogObserver)
            .await
    }

    /// Asynchronous [`Batch::run_with_observer`].
    #[cfg(feature = "async")]
    pub async fn run_async_with_observer<P: AsRef<Path>>(
        &self,
        paths: &[P],
        clauses: &Clauses,
        observer: &mut dyn PipelineObserver,
    ) -> Result<BatchReport> {
        tokio::fs::create_dir_all(&self.options.output_dir).await?;
        observer.on_event(&PipelineEvent::BatchStarted {
            documents: paths.len(),
            output_dir: &self.options.output_dir,
        });

        let mut report = BatchReport::new();
        let mut written = HashSet::new();
        for path in paths {
            let path = path.as_ref();
            let rule_set = self.rules.classify(path);
            let result = self
                .process_document_async(path, rule_set, &written, clauses, observer)
                .await;
            if let Ok(output) = &result {
                written.insert(output.clone());
            }
            if !self.record(&mut report, path, rule_set, result, observer) {
                break;
            }
        }

        self.finish(&report, observer);
        Ok(report)
    }

    /// Read, amend and write one document. Returns the output path.
    fn process_document(
        &self,
        path: &Path,
        rule_set: Option<&RuleSet>,
        written: &HashSet<PathBuf>,
        clauses: &Clauses,
        observer: &mut dyn PipelineObserver,
    ) -> Result<PathBuf> {
        observer.on_event(&PipelineEvent::DocumentStarted { path });
        let output = self.output_path(path)?;
        if written.contains(&output) {
            return Err(duplicate_output_error(path, &output));
        }
        if output.exists() && std::fs::canonicalize(path)? == std::fs::canonicalize(&output)? {
            return Err(overwrite_error(path));
        }

        match rule_set {
            None => {
                observer.on_event(&PipelineEvent::Unclassified { path });
                std::fs::copy(path, &output)?;
            }
            Some(rule_set) => {
                observer.on_event(&PipelineEvent::Classified {
                    path,
                    rule_set: &rule_set.name,
                });
                let bytes = std::fs::read(path)?;
                let amended = self.amend_bytes(path, &bytes, rule_set, clauses, observer)?;
                std::fs::write(&output, amended)?;
            }
        }

        Ok(output)
    }

    #[cfg(feature = "async")]
    async fn process_document_async(
        &self,
        path: &Path,
        rule_set: Option<&RuleSet>,
        written: &HashSet<PathBuf>,
        clauses: &Clauses,
        observer: &mut dyn PipelineObserver,
    ) -> Result<PathBuf> {
        observer.on_event(&PipelineEvent::DocumentStarted { path });
        let output = self.output_path(path)?;
        if written.contains(&output) {
            return Err(duplicate_output_error(path, &output));
        }
        if tokio::fs::try_exists(&output).await?
            && tokio::fs::canonicalize(path).await? == tokio::fs::canonicalize(&output).await?
        {
            return Err(overwrite_error(path));
        }

        match rule_set {
            None => {
                observer.on_event(&PipelineEvent::Unclassified { path });
                tokio::fs::copy(path, &output).await?;
            }
            Some(rule_set) => {
                observer.on_event(&PipelineEvent::Classified {
                    path,
                    rule_set: &rule_set.name,
                });
                let bytes = tokio::fs::read(path).await?;
                let amended = self.amend_bytes(path, &bytes, rule_set, clauses, observer)?;
                tokio::fs::write(&output, amended).await?;
            }
        }

        Ok(output)
    }

    /// Transform a document's bytes with `rule_set`.
    ///
    /// The format is chosen by the extension of `path`.
    pub fn amend_bytes(
        &self,
        path: &Path,
        bytes: &[u8],
        rule_set: &RuleSet,
        clauses: &Clauses,
        observer: &mut dyn PipelineObserver,
    ) -> Result<Vec<u8>> {
        let format = self.formats.for_path(path)?;
        let doc = format.read_bytes(bytes)?;

        let engine = Engine::with_options(clauses, self.options.engine.clone());
        let mut amended = engine.execute(&doc, &rule_set.steps, observer)?;
        amended.metadata = Metadata::amended(&doc.metadata);

        format.to_bytes(&amended, &resolve_default(&doc))
    }

    /// Output path for an input: same file name, inside the output directory.
    pub fn output_path(&self, input: &Path) -> Result<PathBuf> {
        let name = input.file_name().ok_or_else(|| {
            Error::Config(format!("{} has no file name", input.display()))
        })?;
        Ok(self.options.output_dir.join(name))
    }

    /// Record an outcome. Returns `false` when the batch must stop.
    fn record(
        &self,
        report: &mut BatchReport,
        path: &Path,
        rule_set: Option<&RuleSet>,
        result: Result<PathBuf>,
        observer: &mut dyn PipelineObserver,
    ) -> bool {
        let name = rule_set.map(|r| r.name.clone());
        match result {
            Ok(output) => {
                observer.on_event(&PipelineEvent::DocumentWritten {
                    path,
                    output: &output,
                });
                report.push(DocumentOutcome::written(path, output, name));
                true
            }
            Err(error) => {
                observer.on_event(&PipelineEvent::DocumentFailed {
                    path,
                    error: &error,
                });
                report.push(DocumentOutcome::failed(path, name, error));
                self.options.failure_policy == FailurePolicy::Isolate
            }
        }
    }

    fn finish(&self, report: &BatchReport, observer: &mut dyn PipelineObserver) {
        observer.on_event(&PipelineEvent::BatchFinished {
            succeeded: report.succeeded(),
            failed: report.failed(),
        });
    }
}

impl Default for Batch {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn overwrite_error(path: &Path) -> Error {
    Error::Config(format!(
        "output for {} would overwrite the input",
        path.display()
    ))
}

fn duplicate_output_error(path: &Path, output: &Path) -> Error {
    Error::Config(format!(
        "output {} for {} was already written by an earlier input",
        output.display(),
        path.display()
    ))
}
