//! # amendoc
//!
//! Rule-driven amendment of word-processing documents.
//!
//! This library locates anchors in a document (a paragraph, a phrase, a
//! heading), applies structured edits at them (insert, replace, renumber,
//! splice a sentence), styles the new text like its surroundings, and writes
//! the amended document back out.
//!
//! ## Quick Start
//!
//! ```no_run
//! use amendoc::{amend_contracts, Clauses};
//!
//! fn main() -> amendoc::Result<()> {
//!     let clauses = Clauses::new()
//!         .with("default", "Standard legal clause text...")
//!         .with("liability", "Liability clause text...");
//!
//!     let outputs = amend_contracts(
//!         &["contracts/contract1.docx", "contracts/contract2.docx"],
//!         &clauses,
//!     )?;
//!     println!("{:?}", outputs);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Anchor location**: phrase sets, whitespace-insensitive literals,
//!   heading prefixes and regexes, mapped back to the original text
//! - **Contextual styling**: inserted blocks copy font, size, spacing and
//!   alignment from their neighbours
//! - **Rule sets**: per-document edit scripts, loadable from JSON
//! - **Batch processing**: per-document failure isolation and a JSON report
//! - **DOCX and plain text** input and output

pub mod batch;
pub mod clauses;
pub mod error;
pub mod format;
pub mod locate;
pub mod model;
pub mod observe;
pub mod rules;
pub mod style;
pub mod transform;

// Re-export commonly used types
pub use batch::{Batch, BatchOptions, BatchReport, DocumentFailure, DocumentOutcome, FailurePolicy};
pub use clauses::Clauses;
pub use error::{Error, Result};
pub use format::{DocumentFormat, DocxFormat, FormatRegistry, TextFormat};
pub use locate::{locate, Anchor, PatternSpec, TextView};
pub use model::{
    Alignment, Block, BlockStyle, Document, Emphasis, Metadata, Run, Spacing, TextStyle,
};
pub use observe::{LogObserver, NoopObserver, PipelineEvent, PipelineObserver, Severity};
pub use rules::{FileMatcher, RuleRegistry, RuleSet, RuleStep};
pub use style::{resolve_contextual, resolve_default, StyleProfile};
pub use transform::{Content, Engine, EngineOptions, Relabel, Segment, TextLayout, TransformRule};

use std::path::{Path, PathBuf};

/// Read a document, choosing the format by file extension.
///
/// # Example
///
/// ```no_run
/// use amendoc::read_document;
///
/// let doc = read_document("contracts/contract1.docx").unwrap();
/// println!("Blocks: {}", doc.block_count());
/// ```
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<Document> {
    FormatRegistry::with_defaults().read(path.as_ref())
}

/// Write a document, choosing the format by file extension.
///
/// Formatting the document leaves unset is filled from its default style.
pub fn write_document<P: AsRef<Path>>(doc: &Document, path: P) -> Result<()> {
    FormatRegistry::with_defaults().write(doc, &resolve_default(doc), path.as_ref())
}

/// Extract plain text from a document, blocks separated by a blank line.
///
/// # Example
///
/// ```no_run
/// use amendoc::extract_text;
///
/// let text = extract_text("contracts/contract2.docx").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    FormatRegistry::with_defaults().extract_text(path.as_ref())
}

/// Locate `pattern` in a document file.
///
/// Returns the anchor and the text of the block it falls in.
pub fn locate_in_file<P: AsRef<Path>>(path: P, pattern: &PatternSpec) -> Result<(Anchor, String)> {
    let doc = read_document(path)?;
    let view = TextView::of(&doc);
    let anchor = locate(&view, pattern)?;
    let text = view.block_text(anchor.block).unwrap_or_default().to_string();
    Ok((anchor, text))
}

/// Amend documents with the built-in contract rule sets.
///
/// Outputs go to `amended/`. Stops at the first failed document and
/// returns its error; otherwise returns the output paths in input order.
pub fn amend_contracts<P: AsRef<Path>>(paths: &[P], clauses: &Clauses) -> Result<Vec<PathBuf>> {
    Amendoc::new().abort_on_first().run(paths, clauses)?.into_result()
}

/// Builder for batch amendment runs.
///
/// # Example
///
/// ```no_run
/// use amendoc::{Amendoc, Clauses, RuleRegistry};
///
/// let report = Amendoc::new()
///     .with_rules(RuleRegistry::from_json_file("rules.json")?)
///     .with_output_dir("out")
///     .run(&["a.docx", "b.docx"], &Clauses::new())?;
/// println!("{} amended, {} failed", report.succeeded(), report.failed());
/// # Ok::<(), amendoc::Error>(())
/// ```
pub struct Amendoc {
    rules: RuleRegistry,
    options: BatchOptions,
}

impl Amendoc {
    /// Create a builder with the contract presets.
    pub fn new() -> Self {
        Self {
            rules: RuleRegistry::with_defaults(),
            options: BatchOptions::default(),
        }
    }

    /// Use these rule sets instead of the presets.
    pub fn with_rules(mut self, rules: RuleRegistry) -> Self {
        self.rules = rules;
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.options = self.options.with_output_dir(dir);
        self
    }

    /// Stop at the first failed document.
    pub fn abort_on_first(mut self) -> Self {
        self.options = self.options.abort_on_first();
        self
    }

    /// Set the replace-range layout.
    pub fn with_text_layout(mut self, layout: TextLayout) -> Self {
        self.options = self.options.with_text_layout(layout);
        self
    }

    /// Build the batch.
    pub fn build(self) -> Batch {
        Batch::new(self.rules).with_options(self.options)
    }

    /// Run the batch.
    pub fn run<P: AsRef<Path>>(self, paths: &[P], clauses: &Clauses) -> Result<BatchReport> {
        self.build().run(paths, clauses)
    }
}

impl Default for Amendoc {
    fn default() -> Self {
        Self::new()
    }
}
