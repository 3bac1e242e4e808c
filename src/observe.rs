//! Diagnostic events emitted by the amendment pipeline.
//!
//! The pipeline never logs directly from its control flow; it reports
//! [`PipelineEvent`]s to an injected [`PipelineObserver`]. The default
//! [`LogObserver`] forwards them to the `log` facade.
//!
//! # Example
//!
//! ```
//! use amendoc::observe::{PipelineEvent, PipelineObserver, Severity};
//!
//! #[derive(Default)]
//! struct CountFailures(usize);
//!
//! impl PipelineObserver for CountFailures {
//!     fn on_event(&mut self, event: &PipelineEvent<'_>) {
//!         if event.severity() == Severity::Error {
//!             self.0 += 1;
//!         }
//!     }
//! }
//! ```

use std::fmt;
use std::path::Path;

use crate::error::Error;
use crate::locate::{Anchor, PatternSpec};

/// Severity of a pipeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Step-level detail
    Debug,
    /// Document-level progress
    Info,
    /// Something was skipped
    Warn,
    /// A document failed
    Error,
}

impl From<Severity> for log::Level {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Debug => log::Level::Debug,
            Severity::Info => log::Level::Info,
            Severity::Warn => log::Level::Warn,
            Severity::Error => log::Level::Error,
        }
    }
}

/// A structured pipeline event.
#[derive(Debug, Clone, Copy)]
pub enum PipelineEvent<'a> {
    /// A batch is about to process documents.
    BatchStarted {
        /// Number of input documents
        documents: usize,
        /// Output directory
        output_dir: &'a Path,
    },

    /// A document is about to be read.
    DocumentStarted {
        /// Input path
        path: &'a Path,
    },

    /// A rule set was chosen for the document.
    Classified {
        /// Input path
        path: &'a Path,
        /// Rule set name
        rule_set: &'a str,
    },

    /// No rule set accepts the document; it is copied unchanged.
    Unclassified {
        /// Input path
        path: &'a Path,
    },

    /// An anchor was located.
    AnchorLocated {
        /// Pattern that matched
        pattern: &'a PatternSpec,
        /// Resulting anchor
        anchor: &'a Anchor,
    },

    /// A rule was applied.
    RuleApplied {
        /// Rule operation name
        op: &'static str,
        /// Block count before the rule
        blocks_before: usize,
        /// Block count after the rule
        blocks_after: usize,
    },

    /// The amended document was written.
    DocumentWritten {
        /// Input path
        path: &'a Path,
        /// Output path
        output: &'a Path,
    },

    /// A document failed.
    DocumentFailed {
        /// Input path
        path: &'a Path,
        /// The failure
        error: &'a Error,
    },

    /// The batch finished.
    BatchFinished {
        /// Documents written
        succeeded: usize,
        /// Documents that failed
        failed: usize,
    },
}

impl PipelineEvent<'_> {
    /// Severity of the event.
    pub fn severity(&self) -> Severity {
        match self {
            PipelineEvent::AnchorLocated { .. } | PipelineEvent::RuleApplied { .. } => {
                Severity::Debug
            }
            PipelineEvent::Unclassified { .. } => Severity::Warn,
            PipelineEvent::DocumentFailed { .. } => Severity::Error,
            PipelineEvent::BatchFinished { failed, .. } if *failed > 0 => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for PipelineEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineEvent::BatchStarted {
                documents,
                output_dir,
            } => write!(
                f,
                "processing {} document(s) into {}",
                documents,
                output_dir.display()
            ),
            PipelineEvent::DocumentStarted { path } => write!(f, "reading {}", path.display()),
            PipelineEvent::Classified { path, rule_set } => {
                write!(f, "{}: using rule set {}", path.display(), rule_set)
            }
            PipelineEvent::Unclassified { path } => write!(
                f,
                "{}: no rule set matches, copying unchanged",
                path.display()
            ),
            PipelineEvent::AnchorLocated { pattern, anchor } => write!(
                f,
                "located {} at block {} (bytes {}..{})",
                pattern, anchor.block, anchor.span.start, anchor.span.end
            ),
            PipelineEvent::RuleApplied {
                op,
                blocks_before,
                blocks_after,
            } => write!(f, "applied {} ({} -> {} blocks)", op, blocks_before, blocks_after),
            PipelineEvent::DocumentWritten { path, output } => {
                write!(f, "{} -> {}", path.display(), output.display())
            }
            PipelineEvent::DocumentFailed { path, error } => {
                write!(f, "{}: {} ({})", path.display(), error, error.kind())
            }
            PipelineEvent::BatchFinished { succeeded, failed } => {
                write!(f, "done: {} amended, {} failed", succeeded, failed)
            }
        }
    }
}

/// Receiver of pipeline events.
pub trait PipelineObserver {
    /// Called for every event. Does nothing by default.
    fn on_event(&mut self, event: &PipelineEvent<'_>) {
        let _ = event;
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Observer that forwards events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn on_event(&mut self, event: &PipelineEvent<'_>) {
        log::log!(target: "amendoc", event.severity().into(), "{}", event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        let path = Path::new("contract1.docx");
        assert_eq!(
            PipelineEvent::DocumentStarted { path }.severity(),
            Severity::Info
        );
        assert_eq!(PipelineEvent::Unclassified { path }.severity(), Severity::Warn);
        let error = Error::anchor_not_found("x");
        assert_eq!(
            PipelineEvent::DocumentFailed { path, error: &error }.severity(),
            Severity::Error
        );
        assert_eq!(
            PipelineEvent::BatchFinished {
                succeeded: 2,
                failed: 1
            }
            .severity(),
            Severity::Warn
        );
        assert_eq!(log::Level::from(Severity::Debug), log::Level::Debug);
    }

    #[test]
    fn test_event_display_has_context() {
        let path = Path::new("contracts/contract2.docx");
        let error = Error::anchor_not_found("paragraph containing all of [\"as is\"]");
        let line = PipelineEvent::DocumentFailed { path, error: &error }.to_string();
        assert!(line.contains("contract2.docx"));
        assert!(line.contains("anchor_not_found"));
        assert!(line.contains("as is"));
    }

    #[test]
    fn test_default_observers_accept_events() {
        let event = PipelineEvent::BatchFinished {
            succeeded: 1,
            failed: 0,
        };
        NoopObserver.on_event(&event);
        LogObserver.on_event(&event);
    }
}
