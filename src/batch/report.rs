//! Per-document results of a batch run.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// Why a document failed.
#[derive(Debug, Serialize)]
pub struct DocumentFailure {
    /// Input path
    pub path: PathBuf,

    /// Failure kind, see [`Error::kind`]
    pub kind: &'static str,

    /// Human-readable message
    pub message: String,

    /// Pattern that failed to match, for anchor failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip)]
    source: Error,
}

impl DocumentFailure {
    /// Wrap an error raised while processing `path`.
    pub fn new(path: &Path, error: Error) -> Self {
        let pattern = match &error {
            Error::AnchorNotFound { pattern } => Some(pattern.clone()),
            _ => None,
        };
        Self {
            path: path.to_path_buf(),
            kind: error.kind(),
            message: error.to_string(),
            pattern,
            source: error,
        }
    }

    /// The underlying error.
    pub fn error(&self) -> &Error {
        &self.source
    }

    /// Take the underlying error.
    pub fn into_error(self) -> Error {
        self.source
    }
}

/// Result for one input document.
#[derive(Debug, Serialize)]
pub struct DocumentOutcome {
    /// Input path
    pub input: PathBuf,

    /// Written output, if the document succeeded
    pub output: Option<PathBuf>,

    /// Rule set applied; `None` when the document was copied unchanged
    pub rule_set: Option<String>,

    /// Failure, if the document failed
    pub error: Option<DocumentFailure>,
}

impl DocumentOutcome {
    /// Successful outcome.
    pub fn written(input: &Path, output: PathBuf, rule_set: Option<String>) -> Self {
        Self {
            input: input.to_path_buf(),
            output: Some(output),
            rule_set,
            error: None,
        }
    }

    /// Failed outcome.
    pub fn failed(input: &Path, rule_set: Option<String>, error: Error) -> Self {
        Self {
            input: input.to_path_buf(),
            output: None,
            rule_set,
            error: Some(DocumentFailure::new(input, error)),
        }
    }

    /// Check if the document was written.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Ordered outcomes of a batch run.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    /// Outcomes in input order
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an outcome.
    pub fn push(&mut self, outcome: DocumentOutcome) {
        self.outcomes.push(outcome);
    }

    /// Number of documents written.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of documents that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Check if every document was written.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(DocumentOutcome::is_success)
    }

    /// Written outputs, in input order.
    pub fn outputs(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter_map(|o| o.output.as_deref())
            .collect()
    }

    /// Failures, in input order.
    pub fn failures(&self) -> impl Iterator<Item = &DocumentFailure> {
        self.outcomes.iter().filter_map(|o| o.error.as_ref())
    }

    /// Ordered output paths, or the first failure.
    pub fn into_result(self) -> Result<Vec<PathBuf>> {
        let mut outputs = Vec::with_capacity(self.outcomes.len());
        for outcome in self.outcomes {
            if let Some(failure) = outcome.error {
                return Err(failure.into_error());
            }
            outputs.extend(outcome.output);
        }
        Ok(outputs)
    }

    /// Serialize the report as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> BatchReport {
        let mut report = BatchReport::new();
        report.push(DocumentOutcome::written(
            Path::new("contracts/contract1.docx"),
            PathBuf::from("amended/contract1.docx"),
            Some("contract1".into()),
        ));
        report.push(DocumentOutcome::failed(
            Path::new("contracts/contract2.docx"),
            Some("contract2".into()),
            Error::anchor_not_found("paragraph containing all of [\"as is\"]"),
        ));
        report.push(DocumentOutcome::written(
            Path::new("contracts/notes.docx"),
            PathBuf::from("amended/notes.docx"),
            None,
        ));
        report
    }

    #[test]
    fn test_counts_and_outputs() {
        let report = report();
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
        assert_eq!(
            report.outputs(),
            vec![Path::new("amended/contract1.docx"), Path::new("amended/notes.docx")]
        );

        let failure = report.failures().next().unwrap();
        assert_eq!(failure.kind, "anchor_not_found");
        assert!(failure.pattern.as_deref().unwrap().contains("as is"));
        assert!(matches!(failure.error(), Error::AnchorNotFound { .. }));
    }

    #[test]
    fn test_into_result_returns_first_failure() {
        let result = report().into_result();
        assert!(matches!(result, Err(Error::AnchorNotFound { .. })));

        let mut ok = BatchReport::new();
        ok.push(DocumentOutcome::written(
            Path::new("a.docx"),
            PathBuf::from("amended/a.docx"),
            None,
        ));
        assert_eq!(ok.into_result().unwrap(), vec![PathBuf::from("amended/a.docx")]);
    }

    #[test]
    fn test_report_json() {
        let json = report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let outcomes = value["outcomes"].as_array().unwrap();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[1]["error"]["kind"], "anchor_not_found");
        assert!(outcomes[1]["output"].is_null());
        assert!(outcomes[2]["rule_set"].is_null());
    }
}
