//! Error types for amendoc library.

use std::io;
use thiserror::Error;

/// Result type alias for amendoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while amending a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No paragraph, text range, or block satisfied the locate criteria.
    #[error("Anchor not found: {pattern}")]
    AnchorNotFound {
        /// Human-readable rendering of the pattern that failed to match
        pattern: String,
    },

    /// A block needed for sentence-level splicing has no usable text.
    #[error("Malformed block: {0}")]
    MalformedBlock(String),

    /// The document model is missing blocks or package parts we rely on.
    #[error("Invalid document structure: {0}")]
    InvalidDocumentStructure(String),

    /// The DOCX package could not be opened or written.
    #[error("DOCX package error: {0}")]
    Docx(String),

    /// The document XML could not be parsed.
    #[error("XML error: {0}")]
    Xml(String),

    /// A regex pattern in a rule failed to compile.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Content refers to a clause name absent from the clause map.
    #[error("Missing clause: {0}")]
    MissingClause(String),

    /// No registered format handles the file extension.
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Rule set or clause configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Short, stable name of the failure kind, used in batch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::AnchorNotFound { .. } => "anchor_not_found",
            Error::MalformedBlock(_) => "malformed_block",
            Error::InvalidDocumentStructure(_) => "invalid_document_structure",
            Error::Docx(_) => "docx",
            Error::Xml(_) => "xml",
            Error::InvalidPattern(_) => "invalid_pattern",
            Error::MissingClause(_) => "missing_clause",
            Error::UnsupportedFormat(_) => "unsupported_format",
            Error::Config(_) => "config",
        }
    }

    /// Build an [`Error::AnchorNotFound`] from anything displayable.
    pub fn anchor_not_found(pattern: impl std::fmt::Display) -> Self {
        Error::AnchorNotFound {
            pattern: pattern.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Docx(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::anchor_not_found("exact \"Definitions.\"");
        assert_eq!(
            err.to_string(),
            "Anchor not found: exact \"Definitions.\""
        );

        let err = Error::MissingClause("liability".into());
        assert_eq!(err.to_string(), "Missing clause: liability");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(Error::anchor_not_found("x").kind(), "anchor_not_found");
        assert_eq!(Error::MalformedBlock("x".into()).kind(), "malformed_block");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Config(_)));
    }
}
