//! DOCX (Office Open XML) format.
//!
//! Reads paragraphs, runs and the formatting the pipeline carries
//! (font, size, bold, italic, underline, spacing, alignment) from
//! `word/document.xml`, plus core properties from `docProps/core.xml`.
//! Writes a minimal package with the same parts.

mod reader;
mod writer;

use super::DocumentFormat;
use crate::error::Result;
use crate::model::Document;
use crate::style::StyleProfile;

pub(crate) const DOCUMENT_PART: &str = "word/document.xml";
pub(crate) const CORE_PART: &str = "docProps/core.xml";

/// DOCX reader and writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxFormat;

impl DocxFormat {
    /// Create the format.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentFormat for DocxFormat {
    fn extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn read_bytes(&self, bytes: &[u8]) -> Result<Document> {
        reader::read_package(bytes)
    }

    fn to_bytes(&self, doc: &Document, profile: &StyleProfile) -> Result<Vec<u8>> {
        writer::write_package(doc, profile)
    }
}
