//! Plain text format.

use super::DocumentFormat;
use crate::error::{Error, Result};
use crate::model::Document;
use crate::style::StyleProfile;

/// UTF-8 text, one block per blank-line separated paragraph.
///
/// Formatting is dropped on write.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormat;

impl TextFormat {
    /// Create the format.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentFormat for TextFormat {
    fn extensions(&self) -> &[&str] {
        &["txt", "text"]
    }

    fn name(&self) -> &str {
        "text"
    }

    fn read_bytes(&self, bytes: &[u8]) -> Result<Document> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| Error::InvalidDocumentStructure(format!("text is not UTF-8: {}", e)))?;
        Ok(Document::from_text(text))
    }

    fn to_bytes(&self, doc: &Document, _profile: &StyleProfile) -> Result<Vec<u8>> {
        let mut text = doc.plain_text();
        if !text.is_empty() {
            text.push('\n');
        }
        Ok(text.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_round_trip() {
        let format = TextFormat::new();
        let doc = format.read_bytes(b"Intro.\r\n\r\nDefinitions.\nTerms.\n\n").unwrap();
        assert_eq!(doc.block_count(), 2);
        assert_eq!(doc.blocks[1].text(), "Definitions.\nTerms.");

        let bytes = format.to_bytes(&doc, &StyleProfile::fallback()).unwrap();
        assert_eq!(bytes, b"Intro.\n\nDefinitions.\nTerms.\n");
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(
            TextFormat::new().read_bytes(&[0xff, 0xfe]),
            Err(Error::InvalidDocumentStructure(_))
        ));
    }
}
