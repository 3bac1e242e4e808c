//! Document-level types.

use super::Block;
use crate::locate::split_paragraphs;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Separator placed between block texts in the plain-text projection.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// A word-processing document as an ordered sequence of blocks.
///
/// Documents are treated as values: transforms never modify a document in
/// place, they return a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, creator, etc.)
    #[serde(default)]
    pub metadata: Metadata,

    /// Blocks (paragraphs) in document order
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from blocks.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self {
            metadata: Metadata::default(),
            blocks,
        }
    }

    /// Build a document from extracted plain text.
    ///
    /// Each blank-line separated paragraph becomes one unstyled block.
    pub fn from_text(text: &str) -> Self {
        let blocks = split_paragraphs(text)
            .into_iter()
            .map(|range| Block::with_text(&text[range]))
            .collect();
        Self::from_blocks(blocks)
    }

    /// Same metadata, different blocks.
    pub fn with_blocks(&self, blocks: Vec<Block>) -> Self {
        Self {
            metadata: self.metadata.clone(),
            blocks,
        }
    }

    /// Get the number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Get a block by index (0-indexed).
    pub fn get_block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Check if the document has any blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.text())
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR)
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub creator: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Metadata stamped on documents produced by the amendment pipeline.
    pub fn amended(previous: &Metadata) -> Self {
        Self {
            title: previous.title.clone().or_else(|| Some("Contract".to_string())),
            creator: Some("Document Service".to_string()),
            subject: previous.subject.clone(),
            created: previous.created,
            modified: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.block_count(), 0);
        assert_eq!(doc.plain_text(), "");
    }

    #[test]
    fn test_from_text_splits_on_blank_lines() {
        let doc = Document::from_text("Intro.\n\nDefinitions.\nA term means X.\n\n\nClosing.");
        assert_eq!(doc.block_count(), 3);
        assert_eq!(doc.blocks[1].text(), "Definitions.\nA term means X.");
        assert_eq!(doc.blocks[2].text(), "Closing.");
    }

    #[test]
    fn test_plain_text_joins_blocks() {
        let doc = Document::from_blocks(vec![Block::with_text("One"), Block::with_text("Two")]);
        assert_eq!(doc.plain_text(), "One\n\nTwo");
    }

    #[test]
    fn test_amended_metadata_keeps_title() {
        let previous = Metadata {
            title: Some("NDA".to_string()),
            ..Default::default()
        };
        let amended = Metadata::amended(&previous);
        assert_eq!(amended.title.as_deref(), Some("NDA"));
        assert_eq!(amended.creator.as_deref(), Some("Document Service"));
        assert!(amended.modified.is_some());

        let fresh = Metadata::amended(&Metadata::default());
        assert_eq!(fresh.title.as_deref(), Some("Contract"));
    }
}
