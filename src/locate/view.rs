//! Plain-text projection of a document with a block span table.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::{Document, BLOCK_SEPARATOR};

fn paragraph_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:\r?\n){2,}").expect("valid paragraph regex"))
}

/// Split text into paragraphs on blank lines.
///
/// Returns the byte range of every non-empty paragraph in the source text.
pub fn split_paragraphs(text: &str) -> Vec<Range<usize>> {
    let mut paragraphs = Vec::new();
    let mut start = 0;
    for sep in paragraph_break().find_iter(text) {
        if sep.start() > start {
            paragraphs.push(start..sep.start());
        }
        start = sep.end();
    }
    if start < text.len() {
        paragraphs.push(start..text.len());
    }
    paragraphs
}

/// The text searched by the locator, with the byte span of every block.
///
/// Built from a [`Document`] the spans follow its blocks exactly; built from
/// raw extracted text they are the blank-line separated paragraphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextView {
    text: String,
    blocks: Vec<Range<usize>>,
}

impl TextView {
    /// Project a document into text.
    pub fn of(doc: &Document) -> Self {
        let mut text = String::new();
        let mut blocks = Vec::with_capacity(doc.blocks.len());
        for (i, block) in doc.blocks.iter().enumerate() {
            if i > 0 {
                text.push_str(BLOCK_SEPARATOR);
            }
            let start = text.len();
            text.push_str(&block.text());
            blocks.push(start..text.len());
        }
        Self { text, blocks }
    }

    /// Wrap raw extracted text.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let blocks = split_paragraphs(&text);
        Self { text, blocks }
    }

    /// The full text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte spans of the blocks, in order.
    pub fn blocks(&self) -> &[Range<usize>] {
        &self.blocks
    }

    /// Number of blocks in the view.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Text of one block.
    pub fn block_text(&self, index: usize) -> Option<&str> {
        self.blocks.get(index).map(|range| &self.text[range.clone()])
    }

    /// Index of the block that owns the byte at `offset`.
    ///
    /// Offsets inside a separator belong to the preceding block.
    pub fn block_at(&self, offset: usize) -> Option<usize> {
        self.blocks.iter().rposition(|range| range.start <= offset)
    }
}
