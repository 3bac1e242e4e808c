//! Transform engine options.

use serde::{Deserialize, Serialize};

/// How text-level replacements are laid out as blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextLayout {
    /// The whole reconstructed text becomes a single block
    #[default]
    SingleBlock,

    /// Only the affected blocks are rebuilt, split on blank lines
    Paragraphs,
}

/// Options for the transform engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Block layout for `ReplaceRange`
    pub text_layout: TextLayout,
}

impl EngineOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the replace-range layout.
    pub fn with_text_layout(mut self, layout: TextLayout) -> Self {
        self.text_layout = layout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_options_builder() {
        assert_eq!(EngineOptions::default().text_layout, TextLayout::SingleBlock);
        let options = EngineOptions::new().with_text_layout(TextLayout::Paragraphs);
        assert_eq!(options.text_layout, TextLayout::Paragraphs);
    }
}
