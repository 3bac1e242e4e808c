//! Resolved formatting profiles.

use serde::{Deserialize, Serialize};

use crate::model::{Alignment, Block, BlockStyle, Emphasis, Run, Spacing, TextStyle};

/// Font used when a document specifies none.
pub const FALLBACK_FONT: &str = "Times New Roman";

/// Font size in half-points used when a document specifies none.
pub const FALLBACK_SIZE: u32 = 24;

/// Paragraph spacing used when a document specifies none.
pub const FALLBACK_SPACING: Spacing = Spacing::new(240, 240, 360);

/// A complete set of formatting attributes for new content.
///
/// Every field is always set, so building runs from a profile never needs
/// to check for missing values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleProfile {
    /// Font family name
    pub font: String,

    /// Font size in half-points
    pub size: u32,

    /// Paragraph spacing
    pub spacing: Spacing,

    /// Paragraph alignment
    pub alignment: Alignment,

    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Underlined text
    pub underline: bool,
}

impl StyleProfile {
    /// The hardcoded profile used when a document offers no formatting.
    pub fn fallback() -> Self {
        Self {
            font: FALLBACK_FONT.to_string(),
            size: FALLBACK_SIZE,
            spacing: FALLBACK_SPACING,
            alignment: Alignment::Left,
            bold: false,
            italic: false,
            underline: false,
        }
    }

    /// Profile derived from a block and its leading run.
    ///
    /// Missing values come from the fallback profile. Emphasis is copied
    /// from the run only when `inherit_emphasis` is set.
    pub fn from_block(block: &Block, run: &Run, inherit_emphasis: bool) -> Self {
        let fallback = Self::fallback();
        let (bold, italic, underline) = if inherit_emphasis {
            (run.style.bold, run.style.italic, run.style.underline)
        } else {
            (false, false, false)
        };
        Self {
            font: run.style.font.clone().unwrap_or(fallback.font),
            size: run.style.size.unwrap_or(fallback.size),
            spacing: block.style.spacing.unwrap_or(fallback.spacing),
            alignment: block.style.alignment.unwrap_or(fallback.alignment),
            bold,
            italic,
            underline,
        }
    }

    /// Copy of this profile with emphasis overrides applied.
    pub fn with_emphasis(&self, emphasis: Emphasis) -> Self {
        let mut profile = self.clone();
        profile.bold = emphasis.bold.unwrap_or(profile.bold);
        profile.italic = emphasis.italic.unwrap_or(profile.italic);
        profile.underline = emphasis.underline.unwrap_or(profile.underline);
        profile
    }

    /// Fully explicit character style.
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            font: Some(self.font.clone()),
            size: Some(self.size),
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
        }
    }

    /// Fully explicit block style.
    pub fn block_style(&self) -> BlockStyle {
        BlockStyle {
            spacing: Some(self.spacing),
            alignment: Some(self.alignment),
        }
    }

    /// A run styled with this profile.
    pub fn run(&self, text: impl Into<String>) -> Run {
        Run::styled(text, self.text_style())
    }

    /// Fill unset font and size of a run style from this profile.
    pub fn complete(&self, style: &TextStyle) -> TextStyle {
        TextStyle {
            font: Some(style.font.clone().unwrap_or_else(|| self.font.clone())),
            size: Some(style.size.unwrap_or(self.size)),
            ..style.clone()
        }
    }

    /// Fill unset spacing and alignment of a block style from this profile.
    pub fn complete_block(&self, style: &BlockStyle) -> BlockStyle {
        BlockStyle {
            spacing: Some(style.spacing.unwrap_or(self.spacing)),
            alignment: Some(style.alignment.unwrap_or(self.alignment)),
        }
    }
}

impl Default for StyleProfile {
    fn default() -> Self {
        Self::fallback()
    }
}
