//! Block and run-level types.

use serde::{Deserialize, Serialize};

/// A paragraph-equivalent unit of styled text.
///
/// The text of a block is always the concatenation of its runs' text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Styled text spans, in order
    pub runs: Vec<Run>,

    /// Block-level formatting
    #[serde(default)]
    pub style: BlockStyle,
}

impl Block {
    /// Create a new empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a block holding a single unstyled run.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut block = Self::new();
        block.add_text(text);
        block
    }

    /// Create a block from runs and a block style.
    pub fn from_runs(runs: Vec<Run>, style: BlockStyle) -> Self {
        Self { runs, style }
    }

    /// Add plain text as a new run.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.runs.push(Run::new(text));
    }

    /// Add a styled run.
    pub fn add_run(&mut self, run: Run) {
        self.runs.push(run);
    }

    /// Get the plain text of the block.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// First run carrying the block's leading style, if any.
    pub fn first_run(&self) -> Option<&Run> {
        self.runs.first()
    }

    /// Check if the block has no visible text.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|run| run.text.trim().is_empty())
    }
}

/// A contiguous styled text span.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// The text content
    pub text: String,

    /// Character formatting
    #[serde(default)]
    pub style: TextStyle,
}

impl Run {
    /// Create a new run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a run with an explicit style.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Create a bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle {
                bold: true,
                ..Default::default()
            },
        }
    }
}

/// Character formatting for a run.
///
/// `font` and `size` are left unset when a document does not specify them;
/// writers fill them from the document's resolved style profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font family name
    pub font: Option<String>,

    /// Font size in half-points (24 = 12pt)
    pub size: Option<u32>,

    /// Bold text
    #[serde(default)]
    pub bold: bool,

    /// Italic text
    #[serde(default)]
    pub italic: bool,

    /// Underlined text
    #[serde(default)]
    pub underline: bool,
}

impl TextStyle {
    /// Check if any emphasis is applied.
    pub fn has_emphasis(&self) -> bool {
        self.bold || self.italic || self.underline
    }
}

/// Emphasis overrides applied on top of a resolved style.
///
/// `None` inherits the value from context; `Some` forces it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emphasis {
    /// Bold override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,

    /// Italic override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,

    /// Underline override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
}

impl Emphasis {
    /// Inherit everything from context.
    pub const fn inherit() -> Self {
        Self {
            bold: None,
            italic: None,
            underline: None,
        }
    }

    /// Force all emphasis off.
    pub const fn plain() -> Self {
        Self {
            bold: Some(false),
            italic: Some(false),
            underline: Some(false),
        }
    }

    /// Bold only.
    pub const fn bold() -> Self {
        Self {
            bold: Some(true),
            italic: Some(false),
            underline: Some(false),
        }
    }

    /// Bold and underlined, used for clause headings.
    pub const fn heading() -> Self {
        Self {
            bold: Some(true),
            italic: Some(false),
            underline: Some(true),
        }
    }

    /// Layer `other` on top of `self`; `other` wins where it is set.
    pub fn then(self, other: Emphasis) -> Self {
        Self {
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            underline: other.underline.or(self.underline),
        }
    }

    /// Apply the overrides to a text style.
    pub fn apply(&self, style: &mut TextStyle) {
        if let Some(bold) = self.bold {
            style.bold = bold;
        }
        if let Some(italic) = self.italic {
            style.italic = italic;
        }
        if let Some(underline) = self.underline {
            style.underline = underline;
        }
    }
}

/// Block-level formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStyle {
    /// Paragraph spacing
    pub spacing: Option<Spacing>,

    /// Text alignment
    pub alignment: Option<Alignment>,
}

/// Paragraph spacing in twentieths of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spacing {
    /// Space before the paragraph
    pub before: u32,

    /// Space after the paragraph
    pub after: u32,

    /// Line height (240 = single)
    pub line: u32,
}

impl Spacing {
    /// Create a spacing value.
    pub const fn new(before: u32, after: u32, line: u32) -> Self {
        Self {
            before,
            after,
            line,
        }
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Self::new(0, 0, 240)
    }
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

impl Alignment {
    /// Parse a WordprocessingML `w:jc` value.
    pub fn from_ooxml(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "both" | "distribute" => Some(Alignment::Justify),
            _ => None,
        }
    }

    /// The WordprocessingML `w:jc` value.
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_text_concatenates_runs() {
        let mut block = Block::new();
        block.add_text("Hello ");
        block.add_run(Run::bold("world"));
        block.add_text("!");

        assert_eq!(block.text(), "Hello world!");
        assert!(!block.is_empty());
    }

    #[test]
    fn test_whitespace_block_is_empty() {
        let block = Block::with_text("  \t ");
        assert!(block.is_empty());
        assert!(Block::new().is_empty());
    }

    #[test]
    fn test_emphasis_layering() {
        let layered = Emphasis::bold().then(Emphasis {
            underline: Some(true),
            ..Emphasis::inherit()
        });
        assert_eq!(layered.bold, Some(true));
        assert_eq!(layered.underline, Some(true));

        let mut style = TextStyle {
            italic: true,
            ..Default::default()
        };
        Emphasis::heading().apply(&mut style);
        assert!(style.bold && style.underline && !style.italic);

        let mut inherited = TextStyle {
            bold: true,
            ..Default::default()
        };
        Emphasis::inherit().apply(&mut inherited);
        assert!(inherited.bold);
    }

    #[test]
    fn test_alignment_ooxml() {
        assert_eq!(Alignment::from_ooxml("both"), Some(Alignment::Justify));
        assert_eq!(Alignment::from_ooxml("start"), Some(Alignment::Left));
        assert_eq!(Alignment::from_ooxml("bogus"), None);
        assert_eq!(Alignment::Center.as_ooxml(), "center");
    }
}
