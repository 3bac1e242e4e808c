//! Anchors and the patterns that produce them.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A located match.
///
/// `span` is a byte range in the exact text the anchor was found in, and
/// `block` is the index of the block that owns the start of the span. An
/// anchor must not be reused after the document has been edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    /// Index of the originating block
    pub block: usize,

    /// Byte range in the source text
    pub span: Range<usize>,
}

impl Anchor {
    /// Create a new anchor.
    pub fn new(block: usize, span: Range<usize>) -> Self {
        Self { block, span }
    }
}

/// How to find an anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum PatternSpec {
    /// First paragraph whose normalized text contains every phrase
    /// (case-insensitive).
    AllPhrases {
        /// Required phrases
        phrases: Vec<String>,
    },

    /// First occurrence of a literal, compared after normalization
    /// (case-sensitive).
    Exact {
        /// Literal to find
        text: String,
    },

    /// First block whose trimmed text starts with a literal prefix.
    HeadingPrefix {
        /// Literal prefix
        prefix: String,
    },

    /// First regex match on the original text.
    Regex {
        /// Regular expression
        pattern: String,

        /// Match case-insensitively
        #[serde(default)]
        case_insensitive: bool,
    },
}

impl PatternSpec {
    /// Phrase-set pattern.
    pub fn all_phrases<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PatternSpec::AllPhrases {
            phrases: phrases.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact normalized substring pattern.
    pub fn exact(text: impl Into<String>) -> Self {
        PatternSpec::Exact { text: text.into() }
    }

    /// Heading-prefix pattern.
    pub fn heading_prefix(prefix: impl Into<String>) -> Self {
        PatternSpec::HeadingPrefix {
            prefix: prefix.into(),
        }
    }

    /// Regex pattern.
    pub fn regex(pattern: impl Into<String>) -> Self {
        PatternSpec::Regex {
            pattern: pattern.into(),
            case_insensitive: false,
        }
    }

    /// Case-insensitive regex pattern.
    pub fn regex_ci(pattern: impl Into<String>) -> Self {
        PatternSpec::Regex {
            pattern: pattern.into(),
            case_insensitive: true,
        }
    }

    /// Strategy name, as used in rule files.
    pub fn strategy(&self) -> &'static str {
        match self {
            PatternSpec::AllPhrases { .. } => "all_phrases",
            PatternSpec::Exact { .. } => "exact",
            PatternSpec::HeadingPrefix { .. } => "heading_prefix",
            PatternSpec::Regex { .. } => "regex",
        }
    }
}

impl fmt::Display for PatternSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternSpec::AllPhrases { phrases } => {
                write!(f, "paragraph containing all of {:?}", phrases)
            }
            PatternSpec::Exact { text } => write!(f, "exact text {:?}", text),
            PatternSpec::HeadingPrefix { prefix } => {
                write!(f, "block starting with {:?}", prefix)
            }
            PatternSpec::Regex {
                pattern,
                case_insensitive,
            } => {
                if *case_insensitive {
                    write!(f, "regex /{}/i", pattern)
                } else {
                    write!(f, "regex /{}/", pattern)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_display() {
        assert_eq!(
            PatternSpec::exact("Definitions.").to_string(),
            "exact text \"Definitions.\""
        );
        assert_eq!(
            PatternSpec::regex_ci(r"\bDefinitions\.").to_string(),
            r"regex /\bDefinitions\./i"
        );
    }

    #[test]
    fn test_pattern_from_json() {
        let json = r#"{"strategy": "all_phrases", "phrases": ["as is", "receiving party"]}"#;
        let pattern: PatternSpec = serde_json::from_str(json).unwrap();
        assert_eq!(
            pattern,
            PatternSpec::all_phrases(["as is", "receiving party"])
        );

        let json = r#"{"strategy": "regex", "pattern": "^11\\."}"#;
        let pattern: PatternSpec = serde_json::from_str(json).unwrap();
        assert_eq!(pattern.strategy(), "regex");
    }
}
