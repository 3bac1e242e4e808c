//! Transform rules.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::Content;
use crate::model::Emphasis;

/// A single edit applied once at an anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransformRule {
    /// Insert a new block before the anchor block.
    InsertBefore {
        /// Inserted content
        content: Content,
        /// Emphasis over the contextual style
        #[serde(default)]
        emphasis: Emphasis,
    },

    /// Insert a new block after the anchor block.
    InsertAfter {
        /// Inserted content
        content: Content,
        /// Emphasis over the contextual style
        #[serde(default)]
        emphasis: Emphasis,
    },

    /// Replace the anchor's text range.
    ReplaceRange {
        /// Replacement content
        content: Content,
    },

    /// Apply ordered label replacements to the blocks after the anchor.
    RenumberFrom {
        /// Replacements, applied in order
        relabels: Vec<Relabel>,
    },

    /// Insert a sentence after the first sentence of the anchor block.
    SpliceSentence {
        /// Sentence to insert
        content: Content,
    },

    /// Re-letter the definition entries that follow the anchor block.
    LetterDefinitions {
        /// Letter of the first entry
        first: char,
    },

    /// Append a block at the end of the document (no anchor needed).
    Append {
        /// Appended content
        content: Content,
        /// Emphasis over the default style
        #[serde(default)]
        emphasis: Emphasis,
    },
}

impl TransformRule {
    /// Insert-before rule.
    pub fn insert_before(content: Content, emphasis: Emphasis) -> Self {
        TransformRule::InsertBefore { content, emphasis }
    }

    /// Insert-after rule.
    pub fn insert_after(content: Content, emphasis: Emphasis) -> Self {
        TransformRule::InsertAfter { content, emphasis }
    }

    /// Replace-range rule.
    pub fn replace_range(content: Content) -> Self {
        TransformRule::ReplaceRange { content }
    }

    /// Renumber rule.
    pub fn renumber_from(relabels: Vec<Relabel>) -> Self {
        TransformRule::RenumberFrom { relabels }
    }

    /// Sentence splice rule.
    pub fn splice_sentence(content: Content) -> Self {
        TransformRule::SpliceSentence { content }
    }

    /// Definition lettering rule, starting at `first`.
    pub fn letter_definitions(first: char) -> Self {
        TransformRule::LetterDefinitions { first }
    }

    /// Append rule.
    pub fn append(content: Content, emphasis: Emphasis) -> Self {
        TransformRule::Append { content, emphasis }
    }

    /// Operation name, as used in rule files.
    pub fn op(&self) -> &'static str {
        match self {
            TransformRule::InsertBefore { .. } => "insert_before",
            TransformRule::InsertAfter { .. } => "insert_after",
            TransformRule::ReplaceRange { .. } => "replace_range",
            TransformRule::RenumberFrom { .. } => "renumber_from",
            TransformRule::SpliceSentence { .. } => "splice_sentence",
            TransformRule::LetterDefinitions { .. } => "letter_definitions",
            TransformRule::Append { .. } => "append",
        }
    }

    /// Whether the rule must be applied at a located anchor.
    pub fn needs_anchor(&self) -> bool {
        !matches!(self, TransformRule::Append { .. })
    }
}

/// A literal label replacement such as `"12."` → `"13."`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relabel {
    /// Label to find
    pub from: String,
    /// Replacement label
    pub to: String,
}

impl Relabel {
    /// Create a replacement.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Shift every numeric label in `labels` by `delta`.
    ///
    /// The list is ordered so no label is rewritten twice: highest first
    /// for a positive delta, lowest first for a negative one. Labels that
    /// would drop below zero are skipped.
    pub fn shift(labels: RangeInclusive<u32>, delta: i32, suffix: &str) -> Vec<Relabel> {
        let mut numbers: Vec<u32> = labels.collect();
        if delta > 0 {
            numbers.reverse();
        }
        numbers
            .into_iter()
            .filter_map(|n| {
                let shifted = i64::from(n) + i64::from(delta);
                (shifted >= 0 && delta != 0)
                    .then(|| Relabel::new(format!("{}{}", n, suffix), format!("{}{}", shifted, suffix)))
            })
            .collect()
    }

    /// Apply a list of replacements to `text`, in order.
    pub fn apply_all(relabels: &[Relabel], text: &str) -> String {
        relabels.iter().fold(text.to_string(), |acc, relabel| {
            if relabel.from.is_empty() {
                acc
            } else {
                acc.replace(&relabel.from, &relabel.to)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_orders_highest_first() {
        let relabels = Relabel::shift(11..=12, 1, ".");
        assert_eq!(
            relabels,
            vec![Relabel::new("12.", "13."), Relabel::new("11.", "12.")]
        );
    }

    #[test]
    fn test_shift_negative_orders_lowest_first() {
        let relabels = Relabel::shift(0..=2, -1, ".");
        assert_eq!(
            relabels,
            vec![Relabel::new("1.", "0."), Relabel::new("2.", "1.")]
        );
        assert!(Relabel::shift(1..=3, 0, ".").is_empty());
    }

    #[test]
    fn test_apply_all_does_not_double_increment() {
        let text = "Section 12. Foo\n\nSection 11. Bar";
        let out = Relabel::apply_all(&Relabel::shift(11..=12, 1, "."), text);
        assert_eq!(out, "Section 13. Foo\n\nSection 12. Bar");
        assert_eq!(out.matches("13.").count(), 1);
        assert_eq!(out.matches("12.").count(), 1);
    }

    #[test]
    fn test_wrong_order_collides() {
        let text = "Section 12. Foo\n\nSection 11. Bar";
        let out = Relabel::apply_all(
            &[Relabel::new("11.", "12."), Relabel::new("12.", "13.")],
            text,
        );
        assert_eq!(out, "Section 13. Foo\n\nSection 13. Bar");
    }

    #[test]
    fn test_rule_json() {
        let json = r#"{"op": "insert_after", "content": "11. Residuals", "emphasis": {"bold": true, "underline": true}}"#;
        let rule: TransformRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.op(), "insert_after");
        assert!(rule.needs_anchor());

        let json = r#"{"op": "renumber_from", "relabels": [{"from": "12.", "to": "13."}]}"#;
        let rule: TransformRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule, TransformRule::renumber_from(vec![Relabel::new("12.", "13.")]));

        let append = TransformRule::append(Content::text("x"), Emphasis::inherit());
        assert!(!append.needs_anchor());
    }

    #[test]
    fn test_letter_definitions_from_json() {
        let rule: TransformRule =
            serde_json::from_str(r#"{"op": "letter_definitions", "first": "B"}"#).unwrap();
        assert_eq!(rule, TransformRule::letter_definitions('B'));
        assert_eq!(rule.op(), "letter_definitions");
        assert!(rule.needs_anchor());
    }
}
