//! Content inserted by transform rules.

use serde::{Deserialize, Serialize};

use crate::clauses::Clauses;
use crate::error::Result;
use crate::model::{Emphasis, Run};
use crate::style::StyleProfile;

/// A piece of inserted text with its own emphasis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Text to insert, verbatim
    pub text: String,

    /// Emphasis layered on top of the rule's emphasis
    #[serde(default)]
    pub emphasis: Emphasis,
}

impl Segment {
    /// Segment that inherits emphasis.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: Emphasis::inherit(),
        }
    }

    /// Segment with explicit emphasis.
    pub fn with_emphasis(text: impl Into<String>, emphasis: Emphasis) -> Self {
        Self {
            text: text.into(),
            emphasis,
        }
    }

    /// Bold segment.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::with_emphasis(text, Emphasis::bold())
    }

    /// Plain (no emphasis) segment.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::with_emphasis(text, Emphasis::plain())
    }
}

/// What a rule inserts.
///
/// In rule files this is either a string, a list of segments, or
/// `{"clause": "name"}` referring to the batch's clause map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// Literal text
    Text(String),

    /// Named clause resolved at apply time
    Clause {
        /// Clause name
        clause: String,
    },

    /// Styled segments
    Segments(Vec<Segment>),
}

impl Content {
    /// Literal text content.
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text(text.into())
    }

    /// Named clause content.
    pub fn clause(name: impl Into<String>) -> Self {
        Content::Clause {
            clause: name.into(),
        }
    }

    /// Segmented content.
    pub fn segments(segments: Vec<Segment>) -> Self {
        Content::Segments(segments)
    }

    /// Resolve into concrete segments.
    pub fn resolve(&self, clauses: &Clauses) -> Result<Vec<Segment>> {
        match self {
            Content::Text(text) => Ok(vec![Segment::new(text.clone())]),
            Content::Clause { clause } => Ok(vec![Segment::new(clauses.require(clause)?)]),
            Content::Segments(segments) => Ok(segments.clone()),
        }
    }
}

/// Concatenated text of resolved segments.
pub fn segments_text(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}

/// Turn resolved segments into runs styled by `profile`.
pub(crate) fn segments_to_runs(segments: &[Segment], profile: &StyleProfile) -> Vec<Run> {
    segments
        .iter()
        .filter(|segment| !segment.text.is_empty())
        .map(|segment| profile.with_emphasis(segment.emphasis).run(segment.text.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_resolve_variants() {
        let clauses = Clauses::new().with("liability", "Liability clause text...");

        let text = Content::text("Hello").resolve(&clauses).unwrap();
        assert_eq!(segments_text(&text), "Hello");

        let clause = Content::clause("liability").resolve(&clauses).unwrap();
        assert_eq!(segments_text(&clause), "Liability clause text...");

        let missing = Content::clause("nope").resolve(&clauses);
        assert!(matches!(missing, Err(Error::MissingClause(_))));
    }

    #[test]
    fn test_content_json_forms() {
        let text: Content = serde_json::from_str(r#""plain""#).unwrap();
        assert_eq!(text, Content::text("plain"));

        let clause: Content = serde_json::from_str(r#"{"clause": "default"}"#).unwrap();
        assert_eq!(clause, Content::clause("default"));

        let segments: Content =
            serde_json::from_str(r#"[{"text": "A.", "emphasis": {"bold": true}}, {"text": " rest"}]"#)
                .unwrap();
        match segments {
            Content::Segments(list) => {
                assert_eq!(list.len(), 2);
                assert_eq!(list[0].emphasis.bold, Some(true));
                assert_eq!(list[1].emphasis, Emphasis::inherit());
            }
            other => panic!("expected segments, got {:?}", other),
        }
    }

    #[test]
    fn test_segments_to_runs_skips_empty() {
        let profile = StyleProfile::fallback();
        let runs = segments_to_runs(
            &[Segment::bold("A."), Segment::new(""), Segment::new(" means")],
            &profile,
        );
        assert_eq!(runs.len(), 2);
        assert!(runs[0].style.bold);
        assert!(!runs[1].style.bold);
    }
}
