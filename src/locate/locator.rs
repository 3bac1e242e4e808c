//! Anchor location strategies.
//!
//! All strategies are pure and return the first match in document order.

use regex::RegexBuilder;

use super::normalize::{normalize, normalize_str, NormalizeOptions};
use super::{split_paragraphs, Anchor, PatternSpec, TextView};
use crate::error::{Error, Result};

/// Find the first anchor matching `pattern` in `view`.
pub fn locate(view: &TextView, pattern: &PatternSpec) -> Result<Anchor> {
    let found = match pattern {
        PatternSpec::AllPhrases { phrases } => locate_all_phrases(view, phrases),
        PatternSpec::Exact { text } => locate_exact(view, text),
        PatternSpec::HeadingPrefix { prefix } => locate_heading_prefix(view, prefix)?,
        PatternSpec::Regex {
            pattern: source,
            case_insensitive,
        } => locate_regex(view, source, *case_insensitive)?,
    };

    match found {
        Some(anchor) => {
            log::debug!(
                "located {} at block {} (bytes {:?})",
                pattern,
                anchor.block,
                anchor.span
            );
            Ok(anchor)
        }
        None => Err(Error::anchor_not_found(pattern)),
    }
}

/// First paragraph whose normalized text contains every phrase.
///
/// Paragraph boundaries come from the original text; matching happens on
/// the normalized, lowercased paragraph.
fn locate_all_phrases(view: &TextView, phrases: &[String]) -> Option<Anchor> {
    let options = NormalizeOptions::case_insensitive();
    let needles: Vec<String> = phrases
        .iter()
        .map(|phrase| normalize_str(phrase, options))
        .collect();

    let text = view.text();
    split_paragraphs(text).into_iter().find_map(|range| {
        let paragraph = normalize_str(&text[range.clone()], options);
        if needles.iter().all(|needle| paragraph.contains(needle.as_str())) {
            let block = view.block_at(range.start)?;
            Some(Anchor::new(block, range))
        } else {
            None
        }
    })
}

/// First normalized occurrence of a literal, mapped back to source bytes.
fn locate_exact(view: &TextView, target: &str) -> Option<Anchor> {
    let options = NormalizeOptions::new();
    let needle = normalize_str(target, options);
    if needle.is_empty() {
        return None;
    }

    let content = normalize(view.text(), options);
    let found = content.find(&needle)?;
    let span = content.source_range(found);
    let block = view.block_at(span.start)?;
    Some(Anchor::new(block, span))
}

/// First block whose trimmed text starts with `prefix`.
fn locate_heading_prefix(view: &TextView, prefix: &str) -> Result<Option<Anchor>> {
    if view.block_count() == 0 {
        return Err(Error::InvalidDocumentStructure(
            "document has no blocks to search for a heading".to_string(),
        ));
    }

    Ok(view
        .blocks()
        .iter()
        .enumerate()
        .find(|(_, range)| view.text()[(*range).clone()].trim().starts_with(prefix))
        .map(|(index, range)| Anchor::new(index, range.clone())))
}

/// First regex match on the original text.
fn locate_regex(view: &TextView, source: &str, case_insensitive: bool) -> Result<Option<Anchor>> {
    let re = RegexBuilder::new(source)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| Error::InvalidPattern(format!("{}: {}", source, e)))?;

    Ok(re.find(view.text()).and_then(|m| {
        let block = view.block_at(m.start())?;
        Some(Anchor::new(block, m.range()))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Document};

    #[test]
    fn test_exact_finds_block() {
        let view = TextView::from_text("Intro.\n\nDefinitions.\nA term means X.\n\nClosing.");
        let anchor = locate(&view, &PatternSpec::exact("Definitions.")).unwrap();
        assert_eq!(anchor.block, 1);
        assert_eq!(&view.text()[anchor.span], "Definitions.");
    }

    #[test]
    fn test_exact_is_whitespace_insensitive_but_case_sensitive() {
        let view = TextView::from_text("Use in\n furtherance of  the Business Purpose.");
        let anchor =
            locate(&view, &PatternSpec::exact("in furtherance of the Business Purpose.")).unwrap();
        assert_eq!(anchor.block, 0);

        let missing = locate(&view, &PatternSpec::exact("business purpose."));
        assert!(matches!(missing, Err(Error::AnchorNotFound { .. })));
    }

    #[test]
    fn test_all_phrases_first_match_wins() {
        let view = TextView::from_text(
            "Receiving party only.\n\n\
             The Disclosing Party provides Confidential Information AS IS to the Receiving Party.\n\n\
             Again: confidential information as is, receiving party.",
        );
        let pattern =
            PatternSpec::all_phrases(["confidential information", "as is", "receiving party"]);
        let anchor = locate(&view, &pattern).unwrap();
        assert_eq!(anchor.block, 1);
    }

    #[test]
    fn test_all_phrases_not_found() {
        let view = TextView::from_text("One.\n\nTwo.\n\nThree.");
        let result = locate(&view, &PatternSpec::all_phrases(["four"]));
        match result {
            Err(Error::AnchorNotFound { pattern }) => assert!(pattern.contains("four")),
            other => panic!("expected AnchorNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_heading_prefix_over_blocks() {
        let doc = Document::from_blocks(vec![
            Block::with_text("10. Term"),
            Block::with_text("  11. Confidentiality. The parties agree."),
            Block::with_text("11. Confidentiality again"),
        ]);
        let view = TextView::of(&doc);
        let anchor = locate(&view, &PatternSpec::heading_prefix("11. Confidentiality")).unwrap();
        assert_eq!(anchor.block, 1);
    }

    #[test]
    fn test_heading_prefix_on_empty_document() {
        let view = TextView::of(&Document::new());
        let result = locate(&view, &PatternSpec::heading_prefix("11."));
        assert!(matches!(result, Err(Error::InvalidDocumentStructure(_))));
    }

    #[test]
    fn test_regex_strategy() {
        let view = TextView::from_text("Preamble.\n\nDEFINITIONS.\nTerms follow.");
        let anchor = locate(&view, &PatternSpec::regex_ci(r"\bDefinitions\.\s*\n")).unwrap();
        assert_eq!(anchor.block, 1);

        let bad = locate(&view, &PatternSpec::regex("("));
        assert!(matches!(bad, Err(Error::InvalidPattern(_))));
    }

    #[test]
    fn test_empty_exact_target_never_matches() {
        let view = TextView::from_text("Anything.");
        assert!(locate(&view, &PatternSpec::exact("  ")).is_err());
    }
}
