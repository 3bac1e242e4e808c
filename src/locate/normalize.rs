//! Text normalization with an offset table back to the source text.

use std::ops::Range;

use unicode_normalization::char::decompose_compatible;

/// Options for text normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalizeOptions {
    /// Lowercase the text for case-insensitive matching
    pub case_insensitive: bool,
}

impl NormalizeOptions {
    /// Create options with defaults (case-sensitive).
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for case-insensitive matching.
    pub fn case_insensitive() -> Self {
        Self {
            case_insensitive: true,
        }
    }
}

/// Normalized text plus the byte mapping back to its source.
///
/// Whitespace runs collapse to one space, leading and trailing whitespace is
/// dropped, curly quotes become straight quotes, compatibility characters
/// (ligatures, full-width forms) are decomposed, and the text is optionally
/// lowercased. Every byte of `text` remembers the source character it came
/// from, so a match found here can be spliced on the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    starts: Vec<usize>,
    ends: Vec<usize>,
    source_len: usize,
}

impl NormalizedText {
    /// The normalized text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length of the normalized text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the normalized text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Find `needle` (already normalized) and return its normalized range.
    pub fn find(&self, needle: &str) -> Option<Range<usize>> {
        self.text
            .find(needle)
            .map(|start| start..start + needle.len())
    }

    /// Map a normalized byte range to the source byte range it covers.
    pub fn source_range(&self, range: Range<usize>) -> Range<usize> {
        if range.start >= self.text.len() {
            return self.source_len..self.source_len;
        }
        let start = self.starts[range.start];
        if range.is_empty() {
            return start..start;
        }
        let last = range.end.min(self.text.len()) - 1;
        start..self.ends[last]
    }

    fn push(&mut self, ch: char, source: Range<usize>) {
        let before = self.text.len();
        self.text.push(ch);
        for _ in before..self.text.len() {
            self.starts.push(source.start);
            self.ends.push(source.end);
        }
    }
}

/// Normalize text for matching.
pub fn normalize(text: &str, options: NormalizeOptions) -> NormalizedText {
    let mut out = NormalizedText {
        text: String::with_capacity(text.len()),
        starts: Vec::with_capacity(text.len()),
        ends: Vec::with_capacity(text.len()),
        source_len: text.len(),
    };
    let mut pending_space: Option<Range<usize>> = None;

    for (idx, ch) in text.char_indices() {
        let end = idx + ch.len_utf8();
        if ch.is_whitespace() {
            pending_space = Some(match pending_space {
                Some(run) => run.start..end,
                None => idx..end,
            });
            continue;
        }

        // Leading whitespace is dropped; inner runs become one space.
        if let Some(run) = pending_space.take() {
            if !out.is_empty() {
                out.push(' ', run);
            }
        }

        decompose_compatible(straighten_quote(ch), |part| {
            if options.case_insensitive {
                for lower in part.to_lowercase() {
                    out.push(lower, idx..end);
                }
            } else {
                out.push(part, idx..end);
            }
        });
    }

    out
}

/// Normalize a search term and return only the text.
pub fn normalize_str(text: &str, options: NormalizeOptions) -> String {
    normalize(text, options).text
}

fn straighten_quote(ch: char) -> char {
    match ch {
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{00AB}' | '\u{00BB}' => '"',
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => '\'',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace_and_trims() {
        let n = normalize("  Hello,\n\n\t world  ", NormalizeOptions::new());
        assert_eq!(n.as_str(), "Hello, world");
    }

    #[test]
    fn test_straightens_quotes() {
        let n = normalize("\u{201C}Affiliate\u{201D} isn\u{2019}t", NormalizeOptions::new());
        assert_eq!(n.as_str(), "\"Affiliate\" isn't");
    }

    #[test]
    fn test_compatibility_forms() {
        let source = "\u{FB01}nal \u{FF21}greement";
        let n = normalize(source, NormalizeOptions::new());
        assert_eq!(n.as_str(), "final Agreement");
        let found = n.find("fi").unwrap();
        assert_eq!(&source[n.source_range(found)], "\u{FB01}");
    }

    #[test]
    fn test_case_folding() {
        let n = normalize("AS IS Basis", NormalizeOptions::case_insensitive());
        assert_eq!(n.as_str(), "as is basis");
        let n = normalize("AS IS Basis", NormalizeOptions::new());
        assert_eq!(n.as_str(), "AS IS Basis");
    }

    #[test]
    fn test_source_range_spans_collapsed_whitespace() {
        let source = "in furtherance\n  of the\tBusiness Purpose.\n\nNext";
        let n = normalize(source, NormalizeOptions::new());
        let found = n.find("of the Business Purpose.").unwrap();
        let mapped = n.source_range(found);
        assert_eq!(&source[mapped], "of the\tBusiness Purpose.");
    }

    #[test]
    fn test_source_range_with_multibyte_quotes() {
        let source = "The \u{201C}Term\u{201D} means";
        let n = normalize(source, NormalizeOptions::new());
        let found = n.find("\"Term\"").unwrap();
        assert_eq!(&source[n.source_range(found)], "\u{201C}Term\u{201D}");
    }

    #[test]
    fn test_source_range_out_of_bounds() {
        let n = normalize("abc", NormalizeOptions::new());
        assert_eq!(n.source_range(5..6), 3..3);
        assert_eq!(n.source_range(1..1), 1..1);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(normalize("", NormalizeOptions::new()).is_empty());
        assert!(normalize(" \n\t ", NormalizeOptions::new()).is_empty());
    }
}
