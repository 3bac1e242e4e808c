//! Applies transform rules to documents.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use super::content::segments_to_runs;
use super::{split_sentences, Content, EngineOptions, Relabel, TextLayout, TransformRule};
use crate::clauses::Clauses;
use crate::error::{Error, Result};
use crate::locate::{locate, split_paragraphs, Anchor, TextView};
use crate::model::{Block, BlockStyle, Document, Emphasis, Run};
use crate::observe::{PipelineEvent, PipelineObserver};
use crate::rules::RuleStep;
use crate::style::{resolve_block, resolve_contextual, resolve_default, StyleProfile};

/// Transform engine.
///
/// Every operation takes the document by reference and returns a new one;
/// the input is never modified.
///
/// # Example
///
/// ```
/// use amendoc::locate::{locate, PatternSpec, TextView};
/// use amendoc::transform::{Content, Engine, TransformRule};
/// use amendoc::{Clauses, Document, Emphasis};
///
/// let doc = Document::from_text("1. Definitions.\n\n2. Term.");
/// let anchor = locate(&TextView::of(&doc), &PatternSpec::exact("Definitions.")).unwrap();
///
/// let clauses = Clauses::new();
/// let engine = Engine::new(&clauses);
/// let rule = TransformRule::insert_after(Content::text("\"Affiliate\" means ..."), Emphasis::inherit());
/// let amended = engine.apply(&doc, &anchor, &rule).unwrap();
///
/// assert_eq!(amended.block_count(), 3);
/// assert_eq!(amended.blocks[1].text(), "\"Affiliate\" means ...");
/// ```
#[derive(Debug, Clone)]
pub struct Engine<'a> {
    clauses: &'a Clauses,
    options: EngineOptions,
}

impl<'a> Engine<'a> {
    /// Create an engine with default options.
    pub fn new(clauses: &'a Clauses) -> Self {
        Self::with_options(clauses, EngineOptions::default())
    }

    /// Create an engine with explicit options.
    pub fn with_options(clauses: &'a Clauses, options: EngineOptions) -> Self {
        Self { clauses, options }
    }

    /// Engine options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Apply one rule at `anchor`.
    ///
    /// The anchor must come from a [`TextView`] of `doc` itself.
    pub fn apply(&self, doc: &Document, anchor: &Anchor, rule: &TransformRule) -> Result<Document> {
        self.apply_rule(doc, Some(anchor), rule)
    }

    /// Run a sequence of steps, locating a fresh anchor before each one.
    pub fn execute(
        &self,
        doc: &Document,
        steps: &[RuleStep],
        observer: &mut dyn PipelineObserver,
    ) -> Result<Document> {
        let mut current = doc.clone();

        for step in steps {
            let blocks_before = current.block_count();

            let anchor = match (&step.pattern, step.rule.needs_anchor()) {
                (Some(pattern), true) => {
                    let anchor = locate(&TextView::of(&current), pattern)?;
                    observer.on_event(&PipelineEvent::AnchorLocated {
                        pattern,
                        anchor: &anchor,
                    });
                    Some(anchor)
                }
                (None, true) => {
                    return Err(Error::Config(format!(
                        "{} step has no pattern to locate",
                        step.rule.op()
                    )))
                }
                (_, false) => None,
            };

            current = self.apply_rule(&current, anchor.as_ref(), &step.rule)?;

            observer.on_event(&PipelineEvent::RuleApplied {
                op: step.rule.op(),
                blocks_before,
                blocks_after: current.block_count(),
            });
        }

        Ok(current)
    }

    fn apply_rule(
        &self,
        doc: &Document,
        anchor: Option<&Anchor>,
        rule: &TransformRule,
    ) -> Result<Document> {
        match rule {
            TransformRule::Append { content, emphasis } => self.append(doc, content, *emphasis),
            TransformRule::InsertBefore { content, emphasis } => {
                let anchor = require_anchor(doc, anchor, rule)?;
                self.insert(doc, anchor.block, content, *emphasis)
            }
            TransformRule::InsertAfter { content, emphasis } => {
                let anchor = require_anchor(doc, anchor, rule)?;
                self.insert(doc, anchor.block + 1, content, *emphasis)
            }
            TransformRule::ReplaceRange { content } => {
                self.replace_range(doc, require_anchor(doc, anchor, rule)?, content)
            }
            TransformRule::RenumberFrom { relabels } => Ok(renumber_tail(
                doc,
                require_anchor(doc, anchor, rule)?,
                relabels,
            )),
            TransformRule::SpliceSentence { content } => {
                self.splice_sentence(doc, require_anchor(doc, anchor, rule)?, content)
            }
            TransformRule::LetterDefinitions { first } => Ok(letter_definitions(
                doc,
                require_anchor(doc, anchor, rule)?,
                *first,
            )),
        }
    }

    /// Insert a new block so that it ends up at `position`.
    fn insert(
        &self,
        doc: &Document,
        position: usize,
        content: &Content,
        emphasis: Emphasis,
    ) -> Result<Document> {
        let segments = content.resolve(self.clauses)?;
        let profile = resolve_contextual(doc, position).with_emphasis(emphasis);
        let block = Block::from_runs(segments_to_runs(&segments, &profile), profile.block_style());

        let mut blocks = doc.blocks.clone();
        blocks.insert(position, block);
        Ok(doc.with_blocks(blocks))
    }

    /// Append a block at the end using the document default style.
    pub fn append(&self, doc: &Document, content: &Content, emphasis: Emphasis) -> Result<Document> {
        let segments = content.resolve(self.clauses)?;
        let profile = resolve_default(doc).with_emphasis(emphasis);

        let mut blocks = doc.blocks.clone();
        blocks.push(Block::from_runs(
            segments_to_runs(&segments, &profile),
            profile.block_style(),
        ));
        Ok(doc.with_blocks(blocks))
    }

    fn replace_range(&self, doc: &Document, anchor: &Anchor, content: &Content) -> Result<Document> {
        let segments = content.resolve(self.clauses)?;
        let view = TextView::of(doc);
        let text = view.text();
        let span = &anchor.span;

        if span.start > span.end
            || span.end > text.len()
            || !text.is_char_boundary(span.start)
            || !text.is_char_boundary(span.end)
        {
            return Err(Error::InvalidDocumentStructure(format!(
                "replace span {}..{} does not fit the document text ({} bytes)",
                span.start,
                span.end,
                text.len()
            )));
        }

        match self.options.text_layout {
            TextLayout::SingleBlock => {
                let profile = resolve_default(doc);
                let mut runs = Vec::new();
                push_text(&mut runs, &profile, &text[..span.start]);
                runs.extend(segments_to_runs(&segments, &profile));
                push_text(&mut runs, &profile, &text[span.end..]);
                Ok(doc.with_blocks(vec![Block::from_runs(runs, profile.block_style())]))
            }
            TextLayout::Paragraphs => {
                let first = view.block_at(span.start).unwrap_or(anchor.block);
                let last = view
                    .block_at(span.end.saturating_sub(1).max(span.start))
                    .unwrap_or(first);
                let spans = view.blocks();
                let region_start = spans[first].start.min(span.start);
                let region_end = spans[last].end.max(span.end);

                let profile = resolve_block(doc, &doc.blocks[first]);
                let mut runs = Vec::new();
                push_text(&mut runs, &profile, &text[region_start..span.start]);
                runs.extend(segments_to_runs(&segments, &profile));
                push_text(&mut runs, &profile, &text[span.end..region_end]);

                let mut blocks = doc.blocks[..first].to_vec();
                blocks.extend(split_runs(&runs, &profile.block_style()));
                blocks.extend_from_slice(&doc.blocks[last + 1..]);
                Ok(doc.with_blocks(blocks))
            }
        }
    }

    fn splice_sentence(&self, doc: &Document, anchor: &Anchor, content: &Content) -> Result<Document> {
        let block = &doc.blocks[anchor.block];
        let text = block.text();
        let sentences = split_sentences(text.trim());
        let Some((first, rest)) = sentences.split_first() else {
            return Err(Error::MalformedBlock(format!(
                "block {} has no sentences to splice into",
                anchor.block
            )));
        };

        let mut segments = content.resolve(self.clauses)?;
        if let Some(last) = segments.last_mut() {
            last.text.push(' ');
        }

        let profile = resolve_block(doc, block);
        let mut runs = vec![profile.run(format!("{} ", first))];
        runs.extend(segments_to_runs(&segments, &profile));
        if !rest.is_empty() {
            runs.push(profile.run(rest.join(" ")));
        }

        let mut blocks = doc.blocks.clone();
        blocks[anchor.block] = Block::from_runs(runs, block.style.clone());
        Ok(doc.with_blocks(blocks))
    }
}

/// The anchor an anchored rule needs, checked against the document.
fn require_anchor<'x>(
    doc: &Document,
    anchor: Option<&'x Anchor>,
    rule: &TransformRule,
) -> Result<&'x Anchor> {
    let anchor = anchor.ok_or_else(|| {
        Error::Config(format!("{} rule applied without an anchor", rule.op()))
    })?;
    if anchor.block >= doc.block_count() {
        return Err(Error::InvalidDocumentStructure(format!(
            "anchor block {} is out of range ({} blocks)",
            anchor.block,
            doc.block_count()
        )));
    }
    Ok(anchor)
}

/// Relabel every block after the anchor block.
///
/// Labels are matched on the block text, so a label split across runs is
/// still found.
fn renumber_tail(doc: &Document, anchor: &Anchor, relabels: &[Relabel]) -> Document {
    let blocks = doc
        .blocks
        .iter()
        .enumerate()
        .map(|(index, block)| {
            if index <= anchor.block {
                return block.clone();
            }
            Block::from_runs(relabel_runs(&block.runs, relabels), block.style.clone())
        })
        .collect();
    doc.with_blocks(blocks)
}

/// Apply `relabels` in order to the joined text of `runs`.
///
/// Runs a relabel empties are dropped.
fn relabel_runs(runs: &[Run], relabels: &[Relabel]) -> Vec<Run> {
    let mut texts: Vec<String> = runs.iter().map(|run| run.text.clone()).collect();

    for relabel in relabels.iter().filter(|relabel| !relabel.from.is_empty()) {
        let joined = texts.concat();
        let starts: Vec<usize> = joined
            .match_indices(relabel.from.as_str())
            .map(|(start, _)| start)
            .collect();
        // Last match first so earlier offsets stay valid.
        for start in starts.into_iter().rev() {
            replace_across(&mut texts, start..start + relabel.from.len(), &relabel.to);
        }
    }

    runs.iter()
        .zip(texts)
        .filter(|(run, text)| !text.is_empty() || run.text.is_empty())
        .map(|(run, text)| Run::styled(text, run.style.clone()))
        .collect()
}

/// Replace `range` of the concatenated `texts` with `to`.
///
/// The replacement goes into the first run the range touches; the rest of
/// the range is cut from the runs after it.
fn replace_across(texts: &mut [String], range: Range<usize>, to: &str) {
    let mut offset = 0;
    let mut placed = false;
    for text in texts.iter_mut() {
        let len = text.len();
        let start = range.start.max(offset);
        let end = range.end.min(offset + len);
        if start < end {
            let local = start - offset..end - offset;
            text.replace_range(local, if placed { "" } else { to });
            placed = true;
        }
        offset += len;
    }
}

/// Re-letter the definition entries that follow the anchor block.
///
/// Entries are blocks of the form `"Term" means ...`, optionally already
/// lettered. Blank blocks are kept; the first other block ends the list.
/// Each entry is rebuilt as a bold letter and term followed by a plain
/// meaning, in the entry's own font.
fn letter_definitions(doc: &Document, anchor: &Anchor, first: char) -> Document {
    let mut blocks = doc.blocks.clone();
    let mut letters = first.to_ascii_uppercase()..='Z';

    for block in blocks.iter_mut().skip(anchor.block + 1) {
        let text = block.text();
        if text.trim().is_empty() {
            continue;
        }
        let Some((term, meaning)) = definition_parts(&text) else {
            break;
        };
        let Some(letter) = letters.next() else {
            break;
        };

        let profile = resolve_block(doc, block);
        let bold = profile.with_emphasis(Emphasis::bold());
        let runs = vec![
            bold.run(format!("{}.", letter)),
            bold.run(format!("\t{}", term)),
            profile.with_emphasis(Emphasis::plain()).run(format!(" {}", meaning)),
        ];
        *block = Block::from_runs(runs, block.style.clone());
    }

    doc.with_blocks(blocks)
}

/// Split a definition entry into its quoted term and its `means ...` part.
fn definition_parts(text: &str) -> Option<(&str, &str)> {
    static DEFINITION: OnceLock<Regex> = OnceLock::new();
    let re = DEFINITION.get_or_init(|| {
        Regex::new(r#"(?s)^(?:[A-Z]\.)?\s*(["\x{201C}][^"\x{201D}]+["\x{201D}])\s+(means\b.*)$"#)
            .expect("definition pattern is valid")
    });
    let caps = re.captures(text.trim())?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

fn push_text(runs: &mut Vec<Run>, profile: &StyleProfile, text: &str) {
    if !text.is_empty() {
        runs.push(profile.run(text));
    }
}

/// Split a run sequence into blocks at blank lines.
fn split_runs(runs: &[Run], style: &BlockStyle) -> Vec<Block> {
    let text: String = runs.iter().map(|run| run.text.as_str()).collect();

    let mut bounds = Vec::with_capacity(runs.len());
    let mut offset = 0;
    for run in runs {
        bounds.push(offset..offset + run.text.len());
        offset += run.text.len();
    }

    split_paragraphs(&text)
        .into_iter()
        .map(|paragraph| {
            let pieces = runs
                .iter()
                .zip(&bounds)
                .filter_map(|(run, range)| {
                    let start = range.start.max(paragraph.start);
                    let end = range.end.min(paragraph.end);
                    (start < end).then(|| Run::styled(&text[start..end], run.style.clone()))
                })
                .collect();
            Block::from_runs(pieces, style.clone())
        })
        .collect()
}
