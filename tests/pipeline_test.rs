//! Integration tests for locating anchors and applying rule pipelines.

use amendoc::locate::{locate, PatternSpec, TextView};
use amendoc::observe::{NoopObserver, PipelineEvent, PipelineObserver};
use amendoc::rules::presets;
use amendoc::transform::{Content, Engine, Relabel, TransformRule};
use amendoc::{resolve_contextual, Clauses, Document, Emphasis, Error, RuleStep};

fn texts(doc: &Document) -> Vec<String> {
    doc.blocks.iter().map(|block| block.text()).collect()
}

#[derive(Default)]
struct Events {
    located: usize,
    applied: Vec<(&'static str, usize, usize)>,
}

impl PipelineObserver for Events {
    fn on_event(&mut self, event: &PipelineEvent<'_>) {
        match event {
            PipelineEvent::AnchorLocated { .. } => self.located += 1,
            PipelineEvent::RuleApplied {
                op,
                blocks_before,
                blocks_after,
            } => self.applied.push((*op, *blocks_before, *blocks_after)),
            _ => {}
        }
    }
}

// ==================== Anchor Scenarios ====================

#[test]
fn test_exact_anchor_in_definitions_block() {
    let doc = Document::from_text("Intro.\n\nDefinitions.\nA term means X.\n\nClosing.");
    let anchor = locate(&TextView::of(&doc), &PatternSpec::exact("Definitions.")).unwrap();
    assert_eq!(anchor.block, 1);
    assert_eq!(
        &TextView::of(&doc).text()[anchor.span.clone()],
        "Definitions."
    );
}

#[test]
fn test_phrase_set_matches_as_is_paragraph() {
    let doc = Document::from_text(
        "1. Parties.\n\n\
         The Disclosing Party provides Confidential Information AS IS to the Receiving Party.\n\n\
         3. Term.",
    );
    let pattern =
        PatternSpec::all_phrases(["confidential information", "as is", "receiving party"]);
    let anchor = locate(&TextView::of(&doc), &pattern).unwrap();
    assert_eq!(anchor.block, 1);
}

#[test]
fn test_phrase_set_absent_is_anchor_not_found() {
    let doc = Document::from_text("1. Parties.\n\n2. Term.\n\n3. Governing Law.");
    let pattern =
        PatternSpec::all_phrases(["confidential information", "as is", "receiving party"]);
    match locate(&TextView::of(&doc), &pattern) {
        Err(Error::AnchorNotFound { pattern }) => assert!(pattern.contains("as is")),
        other => panic!("expected AnchorNotFound, got {:?}", other),
    }
}

#[test]
fn test_renumber_tail_shifts_without_collisions() {
    let doc = Document::from_text(
        "Use only in furtherance of the Business Purpose.\n\nSection 12. Foo\n\nSection 11. Bar",
    );
    let clauses = Clauses::new();
    let steps = [RuleStep::new(
        PatternSpec::exact("furtherance of the Business Purpose."),
        TransformRule::renumber_from(vec![Relabel::new("12", "13"), Relabel::new("11", "12")]),
    )];

    let amended = Engine::new(&clauses)
        .execute(&doc, &steps, &mut NoopObserver)
        .unwrap();
    assert_eq!(
        amended.plain_text(),
        "Use only in furtherance of the Business Purpose.\n\nSection 13. Foo\n\nSection 12. Bar"
    );
}

// ==================== Engine Properties ====================

#[test]
fn test_insert_after_grows_by_one_verbatim() {
    let doc = Document::from_text("Intro.\n\nDefinitions.\n\nClosing.");
    let view = TextView::of(&doc);
    let anchor = locate(&view, &PatternSpec::exact("Definitions.")).unwrap();
    let content = "\"Affiliate\" means  any entity \u{2014} as defined.";

    let clauses = Clauses::new();
    let amended = Engine::new(&clauses)
        .apply(
            &doc,
            &anchor,
            &TransformRule::insert_after(Content::text(content), Emphasis::inherit()),
        )
        .unwrap();

    assert_eq!(amended.block_count(), doc.block_count() + 1);
    assert_eq!(amended.blocks[anchor.block + 1].text(), content);
    assert_eq!(doc.block_count(), 3);
}

#[test]
fn test_contextual_profile_is_complete_for_empty_document() {
    let profile = resolve_contextual(&Document::new(), 0);
    let style = profile.text_style();
    assert!(style.font.is_some());
    assert!(style.size.is_some());
    let block_style = profile.block_style();
    assert!(block_style.spacing.is_some());
    assert!(block_style.alignment.is_some());
}

#[test]
fn test_missing_clause_fails_the_step() {
    let doc = Document::from_text("Definitions.");
    let clauses = Clauses::new();
    let steps = [RuleStep::new(
        PatternSpec::exact("Definitions."),
        TransformRule::insert_after(Content::clause("liability"), Emphasis::inherit()),
    )];
    let result = Engine::new(&clauses).execute(&doc, &steps, &mut NoopObserver);
    assert!(matches!(result, Err(Error::MissingClause(_))));
}

// ==================== Preset Pipelines ====================

#[test]
fn test_contract3_pipeline_events() {
    let doc = Document::from_text(
        "10. Use. Solely in furtherance of the Business Purpose.\n\n\
         11. Term.\n\n\
         12. Governing Law.",
    );
    let clauses = Clauses::new();
    let mut events = Events::default();
    let amended = Engine::new(&clauses)
        .execute(&doc, &presets::contract3().steps, &mut events)
        .unwrap();

    assert_eq!(events.located, 3);
    assert_eq!(
        events.applied,
        vec![
            ("renumber_from", 3, 3),
            ("insert_after", 3, 4),
            ("insert_after", 4, 5),
        ]
    );
    assert_eq!(texts(&amended)[3..], ["12. Term.", "13. Governing Law."]);
}

#[test]
fn test_contract1_on_document_without_definitions() {
    let doc = Document::from_text("1. Parties.\n\n2. Term.");
    let clauses = Clauses::new();
    let result = Engine::new(&clauses).execute(&doc, &presets::contract1().steps, &mut NoopObserver);
    assert!(matches!(result, Err(Error::AnchorNotFound { .. })));
}
