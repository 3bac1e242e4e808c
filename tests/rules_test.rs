//! Integration tests for rule files.

use std::fs;
use std::path::Path;

use amendoc::rules::{presets, FileMatcher, RuleRegistry};
use amendoc::transform::TransformRule;
use amendoc::{Amendoc, Clauses, Error, PatternSpec};
use tempfile::TempDir;

const LEASE_RULES: &str = r#"{
  "rule_sets": [
    {
      "name": "lease",
      "matcher": { "name_contains": "lease" },
      "steps": [
        {
          "pattern": { "strategy": "heading_prefix", "prefix": "4. Rent" },
          "rule": {
            "op": "insert_after",
            "content": { "clause": "late_fee" },
            "emphasis": { "bold": false }
          }
        },
        {
          "pattern": { "strategy": "exact", "text": "4. Rent" },
          "rule": {
            "op": "renumber_from",
            "relabels": [ { "from": "5.", "to": "6." } ]
          }
        },
        {
          "rule": { "op": "append", "content": "Signed in counterparts." }
        }
      ]
    },
    {
      "name": "notes",
      "matcher": { "extension": ".TXT" },
      "steps": []
    }
  ]
}"#;

#[test]
fn test_load_rule_file() {
    let registry = RuleRegistry::from_json(LEASE_RULES).unwrap();
    assert_eq!(registry.len(), 2);

    let lease = registry.get_by_name("Lease").unwrap();
    assert_eq!(lease.matcher, FileMatcher::name_contains("lease"));
    assert_eq!(lease.steps.len(), 3);
    assert_eq!(
        lease.steps[0].pattern,
        Some(PatternSpec::heading_prefix("4. Rent"))
    );
    assert!(lease.steps[2].pattern.is_none());
    assert!(matches!(lease.steps[2].rule, TransformRule::Append { .. }));

    assert_eq!(
        registry.classify(Path::new("files/lease-2024.txt")).unwrap().name,
        "lease"
    );
    assert_eq!(
        registry.classify(Path::new("files/memo.txt")).unwrap().name,
        "notes"
    );
    assert!(registry.classify(Path::new("files/memo.docx")).is_none());
}

#[test]
fn test_rule_file_drives_a_batch() {
    let dir = TempDir::new().unwrap();
    let rules_path = dir.path().join("rules.json");
    fs::write(&rules_path, LEASE_RULES).unwrap();

    let input = dir.path().join("lease.txt");
    fs::write(&input, "1. Parties.\n\n4. Rent is due monthly.\n\n5. Term.").unwrap();
    let out = dir.path().join("out");

    let clauses = Clauses::new().with("late_fee", "A late fee applies after five days.");
    let outputs = Amendoc::new()
        .with_rules(RuleRegistry::from_json_file(&rules_path).unwrap())
        .with_output_dir(&out)
        .run(&[&input], &clauses)
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(outputs, vec![out.join("lease.txt")]);
    assert_eq!(
        fs::read_to_string(&outputs[0]).unwrap(),
        "1. Parties.\n\n4. Rent is due monthly.\n\nA late fee applies after five days.\n\n6. Term.\n\nSigned in counterparts.\n"
    );
}

#[test]
fn test_rule_file_errors() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        RuleRegistry::from_json_file(dir.path().join("missing.json")),
        Err(Error::Io(_))
    ));
    assert!(matches!(
        RuleRegistry::from_json(r#"[{"name": "a", "steps": [{"rule": {"op": "explode"}}]}]"#),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_presets_serialize_to_loadable_rules() {
    let mut registry = RuleRegistry::new();
    for rule_set in presets::all() {
        registry.register(rule_set);
    }
    let json = registry.to_json().unwrap();
    let reloaded = RuleRegistry::from_json(&json).unwrap();
    assert_eq!(reloaded.rule_sets(), registry.rule_sets());
    assert!(json.contains("\"strategy\": \"all_phrases\""));
}
