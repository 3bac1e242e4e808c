//! Registry of rule sets.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{presets, RuleSet};
use crate::error::{Error, Result};

/// Ordered collection of rule sets.
///
/// Classification walks the rule sets in registration order and returns
/// the first whose matcher accepts the path. Names are unique and looked
/// up case-insensitively; registering a name again replaces the earlier
/// rule set in place.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rule_sets: Vec<RuleSet>,
    by_name: HashMap<String, usize>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RuleFile {
    Many(Vec<RuleSet>),
    Wrapped { rule_sets: Vec<RuleSet> },
    One(RuleSet),
}

impl RuleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the contract presets.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for rule_set in presets::contract_presets() {
            registry.register(rule_set);
        }
        registry
    }

    /// Register a rule set.
    pub fn register(&mut self, rule_set: RuleSet) {
        let key = rule_set.name.to_lowercase();
        match self.by_name.get(&key) {
            Some(&index) => self.rule_sets[index] = rule_set,
            None => {
                self.by_name.insert(key, self.rule_sets.len());
                self.rule_sets.push(rule_set);
            }
        }
    }

    /// Get a rule set by name.
    pub fn get_by_name(&self, name: &str) -> Option<&RuleSet> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&index| &self.rule_sets[index])
    }

    /// First rule set accepting `path`.
    pub fn classify(&self, path: &Path) -> Option<&RuleSet> {
        self.rule_sets.iter().find(|rule_set| rule_set.accepts(path))
    }

    /// Registered rule sets, in order.
    pub fn rule_sets(&self) -> &[RuleSet] {
        &self.rule_sets
    }

    /// Number of rule sets.
    pub fn len(&self) -> usize {
        self.rule_sets.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.rule_sets.is_empty()
    }

    /// Parse rule sets from JSON.
    ///
    /// Accepts a single rule set, an array of rule sets, or an object with
    /// a `rule_sets` array.
    pub fn from_json(json: &str) -> Result<Self> {
        let rule_sets = match serde_json::from_str::<RuleFile>(json) {
            Ok(RuleFile::Many(rule_sets)) | Ok(RuleFile::Wrapped { rule_sets }) => rule_sets,
            Ok(RuleFile::One(rule_set)) => vec![rule_set],
            Err(e) => return Err(Error::Config(format!("invalid rule file: {}", e))),
        };

        let mut registry = Self::new();
        for rule_set in rule_sets {
            if registry.get_by_name(&rule_set.name).is_some() {
                return Err(Error::Config(format!(
                    "rule set {:?} is defined more than once",
                    rule_set.name
                )));
            }
            registry.register(rule_set);
        }
        Ok(registry)
    }

    /// Load rule sets from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize the registered rule sets as a JSON array.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.rule_sets)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::FileMatcher;

    #[test]
    fn test_registry_with_defaults() {
        let registry = RuleRegistry::with_defaults();
        assert_eq!(registry.len(), 3);
        assert!(registry.get_by_name("CONTRACT2").is_some());
        assert_eq!(
            registry
                .classify(Path::new("./contracts/contract1.docx"))
                .map(|r| r.name.as_str()),
            Some("contract1")
        );
        assert!(registry.classify(Path::new("./contracts/lease.docx")).is_none());
    }

    #[test]
    fn test_first_match_wins_and_register_replaces() {
        let mut registry = RuleRegistry::new();
        registry.register(RuleSet::new("docx", FileMatcher::extension("docx")));
        registry.register(RuleSet::new("all", FileMatcher::Any));
        assert_eq!(registry.classify(Path::new("a.docx")).unwrap().name, "docx");
        assert_eq!(registry.classify(Path::new("a.txt")).unwrap().name, "all");

        registry.register(RuleSet::new("DOCX", FileMatcher::extension("odt")));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.classify(Path::new("a.docx")).unwrap().name, "all");
    }

    #[test]
    fn test_from_json_forms() {
        let one = RuleRegistry::from_json(r#"{"name": "a", "steps": []}"#).unwrap();
        assert_eq!(one.len(), 1);

        let many = RuleRegistry::from_json(r#"[{"name": "a", "steps": []}, {"name": "b", "steps": []}]"#)
            .unwrap();
        assert_eq!(many.len(), 2);

        let wrapped = RuleRegistry::from_json(r#"{"rule_sets": [{"name": "a", "steps": []}]}"#)
            .unwrap();
        assert!(wrapped.get_by_name("a").is_some());
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(
            RuleRegistry::from_json("{not json"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            RuleRegistry::from_json(r#"[{"name": "a", "steps": []}, {"name": "A", "steps": []}]"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_defaults_survive_json_round_trip() {
        let registry = RuleRegistry::with_defaults();
        let reloaded = RuleRegistry::from_json(&registry.to_json().unwrap()).unwrap();
        assert_eq!(reloaded.rule_sets(), registry.rule_sets());
    }
}
