//! Built-in rule sets for the bundled contract templates.

use super::{FileMatcher, RuleSet, RuleStep};
use crate::locate::PatternSpec;
use crate::model::Emphasis;
use crate::transform::{Content, Relabel, Segment, TransformRule};

/// Definition inserted into the definitions section.
pub const AFFILIATE_DEFINITION: &str = " means any entity that directly or indirectly controls, is controlled by, or is under common control with a party, where \"control\" means the possession, directly or indirectly, of the power to direct or cause the direction of the management and policies of such entity, whether through ownership of voting securities, by contract, or otherwise.";

/// Uppercase disclaimer replacing the confidentiality paragraph.
pub const AS_IS_DISCLAIMER: &str = "THE DISCLOSING PARTY IS PROVIDING CONFIDENTIAL INFORMATION ON AN \"AS IS\" BASIS FOR USE BY THE RECEIVING PARTY AT ITS OWN RISK. THE DISCLOSING PARTY MAKES NO REPRESENTATIONS OR WARRANTIES REGARDING THE ACCURACY OR COMPLETENESS OF THE CONFIDENTIAL INFORMATION. THE DISCLOSING PARTY DISCLAIMS ALL WARRANTIES, WHETHER EXPRESS, IMPLIED OR STATUTORY, INCLUDING WITHOUT LIMITATION ANY IMPLIED WARRANTIES OF TITLE, NON-INFRINGEMENT OF THIRD PARTY RIGHTS, MERCHANTABILITY, OR FITNESS FOR A PARTICULAR PURPOSE.";

/// Heading of the residuals section.
pub const RESIDUALS_HEADING: &str = "11. Residuals";

/// Body of the residuals section.
pub const RESIDUALS_CLAUSE: &str = "Nothing in this Agreement shall be construed to limit the Receiving Party's right to independently develop or acquire products or services without use of the Disclosing Party's Confidential Information, nor shall it restrict the use of any general knowledge, skills, or experience retained in unaided memory by personnel of the Receiving Party.";

/// Sentence spliced into the confidentiality section.
pub const ACCURACY_DISCLAIMER: &str = "The Disclosing Party makes no representations or warranties regarding the accuracy or completeness of the Confidential Information.";

/// Last sentence of section 10 in the contract3 template.
const SECTION_10_END: &str = "in furtherance of the Business Purpose.";

/// The three contract rule sets, keyed on file name.
pub fn contract_presets() -> Vec<RuleSet> {
    vec![contract1(), contract2(), contract3()]
}

/// Every built-in rule set.
pub fn all() -> Vec<RuleSet> {
    let mut presets = contract_presets();
    presets.push(confidentiality_disclaimer());
    presets.push(residuals_appendix());
    presets
}

/// Built-in rule set by name.
pub fn by_name(name: &str) -> Option<RuleSet> {
    all()
        .into_iter()
        .find(|rule_set| rule_set.name.eq_ignore_ascii_case(name))
}

/// Definitions heading: "Definitions." ending its line.
const DEFINITIONS_HEADING: &str = r"(?m)\bDefinitions\.[ \t]*$";

/// Insert the "Affiliate" definition after the definitions heading and
/// re-letter the definitions list from "A.".
pub fn contract1() -> RuleSet {
    RuleSet::new("contract1", FileMatcher::name_contains("contract1"))
        .step(RuleStep::new(
            PatternSpec::regex_ci(DEFINITIONS_HEADING),
            TransformRule::insert_after(
                Content::segments(vec![
                    Segment::bold("A."),
                    Segment::bold("\t\"Affiliate\""),
                    Segment::plain(AFFILIATE_DEFINITION),
                ]),
                Emphasis::inherit(),
            ),
        ))
        .step(RuleStep::new(
            PatternSpec::regex_ci(DEFINITIONS_HEADING),
            TransformRule::letter_definitions('A'),
        ))
}

/// Replace the confidentiality paragraph with the uppercase disclaimer.
pub fn contract2() -> RuleSet {
    RuleSet::new("contract2", FileMatcher::name_contains("contract2")).step(RuleStep::new(
        PatternSpec::all_phrases(["confidential information", "as is", "receiving party"]),
        TransformRule::replace_range(Content::text(AS_IS_DISCLAIMER)),
    ))
}

/// Add section 11 (Residuals) after section 10, shifting 11 and 12 up.
pub fn contract3() -> RuleSet {
    RuleSet::new("contract3", FileMatcher::name_contains("contract3"))
        .step(RuleStep::new(
            PatternSpec::exact(SECTION_10_END),
            TransformRule::renumber_from(Relabel::shift(11..=12, 1, ".")),
        ))
        .step(RuleStep::new(
            PatternSpec::exact(SECTION_10_END),
            TransformRule::insert_after(Content::text(RESIDUALS_HEADING), Emphasis::heading()),
        ))
        .step(RuleStep::new(
            PatternSpec::heading_prefix(RESIDUALS_HEADING),
            TransformRule::insert_after(Content::text(RESIDUALS_CLAUSE), Emphasis::plain()),
        ))
}

/// Splice the accuracy disclaimer into "11. Confidentiality".
pub fn confidentiality_disclaimer() -> RuleSet {
    RuleSet::new("confidentiality_disclaimer", FileMatcher::Any).step(RuleStep::new(
        PatternSpec::heading_prefix("11. Confidentiality"),
        TransformRule::splice_sentence(Content::text(ACCURACY_DISCLAIMER)),
    ))
}

/// Append the residuals heading and clause at the end of the document.
pub fn residuals_appendix() -> RuleSet {
    RuleSet::new("residuals_appendix", FileMatcher::Any)
        .step(RuleStep::unanchored(TransformRule::append(
            Content::text(RESIDUALS_HEADING),
            Emphasis::heading(),
        )))
        .step(RuleStep::unanchored(TransformRule::append(
            Content::text(RESIDUALS_CLAUSE),
            Emphasis::plain(),
        )))
}
