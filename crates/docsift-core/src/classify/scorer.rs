//! Raw score computation: weighted signal hits per class.

use std::collections::BTreeMap;

use crate::rules::RuleSet;

/// Raw, unnormalized score per class. Computed fresh per document and
/// discarded after calibration.
pub type ScoreVector = BTreeMap<String, f64>;

/// Lowercase the text and collapse whitespace runs to single spaces, so
/// keyword and phrase matching is insensitive to case and line breaks.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Compute the raw score for every class in the rule set.
///
/// Pure function of text and rules. Keywords and phrases match against the
/// normalized text; regexes run against the raw text so patterns can use
/// anchors and their own whitespace classes. Every occurrence contributes
/// its signal weight; a class with no signals or no matches scores 0.0.
pub fn score(text: &str, rules: &RuleSet) -> ScoreVector {
    let normalized = normalize_text(text);

    rules
        .iter()
        .map(|(name, class)| {
            let total: f64 = class
                .signals()
                .iter()
                .map(|signal| signal.weighted_hits(&normalized, text))
                .sum();
            (name.to_string(), total)
        })
        .collect()
}
