//! Rule set configuration: class definitions, signal compilation, validation.
//!
//! The class set is open: class names are free-form strings taken from the
//! rules document, not a closed enum, so new document types can be added
//! purely through configuration. Classes are stored in a `BTreeMap`, which
//! fixes the rule-set iteration order (lexicographic by class name); the
//! classifier's tie-break relies on that order being deterministic.

use std::collections::BTreeMap;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::models::config::{PipelineConfig, SignalWeights};

/// Reserved fallback class. The loader guarantees it exists in every rule
/// set, even when the rules document omits it.
pub const FALLBACK_CLASS: &str = "other";

/// Per-class rule group as it appears in the rules document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassSpec {
    /// Single keywords, matched case-insensitively as substrings.
    pub keywords: Vec<String>,

    /// Multi-word phrases, matched case-insensitively and contiguously.
    pub phrases: Vec<String>,

    /// Regex patterns, compiled case-insensitive at load time.
    pub regexes: Vec<String>,

    /// Per-class softmax temperature override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Per-class signal weight override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<SignalWeights>,
}

/// A compiled scoring signal. The three kinds form a closed set, each
/// exposing the same weighted-hit operation consumed by the scorer.
#[derive(Debug, Clone)]
pub(crate) enum Signal {
    /// Case-insensitive substring; needle is pre-normalized at load.
    Keyword { needle: String, weight: f64 },
    /// Contiguous multi-word match; needle is pre-normalized at load.
    Phrase { needle: String, weight: f64 },
    /// Compiled case-insensitive regex, run against the raw text.
    Pattern { regex: Regex, weight: f64 },
}

impl Signal {
    /// Sum of weighted hits in a document. Every occurrence contributes;
    /// duplicate matches are deliberately not capped, so repeated signals
    /// strengthen the class score.
    pub(crate) fn weighted_hits(&self, normalized: &str, raw: &str) -> f64 {
        match self {
            Signal::Keyword { needle, weight } | Signal::Phrase { needle, weight } => {
                if needle.is_empty() {
                    return 0.0;
                }
                weight * normalized.matches(needle.as_str()).count() as f64
            }
            Signal::Pattern { regex, weight } => weight * regex.find_iter(raw).count() as f64,
        }
    }
}

/// A class's rule group after global defaults have been merged in.
#[derive(Debug, Clone)]
pub struct ClassRules {
    signals: Vec<Signal>,
    temperature: f64,
}

impl ClassRules {
    pub(crate) fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Number of compiled signals across all three kinds.
    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    /// Resolved softmax temperature for this class.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }
}

/// Validated, compiled rule set mapping class names to rule groups.
#[derive(Debug, Clone)]
pub struct RuleSet {
    classes: BTreeMap<String, ClassRules>,
}

impl RuleSet {
    /// Load and compile a rules document from a JSON file.
    pub fn from_file(path: &Path, config: &PipelineConfig) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content, config)
    }

    /// Load and compile a rules document from a JSON string.
    pub fn from_json_str(json: &str, config: &PipelineConfig) -> Result<Self, ConfigError> {
        let specs: BTreeMap<String, ClassSpec> = serde_json::from_str(json)?;
        Self::from_specs(specs, config)
    }

    /// Compile class specs, merging global defaults into every class.
    ///
    /// All validation happens here, once: malformed regexes, negative
    /// weights, and non-positive temperatures are configuration errors and
    /// never surface per document.
    pub fn from_specs(
        mut specs: BTreeMap<String, ClassSpec>,
        config: &PipelineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        // The fallback class must always be scorable, even with no signals.
        specs.entry(FALLBACK_CLASS.to_string()).or_default();

        let mut classes = BTreeMap::new();
        for (name, spec) in specs {
            let rules = compile_class(&name, spec, config)?;
            debug!(
                class = %name,
                signals = rules.signals.len(),
                temperature = rules.temperature,
                "compiled class rules"
            );
            classes.insert(name, rules);
        }

        Ok(Self { classes })
    }

    /// Number of classes, fallback included.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    /// Class names in rule-set iteration order.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Classes with their compiled rules, in rule-set iteration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassRules)> {
        self.classes.iter().map(|(name, rules)| (name.as_str(), rules))
    }

    /// Mean of the resolved per-class temperatures. This is the effective
    /// temperature used to calibrate a score vector over the whole class
    /// set, since softmax takes a single temperature.
    pub fn mean_temperature(&self) -> f64 {
        if self.classes.is_empty() {
            return 1.0;
        }
        let sum: f64 = self.classes.values().map(|c| c.temperature).sum();
        sum / self.classes.len() as f64
    }
}

fn compile_class(
    name: &str,
    spec: ClassSpec,
    config: &PipelineConfig,
) -> Result<ClassRules, ConfigError> {
    let weights = spec.weights.unwrap_or(config.weights);
    weights.validate(name)?;

    let temperature = spec.temperature.unwrap_or(config.temperature);
    if temperature <= 0.0 || temperature.is_nan() {
        return Err(ConfigError::NonPositiveTemperature {
            class: name.to_string(),
            value: temperature,
        });
    }

    let mut signals = Vec::new();
    for keyword in spec.keywords {
        signals.push(Signal::Keyword {
            needle: normalize_needle(&keyword),
            weight: weights.keyword,
        });
    }
    for phrase in spec.phrases {
        signals.push(Signal::Phrase {
            needle: normalize_needle(&phrase),
            weight: weights.phrase,
        });
    }
    for pattern in spec.regexes {
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| ConfigError::InvalidRegex {
                class: name.to_string(),
                pattern: pattern.clone(),
                source,
            })?;
        signals.push(Signal::Pattern {
            regex,
            weight: weights.regex,
        });
    }

    Ok(ClassRules {
        signals,
        temperature,
    })
}

/// Normalize a keyword or phrase the same way document text is normalized:
/// lowercase with whitespace runs collapsed to single spaces.
fn normalize_needle(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spec(keywords: &[&str], phrases: &[&str], regexes: &[&str]) -> ClassSpec {
        ClassSpec {
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            phrases: phrases.iter().map(|s| s.to_string()).collect(),
            regexes: regexes.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_fallback_class_is_inserted() {
        let rules =
            RuleSet::from_json_str(r#"{"invoice": {"keywords": ["invoice"]}}"#, &PipelineConfig::default())
                .unwrap();
        assert!(rules.contains(FALLBACK_CLASS));
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_iteration_order_is_lexicographic() {
        let json = r#"{"passport": {}, "invoice": {}, "flight_ticket": {}}"#;
        let rules = RuleSet::from_json_str(json, &PipelineConfig::default()).unwrap();
        let names: Vec<&str> = rules.class_names().collect();
        assert_eq!(names, vec!["flight_ticket", "invoice", "other", "passport"]);
    }

    #[test]
    fn test_malformed_regex_fails_at_load() {
        let json = r#"{"invoice": {"regexes": ["(unclosed"]}}"#;
        let err = RuleSet::from_json_str(json, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRegex { .. }));
    }

    #[test]
    fn test_negative_weight_fails_at_load() {
        let mut specs = BTreeMap::new();
        let mut class = spec(&["invoice"], &[], &[]);
        class.weights = Some(SignalWeights {
            keyword: -1.0,
            ..Default::default()
        });
        specs.insert("invoice".to_string(), class);
        let err = RuleSet::from_specs(specs, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::NegativeWeight { .. }));
    }

    #[test]
    fn test_non_positive_temperature_fails_at_load() {
        let mut specs = BTreeMap::new();
        let mut class = spec(&[], &[], &[]);
        class.temperature = Some(0.0);
        specs.insert("invoice".to_string(), class);
        let err = RuleSet::from_specs(specs, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveTemperature { .. }));
    }

    #[test]
    fn test_mean_temperature_mixes_overrides_and_default() {
        let json = r#"{"invoice": {"temperature": 0.5}, "passport": {}}"#;
        let rules = RuleSet::from_json_str(json, &PipelineConfig::default()).unwrap();
        // invoice 0.5, passport 1.0, other 1.0
        let expected = (0.5 + 1.0 + 1.0) / 3.0;
        assert!((rules.mean_temperature() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_phrase_needle_is_normalized() {
        let json = r#"{"invoice": {"phrases": ["Total   DUE"]}}"#;
        let rules = RuleSet::from_json_str(json, &PipelineConfig::default()).unwrap();
        let (_, class) = rules.iter().find(|(n, _)| *n == "invoice").unwrap();
        match &class.signals()[0] {
            Signal::Phrase { needle, .. } => assert_eq!(needle, "total due"),
            other => panic!("unexpected signal: {other:?}"),
        }
    }
}
