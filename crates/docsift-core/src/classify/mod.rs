//! Document classification: scoring, calibration, and thresholding.

pub mod scorer;
pub mod softmax;

pub use scorer::{ScoreVector, normalize_text, score};
pub use softmax::{ProbabilityVector, calibrate};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::config::PipelineConfig;
use crate::rules::{FALLBACK_CLASS, RuleSet};

/// Outcome of classifying one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// The decided class. Falls back to [`FALLBACK_CLASS`] when confidence
    /// is below the configured minimum.
    pub top_class: String,

    /// Probability of the winning class before any fallback override.
    pub confidence: f64,

    /// Full calibrated distribution. Never altered by the fallback
    /// override; it always reflects the raw scores.
    pub probabilities: ProbabilityVector,

    /// Whether the decision was overridden to the fallback class.
    pub below_threshold: bool,
}

/// Classifier combining the scorer and calibrator with a confidence
/// threshold. Stateless per document; one instance can classify any number
/// of documents.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleSet,
    min_confidence: f64,
}

impl Classifier {
    pub fn new(rules: RuleSet, config: &PipelineConfig) -> Self {
        Self {
            rules,
            min_confidence: config.min_confidence,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Classify a document's extracted text.
    ///
    /// The winner is the class with maximum probability; ties resolve to
    /// the first class in rule-set iteration order, so repeated runs on
    /// identical input always agree.
    pub fn classify(&self, text: &str) -> Classification {
        let scores = score(text, &self.rules);
        let temperature = self.rules.mean_temperature();
        let probabilities = calibrate(&scores, temperature);

        let (winner, confidence) = probabilities
            .iter()
            .fold(None::<(&str, f64)>, |best, (class, &p)| match best {
                Some((_, bp)) if p <= bp => best,
                _ => Some((class.as_str(), p)),
            })
            .unwrap_or((FALLBACK_CLASS, 0.0));

        let below_threshold = confidence < self.min_confidence;
        let top_class = if below_threshold {
            FALLBACK_CLASS.to_string()
        } else {
            winner.to_string()
        };

        debug!(
            %top_class,
            confidence,
            below_threshold,
            temperature,
            "classified document"
        );

        Classification {
            top_class,
            confidence,
            probabilities,
            below_threshold,
        }
    }
}
