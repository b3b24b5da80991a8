//! Configuration structures for the classification pipeline.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Weights applied to the three signal kinds when scoring a class.
///
/// Defaults follow the historical behavior of the rule engine: phrases carry
/// more weight than single keywords because a contiguous multi-word match is
/// a stronger signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalWeights {
    /// Weight contributed by each keyword occurrence.
    pub keyword: f64,

    /// Weight contributed by each phrase occurrence.
    pub phrase: f64,

    /// Weight contributed by each regex match.
    pub regex: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            keyword: 1.0,
            phrase: 1.5,
            regex: 1.0,
        }
    }
}

impl SignalWeights {
    /// Validate that no weight is negative.
    pub(crate) fn validate(&self, class: &str) -> Result<(), ConfigError> {
        for (kind, value) in [
            ("keyword", self.keyword),
            ("phrase", self.phrase),
            ("regex", self.regex),
        ] {
            if value < 0.0 || value.is_nan() {
                return Err(ConfigError::NegativeWeight {
                    class: class.to_string(),
                    kind,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Main configuration for the docsift pipeline.
///
/// Global defaults here are merged into each class's rule group once at
/// rule-set load time, so the scoring path never needs fallback branching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Default softmax temperature; classes may override it individually.
    pub temperature: f64,

    /// Minimum confidence for the top class to stand; below this the
    /// decision falls back to the reserved `other` class.
    pub min_confidence: f64,

    /// Default signal weights; classes may override them individually.
    pub weights: SignalWeights,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            min_confidence: 0.6,
            weights: SignalWeights::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Validate the global parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature <= 0.0 || self.temperature.is_nan() {
            return Err(ConfigError::NonPositiveDefaultTemperature(self.temperature));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::InvalidMinConfidence(self.min_confidence));
        }
        self.weights.validate("<defaults>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.temperature, 1.0);
        assert_eq!(config.min_confidence, 0.6);
        assert_eq!(config.weights.phrase, 1.5);
        config.validate().unwrap();
    }

    #[test]
    fn test_rejects_bad_temperature() {
        let config = PipelineConfig {
            temperature: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_min_confidence() {
        let config = PipelineConfig {
            min_confidence: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"temperature": 0.5}"#).unwrap();
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.min_confidence, 0.6);
    }
}
