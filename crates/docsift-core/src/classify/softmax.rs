//! Temperature-scaled softmax calibration of raw scores.

use std::collections::BTreeMap;

use super::scorer::ScoreVector;

/// Calibrated probability per class. Values lie in [0, 1] and sum to 1
/// within floating tolerance.
pub type ProbabilityVector = BTreeMap<String, f64>;

/// Temperatures below this are clamped. Configuration validation rejects
/// non-positive temperatures long before this point; the clamp only guards
/// against division by zero if a caller bypasses the loader.
const MIN_TEMPERATURE: f64 = 1e-6;

/// Convert raw class scores to a probability distribution.
///
/// Standard softmax with temperature: `p_i = exp(s_i / T) / Σ exp(s_j / T)`.
/// Lower temperatures sharpen the distribution. The maximum score is
/// subtracted before exponentiating, which leaves the result unchanged but
/// keeps the exponentials bounded. An all-zero score vector calibrates to
/// the uniform distribution.
pub fn calibrate(scores: &ScoreVector, temperature: f64) -> ProbabilityVector {
    if scores.is_empty() {
        return ProbabilityVector::new();
    }

    let temperature = temperature.max(MIN_TEMPERATURE);

    if scores.values().all(|&s| s == 0.0) {
        let uniform = 1.0 / scores.len() as f64;
        return scores.keys().map(|k| (k.clone(), uniform)).collect();
    }

    let max = scores.values().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: ProbabilityVector = scores
        .iter()
        .map(|(k, &s)| (k.clone(), ((s - max) / temperature).exp()))
        .collect();
    let total: f64 = exps.values().sum();

    exps.into_iter().map(|(k, e)| (k, e / total)).collect()
}
