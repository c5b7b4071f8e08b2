use crate::workflows::assessment::instrument::{ConfidenceConfig, Severity};
use crate::workflows::assessment::scoring::aggregate::round2;

use super::{Confidence, ConfidenceLevel, RuleHit};

const HIGH_CUTOFF: f64 = 0.80;
const MEDIUM_CUTOFF: f64 = 0.65;

/// Applied when the instrument maps neither the hit's severity nor MEDIUM.
const FALLBACK_MEDIUM_PENALTY: f64 = 0.06;

/// Total severity-to-penalty lookup: a severity the instrument does not map
/// falls back to the MEDIUM penalty rather than silently contributing zero.
fn penalty_for(severity: Severity, config: &ConfidenceConfig) -> f64 {
    if let Some(&penalty) = config.penalty_by_severity.get(&severity) {
        return penalty;
    }
    config
        .penalty_by_severity
        .get(&Severity::Medium)
        .copied()
        .unwrap_or(FALLBACK_MEDIUM_PENALTY)
}

/// Base confidence minus one penalty per hit, floored and rounded for
/// display.
pub(crate) fn derive(hits: &[RuleHit], config: &ConfidenceConfig) -> Confidence {
    let penalties: f64 = hits
        .iter()
        .map(|hit| penalty_for(hit.severity, config))
        .sum();

    let score = round2((config.base_confidence - penalties).max(config.floor));

    let level = if score >= HIGH_CUTOFF {
        ConfidenceLevel::High
    } else if score >= MEDIUM_CUTOFF {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    };

    Confidence { score, level }
}
