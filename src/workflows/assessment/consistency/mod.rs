pub(crate) mod confidence;
pub(crate) mod rules;

use serde::{Deserialize, Serialize};

use super::domain::CaseFile;
use super::instrument::{Instrument, Severity};

/// Emitted when a consistency check's full predicate set matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleHit {
    pub rule_id: String,
    pub title: String,
    pub severity: Severity,
    pub message: String,
}

/// Derived reliability indicator for the overall result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    pub score: f64,
    pub level: ConfidenceLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub const fn label(self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "LOW",
            ConfidenceLevel::Medium => "MEDIUM",
            ConfidenceLevel::High => "HIGH",
        }
    }
}

/// Consistency pass output: all matching rule hits in declaration order plus
/// the hit-adjusted confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyResult {
    pub hits: Vec<RuleHit>,
    pub confidence: Confidence,
}

pub(crate) fn evaluate_case(instrument: &Instrument, case: &CaseFile) -> ConsistencyResult {
    let hits = rules::evaluate(&instrument.consistency_checks, &case.answers);
    let confidence = confidence::derive(&hits, &instrument.confidence_adjustments);
    ConsistencyResult { hits, confidence }
}
