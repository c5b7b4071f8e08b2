use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for submitted assessment cases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaseId(pub String);

/// Submission document revision this crate understands.
pub const SUPPORTED_SUBMISSION_SCHEMA: u32 = 1;

/// One respondent's answers as produced by the external intake layer.
///
/// The schema is explicit and versioned: `response` is the only recognized
/// answer field, and payloads that do not conform are quarantined at intake
/// instead of being probed for alternate key names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDocument {
    #[serde(default = "default_submission_schema")]
    pub schema_version: u32,
    pub case_id: String,
    pub answers: Vec<RawAnswer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
}

fn default_submission_schema() -> u32 {
    SUPPORTED_SUBMISSION_SCHEMA
}

/// Wire-level answer before intake sanitization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAnswer {
    pub question_id: String,
    pub response: serde_json::Value,
}

/// Scalar answer value retained after intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(f64),
    Boolean(bool),
    Text(String),
}

impl AnswerValue {
    /// Numeric coercion: numbers directly, numeric strings by parsing.
    /// Booleans and other text are not numeric.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(value) => Some(*value),
            AnswerValue::Text(text) => text.trim().parse::<f64>().ok(),
            AnswerValue::Boolean(_) => None,
        }
    }

    /// String coercion used by equality and membership predicates.
    pub fn as_text(&self) -> String {
        match self {
            AnswerValue::Number(value) => {
                if value.fract() == 0.0 && value.is_finite() {
                    format!("{}", *value as i64)
                } else {
                    format!("{value}")
                }
            }
            AnswerValue::Boolean(value) => value.to_string(),
            AnswerValue::Text(text) => text.clone(),
        }
    }
}

/// The sanitized case after intake validation: at most one answer per
/// question, keyed by question id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseFile {
    pub case_id: CaseId,
    pub answers: std::collections::BTreeMap<String, AnswerValue>,
    pub received_at: DateTime<Utc>,
}

/// High level status tracked through the assessment workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Submitted,
    Drafted,
    Approved,
}

impl AssessmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AssessmentStatus::Submitted => "submitted",
            AssessmentStatus::Drafted => "drafted",
            AssessmentStatus::Approved => "approved",
        }
    }
}
