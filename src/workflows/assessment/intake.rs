use std::sync::Arc;

use chrono::Utc;
use std::collections::BTreeMap;
use tracing::warn;

use super::domain::{
    AnswerValue, CaseFile, CaseId, RawAnswer, SubmissionDocument, SUPPORTED_SUBMISSION_SCHEMA,
};
use super::instrument::{Instrument, QuestionKind};

/// Validation errors raised by the intake guard.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("unsupported submission schema version {found} (supported: {supported})")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    #[error("submission is missing a case id")]
    MissingCaseId,
    #[error("answer references unknown question '{0}'")]
    UnknownQuestion(String),
}

/// Guard converting wire submissions into sanitized `CaseFile` instances.
///
/// The submission schema is explicit and versioned; payloads that do not
/// conform are quarantined here instead of being probed for alternate field
/// names downstream.
pub struct IntakeGuard {
    instrument: Arc<Instrument>,
}

impl IntakeGuard {
    pub fn new(instrument: Arc<Instrument>) -> Self {
        Self { instrument }
    }

    pub fn case_from_submission(
        &self,
        document: SubmissionDocument,
    ) -> Result<CaseFile, IntakeError> {
        if document.schema_version != SUPPORTED_SUBMISSION_SCHEMA {
            return Err(IntakeError::UnsupportedSchemaVersion {
                found: document.schema_version,
                supported: SUPPORTED_SUBMISSION_SCHEMA,
            });
        }

        let case_id = document.case_id.trim();
        if case_id.is_empty() {
            return Err(IntakeError::MissingCaseId);
        }
        let case_id = CaseId(case_id.to_string());

        let mut answers = BTreeMap::new();
        for RawAnswer {
            question_id,
            response,
        } in document.answers
        {
            let question = self
                .instrument
                .question(&question_id)
                .ok_or_else(|| IntakeError::UnknownQuestion(question_id.clone()))?;

            let Some(value) = scalar_answer(response) else {
                warn!(case = %case_id.0, question = %question_id, "dropping non-scalar answer");
                continue;
            };

            if let (QuestionKind::OpenText, Some(min_chars)) = (question.kind, question.min_chars) {
                if let AnswerValue::Text(text) = &value {
                    if text.trim().chars().count() < min_chars {
                        warn!(
                            case = %case_id.0,
                            question = %question_id,
                            min_chars,
                            "open text answer below minimum length"
                        );
                    }
                }
            }

            // Duplicate answers for one question id: last write wins.
            answers.insert(question_id, value);
        }

        Ok(CaseFile {
            case_id,
            answers,
            received_at: document.received_at.unwrap_or_else(Utc::now),
        })
    }
}

fn scalar_answer(value: serde_json::Value) -> Option<AnswerValue> {
    match value {
        serde_json::Value::Number(number) => number.as_f64().map(AnswerValue::Number),
        serde_json::Value::Bool(flag) => Some(AnswerValue::Boolean(flag)),
        serde_json::Value::String(text) => Some(AnswerValue::Text(text)),
        _ => None,
    }
}
