pub(crate) mod aggregate;
pub(crate) mod bands;
pub(crate) mod normalize;

pub use bands::{BandVerdict, INSUFFICIENT_DATA_LABEL};

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::consistency::{self, ConsistencyResult};
use super::domain::{AnswerValue, CaseFile, CaseId};
use super::instrument::{Instrument, QuestionKind};

/// Stateless engine mapping a sanitized case file to per-item scores,
/// dimension aggregates, consistency hits, and confidence. Borrows the case
/// for the duration of one call and retains nothing across calls.
pub struct ScoringEngine {
    instrument: Arc<Instrument>,
}

impl ScoringEngine {
    pub fn new(instrument: Arc<Instrument>) -> Self {
        Self { instrument }
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    /// Normalize every bank question against the case answers, then
    /// aggregate into dimension means and overall indices.
    pub fn score(&self, case: &CaseFile) -> ScoringResult {
        let scored_items: Vec<ScoredItem> = self
            .instrument
            .question_bank
            .iter()
            .map(|question| {
                let response = case.answers.get(&question.id);
                ScoredItem {
                    question_id: question.id.clone(),
                    dimension: question.dimension.clone(),
                    kind: question.kind,
                    response: response.cloned(),
                    score: normalize::normalize(question, response),
                }
            })
            .collect();

        let (dimension_scores, aggregate_indices) =
            aggregate::aggregate(&self.instrument, &scored_items);

        ScoringResult {
            scored_items,
            dimension_scores,
            aggregate_indices,
        }
    }

    pub fn evaluate_consistency(&self, case: &CaseFile) -> ConsistencyResult {
        consistency::evaluate_case(&self.instrument, case)
    }

    /// Full draft: scoring plus the independently-evaluated consistency pass.
    pub fn assess(&self, case: &CaseFile) -> DraftAssessment {
        DraftAssessment {
            case_id: case.case_id.clone(),
            scoring: self.score(case),
            consistency: self.evaluate_consistency(case),
        }
    }

    /// Band verdict for a dimension or index score under this instrument's
    /// cut points.
    pub fn band(&self, score: Option<f64>) -> BandVerdict {
        bands::classify(score, &self.instrument.bands)
    }
}

/// Per-question scoring trail retained for transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub question_id: String,
    pub dimension: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub response: Option<AnswerValue>,
    pub score: Option<f64>,
}

/// Derived scoring output. Regenerable at any time from instrument plus
/// submission; never hand-edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub scored_items: Vec<ScoredItem>,
    pub dimension_scores: BTreeMap<String, Option<f64>>,
    pub aggregate_indices: BTreeMap<String, Option<f64>>,
}

/// The scored-but-unapproved assessment gated behind human review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftAssessment {
    pub case_id: CaseId,
    pub scoring: ScoringResult,
    pub consistency: ConsistencyResult,
}
