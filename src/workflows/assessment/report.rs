use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::consistency::{Confidence, RuleHit};
use super::domain::CaseId;
use super::instrument::Instrument;
use super::scoring::{bands, BandVerdict, DraftAssessment};

/// Dimension entry carrying the effective score shown to readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionReportEntry {
    pub code: String,
    pub name: String,
    pub score: Option<f64>,
    pub band: BandVerdict,
    pub band_label: String,
    pub overridden: bool,
}

/// Aggregate index entry with its band verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexReportEntry {
    pub id: String,
    pub score: Option<f64>,
    pub band: BandVerdict,
    pub band_label: String,
}

/// Rendering-layer view of an assessment, consumed by the external report
/// generator and approval UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReportView {
    pub case_id: CaseId,
    pub instrument_id: String,
    pub dimensions: Vec<DimensionReportEntry>,
    pub indices: Vec<IndexReportEntry>,
    pub hits: Vec<RuleHit>,
    pub confidence: Confidence,
    pub generated_at: DateTime<Utc>,
}

impl AssessmentReportView {
    /// Compose the display view from an approved draft. Reviewer overrides
    /// take precedence over engine-computed dimension scores; nothing is
    /// recomputed on their behalf.
    pub fn compose(
        instrument: &Instrument,
        draft: &DraftAssessment,
        overrides: &BTreeMap<String, f64>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let dimensions = instrument
            .dimensions
            .iter()
            .map(|dimension| {
                let computed = draft
                    .scoring
                    .dimension_scores
                    .get(&dimension.code)
                    .copied()
                    .flatten();
                let (score, overridden) = match overrides.get(&dimension.code) {
                    Some(&replacement) => (Some(replacement), true),
                    None => (computed, false),
                };
                let band = bands::classify(score, &instrument.bands);
                DimensionReportEntry {
                    code: dimension.code.clone(),
                    name: dimension.name.clone(),
                    score,
                    band_label: band.label().to_string(),
                    band,
                    overridden,
                }
            })
            .collect();

        let indices = instrument
            .aggregate_indices
            .iter()
            .map(|index| {
                let score = draft
                    .scoring
                    .aggregate_indices
                    .get(&index.id)
                    .copied()
                    .flatten();
                let band = bands::classify(score, &instrument.bands);
                IndexReportEntry {
                    id: index.id.clone(),
                    score,
                    band_label: band.label().to_string(),
                    band,
                }
            })
            .collect();

        Self {
            case_id: draft.case_id.clone(),
            instrument_id: instrument.instrument_id.clone(),
            dimensions,
            indices,
            hits: draft.consistency.hits.clone(),
            confidence: draft.consistency.confidence.clone(),
            generated_at,
        }
    }
}
