use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AssessmentStatus, CaseFile, CaseId};
use super::report::AssessmentReportView;
use super::scoring::DraftAssessment;

/// Repository record containing the case, its draft, and approval metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    pub case: CaseFile,
    pub status: AssessmentStatus,
    pub draft: Option<DraftAssessment>,
    #[serde(default)]
    pub overrides: BTreeMap<String, f64>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
}

impl CaseRecord {
    pub fn status_view(&self) -> CaseStatusView {
        let consistency = self.draft.as_ref().map(|draft| &draft.consistency);
        CaseStatusView {
            case_id: self.case.case_id.clone(),
            status: self.status.label(),
            confidence: consistency.map(|result| result.confidence.score),
            consistency_hits: consistency.map(|result| result.hits.len()),
        }
    }
}

/// Sanitized representation of a case's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct CaseStatusView {
    pub case_id: CaseId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistency_hits: Option<usize>,
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait CaseRepository: Send + Sync {
    fn insert(&self, record: CaseRecord) -> Result<CaseRecord, RepositoryError>;
    fn update(&self, record: CaseRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &CaseId) -> Result<Option<CaseRecord>, RepositoryError>;
    fn pending(&self, limit: usize) -> Result<Vec<CaseRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound rendering seam: the PDF/email collaborators live behind this
/// trait and receive the composed report view.
pub trait ReportDispatcher: Send + Sync {
    fn dispatch(&self, report: AssessmentReportView) -> Result<(), DispatchError>;
}

/// Report delivery error.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("report transport unavailable: {0}")]
    Transport(String),
}
