use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use super::domain::{AssessmentStatus, CaseId, SubmissionDocument};
use super::instrument::Instrument;
use super::intake::{IntakeError, IntakeGuard};
use super::report::AssessmentReportView;
use super::repository::{
    CaseRecord, CaseRepository, DispatchError, ReportDispatcher, RepositoryError,
};
use super::scoring::{DraftAssessment, ScoringEngine};

/// Service composing the intake guard, repository, scoring engine, and the
/// outbound report seam.
pub struct AssessmentService<R, D> {
    guard: Arc<IntakeGuard>,
    repository: Arc<R>,
    dispatcher: Arc<D>,
    engine: Arc<ScoringEngine>,
    instrument: Arc<Instrument>,
}

impl<R, D> AssessmentService<R, D>
where
    R: CaseRepository + 'static,
    D: ReportDispatcher + 'static,
{
    pub fn new(instrument: Arc<Instrument>, repository: Arc<R>, dispatcher: Arc<D>) -> Self {
        let guard = Arc::new(IntakeGuard::new(instrument.clone()));
        let engine = Arc::new(ScoringEngine::new(instrument.clone()));

        Self {
            guard,
            repository,
            dispatcher,
            engine,
            instrument,
        }
    }

    /// Accept a new submission, returning the repository-backed record.
    pub fn submit(
        &self,
        document: SubmissionDocument,
    ) -> Result<CaseRecord, AssessmentServiceError> {
        let case = self.guard.case_from_submission(document)?;

        let record = CaseRecord {
            case,
            status: AssessmentStatus::Submitted,
            draft: None,
            overrides: BTreeMap::new(),
            approved_at: None,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Score a submitted case and persist the draft for human review.
    pub fn score(&self, case_id: &CaseId) -> Result<DraftAssessment, AssessmentServiceError> {
        let mut record = self
            .repository
            .fetch(case_id)?
            .ok_or(RepositoryError::NotFound)?;

        let draft = self.engine.assess(&record.case);

        record.status = AssessmentStatus::Drafted;
        record.draft = Some(draft.clone());
        self.repository.update(record)?;

        Ok(draft)
    }

    /// Approve a drafted case, recording reviewer overrides, and hand the
    /// composed report to the dispatcher. Override values replace the
    /// engine-computed dimension scores without re-triggering scoring.
    pub fn approve(
        &self,
        case_id: &CaseId,
        overrides: BTreeMap<String, f64>,
    ) -> Result<AssessmentReportView, AssessmentServiceError> {
        let mut record = self
            .repository
            .fetch(case_id)?
            .ok_or(RepositoryError::NotFound)?;

        let draft = record
            .draft
            .clone()
            .ok_or_else(|| AssessmentServiceError::NotScored(case_id.0.clone()))?;

        for code in overrides.keys() {
            if self.instrument.dimension(code).is_none() {
                return Err(AssessmentServiceError::UnknownOverrideDimension(
                    code.clone(),
                ));
            }
        }

        let approved_at = Utc::now();
        let report = AssessmentReportView::compose(&self.instrument, &draft, &overrides, approved_at);

        record.status = AssessmentStatus::Approved;
        record.overrides = overrides;
        record.approved_at = Some(approved_at);
        self.repository.update(record)?;

        self.dispatcher.dispatch(report.clone())?;

        Ok(report)
    }

    /// Fetch a case and current status for host responses.
    pub fn get(&self, case_id: &CaseId) -> Result<CaseRecord, AssessmentServiceError> {
        let record = self
            .repository
            .fetch(case_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("case '{0}' has not been scored yet")]
    NotScored(String),
    #[error("override references unknown dimension '{0}'")]
    UnknownOverrideDimension(String),
}
