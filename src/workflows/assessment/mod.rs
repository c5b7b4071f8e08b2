//! Questionnaire intake, scoring, consistency evaluation, confidence
//! derivation, and approval gating for one assessment instrument.
//!
//! The engine itself is pure: an immutable [`Instrument`] plus one sanitized
//! [`CaseFile`] map to scores, aggregates, rule hits, and confidence in a
//! single synchronous pass. Persistence, report rendering, and delivery stay
//! behind the `repository` traits as external collaborators.

pub(crate) mod consistency;
pub mod domain;
pub mod instrument;
pub(crate) mod intake;
pub mod report;
pub mod repository;
pub(crate) mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use consistency::{Confidence, ConfidenceLevel, ConsistencyResult, RuleHit};
pub use domain::{
    AnswerValue, AssessmentStatus, CaseFile, CaseId, RawAnswer, SubmissionDocument,
    SUPPORTED_SUBMISSION_SCHEMA,
};
pub use instrument::{
    AggregateIndex, BandThreshold, ChoiceOption, ConfidenceConfig, ConsistencyRule, Dimension,
    Instrument, InstrumentError, Predicate, PredicateTest, Question, QuestionKind, RuleKind,
    ScaleBounds, Severity, SUPPORTED_INSTRUMENT_SCHEMA,
};
pub use intake::{IntakeError, IntakeGuard};
pub use report::{AssessmentReportView, DimensionReportEntry, IndexReportEntry};
pub use repository::{
    CaseRecord, CaseRepository, CaseStatusView, DispatchError, ReportDispatcher, RepositoryError,
};
pub use scoring::{
    BandVerdict, DraftAssessment, ScoredItem, ScoringEngine, ScoringResult,
    INSUFFICIENT_DATA_LABEL,
};
pub use service::{AssessmentService, AssessmentServiceError};
