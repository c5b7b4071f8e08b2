use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::workflows::assessment::domain::{
    AnswerValue, CaseFile, CaseId, RawAnswer, SubmissionDocument,
};
use crate::workflows::assessment::instrument::{
    AggregateIndex, BandThreshold, ChoiceOption, ConfidenceConfig, ConsistencyRule, Dimension,
    Instrument, Predicate, PredicateTest, Question, QuestionKind, RuleKind, ScaleBounds, Severity,
};
use crate::workflows::assessment::report::AssessmentReportView;
use crate::workflows::assessment::repository::{
    CaseRecord, CaseRepository, DispatchError, ReportDispatcher, RepositoryError,
};
use crate::workflows::assessment::scoring::ScoringEngine;
use crate::workflows::assessment::service::AssessmentService;

pub(super) fn timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-08-01T09:30:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

fn likert(id: &str, dimension: &str, reverse_scored: bool) -> Question {
    Question {
        id: id.to_string(),
        dimension: dimension.to_string(),
        kind: QuestionKind::Likert5,
        reverse_scored,
        min_chars: None,
        bounds: None,
        options: Vec::new(),
    }
}

fn choice(id: &str, dimension: &str, options: &[(&str, f64)]) -> Question {
    Question {
        id: id.to_string(),
        dimension: dimension.to_string(),
        kind: QuestionKind::MultipleChoice,
        reverse_scored: false,
        min_chars: None,
        bounds: None,
        options: options
            .iter()
            .map(|(label, score)| ChoiceOption {
                label: label.to_string(),
                score: *score,
            })
            .collect(),
    }
}

pub(super) fn instrument() -> Instrument {
    Instrument {
        schema_version: 1,
        instrument_id: "integrity-screen-v2".to_string(),
        question_bank: vec![
            likert("DI-1", "DI", false),
            likert("DI-2", "DI", true),
            choice(
                "AC-1",
                "AC",
                &[
                    ("never", 5.0),
                    ("rarely", 4.0),
                    ("sometimes", 3.0),
                    ("often", 2.0),
                    ("always", 1.0),
                ],
            ),
            Question {
                id: "AC-2".to_string(),
                dimension: "AC".to_string(),
                kind: QuestionKind::OpenText,
                reverse_scored: false,
                min_chars: Some(20),
                bounds: None,
                options: Vec::new(),
            },
            likert("TR-1", "TR", false),
            choice("TR-2", "TR", &[("yes", 5.0), ("no", 1.0)]),
            likert("RC-1", "RC", false),
            Question {
                id: "SR-1".to_string(),
                dimension: "SR".to_string(),
                kind: QuestionKind::Scale,
                reverse_scored: false,
                min_chars: None,
                bounds: Some(ScaleBounds { min: 0.0, max: 4.0 }),
                options: Vec::new(),
            },
            likert("EM-1", "EM", false),
        ],
        dimensions: vec![
            dimension("DI", "Decision Integrity"),
            dimension("AC", "Accountability"),
            dimension("TR", "Transparency"),
            dimension("RC", "Rule Conformance"),
            dimension("SR", "Stress Response"),
            dimension("EM", "Ethical Mindset"),
        ],
        bands: vec![
            BandThreshold {
                label: "Risk Zone".to_string(),
                upper: Some(2.5),
            },
            BandThreshold {
                label: "Watch Zone".to_string(),
                upper: Some(3.5),
            },
            BandThreshold {
                label: "Stable Zone".to_string(),
                upper: None,
            },
        ],
        aggregate_indices: vec![
            AggregateIndex {
                id: "integrity_index".to_string(),
                dimensions: vec!["DI".to_string(), "AC".to_string(), "TR".to_string()],
            },
            AggregateIndex {
                id: "reliability_index".to_string(),
                dimensions: vec![
                    "RC".to_string(),
                    "SR".to_string(),
                    "EM".to_string(),
                    "TR".to_string(),
                ],
            },
        ],
        consistency_checks: vec![
            ConsistencyRule {
                id: "CC-1".to_string(),
                title: "Elevated self-rating with denied disclosure".to_string(),
                severity: Severity::High,
                kind: RuleKind::ContradictionPair,
                if_group: vec![Predicate {
                    question_id: "DI-1".to_string(),
                    test: PredicateTest::GteLikert(4.0),
                }],
                and_group: vec![Predicate {
                    question_id: "TR-2".to_string(),
                    test: PredicateTest::Equals("no".to_string()),
                }],
                message: "High decision-integrity self-rating contradicts the disclosure answer."
                    .to_string(),
            },
            ConsistencyRule {
                id: "CC-2".to_string(),
                title: "Rule conformance versus stress response".to_string(),
                severity: Severity::Medium,
                kind: RuleKind::ContradictionPair,
                if_group: vec![Predicate {
                    question_id: "RC-1".to_string(),
                    test: PredicateTest::GteLikert(4.0),
                }],
                and_group: vec![Predicate {
                    question_id: "SR-1".to_string(),
                    test: PredicateTest::In(vec!["0".to_string(), "1".to_string()]),
                }],
                message: "Strong rule conformance contradicts the reported stress response."
                    .to_string(),
            },
            ConsistencyRule {
                id: "CC-3".to_string(),
                title: "Response latency outlier".to_string(),
                severity: Severity::Low,
                kind: RuleKind::Other("response_latency".to_string()),
                if_group: Vec::new(),
                and_group: Vec::new(),
                message: "Answer timing suggests inattentive responding.".to_string(),
            },
        ],
        confidence_adjustments: ConfidenceConfig {
            base_confidence: 0.85,
            penalty_by_severity: BTreeMap::from([
                (Severity::Low, 0.03),
                (Severity::Medium, 0.06),
                (Severity::High, 0.10),
            ]),
            floor: 0.35,
        },
    }
}

fn dimension(code: &str, name: &str) -> Dimension {
    Dimension {
        code: code.to_string(),
        name: name.to_string(),
    }
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(Arc::new(instrument()))
}

pub(super) fn case(answers: &[(&str, AnswerValue)]) -> CaseFile {
    CaseFile {
        case_id: CaseId("case-0001".to_string()),
        answers: answers
            .iter()
            .map(|(id, value)| (id.to_string(), value.clone()))
            .collect(),
        received_at: timestamp(),
    }
}

pub(super) fn submission_document(case_id: &str) -> SubmissionDocument {
    SubmissionDocument {
        schema_version: 1,
        case_id: case_id.to_string(),
        answers: vec![
            raw("DI-1", json!(4)),
            raw("DI-2", json!(2)),
            raw("AC-1", json!("never")),
            raw(
                "AC-2",
                json!("I double checked the ledger before sign-off."),
            ),
            raw("TR-1", json!(4)),
            raw("TR-2", json!("yes")),
            raw("RC-1", json!(5)),
            raw("SR-1", json!(3)),
            raw("EM-1", json!(4)),
        ],
        received_at: Some(timestamp()),
    }
}

pub(super) fn raw(question_id: &str, response: serde_json::Value) -> RawAnswer {
    RawAnswer {
        question_id: question_id.to_string(),
        response,
    }
}

pub(super) fn build_service() -> (
    AssessmentService<MemoryRepository, MemoryDispatcher>,
    Arc<MemoryRepository>,
    Arc<MemoryDispatcher>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let dispatcher = Arc::new(MemoryDispatcher::default());
    let service = AssessmentService::new(
        Arc::new(instrument()),
        repository.clone(),
        dispatcher.clone(),
    );
    (service, repository, dispatcher)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<CaseId, CaseRecord>>>,
}

impl CaseRepository for MemoryRepository {
    fn insert(&self, record: CaseRecord) -> Result<CaseRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.case.case_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.case.case_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: CaseRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.case.case_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &CaseId) -> Result<Option<CaseRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn pending(&self, _limit: usize) -> Result<Vec<CaseRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDispatcher {
    reports: Arc<Mutex<Vec<AssessmentReportView>>>,
}

impl MemoryDispatcher {
    pub(super) fn reports(&self) -> Vec<AssessmentReportView> {
        self.reports.lock().expect("dispatcher mutex poisoned").clone()
    }
}

impl ReportDispatcher for MemoryDispatcher {
    fn dispatch(&self, report: AssessmentReportView) -> Result<(), DispatchError> {
        self.reports
            .lock()
            .expect("dispatcher mutex poisoned")
            .push(report);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl CaseRepository for UnavailableRepository {
    fn insert(&self, _record: CaseRecord) -> Result<CaseRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: CaseRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &CaseId) -> Result<Option<CaseRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn pending(&self, _limit: usize) -> Result<Vec<CaseRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct FailingDispatcher;

impl ReportDispatcher for FailingDispatcher {
    fn dispatch(&self, _report: AssessmentReportView) -> Result<(), DispatchError> {
        Err(DispatchError::Transport("smtp relay unreachable".to_string()))
    }
}
