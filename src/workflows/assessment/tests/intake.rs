use std::sync::Arc;

use serde_json::json;

use super::common::*;
use crate::workflows::assessment::domain::AnswerValue;
use crate::workflows::assessment::intake::{IntakeError, IntakeGuard};

fn guard() -> IntakeGuard {
    IntakeGuard::new(Arc::new(instrument()))
}

#[test]
fn accepts_a_conforming_submission() {
    let guard = guard();
    let document = submission_document("case-0042");

    let case = guard.case_from_submission(document).expect("valid intake");

    assert_eq!(case.case_id.0, "case-0042");
    assert_eq!(case.answers.len(), 9);
    assert_eq!(case.answers["DI-1"], AnswerValue::Number(4.0));
    assert_eq!(case.received_at, timestamp());
}

#[test]
fn rejects_unsupported_schema_versions() {
    let guard = guard();
    let mut document = submission_document("case-0042");
    document.schema_version = 2;

    let error = guard
        .case_from_submission(document)
        .expect_err("future schema quarantined");

    assert!(matches!(
        error,
        IntakeError::UnsupportedSchemaVersion { found: 2, .. }
    ));
}

#[test]
fn rejects_blank_case_ids() {
    let guard = guard();
    let document = submission_document("  ");

    let error = guard
        .case_from_submission(document)
        .expect_err("blank case id quarantined");

    assert!(matches!(error, IntakeError::MissingCaseId));
}

#[test]
fn rejects_answers_for_unknown_questions() {
    let guard = guard();
    let mut document = submission_document("case-0042");
    document.answers.push(raw("ZZ-9", json!(3)));

    let error = guard
        .case_from_submission(document)
        .expect_err("unknown question quarantined");

    match error {
        IntakeError::UnknownQuestion(question_id) => assert_eq!(question_id, "ZZ-9"),
        other => panic!("expected unknown question error, got {other:?}"),
    }
}

#[test]
fn duplicate_answers_resolve_last_write_wins() {
    let guard = guard();
    let mut document = submission_document("case-0042");
    document.answers.push(raw("DI-1", json!(2)));

    let case = guard.case_from_submission(document).expect("valid intake");

    assert_eq!(case.answers["DI-1"], AnswerValue::Number(2.0));
}

#[test]
fn non_scalar_answers_are_dropped_not_fatal() {
    let guard = guard();
    let mut document = submission_document("case-0042");
    document
        .answers
        .retain(|answer| answer.question_id != "EM-1");
    document.answers.push(raw("EM-1", json!([1, 2, 3])));

    let case = guard.case_from_submission(document).expect("valid intake");

    assert!(!case.answers.contains_key("EM-1"));
    assert_eq!(case.answers["DI-1"], AnswerValue::Number(4.0));
}

#[test]
fn short_open_text_answers_are_retained() {
    let guard = guard();
    let mut document = submission_document("case-0042");
    document
        .answers
        .retain(|answer| answer.question_id != "AC-2");
    document.answers.push(raw("AC-2", json!("ok")));

    let case = guard.case_from_submission(document).expect("valid intake");

    assert_eq!(case.answers["AC-2"], AnswerValue::Text("ok".to_string()));
}

#[test]
fn stamps_received_at_when_the_document_omits_it() {
    let guard = guard();
    let mut document = submission_document("case-0042");
    document.received_at = None;

    let before = chrono::Utc::now();
    let case = guard.case_from_submission(document).expect("valid intake");

    assert!(case.received_at >= before);
}
