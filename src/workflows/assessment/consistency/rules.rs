use std::collections::BTreeMap;

use tracing::warn;

use crate::workflows::assessment::domain::AnswerValue;
use crate::workflows::assessment::instrument::{
    ConsistencyRule, Predicate, PredicateTest, RuleKind,
};
use crate::workflows::assessment::scoring::normalize::canonical_text;

use super::RuleHit;

/// Evaluate all declared checks against the answers, reporting every match
/// in declaration order. Unrecognized rule kinds are skipped, not errors, so
/// newer rule authoring never breaks an older engine.
pub(crate) fn evaluate(
    rules: &[ConsistencyRule],
    answers: &BTreeMap<String, AnswerValue>,
) -> Vec<RuleHit> {
    let mut hits = Vec::new();

    for rule in rules {
        match &rule.kind {
            RuleKind::ContradictionPair => {
                if group_holds(&rule.if_group, answers) && group_holds(&rule.and_group, answers) {
                    hits.push(RuleHit {
                        rule_id: rule.id.clone(),
                        title: rule.title.clone(),
                        severity: rule.severity,
                        message: rule.message.clone(),
                    });
                }
            }
            RuleKind::Other(kind) => {
                warn!(rule = %rule.id, kind = %kind, "skipping consistency check with unrecognized kind");
            }
        }
    }

    hits
}

/// An empty predicate group is vacuously true.
fn group_holds(group: &[Predicate], answers: &BTreeMap<String, AnswerValue>) -> bool {
    group
        .iter()
        .all(|predicate| predicate_holds(predicate, answers))
}

/// A predicate over a missing answer is false, never an error.
fn predicate_holds(predicate: &Predicate, answers: &BTreeMap<String, AnswerValue>) -> bool {
    let Some(answer) = answers.get(&predicate.question_id) else {
        return false;
    };

    match &predicate.test {
        PredicateTest::Equals(expected) => {
            canonical_text(&answer.as_text()) == canonical_text(expected)
        }
        PredicateTest::In(candidates) => {
            let actual = canonical_text(&answer.as_text());
            candidates
                .iter()
                .any(|candidate| canonical_text(candidate) == actual)
        }
        PredicateTest::GteLikert(threshold) => answer
            .numeric()
            .map(|value| value >= *threshold)
            .unwrap_or(false),
    }
}
