use crate::workflows::assessment::domain::AnswerValue;
use crate::workflows::assessment::instrument::{Question, QuestionKind, ScaleBounds};

/// Canonical textual form for label matching: BOM/zero-width stripped,
/// whitespace collapsed, lowercased.
pub(crate) fn canonical_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

const LIKERT_LABELS: [(&str, i64); 6] = [
    ("strongly disagree", 1),
    ("disagree", 2),
    ("neutral", 3),
    ("neither agree nor disagree", 3),
    ("agree", 4),
    ("strongly agree", 5),
];

fn likert_label_value(text: &str) -> Option<i64> {
    let canonical = canonical_text(text);
    LIKERT_LABELS
        .iter()
        .find(|(label, _)| *label == canonical)
        .map(|(_, value)| *value)
}

/// Coerce a raw answer to an integral Likert value. Accepts integers,
/// integral floats, numeric strings, and canonical Likert labels.
fn likert_value(raw: &AnswerValue) -> Option<i64> {
    match raw {
        AnswerValue::Number(value) => {
            if value.is_finite() && value.fract() == 0.0 {
                Some(*value as i64)
            } else {
                None
            }
        }
        AnswerValue::Text(text) => {
            let trimmed = text.trim();
            if let Ok(parsed) = trimmed.parse::<i64>() {
                return Some(parsed);
            }
            likert_label_value(trimmed)
        }
        AnswerValue::Boolean(_) => None,
    }
}

/// Map a raw answer to a canonical numeric score for one question, or `None`
/// when the answer is missing, malformed, or inherently unscored. Pure over
/// its inputs; a bad answer never fails the rest of the submission.
pub(crate) fn normalize(question: &Question, raw: Option<&AnswerValue>) -> Option<f64> {
    let raw = raw?;
    match question.kind {
        QuestionKind::Likert5 => {
            let value = likert_value(raw).filter(|value| (1..=5).contains(value))?;
            let scored = if question.reverse_scored { 6 - value } else { value };
            Some(scored as f64)
        }
        QuestionKind::MultipleChoice => {
            let selected = canonical_text(&raw.as_text());
            question
                .options
                .iter()
                .find(|option| canonical_text(&option.label) == selected)
                .map(|option| option.score)
        }
        QuestionKind::OpenText => None,
        QuestionKind::Scale => {
            let bounds = question.bounds?;
            scale_value(raw, bounds)
        }
    }
}

fn scale_value(raw: &AnswerValue, bounds: ScaleBounds) -> Option<f64> {
    let within = |value: f64| (value >= bounds.min && value <= bounds.max).then_some(value);

    match raw {
        AnswerValue::Number(value) => value.is_finite().then_some(*value).and_then(within),
        AnswerValue::Boolean(value) => Some(if *value { bounds.max } else { bounds.min }),
        AnswerValue::Text(text) => {
            let trimmed = text.trim();
            if let Ok(parsed) = trimmed.parse::<f64>() {
                return within(parsed);
            }
            match canonical_text(trimmed).as_str() {
                "yes" | "true" => Some(bounds.max),
                "no" | "false" => Some(bounds.min),
                _ => likert_label_value(trimmed)
                    .map(|value| value as f64)
                    .and_then(within),
            }
        }
    }
}
