use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::scoring::normalize::canonical_text;

/// Instrument document revision this crate understands.
pub const SUPPORTED_INSTRUMENT_SCHEMA: u32 = 1;

/// Versioned definition of one assessment type: question bank, dimensions,
/// band cut points, consistency checks, and confidence adjustments.
///
/// Loaded once at startup, validated, then shared read-only for the life of
/// the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    #[serde(default = "default_instrument_schema")]
    pub schema_version: u32,
    pub instrument_id: String,
    pub question_bank: Vec<Question>,
    pub dimensions: Vec<Dimension>,
    pub bands: Vec<BandThreshold>,
    #[serde(default)]
    pub aggregate_indices: Vec<AggregateIndex>,
    #[serde(default)]
    pub consistency_checks: Vec<ConsistencyRule>,
    pub confidence_adjustments: ConfidenceConfig,
}

fn default_instrument_schema() -> u32 {
    SUPPORTED_INSTRUMENT_SCHEMA
}

impl Instrument {
    /// Parse and validate an instrument document produced by the external
    /// question-bank compiler. Integrity violations fail here, at load time.
    pub fn from_json(raw: &str) -> Result<Self, InstrumentError> {
        let instrument: Self = serde_json::from_str(raw)?;
        instrument.validate()?;
        Ok(instrument)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.question_bank.iter().find(|question| question.id == id)
    }

    pub fn dimension(&self, code: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|dimension| dimension.code == code)
    }

    fn validate(&self) -> Result<(), InstrumentError> {
        if self.schema_version != SUPPORTED_INSTRUMENT_SCHEMA {
            return Err(InstrumentError::UnsupportedSchemaVersion {
                found: self.schema_version,
                supported: SUPPORTED_INSTRUMENT_SCHEMA,
            });
        }

        if self.question_bank.is_empty() {
            return Err(InstrumentError::EmptyQuestionBank);
        }

        let mut dimension_codes = BTreeSet::new();
        for dimension in &self.dimensions {
            if !dimension_codes.insert(dimension.code.as_str()) {
                return Err(InstrumentError::DuplicateDimension(dimension.code.clone()));
            }
        }

        let mut question_ids = BTreeSet::new();
        for question in &self.question_bank {
            if !question_ids.insert(question.id.as_str()) {
                return Err(InstrumentError::DuplicateQuestion(question.id.clone()));
            }
            if !dimension_codes.contains(question.dimension.as_str()) {
                return Err(InstrumentError::UnknownDimension {
                    question: question.id.clone(),
                    dimension: question.dimension.clone(),
                });
            }
            question.validate_shape()?;
        }

        for rule in &self.consistency_checks {
            for predicate in rule.if_group.iter().chain(rule.and_group.iter()) {
                if !question_ids.contains(predicate.question_id.as_str()) {
                    return Err(InstrumentError::UnknownRuleQuestion {
                        rule: rule.id.clone(),
                        question: predicate.question_id.clone(),
                    });
                }
            }
        }

        for index in &self.aggregate_indices {
            if index.dimensions.is_empty() {
                return Err(InstrumentError::EmptyIndex(index.id.clone()));
            }
            for code in &index.dimensions {
                if !dimension_codes.contains(code.as_str()) {
                    return Err(InstrumentError::UnknownIndexDimension {
                        index: index.id.clone(),
                        dimension: code.clone(),
                    });
                }
            }
        }

        validate_bands(&self.bands)?;
        self.confidence_adjustments.validate()?;

        Ok(())
    }
}

/// Grouping category for related questions (e.g. "Decision Integrity").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub code: String,
    pub name: String,
}

/// One entry of the question bank with its scoring parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub dimension: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub reverse_scored: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_chars: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<ScaleBounds>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
}

impl Question {
    fn validate_shape(&self) -> Result<(), InstrumentError> {
        match self.kind {
            QuestionKind::MultipleChoice => {
                if self.options.is_empty() {
                    return Err(InstrumentError::MissingOptions(self.id.clone()));
                }
                let mut labels = BTreeSet::new();
                for option in &self.options {
                    if !labels.insert(canonical_text(&option.label)) {
                        return Err(InstrumentError::DuplicateChoiceLabel {
                            question: self.id.clone(),
                            label: option.label.clone(),
                        });
                    }
                }
            }
            QuestionKind::Scale => {
                let bounds = self
                    .bounds
                    .as_ref()
                    .ok_or_else(|| InstrumentError::MissingBounds(self.id.clone()))?;
                if !bounds.min.is_finite() || !bounds.max.is_finite() || bounds.min >= bounds.max {
                    return Err(InstrumentError::InvalidBounds {
                        question: self.id.clone(),
                        min: bounds.min,
                        max: bounds.max,
                    });
                }
            }
            QuestionKind::Likert5 | QuestionKind::OpenText => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Likert5,
    MultipleChoice,
    OpenText,
    Scale,
}

/// Inclusive numeric range accepted by a `scale` question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleBounds {
    pub min: f64,
    pub max: f64,
}

/// Choice label paired with the score awarded when selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub score: f64,
}

/// Named mean over a subset of dimension codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateIndex {
    pub id: String,
    pub dimensions: Vec<String>,
}

/// Band cut point: scores at or below `upper` fall into this band. The final
/// band may omit `upper` to act as the unbounded top zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandThreshold {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
}

fn validate_bands(bands: &[BandThreshold]) -> Result<(), InstrumentError> {
    if bands.is_empty() {
        return Err(InstrumentError::EmptyBands);
    }

    let mut previous: Option<f64> = None;
    for (position, band) in bands.iter().enumerate() {
        let is_last = position + 1 == bands.len();
        match band.upper {
            Some(upper) => {
                if !upper.is_finite() {
                    return Err(InstrumentError::BandOrder(band.label.clone()));
                }
                if previous.is_some_and(|floor| upper <= floor) {
                    return Err(InstrumentError::BandOrder(band.label.clone()));
                }
                previous = Some(upper);
            }
            None if is_last => {}
            None => {
                return Err(InstrumentError::UnboundedInnerBand(band.label.clone()));
            }
        }
    }

    Ok(())
}

/// Declarative cross-question check. Only `contradiction_pair` is evaluated
/// today; other kinds parse but are skipped so rule authors can ship ahead of
/// the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyRule {
    pub id: String,
    pub title: String,
    pub severity: Severity,
    #[serde(default)]
    pub kind: RuleKind,
    #[serde(default, rename = "if")]
    pub if_group: Vec<Predicate>,
    #[serde(default, rename = "and")]
    pub and_group: Vec<Predicate>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleKind {
    ContradictionPair,
    Other(String),
}

impl Default for RuleKind {
    fn default() -> Self {
        Self::ContradictionPair
    }
}

impl From<String> for RuleKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "contradiction_pair" => Self::ContradictionPair,
            _ => Self::Other(value),
        }
    }
}

impl From<RuleKind> for String {
    fn from(value: RuleKind) -> Self {
        match value {
            RuleKind::ContradictionPair => "contradiction_pair".to_string(),
            RuleKind::Other(other) => other,
        }
    }
}

/// Single-answer test inside a consistency rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub question_id: String,
    #[serde(flatten)]
    pub test: PredicateTest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateTest {
    Equals(String),
    In(Vec<String>),
    GteLikert(f64),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        }
    }
}

/// Base confidence and per-severity penalties applied for each rule hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    pub base_confidence: f64,
    #[serde(default)]
    pub penalty_by_severity: BTreeMap<Severity, f64>,
    pub floor: f64,
}

impl ConfidenceConfig {
    fn validate(&self) -> Result<(), InstrumentError> {
        if !self.base_confidence.is_finite() || !(0.0..=1.0).contains(&self.base_confidence) {
            return Err(InstrumentError::InvalidBaseConfidence(self.base_confidence));
        }
        if !self.floor.is_finite() || !(0.0..=1.0).contains(&self.floor) {
            return Err(InstrumentError::InvalidFloor(self.floor));
        }
        if self.floor > self.base_confidence {
            return Err(InstrumentError::FloorAboveBase {
                floor: self.floor,
                base: self.base_confidence,
            });
        }
        for (&severity, &penalty) in &self.penalty_by_severity {
            if !penalty.is_finite() || penalty < 0.0 {
                return Err(InstrumentError::InvalidPenalty {
                    severity,
                    value: penalty,
                });
            }
        }
        Ok(())
    }
}

/// Load-time integrity violations. These indicate a broken deployment, not
/// bad respondent input, so they halt processing instead of degrading.
#[derive(Debug, thiserror::Error)]
pub enum InstrumentError {
    #[error("instrument document failed to parse: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported instrument schema version {found} (supported: {supported})")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    #[error("question bank is empty")]
    EmptyQuestionBank,
    #[error("duplicate dimension code '{0}'")]
    DuplicateDimension(String),
    #[error("duplicate question id '{0}'")]
    DuplicateQuestion(String),
    #[error("question '{question}' references unknown dimension '{dimension}'")]
    UnknownDimension { question: String, dimension: String },
    #[error("multiple choice question '{0}' declares no options")]
    MissingOptions(String),
    #[error("question '{question}' declares duplicate choice label '{label}'")]
    DuplicateChoiceLabel { question: String, label: String },
    #[error("scale question '{0}' declares no bounds")]
    MissingBounds(String),
    #[error("scale question '{question}' has invalid bounds (min {min}, max {max})")]
    InvalidBounds { question: String, min: f64, max: f64 },
    #[error("consistency check '{rule}' references unknown question '{question}'")]
    UnknownRuleQuestion { rule: String, question: String },
    #[error("aggregate index '{index}' references unknown dimension '{dimension}'")]
    UnknownIndexDimension { index: String, dimension: String },
    #[error("aggregate index '{0}' names no dimensions")]
    EmptyIndex(String),
    #[error("band list is empty")]
    EmptyBands,
    #[error("band '{0}' omits an upper bound but is not the final band")]
    UnboundedInnerBand(String),
    #[error("band upper bounds must be finite and strictly ascending (violated at '{0}')")]
    BandOrder(String),
    #[error("base confidence {0} is outside [0, 1]")]
    InvalidBaseConfidence(f64),
    #[error("confidence floor {0} is outside [0, 1]")]
    InvalidFloor(f64),
    #[error("confidence floor {floor} exceeds base confidence {base}")]
    FloorAboveBase { floor: f64, base: f64 },
    #[error("penalty for severity {severity:?} must be finite and non-negative, found {value}")]
    InvalidPenalty { severity: Severity, value: f64 },
}
