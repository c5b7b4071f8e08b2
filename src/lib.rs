//! Scoring and consistency engine for questionnaire-driven integrity
//! assessments.
//!
//! An immutable instrument (question bank, dimensions, bands, consistency
//! checks, confidence adjustments) is loaded and validated once at startup,
//! then shared read-only across scoring calls. Each call takes one
//! respondent's sanitized answers and produces per-item scores, dimension
//! means, aggregate indices, contradiction hits, and a derived confidence.
//! Results stay gated behind a human approval step before the report leaves
//! the system.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

pub use error::AppError;
