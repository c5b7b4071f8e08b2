use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::assessment::instrument::InstrumentError;
use crate::workflows::assessment::service::AssessmentServiceError;

/// Top-level error surfaced to embedding hosts.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("instrument error: {0}")]
    Instrument(#[from] InstrumentError),
    #[error("assessment error: {0}")]
    Assessment(#[from] AssessmentServiceError),
}
