use std::env;
use std::path::PathBuf;

use crate::workflows::assessment::instrument::{Instrument, InstrumentError};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for embedding hosts.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub instrument: InstrumentConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let instrument_path = env::var("ASSESSMENT_INSTRUMENT_PATH")
            .unwrap_or_else(|_| "instrument.json".to_string());
        if instrument_path.trim().is_empty() {
            return Err(ConfigError::EmptyInstrumentPath);
        }

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            instrument: InstrumentConfig {
                path: PathBuf::from(instrument_path),
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where the compiled instrument document is read from at startup.
#[derive(Debug, Clone)]
pub struct InstrumentConfig {
    pub path: PathBuf,
}

impl InstrumentConfig {
    /// Read and validate the instrument document. Integrity violations halt
    /// startup here; they indicate a broken deployment, not bad respondent
    /// input.
    pub fn load_instrument(&self) -> Result<Instrument, ConfigError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| {
            ConfigError::InstrumentRead {
                path: self.path.clone(),
                source,
            }
        })?;
        Ok(Instrument::from_json(&raw)?)
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ASSESSMENT_INSTRUMENT_PATH must not be empty")]
    EmptyInstrumentPath,
    #[error("unable to read instrument document at {}: {source}", path.display())]
    InstrumentRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Instrument(#[from] InstrumentError),
}
