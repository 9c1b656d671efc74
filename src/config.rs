//! Configuration consumed by the pipeline.
//!
//! The pipeline does not own application configuration; it only needs the
//! runtime environment (for error-message redaction) and a log level.
//! Loaded from environment variables with an `API` prefix.

use config::{Config as ConfigLoader, ConfigError, Environment as EnvSource};
use serde::Deserialize;

/// Runtime environment, gating error-message redaction in the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    /// Whether internal error messages must be redacted from clients.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            log_level: default_log_level(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from the environment.
    ///
    /// Reads `API__ENVIRONMENT` and `API__LOG_LEVEL`, falling back to
    /// development / `info`.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .set_default("environment", "development")?
            .set_default("log_level", "info")?
            .add_source(
                EnvSource::with_prefix("API")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
