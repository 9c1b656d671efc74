//! Logging and tracing setup.
//!
//! The pipeline emits structured request logs through `tracing`; this
//! module wires up a JSON subscriber for hosts that do not install one
//! themselves.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::PipelineConfig;

/// Initialize the tracing subscriber with JSON formatting.
///
/// `RUST_LOG` takes precedence; otherwise the configured log level is
/// applied to this crate's target.
pub fn init(config: &PipelineConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("api_core={}", config.log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Initialize tracing for tests (human-readable format, no JSON).
#[cfg(test)]
pub fn _init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("api_core=debug")
        .try_init();
}
