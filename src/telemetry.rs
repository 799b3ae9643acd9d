//! Tracing subscriber setup
//!
//! A registry with two layers:
//!
//! ```text
//! Registry
//!   ├── EnvFilter (RUST_LOG, else the caller's default directive)
//!   └── Fmt Layer (stderr, so stdout carries only progress lines)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use s3_smoke::telemetry::init_subscriber;
//!
//! // Already-initialised is the only failure and is safe to ignore
//! let _ = init_subscriber("warn");
//! tracing::warn!("visible at the default level");
//! ```

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset and the caller has no preference
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Telemetry errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter '{directive}': {message}")]
    InvalidFilter { directive: String, message: String },

    #[error("Failed to set global subscriber (may already be initialized): {0}")]
    AlreadyInitialized(String),
}

/// Build the filter: `RUST_LOG` when set, otherwise `default_directive`
pub fn env_filter(default_directive: &str) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(default_directive).map_err(|e| TelemetryError::InvalidFilter {
        directive: default_directive.to_string(),
        message: e.to_string(),
    })
}

/// Install the global subscriber
pub fn init_subscriber(default_directive: &str) -> Result<(), TelemetryError> {
    let env_filter = env_filter(default_directive)?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))
}
