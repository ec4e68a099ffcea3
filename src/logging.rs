//! # Structured Logging Module
//!
//! Environment-aware tracing initialization for the pipeline. Console output
//! by default, JSON when `MATCHUP_LOG_FORMAT=json` is set (for log shippers).

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration.
///
/// Safe to call more than once; initialization happens exactly once per
/// process, and an already-installed global subscriber (e.g. from a test
/// harness) is left in place.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_log_level(&environment)));

        let json_output = std::env::var("MATCHUP_LOG_FORMAT")
            .map(|fmt| fmt.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let installed = if json_output {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .try_init()
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .try_init()
        };

        if installed.is_err() {
            tracing::debug!("global tracing subscriber already initialized");
        } else {
            tracing::info!(environment = %environment, "structured logging initialized");
        }
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("MATCHUP_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get default log level based on environment
fn default_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}
