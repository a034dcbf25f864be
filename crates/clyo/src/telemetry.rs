//! Tracing subscriber set-up for console hosts.
//!
//! Diagnostics go to stderr so they never interleave with the prompt and
//! command output written to stdout.

use std::io::{self, IsTerminal};

use clyo_config::{Config, LogFormat};
use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::UtcTime;

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Proof that the global subscriber is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured log filter does not parse.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Another subscriber is already installed.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global tracing subscriber on first use.
///
/// Later calls return a fresh handle without reconfiguring anything, even
/// when `config` differs.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when `config.log_filter` is not a valid
/// directive list, and [`TelemetryError::Subscriber`] when a different global
/// subscriber was installed by someone else.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(config))
        .map(|_| TelemetryHandle)
}

/// Parses the configured filter directives.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the directives do not parse.
pub fn filter(config: &Config) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(config.log_filter()).map_err(|error| TelemetryError::Filter(error.to_string()))
}

fn install_subscriber(config: &Config) -> Result<(), TelemetryError> {
    let env_filter = filter(config)?;
    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(UtcTime::rfc_3339());

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.log_format() {
        LogFormat::Json => Box::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    };
    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn config_with_filter(log_filter: &str) -> Config {
        Config {
            log_filter: log_filter.to_owned(),
            ..Config::default()
        }
    }

    #[rstest]
    #[case::level("info")]
    #[case::target("clyo::dispatch=debug,warn")]
    fn accepts_valid_directives(#[case] directives: &str) {
        assert!(filter(&config_with_filter(directives)).is_ok());
    }

    #[test]
    fn rejects_malformed_directives() {
        let error = filter(&config_with_filter("clyo=loudest")).expect_err("malformed filter");
        assert!(matches!(error, TelemetryError::Filter(_)));
    }
}
