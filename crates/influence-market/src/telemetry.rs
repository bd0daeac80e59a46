use crate::config::TelemetryConfig;
use thiserror::Error;
use tracing_subscriber::filter::{Directive, ParseError};
use tracing_subscriber::EnvFilter;

/// Transport crates that drown out wizard events at `debug`.
const QUIET_TARGETS: [&str; 2] = ["hyper=warn", "axum::rejection=info"];

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("telemetry error: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Installs the global subscriber; `RUST_LOG` wins over the configured level.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

fn build_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    let invalid = |source| TelemetryError::EnvFilter {
        value: level.to_string(),
        source,
    };

    let mut filter = EnvFilter::try_new(level).map_err(invalid)?;
    for target in QUIET_TARGETS {
        let directive: Directive = target.parse().map_err(invalid)?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_keeps_transport_noise_down() {
        let filter = build_filter("debug").expect("debug is a valid level");
        let rendered = filter.to_string();
        assert!(rendered.contains("debug"));
        assert!(rendered.contains("hyper=warn"));
    }

    #[test]
    fn malformed_level_reports_the_offending_value() {
        let error = build_filter("wizard=loud").expect_err("unknown level");
        assert!(error
            .to_string()
            .contains("invalid log level/filter 'wizard=loud'"));
    }
}
