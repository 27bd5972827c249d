//! Subscriber setup
//!
//! Installs the global tracing subscriber for the configured format.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::{LogFormat, ObservabilityConfig, ObservabilityError};

/// Initialize the tracing subscriber based on configuration.
///
/// `RUST_LOG` wins over `config.log_filter` when both are set.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<(), ObservabilityError> {
    let filter = build_filter(config)?;
    let subscriber = tracing_subscriber::registry().with(filter);

    let result = match config.log_format {
        LogFormat::Pretty => subscriber
            .with(
                fmt::layer()
                    .pretty()
                    .with_ansi(config.ansi)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        LogFormat::Json => subscriber
            .with(fmt::layer().json().with_ansi(false).with_target(true).with_current_span(false))
            .try_init(),
        LogFormat::Compact => subscriber
            .with(fmt::layer().compact().with_ansi(config.ansi).with_target(true))
            .try_init(),
    };

    result.map_err(|e| ObservabilityError::Provider(format!("Failed to init tracing: {}", e)))
}

fn build_filter(config: &ObservabilityConfig) -> Result<EnvFilter, ObservabilityError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .map_err(|e| ObservabilityError::Config(format!("Invalid log filter: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_directives() {
        let config = ObservabilityConfig::builder()
            .log_filter("postern=debug,warn")
            .build();
        assert!(build_filter(&config).is_ok());
    }
}
