//! Observability (AU-2, AU-3, AU-12)
//!
//! Library code logs through standard `tracing` macros and the
//! [`security_event!`](crate::security_event) macro; it never installs a
//! subscriber on its own. Applications call [`init`] once at startup, or
//! install their own subscriber.
//!
//! # Usage
//!
//! ```ignore
//! use postern::observability::{init, ObservabilityConfig};
//!
//! init(ObservabilityConfig::from_env())?;
//! ```

mod config;
mod events;
mod providers;

pub use config::{LogFormat, ObservabilityConfig, ObservabilityConfigBuilder, DEFAULT_LOG_FILTER};
pub use events::{security_event, SecurityEvent, Severity};

use tracing::info;

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the filter directive is invalid or a global
/// subscriber is already installed.
pub fn init(config: ObservabilityConfig) -> Result<(), ObservabilityError> {
    providers::init_tracing(&config)?;

    info!(log_format = ?config.log_format, "Observability initialized");

    Ok(())
}

/// Observability initialization errors
#[derive(Debug)]
pub enum ObservabilityError {
    /// Invalid configuration
    Config(String),
    /// Subscriber installation failed
    Provider(String),
}

impl std::fmt::Display for ObservabilityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Observability config error: {}", msg),
            Self::Provider(msg) => write!(f, "Provider error: {}", msg),
        }
    }
}

impl std::error::Error for ObservabilityError {}
