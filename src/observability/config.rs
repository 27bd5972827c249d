//! Logging configuration

use std::str::FromStr;

use crate::parse::parse_bool;

/// Filter used when neither `RUST_LOG` nor the builder sets one: the crate's
/// own security events at info, everything else at warn.
pub const DEFAULT_LOG_FILTER: &str = "warn,postern=info";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human-readable
    #[default]
    Pretty,
    /// One JSON object per event, for log shipping
    Json,
    /// Single-line text
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// How [`init`](super::init) renders and filters events
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,
    /// `EnvFilter` directive, e.g. "postern=debug"
    pub log_filter: String,
    /// Colored output for the text formats
    pub ansi: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            ansi: true,
        }
    }
}

impl ObservabilityConfig {
    /// Load from the environment.
    ///
    /// - `LOG_FORMAT`: "pretty", "json", or "compact" (default: "pretty")
    /// - `RUST_LOG`: filter directive (default: "warn,postern=info")
    /// - `LOG_ANSI`: "true"/"false" (default: "true")
    ///
    /// Unrecognized values fall back to the default. Nothing is logged here
    /// since no subscriber exists yet.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            log_format: read("LOG_FORMAT", |s| s.parse().ok()).unwrap_or(defaults.log_format),
            log_filter: read("RUST_LOG", |s| Some(s.to_string())).unwrap_or(defaults.log_filter),
            ansi: read("LOG_ANSI", parse_bool).unwrap_or(defaults.ansi),
        }
    }

    pub fn builder() -> ObservabilityConfigBuilder {
        ObservabilityConfigBuilder::default()
    }
}

fn read<T>(name: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    std::env::var(name).ok().and_then(|raw| parse(&raw))
}

/// Builder for [`ObservabilityConfig`]
#[derive(Debug, Default)]
pub struct ObservabilityConfigBuilder {
    config: ObservabilityConfig,
}

impl ObservabilityConfigBuilder {
    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.config.log_format = format;
        self
    }

    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.log_filter = filter.into();
        self
    }

    pub fn ansi(mut self, ansi: bool) -> Self {
        self.config.ansi = ansi;
        self
    }

    pub fn build(self) -> ObservabilityConfig {
        self.config
    }
}
