//! Credential core configuration
//!
//! Builder-pattern configuration for password hashing cost and email
//! handling, loadable from the environment.

use std::env;

use crate::parse::{parse_bool, parse_size};

// ============================================================================
// Hasher Configuration (IA-5(1))
// ============================================================================

/// Argon2id cost parameters.
///
/// Defaults follow the OWASP Password Storage Cheat Sheet minimum for
/// Argon2id: 19 MiB of memory, 2 iterations, 1 degree of parallelism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasherConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes over memory
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl HasherConfig {
    /// Lowest cost Argon2 accepts. For tests only.
    pub fn testing() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }
}

// ============================================================================
// Auth Configuration
// ============================================================================

/// Configuration for [`AuthCore`](crate::AuthCore).
///
/// # Example
///
/// ```ignore
/// use postern::{AuthConfig, HasherConfig};
///
/// // Load from environment variables
/// let config = AuthConfig::from_env();
///
/// // Or build programmatically
/// let config = AuthConfig::builder()
///     .hasher(HasherConfig { memory_kib: 64 * 1024, iterations: 3, parallelism: 2 })
///     .validate_email_format(true)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Password hashing cost
    pub hasher: HasherConfig,

    /// Fold emails to ASCII lowercase before lookup and insert.
    /// When disabled, emails are only trimmed and compared case-sensitively.
    pub normalize_email_case: bool,

    /// Reject registrations whose email is not syntactically valid.
    /// Empty emails and passwords are always rejected.
    pub validate_email_format: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            hasher: HasherConfig::default(),
            normalize_email_case: true,
            validate_email_format: false,
        }
    }
}

impl AuthConfig {
    /// Create a new builder
    pub fn builder() -> AuthConfigBuilder {
        AuthConfigBuilder::default()
    }

    /// Cheap hashing, default email handling. For tests only.
    pub fn testing() -> Self {
        Self {
            hasher: HasherConfig::testing(),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AUTH_HASH_MEMORY`: Argon2 memory, e.g. "19MB", "64MiB" (default: "19MB")
    /// - `AUTH_HASH_ITERATIONS`: Argon2 passes (default: 2)
    /// - `AUTH_HASH_PARALLELISM`: Argon2 lanes (default: 1)
    /// - `AUTH_NORMALIZE_EMAIL_CASE`: "true"/"false" (default: "true")
    /// - `AUTH_VALIDATE_EMAIL_FORMAT`: "true"/"false" (default: "false")
    ///
    /// Unparseable values fall back to the default and log a warning.
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// `var` returns the raw value of a variable, or `None` if unset.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let memory_kib = read_var(&var, "AUTH_HASH_MEMORY", |s| {
            parse_size(s).and_then(|bytes| u32::try_from(bytes / 1024).ok())
        })
        .unwrap_or(defaults.hasher.memory_kib);

        let iterations = read_var(&var, "AUTH_HASH_ITERATIONS", |s| s.trim().parse().ok())
            .unwrap_or(defaults.hasher.iterations);

        let parallelism = read_var(&var, "AUTH_HASH_PARALLELISM", |s| s.trim().parse().ok())
            .unwrap_or(defaults.hasher.parallelism);

        let normalize_email_case = read_var(&var, "AUTH_NORMALIZE_EMAIL_CASE", parse_bool)
            .unwrap_or(defaults.normalize_email_case);

        let validate_email_format = read_var(&var, "AUTH_VALIDATE_EMAIL_FORMAT", parse_bool)
            .unwrap_or(defaults.validate_email_format);

        Self {
            hasher: HasherConfig {
                memory_kib,
                iterations,
                parallelism,
            },
            normalize_email_case,
            validate_email_format,
        }
    }
}

/// Read and parse one variable, warning when it is set but invalid.
pub(crate) fn read_var<T>(
    var: &impl Fn(&str) -> Option<String>,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = var(name)?;
    let parsed = parse(&raw);
    if parsed.is_none() {
        tracing::warn!(variable = name, value = %raw, "Ignoring invalid configuration value");
    }
    parsed
}

/// Builder for AuthConfig
#[derive(Debug, Clone, Default)]
pub struct AuthConfigBuilder {
    config: AuthConfig,
}

impl AuthConfigBuilder {
    /// Set hashing cost
    pub fn hasher(mut self, hasher: HasherConfig) -> Self {
        self.config.hasher = hasher;
        self
    }

    /// Enable/disable case folding of emails
    pub fn normalize_email_case(mut self, normalize: bool) -> Self {
        self.config.normalize_email_case = normalize;
        self
    }

    /// Enable/disable email syntax validation on registration
    pub fn validate_email_format(mut self, validate: bool) -> Self {
        self.config.validate_email_format = validate;
        self
    }

    /// Build the configuration
    pub fn build(self) -> AuthConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::with_captured_tracing;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.hasher.memory_kib, 19456);
        assert_eq!(config.hasher.iterations, 2);
        assert_eq!(config.hasher.parallelism, 1);
        assert!(config.normalize_email_case);
        assert!(!config.validate_email_format);
    }

    #[test]
    fn test_builder() {
        let config = AuthConfig::builder()
            .hasher(HasherConfig::testing())
            .normalize_email_case(false)
            .validate_email_format(true)
            .build();

        assert_eq!(config.hasher, HasherConfig::testing());
        assert!(!config.normalize_email_case);
        assert!(config.validate_email_format);
    }

    #[test]
    fn test_testing_preset_is_cheap() {
        let config = AuthConfig::testing();
        assert_eq!(config.hasher.memory_kib, 8);
        assert!(config.normalize_email_case);
    }

    fn vars(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_from_vars_unset_uses_defaults() {
        let config = AuthConfig::from_vars(|_| None);
        assert_eq!(config.hasher, HasherConfig::default());
        assert!(config.normalize_email_case);
        assert!(!config.validate_email_format);
    }

    #[test]
    fn test_from_vars_memory_sizes() {
        let config = AuthConfig::from_vars(vars(&[("AUTH_HASH_MEMORY", "19MB")]));
        assert_eq!(config.hasher.memory_kib, 19456);

        let config = AuthConfig::from_vars(vars(&[("AUTH_HASH_MEMORY", "64MiB")]));
        assert_eq!(config.hasher.memory_kib, 65536);

        let config = AuthConfig::from_vars(vars(&[("AUTH_HASH_MEMORY", "512KB")]));
        assert_eq!(config.hasher.memory_kib, 512);
    }

    #[test]
    fn test_from_vars_all_fields() {
        let config = AuthConfig::from_vars(vars(&[
            ("AUTH_HASH_ITERATIONS", "3"),
            ("AUTH_HASH_PARALLELISM", " 4 "),
            ("AUTH_NORMALIZE_EMAIL_CASE", "false"),
            ("AUTH_VALIDATE_EMAIL_FORMAT", "yes"),
        ]));

        assert_eq!(config.hasher.iterations, 3);
        assert_eq!(config.hasher.parallelism, 4);
        assert!(!config.normalize_email_case);
        assert!(config.validate_email_format);
    }

    #[test]
    fn test_from_vars_invalid_falls_back_and_warns() {
        let (config, output) = with_captured_tracing(|| {
            AuthConfig::from_vars(vars(&[
                ("AUTH_HASH_MEMORY", "lots"),
                ("AUTH_HASH_ITERATIONS", "abc"),
                ("AUTH_NORMALIZE_EMAIL_CASE", "maybe"),
            ]))
        });

        assert_eq!(config.hasher, HasherConfig::default());
        assert!(config.normalize_email_case);

        assert!(output.contains("\"level\":\"WARN\""));
        assert!(output.contains("AUTH_HASH_MEMORY"));
        assert!(output.contains("AUTH_HASH_ITERATIONS"));
        assert!(output.contains("AUTH_NORMALIZE_EMAIL_CASE"));
        assert!(output.contains("lots"));
    }

    #[test]
    fn test_from_vars_memory_too_large_falls_back() {
        let config = AuthConfig::from_vars(vars(&[("AUTH_HASH_MEMORY", "8192GB")]));
        assert_eq!(config.hasher.memory_kib, HasherConfig::default().memory_kib);
    }
}
