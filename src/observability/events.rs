//! Security Event Logging
//!
//! Structured records for the auditable events of the credential core
//! (NIST SP 800-53 AU-2, AU-3).
//!
//! # Usage
//!
//! ```ignore
//! use postern::observability::{SecurityEvent, security_event};
//!
//! security_event!(
//!     SecurityEvent::AuthenticationFailure,
//!     email = %email,
//!     reason = "invalid_password",
//!     "Authentication failed"
//! );
//! ```
//!
//! Never pass a plaintext password, a password digest, or a session
//! identifier as a field.

use std::fmt;

/// Security event categories for audit logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityEvent {
    // Authentication events
    /// Password verified for a registered user
    AuthenticationSuccess,
    /// Unknown user, wrong password, or storage fault during login
    AuthenticationFailure,
    /// Session identifier issued
    SessionCreated,
    /// Session requested for an unknown user or could not be stored
    SessionDenied,

    // User management events
    /// New user registered
    UserRegistered,
    /// Registration refused (duplicate email or invalid input)
    RegistrationRejected,

    // System events
    /// Persistent user store opened
    DatabaseConnected,
    /// User store returned an error other than "not found"
    StorageFailure,
}

impl SecurityEvent {
    /// Get the event category for filtering/grouping
    pub fn category(&self) -> &'static str {
        match self {
            Self::AuthenticationSuccess
            | Self::AuthenticationFailure
            | Self::SessionCreated
            | Self::SessionDenied => "authentication",

            Self::UserRegistered | Self::RegistrationRejected => "user_management",

            Self::DatabaseConnected | Self::StorageFailure => "system",
        }
    }

    /// Get the severity level for the event
    pub fn severity(&self) -> Severity {
        match self {
            Self::StorageFailure => Severity::Critical,

            Self::AuthenticationFailure | Self::SessionDenied => Severity::High,

            Self::AuthenticationSuccess
            | Self::UserRegistered
            | Self::RegistrationRejected => Severity::Medium,

            Self::SessionCreated | Self::DatabaseConnected => Severity::Low,
        }
    }

    /// Get the event name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Self::AuthenticationSuccess => "authentication_success",
            Self::AuthenticationFailure => "authentication_failure",
            Self::SessionCreated => "session_created",
            Self::SessionDenied => "session_denied",
            Self::UserRegistered => "user_registered",
            Self::RegistrationRejected => "registration_rejected",
            Self::DatabaseConnected => "database_connected",
            Self::StorageFailure => "storage_failure",
        }
    }
}

impl fmt::Display for SecurityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Event severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Routine operations
    Low,
    /// Important state changes
    Medium,
    /// Security-relevant failures
    High,
    /// Immediate attention required
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Log a security event with structured fields.
///
/// Adds `security_event`, `category` and `severity` fields and picks the
/// level from the severity: critical → error, high → warn, medium → info,
/// low → debug.
#[macro_export]
macro_rules! security_event {
    ($event:expr, $($field:tt)*) => {{
        let event = $event;
        let category = event.category();
        let event_name = event.name();

        match event.severity() {
            $crate::observability::Severity::Critical => {
                ::tracing::error!(
                    security_event = event_name,
                    category = category,
                    severity = "critical",
                    $($field)*
                );
            }
            $crate::observability::Severity::High => {
                ::tracing::warn!(
                    security_event = event_name,
                    category = category,
                    severity = "high",
                    $($field)*
                );
            }
            $crate::observability::Severity::Medium => {
                ::tracing::info!(
                    security_event = event_name,
                    category = category,
                    severity = "medium",
                    $($field)*
                );
            }
            $crate::observability::Severity::Low => {
                ::tracing::debug!(
                    security_event = event_name,
                    category = category,
                    severity = "low",
                    $($field)*
                );
            }
        }
    }};
}

pub use security_event;
