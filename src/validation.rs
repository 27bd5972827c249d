//! Registration Input Validation (SI-10)
//!
//! Checks applied to credentials before they reach the store. Only
//! emptiness is enforced unconditionally; email syntax checking is opt-in
//! through [`AuthConfig::validate_email_format`](crate::AuthConfig).

use std::fmt;

/// Validation error with field context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: &'static str,
    /// Error code for programmatic handling
    pub code: ValidationErrorCode,
    /// Human-readable message
    pub message: &'static str,
}

impl ValidationError {
    fn new(field: &'static str, code: ValidationErrorCode, message: &'static str) -> Self {
        Self {
            field,
            code,
            message,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validation error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorCode {
    /// Value is required but empty
    Required,
    /// Email format is invalid
    InvalidEmail,
}

impl fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::InvalidEmail => write!(f, "invalid_email"),
        }
    }
}

/// Reject an empty value.
pub fn validate_required(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(
            field,
            ValidationErrorCode::Required,
            "must not be empty",
        ));
    }
    Ok(())
}

/// Basic email syntax check.
///
/// - exactly one `@`
/// - local part: 1..=64 bytes, no leading/trailing/consecutive dots
/// - domain: 1..=255 bytes, at least one dot, alphanumerics, dots and hyphens
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    let invalid = |message| {
        Err(ValidationError::new(
            "email",
            ValidationErrorCode::InvalidEmail,
            message,
        ))
    };

    let Some((local, domain)) = value.split_once('@') else {
        return invalid("missing @");
    };
    if domain.contains('@') {
        return invalid("more than one @");
    }

    if local.is_empty() || local.len() > 64 {
        return invalid("invalid local part");
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return invalid("invalid local part");
    }

    if domain.is_empty() || domain.len() > 255 || !domain.contains('.') {
        return invalid("invalid domain");
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        return invalid("invalid domain");
    }
    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return invalid("invalid domain characters");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert!(validate_required("x", "password").is_ok());
        let err = validate_required("", "password").unwrap_err();
        assert_eq!(err.field, "password");
        assert_eq!(err.code, ValidationErrorCode::Required);
        assert_eq!(err.to_string(), "password: must not be empty");
    }

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("first.last@sub.example.org").is_ok());
        assert!(validate_email("user+tag@my-host.io").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "plainaddress",
            "@x.com",
            "a@",
            "a@@x.com",
            "a@b@x.com",
            ".a@x.com",
            "a.@x.com",
            "a..b@x.com",
            "a@localhost",
            "a@.x.com",
            "a@x_y.com",
        ] {
            let err = validate_email(email).unwrap_err();
            assert_eq!(err.code, ValidationErrorCode::InvalidEmail, "{}", email);
        }
    }
}
