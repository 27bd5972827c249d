//! Credential core errors (SI-11)
//!
//! Only [`AuthCore::register`](crate::AuthCore::register) and construction
//! return errors. `authenticate` and `create_session` fail closed: every
//! failure, including a broken store, becomes `false` / `None` for the caller
//! and is logged instead.
//!
//! Messages never contain a password, a digest, or a session identifier.

use thiserror::Error;

use crate::password::HashError;
use crate::store::StoreError;
use crate::validation::ValidationError;

/// Errors surfaced by the credential core
#[derive(Debug, Error)]
pub enum AuthError {
    /// An account with this email exists already
    #[error("user {email} already exists")]
    AlreadyRegistered {
        /// Normalized email that collided
        email: String,
    },

    /// Registration input rejected before touching the store
    #[error("invalid registration input: {0}")]
    Validation(#[from] ValidationError),

    /// Store failed with something other than not-found or duplicate
    #[error("storage failure: {0}")]
    Storage(#[source] StoreError),

    /// Password hash could not be derived
    #[error(transparent)]
    Hashing(#[from] HashError),

    /// Invalid construction parameters
    #[error("invalid auth configuration: {0}")]
    Config(String),
}

impl AuthError {
    /// Whether this is the duplicate-email outcome
    pub fn is_already_registered(&self) -> bool {
        matches!(self, Self::AlreadyRegistered { .. })
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { email } => Self::AlreadyRegistered { email },
            other => Self::Storage(other),
        }
    }
}

/// Result type alias for credential core operations
pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_maps_to_already_registered() {
        let err = AuthError::from(StoreError::Duplicate {
            email: "a@x.com".into(),
        });
        assert!(err.is_already_registered());
        assert_eq!(err.to_string(), "user a@x.com already exists");
    }

    #[test]
    fn test_backend_maps_to_storage() {
        let err = AuthError::from(StoreError::Backend("disk full".into()));
        assert!(matches!(err, AuthError::Storage(StoreError::Backend(_))));
        assert!(!err.is_already_registered());
        assert_eq!(err.to_string(), "storage failure: storage backend error: disk full");
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;

        let err = AuthError::from(StoreError::Backend("disk full".into()));
        assert!(err.source().is_some());
    }
}
