//! User Record Storage (AC-2)
//!
//! [`UserStore`] is the seam between the credential core and persistence.
//! Implement it for your database; two backends ship with the crate:
//!
//! - [`InMemoryUserStore`]: process-local, for tests and single-instance tools
//! - [`SqliteUserStore`] (feature `sqlite`): file or in-memory SQLite
//!
//! # Contract
//!
//! Every method is an atomic primitive. In particular `add_user` must enforce
//! email uniqueness itself (unique index, check-and-insert under one lock)
//! and report a collision as [`StoreError::Duplicate`]. A lookup before the
//! insert is not enough once registrations run concurrently.
//!
//! Absence is reported as [`StoreError::NotFound`], never folded into
//! [`StoreError::Backend`], so callers can tell "no such user" from
//! "storage is broken".

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::InMemoryUserStore;
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteConfig, SqliteUserStore};

use thiserror::Error;

use crate::identifier::SessionId;
use crate::password::PasswordDigest;
use crate::user::{User, UserId};

/// Storage errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// No record matches the lookup key
    #[error("user not found")]
    NotFound,
    /// Email uniqueness constraint rejected an insert
    #[error("email already registered: {email}")]
    Duplicate {
        /// Email that collided
        email: String,
    },
    /// Any other backend failure
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Keyed access to user records.
pub trait UserStore: Send + Sync {
    /// Look up a user by (normalized) email.
    fn find_user_by_email(&self, email: &str) -> Result<User>;

    /// Insert a new user with no session.
    fn add_user(&self, email: &str, hashed_password: PasswordDigest) -> Result<User>;

    /// Replace the session identifier of an existing user.
    fn update_session(&self, user_id: UserId, session_id: SessionId) -> Result<User>;
}
