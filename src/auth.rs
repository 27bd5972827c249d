//! Credential Core (IA-2, IA-5, AC-2, SC-23)
//!
//! [`AuthCore`] registers accounts, checks passwords, and issues session
//! identifiers on top of an injected [`UserStore`].
//!
//! # Contracts
//!
//! | Operation        | Success          | Failure                                 |
//! |------------------|------------------|-----------------------------------------|
//! | `register`       | `Ok(User)`       | `Err(AuthError)`: duplicate, storage, … |
//! | `authenticate`   | `true`           | `false` for every failure               |
//! | `create_session` | `Some(SessionId)`| `None` for every failure                |
//!
//! `authenticate` and `create_session` fail closed. The caller cannot tell an
//! unknown email from a storage outage; the security event log can.
//!
//! # Per-user state
//!
//! ```text
//! Unregistered ──register──▶ Registered(no session)
//!                                 │ create_session
//!                                 ▼
//!                            Registered(session = S) ──create_session──▶ Registered(session = S')
//! ```
//!
//! There is no transition back: users are never deleted and sessions are
//! only ever replaced.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use postern::{AuthConfig, AuthCore, InMemoryUserStore};
//!
//! let auth = AuthCore::with_config(Arc::new(InMemoryUserStore::new()), &AuthConfig::from_env())?;
//!
//! let user = auth.register("a@x.com", "secret")?;
//! assert!(auth.authenticate("a@x.com", "secret"));
//!
//! let session = auth.create_session("a@x.com").expect("registered user");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::error::{AuthError, Result};
use crate::identifier::{IdentifierGenerator, SessionId, UuidGenerator};
use crate::observability::{security_event, SecurityEvent};
use crate::password::PasswordHasher;
use crate::store::{StoreError, UserStore};
use crate::user::User;
use crate::validation::{validate_email, validate_required};

// ============================================================================
// AuthCore
// ============================================================================

/// Registration, password verification, and session issuance over a
/// [`UserStore`].
///
/// Safe to share between request threads (`Send + Sync`).
pub struct AuthCore {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    ids: Box<dyn IdentifierGenerator>,
    normalize_email_case: bool,
    validate_email_format: bool,
}

impl AuthCore {
    /// Create a core with default configuration.
    pub fn new(store: Arc<dyn UserStore>) -> Result<Self> {
        Self::with_config(store, &AuthConfig::default())
    }

    /// Create a core with explicit configuration.
    ///
    /// Fails with [`AuthError::Config`] if the hashing parameters are out of
    /// range for Argon2.
    pub fn with_config(store: Arc<dyn UserStore>, config: &AuthConfig) -> Result<Self> {
        let hasher =
            PasswordHasher::new(&config.hasher).map_err(|e| AuthError::Config(e.to_string()))?;

        Ok(Self {
            store,
            hasher,
            ids: Box::new(UuidGenerator),
            normalize_email_case: config.normalize_email_case,
            validate_email_format: config.validate_email_format,
        })
    }

    /// Replace the session identifier source.
    pub fn with_id_generator(mut self, ids: impl IdentifierGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Register a new account.
    ///
    /// The email is normalized first (trimmed, and lowercased unless case
    /// folding is disabled). An existing account is never overwritten and
    /// the new password is not hashed in that case.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Validation`]: empty email or password, or a malformed
    ///   email when format validation is enabled
    /// - [`AuthError::AlreadyRegistered`]: the email is taken, whether seen by
    ///   the lookup or by the store's uniqueness constraint on insert
    /// - [`AuthError::Storage`]: any other store failure
    /// - [`AuthError::Hashing`]: the password hash could not be derived
    pub fn register(&self, email: &str, password: &str) -> Result<User> {
        let email = self.normalize_email(email);

        if let Err(err) = self.validate_registration(&email, password) {
            security_event!(
                SecurityEvent::RegistrationRejected,
                email = %email,
                reason = "invalid_input",
                field = err.field,
                "Registration rejected"
            );
            return Err(err.into());
        }

        match self.lookup(&email) {
            Ok(None) => {}
            Ok(Some(_)) => return Err(duplicate(email)),
            Err(err) => {
                log_storage_failure("register", "find_user_by_email", &err);
                return Err(AuthError::Storage(err));
            }
        }

        let digest = self.hasher.hash(password)?;

        match self.store.add_user(&email, digest) {
            Ok(user) => {
                security_event!(
                    SecurityEvent::UserRegistered,
                    user_id = %user.id(),
                    email = %user.email(),
                    "User registered"
                );
                Ok(user)
            }
            Err(StoreError::Duplicate { .. }) => Err(duplicate(email)),
            Err(err) => {
                log_storage_failure("register", "add_user", &err);
                Err(AuthError::Storage(err))
            }
        }
    }

    /// Check a login attempt.
    ///
    /// Returns `true` only if the account exists and the password matches.
    /// Unknown accounts still pay for one hash verification so response
    /// time does not reveal which emails are registered.
    pub fn authenticate(&self, email: &str, password: &str) -> bool {
        let email = self.normalize_email(email);

        match self.lookup(&email) {
            Ok(Some(user)) => {
                let valid = self.hasher.verify(password, user.password_digest());
                if valid {
                    security_event!(
                        SecurityEvent::AuthenticationSuccess,
                        user_id = %user.id(),
                        email = %email,
                        "User authenticated"
                    );
                } else {
                    log_authentication_failure(&email, "invalid_password");
                }
                valid
            }
            Ok(None) => {
                self.hasher.burn(password);
                log_authentication_failure(&email, "unknown_user");
                false
            }
            Err(err) => {
                log_storage_failure("authenticate", "find_user_by_email", &err);
                log_authentication_failure(&email, "storage_error");
                false
            }
        }
    }

    /// Issue a fresh session identifier for a registered user.
    ///
    /// Any previous identifier is overwritten. Returns `None` for an unknown
    /// email or when the store cannot be read or updated.
    pub fn create_session(&self, email: &str) -> Option<SessionId> {
        let email = self.normalize_email(email);

        let user = match self.lookup(&email) {
            Ok(Some(user)) => user,
            Ok(None) => {
                log_session_denied(&email, "unknown_user");
                return None;
            }
            Err(err) => {
                log_storage_failure("create_session", "find_user_by_email", &err);
                log_session_denied(&email, "storage_error");
                return None;
            }
        };

        let session_id = SessionId::new(self.ids.generate());

        match self.store.update_session(user.id(), session_id.clone()) {
            Ok(_) => {
                security_event!(
                    SecurityEvent::SessionCreated,
                    user_id = %user.id(),
                    "Session created"
                );
                Some(session_id)
            }
            Err(err) => {
                log_storage_failure("create_session", "update_session", &err);
                log_session_denied(&email, "storage_error");
                None
            }
        }
    }

    /// Apply the configured email policy.
    pub fn normalize_email(&self, email: &str) -> String {
        let trimmed = email.trim();
        if self.normalize_email_case {
            trimmed.to_ascii_lowercase()
        } else {
            trimmed.to_string()
        }
    }

    fn validate_registration(
        &self,
        email: &str,
        password: &str,
    ) -> std::result::Result<(), crate::validation::ValidationError> {
        validate_required(email, "email")?;
        validate_required(password, "password")?;
        if self.validate_email_format {
            validate_email(email)?;
        }
        Ok(())
    }

    /// Separate "no such user" from real storage faults.
    fn lookup(&self, email: &str) -> std::result::Result<Option<User>, StoreError> {
        match self.store.find_user_by_email(email) {
            Ok(user) => Ok(Some(user)),
            Err(StoreError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

impl fmt::Debug for AuthCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthCore")
            .field("hasher", &self.hasher)
            .field("normalize_email_case", &self.normalize_email_case)
            .field("validate_email_format", &self.validate_email_format)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Event Helpers
// ============================================================================

fn duplicate(email: String) -> AuthError {
    security_event!(
        SecurityEvent::RegistrationRejected,
        email = %email,
        reason = "duplicate_email",
        "Registration rejected"
    );
    AuthError::AlreadyRegistered { email }
}

fn log_authentication_failure(email: &str, reason: &'static str) {
    security_event!(
        SecurityEvent::AuthenticationFailure,
        email = %email,
        reason = reason,
        "Authentication failed"
    );
}

fn log_session_denied(email: &str, reason: &'static str) {
    security_event!(
        SecurityEvent::SessionDenied,
        email = %email,
        reason = reason,
        "Session not created"
    );
}

fn log_storage_failure(operation: &'static str, store_call: &'static str, err: &StoreError) {
    security_event!(
        SecurityEvent::StorageFailure,
        operation = operation,
        store_call = store_call,
        error = %err,
        "User store failure"
    );
}

// ============================================================================
// Tests
// ============================================================================
