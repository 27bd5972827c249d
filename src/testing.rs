//! Test Doubles (SA-11)
//!
//! Collaborators for exercising the credential core without a real
//! database or randomness, plus a helper that captures log output so tests
//! can assert on emitted security events.
//!
//! Compiled for this crate's own tests and, for downstream crates, with the
//! `testing` feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use postern::testing::{FailingUserStore, SequenceGenerator};
//! use postern::{AuthConfig, AuthCore};
//!
//! let auth = AuthCore::with_config(Arc::new(FailingUserStore::always()), &AuthConfig::testing())?
//!     .with_id_generator(SequenceGenerator::new("session"));
//!
//! assert!(!auth.authenticate("a@x.com", "secret"));
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::identifier::{IdentifierGenerator, SessionId};
use crate::password::PasswordDigest;
use crate::store::{InMemoryUserStore, StoreError, UserStore};
use crate::user::{User, UserId};

// ============================================================================
// Store Doubles
// ============================================================================

/// Store that returns [`StoreError::Backend`] from selected operations and
/// delegates the rest to an in-memory store.
#[derive(Debug, Clone, Default)]
pub struct FailingUserStore {
    inner: InMemoryUserStore,
    fail_lookup: bool,
    fail_insert: bool,
    fail_update: bool,
}

impl FailingUserStore {
    /// Every operation fails
    pub fn always() -> Self {
        Self {
            inner: InMemoryUserStore::new(),
            fail_lookup: true,
            fail_insert: true,
            fail_update: true,
        }
    }

    /// Lookups and inserts succeed; `update_session` fails
    pub fn on_update(inner: InMemoryUserStore) -> Self {
        Self {
            inner,
            fail_update: true,
            ..Self::default()
        }
    }

    /// Lookups succeed; `add_user` fails
    pub fn on_insert() -> Self {
        Self {
            fail_insert: true,
            ..Self::default()
        }
    }

    fn injected() -> StoreError {
        StoreError::Backend("injected failure".to_string())
    }
}

impl UserStore for FailingUserStore {
    fn find_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        if self.fail_lookup {
            return Err(Self::injected());
        }
        self.inner.find_user_by_email(email)
    }

    fn add_user(&self, email: &str, hashed_password: PasswordDigest) -> Result<User, StoreError> {
        if self.fail_insert {
            return Err(Self::injected());
        }
        self.inner.add_user(email, hashed_password)
    }

    fn update_session(&self, user_id: UserId, session_id: SessionId) -> Result<User, StoreError> {
        if self.fail_update {
            return Err(Self::injected());
        }
        self.inner.update_session(user_id, session_id)
    }
}

/// Store whose lookups always miss while inserts hit the real records.
///
/// Reproduces the losing side of a concurrent registration: the pre-check
/// saw no user, but another request inserted one before this insert ran.
#[derive(Debug, Clone, Default)]
pub struct RacingUserStore {
    inner: InMemoryUserStore,
}

impl RacingUserStore {
    /// Wrap a store whose records the "winning" request already wrote
    pub fn new(inner: InMemoryUserStore) -> Self {
        Self { inner }
    }
}

impl UserStore for RacingUserStore {
    fn find_user_by_email(&self, _email: &str) -> Result<User, StoreError> {
        Err(StoreError::NotFound)
    }

    fn add_user(&self, email: &str, hashed_password: PasswordDigest) -> Result<User, StoreError> {
        self.inner.add_user(email, hashed_password)
    }

    fn update_session(&self, user_id: UserId, session_id: SessionId) -> Result<User, StoreError> {
        self.inner.update_session(user_id, session_id)
    }
}

// ============================================================================
// Deterministic Identifiers
// ============================================================================

/// Generates `"{prefix}-1"`, `"{prefix}-2"`, ...
#[derive(Debug)]
pub struct SequenceGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequenceGenerator {
    /// Create a generator with the given prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdentifierGenerator for SequenceGenerator {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}

// ============================================================================
// Log Capture
// ============================================================================

/// A writer that captures output to a shared buffer.
#[derive(Clone, Default)]
pub struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CaptureWriter {
    /// Create a new capture writer with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the captured output as a string.
    pub fn output(&self) -> String {
        let buf = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&buf).to_string()
    }
}

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CaptureWriter {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a closure with tracing output captured as JSON lines.
///
/// Only events emitted on the calling thread are captured. Returns the
/// closure's result and everything logged at DEBUG and above.
pub fn with_captured_tracing<F, R>(f: F) -> (R, String)
where
    F: FnOnce() -> R,
{
    let capture = CaptureWriter::new();

    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_writer(capture.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture.output())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_generator() {
        let generator = SequenceGenerator::new("s");
        assert_eq!(generator.generate(), "s-1");
        assert_eq!(generator.generate(), "s-2");
    }

    #[test]
    fn test_failing_store_always() {
        let store = FailingUserStore::always();
        assert!(matches!(
            store.find_user_by_email("a@x.com"),
            Err(StoreError::Backend(_))
        ));
        assert!(matches!(
            store.update_session(UserId(1), SessionId::new("s")),
            Err(StoreError::Backend(_))
        ));
    }

    #[test]
    fn test_racing_store_misses_then_collides() {
        let inner = InMemoryUserStore::new();
        inner
            .add_user("a@x.com", PasswordDigest::from_phc("winner"))
            .unwrap();

        let racing = RacingUserStore::new(inner);
        assert!(matches!(
            racing.find_user_by_email("a@x.com"),
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            racing.add_user("a@x.com", PasswordDigest::from_phc("loser")),
            Err(StoreError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_capture_collects_events() {
        let (value, output) = with_captured_tracing(|| {
            tracing::info!(answer = 42, "captured");
            7
        });
        assert_eq!(value, 7);
        assert!(output.contains("\"answer\":42"));
        assert!(output.contains("captured"));
    }
}
