//! SQLite user store
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE users (
//!     id              INTEGER PRIMARY KEY AUTOINCREMENT,
//!     email           TEXT NOT NULL UNIQUE,
//!     hashed_password TEXT NOT NULL,
//!     session_id      TEXT
//! );
//! ```
//!
//! The `UNIQUE` constraint on `email` is what makes concurrent registration
//! safe: a unique-constraint violation on insert is reported as
//! [`StoreError::Duplicate`]. Other constraint failures are backend errors.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::{Result, StoreError, UserStore};
use crate::config::read_var;
use crate::identifier::SessionId;
use crate::observability::{security_event, SecurityEvent};
use crate::parse::parse_duration;
use crate::password::PasswordDigest;
use crate::user::{User, UserId};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        hashed_password TEXT NOT NULL,
        session_id TEXT
    );";

// ============================================================================
// Configuration
// ============================================================================

/// SQLite store configuration
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database file path
    pub path: PathBuf,

    /// How long a writer waits on a locked database before failing
    /// Default: 5 seconds
    pub busy_timeout: Duration,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("auth.db"),
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl SqliteConfig {
    /// Configuration for a database file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AUTH_DATABASE_PATH`: database file (default: "auth.db")
    /// - `AUTH_DATABASE_BUSY_TIMEOUT`: e.g. "5s", "500ms" (default: "5s")
    ///
    /// An unparseable timeout falls back to the default and logs a warning.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let path = read_var(&var, "AUTH_DATABASE_PATH", |s| {
            let s = s.trim();
            (!s.is_empty()).then(|| PathBuf::from(s))
        })
        .unwrap_or(defaults.path);

        let busy_timeout = read_var(&var, "AUTH_DATABASE_BUSY_TIMEOUT", parse_duration)
            .unwrap_or(defaults.busy_timeout);

        Self { path, busy_timeout }
    }

    /// Set busy timeout
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}

// ============================================================================
// Store
// ============================================================================

/// SQLite-backed user store.
///
/// A single connection guarded by a mutex; every trait method runs as one
/// statement (or one locked read-after-write) on it.
pub struct SqliteUserStore {
    conn: Mutex<Connection>,
}

impl SqliteUserStore {
    /// Open (or create) the database described by `config`.
    pub fn open(config: &SqliteConfig) -> Result<Self> {
        let conn = Connection::open(&config.path).map_err(backend)?;
        conn.busy_timeout(config.busy_timeout).map_err(backend)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;").map_err(backend)?;

        let store = Self::init(conn)?;
        log_connected(&config.path);
        Ok(store)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(backend)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).map_err(backend)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Verify the connection answers a trivial query.
    ///
    /// Returns the round-trip latency.
    pub fn health_check(&self) -> Result<Duration> {
        let start = Instant::now();
        let one: i64 = self
            .conn
            .lock()
            .query_row("SELECT 1", [], |row| row.get(0))
            .map_err(backend)?;

        if one != 1 {
            return Err(StoreError::Backend("unexpected health check result".into()));
        }

        let latency = start.elapsed();
        debug!(latency_ms = latency.as_millis() as u64, "User store health check passed");
        Ok(latency)
    }

    /// Number of stored users with exactly this email
    pub fn count_email(&self, email: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .lock()
            .query_row(
                "SELECT COUNT(*) FROM users WHERE email = ?1",
                params![email],
                |row| row.get(0),
            )
            .map_err(backend)?;
        usize::try_from(count).map_err(|e| StoreError::Backend(e.to_string()))
    }

    fn user_by_id(conn: &Connection, user_id: UserId) -> Result<User> {
        conn.query_row(
            "SELECT id, email, hashed_password, session_id FROM users WHERE id = ?1",
            params![user_id.0],
            row_to_user,
        )
        .optional()
        .map_err(backend)?
        .ok_or(StoreError::NotFound)
    }
}

impl UserStore for SqliteUserStore {
    fn find_user_by_email(&self, email: &str) -> Result<User> {
        self.conn
            .lock()
            .query_row(
                "SELECT id, email, hashed_password, session_id FROM users WHERE email = ?1",
                params![email],
                row_to_user,
            )
            .optional()
            .map_err(backend)?
            .ok_or(StoreError::NotFound)
    }

    fn add_user(&self, email: &str, hashed_password: PasswordDigest) -> Result<User> {
        let conn = self.conn.lock();
        let result = conn.execute(
            "INSERT INTO users (email, hashed_password) VALUES (?1, ?2)",
            params![email, hashed_password.as_phc()],
        );

        match result {
            Ok(_) => Ok(User::new(
                UserId(conn.last_insert_rowid()),
                email,
                hashed_password,
            )),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(StoreError::Duplicate {
                    email: email.to_string(),
                })
            }
            Err(e) => Err(backend(e)),
        }
    }

    fn update_session(&self, user_id: UserId, session_id: SessionId) -> Result<User> {
        let conn = self.conn.lock();
        let changed = conn
            .execute(
                "UPDATE users SET session_id = ?1 WHERE id = ?2",
                params![session_id.as_str(), user_id.0],
            )
            .map_err(backend)?;

        if changed == 0 {
            return Err(StoreError::NotFound);
        }

        Self::user_by_id(&conn, user_id)
    }
}

impl std::fmt::Debug for SqliteUserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteUserStore").finish_non_exhaustive()
    }
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    let id: i64 = row.get(0)?;
    let email: String = row.get(1)?;
    let hashed_password: String = row.get(2)?;
    let session_id: Option<String> = row.get(3)?;

    Ok(User::new(UserId(id), email, PasswordDigest::from_phc(hashed_password))
        .with_session(session_id.map(SessionId::new)))
}

fn backend(err: rusqlite::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn log_connected(path: &Path) {
    security_event!(
        SecurityEvent::DatabaseConnected,
        path = %path.display(),
        "User store opened"
    );
    info!(path = %path.display(), "SQLite user store ready");
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::with_captured_tracing;

    fn digest(tag: &str) -> PasswordDigest {
        PasswordDigest::from_phc(format!("$argon2id$v=19$m=8,t=1,p=1$c2FsdA${}", tag))
    }

    #[test]
    fn test_add_and_find() {
        let store = SqliteUserStore::open_in_memory().unwrap();
        let user = store.add_user("a@x.com", digest("one")).unwrap();
        assert!(!user.has_session());

        let found = store.find_user_by_email("a@x.com").unwrap();
        assert_eq!(found.id(), user.id());
        assert_eq!(found.email(), "a@x.com");
        assert!(found.password_digest().ct_eq(&digest("one")));
        assert!(found.session_id().is_none());
    }

    #[test]
    fn test_not_found() {
        let store = SqliteUserStore::open_in_memory().unwrap();
        assert!(matches!(
            store.find_user_by_email("nobody@example.com"),
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.update_session(UserId(42), SessionId::new("s")),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn test_unique_email_constraint() {
        let store = SqliteUserStore::open_in_memory().unwrap();
        store.add_user("a@x.com", digest("first")).unwrap();

        let err = store.add_user("a@x.com", digest("second")).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { ref email } if email == "a@x.com"));

        let kept = store.find_user_by_email("a@x.com").unwrap();
        assert!(kept.password_digest().ct_eq(&digest("first")));
        assert_eq!(store.count_email("a@x.com").unwrap(), 1);
        assert_eq!(store.count_email("b@x.com").unwrap(), 0);
    }

    #[test]
    fn test_update_session_overwrites() {
        let store = SqliteUserStore::open_in_memory().unwrap();
        let user = store.add_user("a@x.com", digest("pw")).unwrap();

        let first = store.update_session(user.id(), SessionId::new("s1")).unwrap();
        assert!(first.session_id().unwrap().matches("s1"));

        store.update_session(user.id(), SessionId::new("s2")).unwrap();
        let found = store.find_user_by_email("a@x.com").unwrap();
        assert!(found.session_id().unwrap().matches("s2"));
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = SqliteConfig::new(dir.path().join("users.db"));

        let id = {
            let store = SqliteUserStore::open(&config).unwrap();
            let user = store.add_user("a@x.com", digest("pw")).unwrap();
            store.update_session(user.id(), SessionId::new("s1")).unwrap();
            user.id()
        };

        let reopened = SqliteUserStore::open(&config).unwrap();
        let found = reopened.find_user_by_email("a@x.com").unwrap();
        assert_eq!(found.id(), id);
        assert!(found.session_id().unwrap().matches("s1"));
    }

    #[test]
    fn test_health_check() {
        let store = SqliteUserStore::open_in_memory().unwrap();
        assert!(store.health_check().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = SqliteConfig::new("/tmp/x.db").busy_timeout(Duration::from_millis(250));
        assert_eq!(config.path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_non_unique_constraint_is_backend_error() {
        let store = SqliteUserStore::open_in_memory().unwrap();
        store
            .conn
            .lock()
            .execute_batch(
                "CREATE TRIGGER reject_blocked BEFORE INSERT ON users
                 WHEN NEW.email = 'blocked@x.com'
                 BEGIN SELECT RAISE(ABORT, 'blocked'); END;",
            )
            .unwrap();

        assert!(matches!(
            store.add_user("blocked@x.com", digest("pw")),
            Err(StoreError::Backend(_))
        ));
        assert!(store.add_user("ok@x.com", digest("pw")).is_ok());
        assert!(matches!(
            store.add_user("ok@x.com", digest("pw")),
            Err(StoreError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_from_vars() {
        let config = SqliteConfig::from_vars(|name| match name {
            "AUTH_DATABASE_PATH" => Some("/var/lib/postern/users.db".to_string()),
            "AUTH_DATABASE_BUSY_TIMEOUT" => Some("750ms".to_string()),
            _ => None,
        });
        assert_eq!(config.path, PathBuf::from("/var/lib/postern/users.db"));
        assert_eq!(config.busy_timeout, Duration::from_millis(750));

        let config = SqliteConfig::from_vars(|_| None);
        assert_eq!(config.path, PathBuf::from("auth.db"));
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_vars_invalid_timeout_falls_back_and_warns() {
        let (config, output) = with_captured_tracing(|| {
            SqliteConfig::from_vars(|name| match name {
                "AUTH_DATABASE_BUSY_TIMEOUT" => Some("18446744073709551615s".to_string()),
                _ => None,
            })
        });

        assert_eq!(config.busy_timeout, Duration::from_secs(5));
        assert!(output.contains("AUTH_DATABASE_BUSY_TIMEOUT"));
        assert!(output.contains("\"level\":\"WARN\""));
    }
}
