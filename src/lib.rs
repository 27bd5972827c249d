//! # Postern
//!
//! A small credential core: salted password registration, login
//! verification, and opaque session identifiers behind a pluggable user
//! store.
//!
//! ## Features
//!
//! - **Password Storage** (IA-5(1)): Argon2id with per-user OS-random salts,
//!   PHC-format digests, constant-time verification
//! - **Fail-Closed Login** (IA-2): every failure looks the same to the
//!   caller
//! - **Session Identifiers** (SC-23): random v4 UUIDs, one active session per
//!   user
//! - **Unique Accounts** (AC-2): duplicate registration is refused at the
//!   store, so concurrent registrations cannot both succeed
//! - **Security Event Logging** (AU-2, AU-3): structured `tracing` events
//!   that never carry secrets
//! - **Storage Backends**: in-memory, and SQLite with the `sqlite` feature
//!   (on by default)
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use postern::{AuthConfig, AuthCore, SqliteConfig, SqliteUserStore};
//! use postern::observability::{init, ObservabilityConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init(ObservabilityConfig::from_env())?;
//!
//!     let store = SqliteUserStore::open(&SqliteConfig::from_env())?;
//!     let auth = AuthCore::with_config(Arc::new(store), &AuthConfig::from_env())?;
//!
//!     auth.register("a@x.com", "correct horse battery staple")?;
//!
//!     if auth.authenticate("a@x.com", "correct horse battery staple") {
//!         let session = auth.create_session("a@x.com");
//!         // hand the session id to the transport layer...
//!     }
//!     Ok(())
//! }
//! ```

mod auth;
mod config;
mod crypto;
mod error;
mod identifier;
pub mod observability;
mod parse;
pub mod password;
pub mod prelude;
pub mod store;
mod user;
pub mod validation;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-exports
pub use auth::AuthCore;
pub use config::{AuthConfig, AuthConfigBuilder, HasherConfig};
pub use crypto::{constant_time_eq, constant_time_str_eq};
pub use error::{AuthError, Result};
pub use identifier::{IdentifierGenerator, SessionId, UuidGenerator};
pub use observability::{ObservabilityConfig, ObservabilityConfigBuilder};
pub use parse::{parse_bool, parse_duration, parse_size};
pub use password::{HashError, PasswordDigest, PasswordHasher};
pub use store::{InMemoryUserStore, StoreError, UserStore};
pub use user::{User, UserId};

#[cfg(feature = "sqlite")]
pub use store::{SqliteConfig, SqliteUserStore};
