//! Postern Prelude - Common imports for applications
//!
//! # Usage
//!
//! ```ignore
//! use postern::prelude::*;
//!
//! let auth = AuthCore::with_config(Arc::new(InMemoryUserStore::new()), &AuthConfig::from_env())?;
//! ```

// =============================================================================
// Credential Core (IA-2, IA-5, SC-23)
// =============================================================================

pub use crate::auth::AuthCore;
pub use crate::config::{AuthConfig, AuthConfigBuilder, HasherConfig};
pub use crate::identifier::{IdentifierGenerator, SessionId, UuidGenerator};
pub use crate::password::PasswordDigest;
pub use crate::user::{User, UserId};

// =============================================================================
// Storage
// =============================================================================

pub use crate::store::{InMemoryUserStore, StoreError, UserStore};

#[cfg(feature = "sqlite")]
pub use crate::store::{SqliteConfig, SqliteUserStore};

// =============================================================================
// Error Handling (SI-11)
// =============================================================================

pub use crate::error::AuthError;
pub use crate::validation::{ValidationError, ValidationErrorCode};

// =============================================================================
// Observability (AU-2, AU-3, AU-12)
// =============================================================================

pub use crate::observability::{ObservabilityConfig, SecurityEvent};

// =============================================================================
// External Re-exports for Convenience
// =============================================================================

pub use std::sync::Arc;

// Tracing for logging
pub use tracing::{debug, error, info, instrument, trace, warn};
