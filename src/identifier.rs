//! Session Identifiers (SC-23, SC-23(3))
//!
//! Unique, unguessable identifiers for authenticated sessions. The default
//! [`UuidGenerator`] renders random (version 4) UUIDs: 122 bits drawn from
//! the operating system CSPRNG, so collisions over the lifetime of a
//! deployment are negligible and values carry no ordering.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::constant_time_str_eq;

/// Source of opaque random identifiers.
///
/// Implementations must be safe to share across request threads. Inject a
/// deterministic implementation in tests with
/// [`AuthCore::with_id_generator`](crate::AuthCore::with_id_generator).
pub trait IdentifierGenerator: Send + Sync {
    /// Produce a new identifier as text.
    fn generate(&self) -> String;
}

/// Random v4 UUID generator (hyphenated, lowercase)
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdentifierGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Opaque session identifier issued by `create_session`.
///
/// Treat it as a bearer secret: `Debug` is redacted and equality against an
/// untrusted value should go through [`SessionId::matches`].
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a stored or generated identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The identifier text, for handing to the transport layer or storage.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison against a presented value.
    pub fn matches(&self, presented: &str) -> bool {
        constant_time_str_eq(&self.0, presented)
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionId(<redacted>)")
    }
}
