//! Password Hashing (IA-5(1))
//!
//! Salted, deliberately slow one-way hashing of memorized secrets with
//! Argon2id (NIST SP 800-63B §5.1.1.2).
//!
//! # Properties
//!
//! - Every call to [`PasswordHasher::hash`] draws a fresh 16-byte salt from the
//!   operating system CSPRNG, so the same password never hashes to the same
//!   digest twice.
//! - Digests are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`).
//!   Salt and cost parameters travel with the digest, so verification keeps
//!   working after the configured cost changes.
//! - Verification re-derives the hash and compares in constant time inside
//!   the `password-hash` crate.
//!
//! # Usage
//!
//! ```ignore
//! use postern::password::PasswordHasher;
//! use postern::HasherConfig;
//!
//! let hasher = PasswordHasher::new(&HasherConfig::default())?;
//! let digest = hasher.hash("correct horse battery staple")?;
//!
//! assert!(hasher.verify("correct horse battery staple", &digest));
//! assert!(!hasher.verify("Tr0ub4dor&3", &digest));
//! ```

use std::fmt;
use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version};
use thiserror::Error;

use crate::config::HasherConfig;
use crate::crypto::constant_time_str_eq;

// ============================================================================
// Password Digest
// ============================================================================

/// Opaque salted password hash in PHC string format.
///
/// The digest is deliberately hard to misuse:
/// - `Debug` prints `PasswordDigest(<redacted>)`
/// - there is no `Display` and no `PartialEq`; use [`PasswordDigest::ct_eq`]
/// - user records skip it during serialization
///
/// Storage backends persist it with [`as_phc`](Self::as_phc) and rebuild it
/// with [`from_phc`](Self::from_phc).
#[derive(Clone)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap a PHC string loaded from storage.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// PHC string for persistence.
    pub fn as_phc(&self) -> &str {
        &self.0
    }

    /// Constant-time equality against another digest.
    pub fn ct_eq(&self, other: &PasswordDigest) -> bool {
        constant_time_str_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Password hashing errors
#[derive(Debug, Clone, Error)]
pub enum HashError {
    /// Cost parameters rejected by Argon2
    #[error("invalid argon2 parameters: {0}")]
    InvalidParams(String),
    /// Hash derivation failed
    #[error("password hash derivation failed: {0}")]
    Derivation(String),
}

// ============================================================================
// Hasher
// ============================================================================

/// Argon2id password hasher (IA-5(1))
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    decoy: OnceLock<Option<PasswordDigest>>,
}

impl PasswordHasher {
    /// Build a hasher with the given cost parameters.
    pub fn new(config: &HasherConfig) -> Result<Self, HashError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| HashError::InvalidParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            decoy: OnceLock::new(),
        })
    }

    /// Hash a plaintext password with a freshly generated salt.
    pub fn hash(&self, plaintext: &str) -> Result<PasswordDigest, HashError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|h| PasswordDigest(h.to_string()))
            .map_err(|e| HashError::Derivation(e.to_string()))
    }

    /// Check a plaintext password against a stored digest.
    ///
    /// Returns `false` for a wrong password and for a digest that does not
    /// parse as a PHC string.
    pub fn verify(&self, plaintext: &str, digest: &PasswordDigest) -> bool {
        PasswordHash::new(digest.as_phc())
            .map(|parsed| {
                self.argon2
                    .verify_password(plaintext.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Spend one verification worth of CPU against a decoy digest.
    ///
    /// Called when no account matches so that a login for an unknown email
    /// costs the same as a login with a wrong password.
    pub fn burn(&self, plaintext: &str) {
        let decoy = self
            .decoy
            .get_or_init(|| self.hash("postern-decoy-credential").ok());

        if let Some(decoy) = decoy {
            let _ = self.verify(plaintext, decoy);
        }
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("algorithm", &"argon2id")
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(&HasherConfig::testing()).unwrap()
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = hasher();
        let first = hasher.hash("secret").unwrap();
        let second = hasher.hash("secret").unwrap();

        assert!(!first.ct_eq(&second));
        assert!(hasher.verify("secret", &first));
        assert!(hasher.verify("secret", &second));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hasher = hasher();
        let digest = hasher.hash("secret").unwrap();

        assert!(!hasher.verify("Secret", &digest));
        assert!(!hasher.verify("", &digest));
    }

    #[test]
    fn test_digest_is_phc_argon2id() {
        let digest = hasher().hash("secret").unwrap();
        assert!(digest.as_phc().starts_with("$argon2id$v=19$"));
        assert!(!digest.as_phc().contains("secret"));
    }

    #[test]
    fn test_malformed_digest_fails_closed() {
        let hasher = hasher();
        assert!(!hasher.verify("secret", &PasswordDigest::from_phc("not-a-phc-string")));
        assert!(!hasher.verify("secret", &PasswordDigest::from_phc("")));
    }

    #[test]
    fn test_verify_uses_embedded_params() {
        let cheap = hasher();
        let digest = cheap.hash("secret").unwrap();

        let costlier = PasswordHasher::new(&HasherConfig {
            memory_kib: 64,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(costlier.verify("secret", &digest));
    }

    #[test]
    fn test_debug_is_redacted() {
        let digest = hasher().hash("secret").unwrap();
        let rendered = format!("{:?}", digest);
        assert_eq!(rendered, "PasswordDigest(<redacted>)");
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = PasswordHasher::new(&HasherConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(matches!(result, Err(HashError::InvalidParams(_))));
    }

    #[test]
    fn test_burn_does_not_panic() {
        let hasher = hasher();
        hasher.burn("anything");
        hasher.burn("anything else");
    }
}
