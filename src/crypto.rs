//! Constant-time comparison helpers (IA-5(1), SC-23)
//!
//! Secrets held by this crate (password digests, session identifiers) are
//! only ever compared through these functions. Early-exit `==` on a secret
//! leaks the length of the matching prefix through response timing.

use subtle::ConstantTimeEq;

/// Compare two byte slices in constant time.
///
/// Slices of different length compare unequal; the length itself is not
/// treated as secret.
///
/// ```rust
/// use postern::constant_time_eq;
///
/// assert!(constant_time_eq(b"digest", b"digest"));
/// assert!(!constant_time_eq(b"digest", b"digesT"));
/// ```
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// String form of [`constant_time_eq`].
pub fn constant_time_str_eq(a: &str, b: &str) -> bool {
    constant_time_eq(a.as_bytes(), b.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_inputs() {
        assert!(constant_time_eq(b"$argon2id$v=19", b"$argon2id$v=19"));
        assert!(constant_time_str_eq("3f1c-77aa", "3f1c-77aa"));
    }

    #[test]
    fn test_mismatch_at_any_position() {
        assert!(!constant_time_str_eq("abcdef", "Xbcdef"));
        assert!(!constant_time_str_eq("abcdef", "abcdeX"));
    }

    #[test]
    fn test_length_mismatch() {
        assert!(!constant_time_eq(b"short", b"shorter"));
        assert!(constant_time_eq(b"", b""));
    }
}
