//! User account record (AC-2)

use std::fmt;

use serde::Serialize;

use crate::identifier::SessionId;
use crate::password::PasswordDigest;

/// Store-assigned user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered account.
///
/// The password digest and session identifier are secrets: both are left out
/// of serialized output and of `Debug`.
#[derive(Clone, Serialize)]
pub struct User {
    id: UserId,
    email: String,
    #[serde(skip)]
    hashed_password: PasswordDigest,
    #[serde(skip)]
    session_id: Option<SessionId>,
}

impl User {
    /// Build a record for a freshly inserted or loaded account.
    ///
    /// Storage backends are the only expected callers.
    pub fn new(id: UserId, email: impl Into<String>, hashed_password: PasswordDigest) -> Self {
        Self {
            id,
            email: email.into(),
            hashed_password,
            session_id: None,
        }
    }

    /// Attach the current session identifier
    pub fn with_session(mut self, session_id: Option<SessionId>) -> Self {
        self.session_id = session_id;
        self
    }

    /// Store-assigned identifier
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Email as stored (already normalized)
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Password digest, for persistence and verification
    pub fn password_digest(&self) -> &PasswordDigest {
        &self.hashed_password
    }

    /// Current session identifier, if one was issued
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// Whether a session has been issued for this user
    pub fn has_session(&self) -> bool {
        self.session_id.is_some()
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("has_session", &self.has_session())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User::new(
            UserId(7),
            "a@x.com",
            PasswordDigest::from_phc("$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA"),
        )
    }

    #[test]
    fn test_new_user_has_no_session() {
        let user = sample();
        assert_eq!(user.id(), UserId(7));
        assert_eq!(user.email(), "a@x.com");
        assert!(!user.has_session());
        assert!(user.session_id().is_none());
    }

    #[test]
    fn test_with_session() {
        let user = sample().with_session(Some(SessionId::new("s-1")));
        assert!(user.session_id().unwrap().matches("s-1"));
    }

    #[test]
    fn test_serialization_omits_secrets() {
        let user = sample().with_session(Some(SessionId::new("s-1")));
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 7, "email": "a@x.com" }));
    }

    #[test]
    fn test_debug_omits_secrets() {
        let user = sample().with_session(Some(SessionId::new("s-1")));
        let rendered = format!("{:?}", user);
        assert!(!rendered.contains("argon2"));
        assert!(!rendered.contains("s-1"));
        assert!(rendered.contains("a@x.com"));
    }
}
