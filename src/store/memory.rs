//! In-memory user store

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{Result, StoreError, UserStore};
use crate::identifier::SessionId;
use crate::password::PasswordDigest;
use crate::user::{User, UserId};

#[derive(Debug, Default)]
struct Records {
    next_id: i64,
    by_id: HashMap<UserId, User>,
    by_email: HashMap<String, UserId>,
}

/// Process-local user store.
///
/// Uniqueness check and insert happen under one write lock. Clones share
/// the same records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    records: Arc<RwLock<Records>>,
}

impl InMemoryUserStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.by_id.len()).unwrap_or(0)
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of stored users with exactly this email
    pub fn count_email(&self, email: &str) -> usize {
        self.records
            .read()
            .map(|r| r.by_id.values().filter(|u| u.email() == email).count())
            .unwrap_or(0)
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("user store lock poisoned".to_string())
}

impl UserStore for InMemoryUserStore {
    fn find_user_by_email(&self, email: &str) -> Result<User> {
        let records = self.records.read().map_err(poisoned)?;
        records
            .by_email
            .get(email)
            .and_then(|id| records.by_id.get(id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn add_user(&self, email: &str, hashed_password: PasswordDigest) -> Result<User> {
        let mut records = self.records.write().map_err(poisoned)?;

        if records.by_email.contains_key(email) {
            return Err(StoreError::Duplicate {
                email: email.to_string(),
            });
        }

        records.next_id += 1;
        let id = UserId(records.next_id);
        let user = User::new(id, email, hashed_password);

        records.by_email.insert(email.to_string(), id);
        records.by_id.insert(id, user.clone());

        Ok(user)
    }

    fn update_session(&self, user_id: UserId, session_id: SessionId) -> Result<User> {
        let mut records = self.records.write().map_err(poisoned)?;
        let user = records.by_id.get_mut(&user_id).ok_or(StoreError::NotFound)?;

        *user = user.clone().with_session(Some(session_id));
        Ok(user.clone())
    }
}
