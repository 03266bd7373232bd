/// In-process user store
///
/// Holds rows in a map behind a synchronous mutex and enforces the same
/// constraints as the PostgreSQL schema: primary key on `id`, unique
/// normalized email, conditional update on `(id, version)`. The lock is
/// never held across an `.await`.
///
/// Used by unit tests, the HTTP integration tests and for running the API
/// without a database.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{StoreError, UserStore};
use crate::models::user::{NewUser, User, EMAIL_UNIQUE_CONSTRAINT, PRIMARY_KEY_CONSTRAINT};

/// [`UserStore`] backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    rows: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Writes are single map operations, so a poisoned map is still consistent.
    fn rows(&self) -> MutexGuard<'_, HashMap<Uuid, User>> {
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.rows().get(&id).cloned())
    }

    async fn find_by_email(&self, email_address: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .rows()
            .values()
            .find(|row| row.email_address == email_address)
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut rows = self.rows();

        if rows.contains_key(&user.id) {
            return Err(StoreError::UniqueViolation {
                constraint: PRIMARY_KEY_CONSTRAINT.to_string(),
            });
        }

        if rows.values().any(|row| row.email_address == user.email_address) {
            return Err(StoreError::UniqueViolation {
                constraint: EMAIL_UNIQUE_CONSTRAINT.to_string(),
            });
        }

        let row = User {
            id: user.id,
            email_address: user.email_address,
            password_hash: user.password_hash,
            is_active: user.is_active,
            created_at: Utc::now(),
            version: user.version,
        };
        rows.insert(row.id, row.clone());

        Ok(row)
    }

    async fn update_active_if_version(
        &self,
        id: Uuid,
        expected_version: i64,
        is_active: bool,
    ) -> Result<u64, StoreError> {
        let mut rows = self.rows();

        match rows.get_mut(&id) {
            Some(row) if row.version == expected_version => {
                row.is_active = is_active;
                row.version = expected_version + 1;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
