/// PostgreSQL user store
///
/// Thin adapter from [`UserStore`] onto the row functions in
/// [`crate::models::user`]. Callers that need to compose a transition with
/// other writes in one transaction can call those functions directly with a
/// `&mut Transaction` instead of going through this type.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{StoreError, UserStore};
use crate::db::pool::health_check;
use crate::models::user::{NewUser, User};

/// [`UserStore`] backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_email(&self, email_address: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_email(&self.pool, email_address).await?)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        Ok(User::insert(&self.pool, &user).await?)
    }

    async fn update_active_if_version(
        &self,
        id: Uuid,
        expected_version: i64,
        is_active: bool,
    ) -> Result<u64, StoreError> {
        Ok(User::set_active_if_version(&self.pool, id, expected_version, is_active).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(health_check(&self.pool).await?)
    }
}
