/// User store abstraction
///
/// The loader and the transition engine only talk to storage through the
/// [`UserStore`] trait. Four operations are needed:
///
/// - get a row by id
/// - get a row by normalized email
/// - insert a row (fails on a unique violation)
/// - conditional update of `(is_active, version)` keyed on `(id, version)`,
///   returning the number of rows matched
///
/// # Implementations
///
/// - [`postgres::PgUserStore`]: PostgreSQL via sqlx
/// - [`memory::MemoryUserStore`]: in-process map with the same constraints,
///   for tests and local development
///
/// # Example
///
/// ```
/// use accounts_shared::store::{memory::MemoryUserStore, UserStore};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryUserStore::new();
/// assert!(store.find_by_id(Uuid::new_v4()).await?.is_none());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::user::{NewUser, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

/// Errors raised by a store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Insert rejected by a unique constraint
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A keyed update matched more than one row
    #[error("Unexpected affected row count: {0}")]
    UnexpectedRowCount(u64),

    /// Any other database failure (connection, timeout, protocol)
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// True when the violated constraint is the email uniqueness constraint
    pub fn is_email_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::UniqueViolation { constraint }
                if constraint == crate::models::user::EMAIL_UNIQUE_CONSTRAINT
        )
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or_default().to_string(),
                };
            }
        }
        StoreError::Database(err)
    }
}

/// Persistent table of user rows
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns the row with this id, if any
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Returns the row with this normalized email, if any
    async fn find_by_email(&self, email_address: &str) -> Result<Option<User>, StoreError>;

    /// Inserts a row; fails with [`StoreError::UniqueViolation`] when the id
    /// or the email address is taken
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    /// Sets `is_active` and `version = expected_version + 1` where
    /// `id = id AND version = expected_version`; returns rows matched
    async fn update_active_if_version(
        &self,
        id: Uuid,
        expected_version: i64,
        is_active: bool,
    ) -> Result<u64, StoreError>;

    /// Connectivity check
    async fn ping(&self) -> Result<(), StoreError>;
}
