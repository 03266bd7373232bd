/// Account service context
///
/// Bundles the store and the hashing service behind shared handles so the
/// calling layer constructs them once and passes the context around. All
/// methods delegate to the free functions in [`loader`](super::loader),
/// [`engine`](super::engine) and [`authenticate`](super::authenticate).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use accounts_shared::accounts::AccountService;
/// use accounts_shared::auth::password::{Argon2Hasher, HashingConfig};
/// use accounts_shared::models::user::PendingUser;
/// use accounts_shared::store::MemoryUserStore;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = AccountService::new(
///     Arc::new(MemoryUserStore::new()),
///     Arc::new(Argon2Hasher::new(HashingConfig::default())),
/// );
///
/// let created = service.create(PendingUser::new(Uuid::new_v4(), "a@x.com", "secret1")).await?;
/// let user = service.load_active(created.id, Some(created.version)).await?;
/// let deactivated = service.deactivate(user).await?;
/// assert_eq!(deactivated.version, 2);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use uuid::Uuid;

use super::{authenticate, engine, loader, AccountError};
use crate::auth::password::PasswordHashing;
use crate::events::{UserActivated, UserCreated, UserDeactivated};
use crate::models::user::{ActiveUser, InactiveUser, PendingUser};
use crate::store::UserStore;

/// Shared store and hasher
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHashing>,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHashing>) -> Self {
        Self { store, hasher }
    }

    pub fn store(&self) -> &dyn UserStore {
        self.store.as_ref()
    }

    pub async fn create(&self, pending: PendingUser) -> Result<UserCreated, AccountError> {
        engine::create(self.store.as_ref(), self.hasher.as_ref(), pending).await
    }

    pub async fn deactivate(&self, user: ActiveUser) -> Result<UserDeactivated, AccountError> {
        engine::deactivate(self.store.as_ref(), user).await
    }

    pub async fn activate(&self, user: InactiveUser) -> Result<UserActivated, AccountError> {
        engine::activate(self.store.as_ref(), user).await
    }

    pub async fn load_active(
        &self,
        id: Uuid,
        expected_version: Option<i64>,
    ) -> Result<ActiveUser, AccountError> {
        loader::load_active(self.store.as_ref(), id, expected_version).await
    }

    pub async fn load_inactive(
        &self,
        id: Uuid,
        expected_version: Option<i64>,
    ) -> Result<InactiveUser, AccountError> {
        loader::load_inactive(self.store.as_ref(), id, expected_version).await
    }

    pub async fn load_active_by_email(
        &self,
        email_address: &str,
        expected_version: Option<i64>,
    ) -> Result<ActiveUser, AccountError> {
        loader::load_active_by_email(self.store.as_ref(), email_address, expected_version).await
    }

    pub async fn authenticate(&self, email_address: &str, password: &str) -> Result<ActiveUser, AccountError> {
        authenticate::authenticate(self.store.as_ref(), self.hasher.as_ref(), email_address, password).await
    }
}
