/// Transition engine
///
/// Create, activate and deactivate. Activation and deactivation are single
/// conditional writes keyed on the view's `(id, version)`:
///
/// ```sql
/// UPDATE users SET is_active = $3, version = $2 + 1
/// WHERE id = $1 AND version = $2
/// ```
///
/// One matched row means the write committed at `version + 1`. Zero means
/// another writer moved the row first and the caller gets
/// [`AccountError::StateConflict`]. The engine never retries.

use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::Validate;

use super::error::AccountError;
use crate::auth::password::PasswordHashing;
use crate::events::{UserActivated, UserCreated, UserDeactivated};
use crate::models::user::{ActiveUser, InactiveUser, NewUser, PendingUser, INITIAL_VERSION};
use crate::store::{StoreError, UserStore};

/// Creates an active user at version 1
///
/// Steps: normalize the email, validate every field, check the email is
/// free, hash the password, insert. An insert rejected by the email unique
/// constraint (a concurrent sign-up with the same address) is reported as
/// [`AccountError::AlreadyExists`] like the pre-check.
pub async fn create(
    store: &dyn UserStore,
    hasher: &dyn PasswordHashing,
    pending: PendingUser,
) -> Result<UserCreated, AccountError> {
    let pending = pending.normalized();
    pending.validate()?;

    if store.find_by_email(&pending.email_address).await?.is_some() {
        debug!(email_address = %pending.email_address, "Email address already registered");
        return Err(AccountError::AlreadyExists);
    }

    let password_hash = hasher.hash(&pending.password).await.map_err(|e| {
        error!(error = %e, "Password hashing failed");
        AccountError::from(e)
    })?;

    let row = store
        .insert(NewUser {
            id: pending.id,
            email_address: pending.email_address,
            password_hash,
            is_active: true,
            version: INITIAL_VERSION,
        })
        .await
        .map_err(|e| match e {
            e if e.is_email_conflict() => {
                debug!("Email address registered concurrently");
                AccountError::AlreadyExists
            }
            e => AccountError::Storage(e),
        })?;

    info!(user_id = %row.id, version = row.version, "User created");

    Ok(UserCreated {
        id: row.id,
        email_address: row.email_address,
        version: row.version,
    })
}

/// Deactivates an active user, consuming the view
pub async fn deactivate(store: &dyn UserStore, user: ActiveUser) -> Result<UserDeactivated, AccountError> {
    let version = set_active(store, user.id(), user.version(), false).await?;
    info!(user_id = %user.id(), version = version, "User deactivated");

    Ok(UserDeactivated {
        id: user.id(),
        version,
    })
}

/// Activates an inactive user, consuming the view
pub async fn activate(store: &dyn UserStore, user: InactiveUser) -> Result<UserActivated, AccountError> {
    let version = set_active(store, user.id(), user.version(), true).await?;
    info!(user_id = %user.id(), version = version, "User activated");

    Ok(UserActivated {
        id: user.id(),
        version,
    })
}

/// Conditional write; returns the new version
async fn set_active(
    store: &dyn UserStore,
    id: Uuid,
    version: i64,
    is_active: bool,
) -> Result<i64, AccountError> {
    match store.update_active_if_version(id, version, is_active).await? {
        1 => Ok(version + 1),
        0 => {
            warn!(user_id = %id, version = version, "Optimistic lock lost");
            Err(AccountError::StateConflict { id, version })
        }
        n => {
            error!(user_id = %id, version = version, rows = n, "Conditional update matched several rows");
            Err(AccountError::Storage(StoreError::UnexpectedRowCount(n)))
        }
    }
}
