/// Credential check
///
/// Looks up an active user by email and verifies the password. The errors
/// are passed through untouched (`NotFound`, `IsInactive`, `Mismatch`); it
/// is up to the caller to collapse them into one response if it does not
/// want to reveal which emails are registered.

use tracing::debug;

use super::error::AccountError;
use super::loader::fetch_active_by_email;
use crate::auth::password::PasswordHashing;
use crate::models::user::ActiveUser;
use crate::store::UserStore;

/// Returns the active user owning `email_address` if `password` matches
pub async fn authenticate(
    store: &dyn UserStore,
    hasher: &dyn PasswordHashing,
    email_address: &str,
    password: &str,
) -> Result<ActiveUser, AccountError> {
    let row = fetch_active_by_email(store, email_address, None).await?;

    hasher.verify(&row.password_hash, password).await.map_err(|e| {
        debug!(user_id = %row.id, error = %e, "Password verification failed");
        AccountError::from(e)
    })?;

    debug!(user_id = %row.id, "User authenticated");
    Ok(ActiveUser::from_row(row))
}
