/// Aggregate loader
///
/// Reads one user row and projects it into [`ActiveUser`] or
/// [`InactiveUser`]. Checks run in a fixed order:
///
/// 1. no row: [`AccountError::NotFound`]
/// 2. `expected_version` given and different from the stored version:
///    [`AccountError::InvalidVersion`]
/// 3. active flag does not match the requested view:
///    [`AccountError::IsInactive`] / [`AccountError::IsActive`]
///
/// Each call is a single read. The returned view is a snapshot and goes
/// stale at the first write to the same row.

use tracing::debug;
use uuid::Uuid;

use super::error::AccountError;
use crate::models::user::{normalize_email, ActiveUser, InactiveUser, User};
use crate::store::UserStore;

/// Loads an active user by id
pub async fn load_active(
    store: &dyn UserStore,
    id: Uuid,
    expected_version: Option<i64>,
) -> Result<ActiveUser, AccountError> {
    let row = store.find_by_id(id).await?;
    check_active(row, expected_version).map(ActiveUser::from_row)
}

/// Loads an inactive user by id
pub async fn load_inactive(
    store: &dyn UserStore,
    id: Uuid,
    expected_version: Option<i64>,
) -> Result<InactiveUser, AccountError> {
    let row = store.find_by_id(id).await?.ok_or(AccountError::NotFound)?;
    check_version(&row, expected_version)?;

    if row.is_active {
        debug!(user_id = %row.id, version = row.version, "User is active");
        return Err(AccountError::IsActive);
    }

    debug!(user_id = %row.id, version = row.version, "Loaded inactive user");
    Ok(InactiveUser::from_row(row))
}

/// Loads an active user by email address; the address is normalized first
pub async fn load_active_by_email(
    store: &dyn UserStore,
    email_address: &str,
    expected_version: Option<i64>,
) -> Result<ActiveUser, AccountError> {
    fetch_active_by_email(store, email_address, expected_version)
        .await
        .map(ActiveUser::from_row)
}

/// Same checks as [`load_active_by_email`] but keeps the full row, password
/// hash included
pub(crate) async fn fetch_active_by_email(
    store: &dyn UserStore,
    email_address: &str,
    expected_version: Option<i64>,
) -> Result<User, AccountError> {
    let email_address = normalize_email(email_address);
    let row = store.find_by_email(&email_address).await?;
    check_active(row, expected_version)
}

fn check_active(row: Option<User>, expected_version: Option<i64>) -> Result<User, AccountError> {
    let row = row.ok_or(AccountError::NotFound)?;
    check_version(&row, expected_version)?;

    if !row.is_active {
        debug!(user_id = %row.id, version = row.version, "User is inactive");
        return Err(AccountError::IsInactive);
    }

    debug!(user_id = %row.id, version = row.version, "Loaded active user");
    Ok(row)
}

fn check_version(row: &User, expected_version: Option<i64>) -> Result<(), AccountError> {
    match expected_version {
        Some(expected) if expected != row.version => {
            debug!(
                user_id = %row.id,
                expected = expected,
                actual = row.version,
                "Version mismatch on load"
            );
            Err(AccountError::InvalidVersion {
                expected,
                actual: row.version,
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{NewUser, INITIAL_VERSION};
    use crate::store::MemoryUserStore;

    async fn seed(store: &MemoryUserStore, email: &str, is_active: bool) -> Uuid {
        let id = Uuid::new_v4();
        store
            .insert(NewUser {
                id,
                email_address: email.to_string(),
                password_hash: "$argon2id$stub".to_string(),
                is_active,
                version: INITIAL_VERSION,
            })
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn test_load_active() {
        let store = MemoryUserStore::new();
        let id = seed(&store, "a@x.com", true).await;

        let user = load_active(&store, id, None).await.unwrap();
        assert_eq!(user.id(), id);
        assert_eq!(user.email_address(), "a@x.com");
        assert_eq!(user.version(), 1);

        let user = load_active(&store, id, Some(1)).await.unwrap();
        assert_eq!(user.version(), 1);
    }

    #[tokio::test]
    async fn test_load_missing() {
        let store = MemoryUserStore::new();
        let id = Uuid::new_v4();

        assert!(matches!(load_active(&store, id, None).await, Err(AccountError::NotFound)));
        assert!(matches!(load_inactive(&store, id, None).await, Err(AccountError::NotFound)));
        assert!(matches!(
            load_active_by_email(&store, "nobody@x.com", None).await,
            Err(AccountError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_wrong_state() {
        let store = MemoryUserStore::new();
        let active = seed(&store, "a@x.com", true).await;
        let inactive = seed(&store, "b@x.com", false).await;

        assert!(matches!(load_active(&store, inactive, None).await, Err(AccountError::IsInactive)));
        assert!(matches!(load_inactive(&store, active, None).await, Err(AccountError::IsActive)));
        assert!(matches!(
            load_active_by_email(&store, "b@x.com", None).await,
            Err(AccountError::IsInactive)
        ));

        let user = load_inactive(&store, inactive, None).await.unwrap();
        assert_eq!(user.id(), inactive);
    }

    #[tokio::test]
    async fn test_invalid_version_regardless_of_state() {
        let store = MemoryUserStore::new();
        let active = seed(&store, "a@x.com", true).await;
        let inactive = seed(&store, "b@x.com", false).await;

        let err = load_active(&store, active, Some(2)).await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidVersion { expected: 2, actual: 1 }));

        // wrong state and wrong version: the stale expectation is reported
        let err = load_active(&store, inactive, Some(5)).await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidVersion { expected: 5, actual: 1 }));

        let err = load_inactive(&store, active, Some(5)).await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidVersion { .. }));
    }

    #[tokio::test]
    async fn test_load_by_email_normalizes() {
        let store = MemoryUserStore::new();
        let id = seed(&store, "user@example.com", true).await;

        let user = load_active_by_email(&store, "  User@Example.COM ", None).await.unwrap();
        assert_eq!(user.id(), id);
        assert_eq!(user.email_address(), "user@example.com");
    }

    #[tokio::test]
    async fn test_fetch_keeps_password_hash() {
        let store = MemoryUserStore::new();
        seed(&store, "a@x.com", true).await;

        let row = fetch_active_by_email(&store, "a@x.com", None).await.unwrap();
        assert_eq!(row.password_hash, "$argon2id$stub");
    }
}
