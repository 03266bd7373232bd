/// User row, sign-up input and the typed lifecycle views
///
/// A user row is the only shared mutable resource of the service. Its
/// `is_active` flag and `version` counter change together through a single
/// conditional update keyed on `(id, version)`; nothing else ever writes them.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id            UUID PRIMARY KEY,
///     email_address TEXT NOT NULL,
///     password_hash TEXT NOT NULL,
///     is_active     BOOLEAN NOT NULL,
///     created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     version       BIGINT NOT NULL CHECK (version >= 1),
///     CONSTRAINT users_email_address_key UNIQUE (email_address)
/// );
/// ```
///
/// # Views
///
/// `ActiveUser` and `InactiveUser` are distinct types. Deactivation takes an
/// `ActiveUser`, activation takes an `InactiveUser`. Views are only built
/// from a row by the loader and carry the version they were read at.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Name of the unique constraint on the normalized email column
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_address_key";

/// Name of the primary key constraint
pub const PRIMARY_KEY_CONSTRAINT: &str = "users_pkey";

/// Version assigned to a freshly created row
pub const INITIAL_VERSION: i64 = 1;

/// Persisted user row
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Normalized (trimmed, lower-cased) email address, unique across rows
    pub email_address: String,

    /// Argon2id PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Lifecycle flag: true for active accounts
    pub is_active: bool,

    /// When the row was inserted
    pub created_at: DateTime<Utc>,

    /// Optimistic-lock counter; 1 on creation, +1 per committed transition
    pub version: i64,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email_address", &self.email_address)
            .field("password_hash", &"<redacted>")
            .field("is_active", &self.is_active)
            .field("created_at", &self.created_at)
            .field("version", &self.version)
            .finish()
    }
}

/// Row about to be inserted
#[derive(Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub email_address: String,
    pub password_hash: String,
    pub is_active: bool,
    pub version: i64,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("id", &self.id)
            .field("email_address", &self.email_address)
            .field("is_active", &self.is_active)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Sign-up input, built by the caller and consumed by `create`
///
/// Validation runs after the email has been normalized; every field is
/// checked so that all violations are reported together.
#[derive(Clone, Validate)]
pub struct PendingUser {
    /// Caller-chosen identifier; must be a version 4 UUID
    #[validate(custom(function = "validate_user_id"))]
    pub id: Uuid,

    /// Raw email address as typed by the user
    #[validate(
        length(min = 1, message = "cannot be blank"),
        email(message = "must be a valid email address")
    )]
    pub email_address: String,

    /// Plaintext password, 6 to 20 characters
    #[validate(length(min = 6, max = 20, message = "the length must be between 6 and 20"))]
    pub password: String,
}

impl PendingUser {
    pub fn new(id: Uuid, email_address: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id,
            email_address: email_address.into(),
            password: password.into(),
        }
    }

    /// Returns a copy with the email trimmed and lower-cased
    pub fn normalized(self) -> Self {
        Self {
            email_address: normalize_email(&self.email_address),
            ..self
        }
    }
}

impl fmt::Debug for PendingUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingUser")
            .field("id", &self.id)
            .field("email_address", &self.email_address)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn validate_user_id(id: &Uuid) -> Result<(), ValidationError> {
    if id.is_nil() || id.get_version() != Some(uuid::Version::Random) {
        let mut err = ValidationError::new("uuid_v4");
        err.message = Some("must be a valid UUID v4".into());
        return Err(err);
    }
    Ok(())
}

/// Trims surrounding whitespace and lower-cases an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Snapshot of a row whose `is_active` flag was true when loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUser {
    id: Uuid,
    email_address: String,
    version: i64,
}

/// Snapshot of a row whose `is_active` flag was false when loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InactiveUser {
    id: Uuid,
    email_address: String,
    version: i64,
}

macro_rules! view_accessors {
    ($view:ident) => {
        impl $view {
            pub(crate) fn from_row(row: User) -> Self {
                Self {
                    id: row.id,
                    email_address: row.email_address,
                    version: row.version,
                }
            }

            pub fn id(&self) -> Uuid {
                self.id
            }

            pub fn email_address(&self) -> &str {
                &self.email_address
            }

            /// Version observed when the view was loaded
            pub fn version(&self) -> i64 {
                self.version
            }
        }
    };
}

view_accessors!(ActiveUser);
view_accessors!(InactiveUser);

const USER_COLUMNS: &str = "id, email_address, password_hash, is_active, created_at, version";

impl User {
    /// Inserts a new row
    ///
    /// # Errors
    ///
    /// Fails with a database error carrying the violated constraint name when
    /// the id or the email address already exists.
    pub async fn insert<'e>(executor: impl PgExecutor<'e>, data: &NewUser) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO users (id, email_address, password_hash, is_active, version)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&query)
            .bind(data.id)
            .bind(&data.email_address)
            .bind(&data.password_hash)
            .bind(data.is_active)
            .bind(data.version)
            .fetch_one(executor)
            .await
    }

    /// Finds a row by ID
    pub async fn find_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Finds a row by its normalized email address
    pub async fn find_by_email<'e>(
        executor: impl PgExecutor<'e>,
        email_address: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email_address = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(email_address)
            .fetch_optional(executor)
            .await
    }

    /// Sets the active flag and bumps the version, only if the row is still
    /// at `expected_version`
    ///
    /// Returns the number of rows matched: 1 when the write committed, 0 when
    /// another writer got there first.
    pub async fn set_active_if_version<'e>(
        executor: impl PgExecutor<'e>,
        id: Uuid,
        expected_version: i64,
        is_active: bool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_active = $3, version = $2 + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(id)
        .bind(expected_version)
        .bind(is_active)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(email: &str, password: &str) -> PendingUser {
        PendingUser::new(Uuid::new_v4(), email, password)
    }

    fn field_names(err: &validator::ValidationErrors) -> Vec<String> {
        let mut fields: Vec<String> = err.field_errors().keys().map(|k| k.to_string()).collect();
        fields.sort_unstable();
        fields
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  User@Example.com "), "user@example.com");
        assert_eq!(normalize_email("a@x.com"), "a@x.com");
        assert_eq!(normalize_email("\tMIXED@Case.Org\n"), "mixed@case.org");
    }

    #[test]
    fn test_normalized_keeps_id_and_password() {
        let original = pending("  A@X.com ", "secret1");
        let id = original.id;
        let normalized = original.normalized();
        assert_eq!(normalized.id, id);
        assert_eq!(normalized.email_address, "a@x.com");
        assert_eq!(normalized.password, "secret1");
    }

    #[test]
    fn test_valid_pending_user() {
        assert!(pending("user@example.com", "secret1").validate().is_ok());
    }

    #[test]
    fn test_password_length_boundaries() {
        assert!(pending("a@x.com", "12345").validate().is_err());
        assert!(pending("a@x.com", "123456").validate().is_ok());
        assert!(pending("a@x.com", &"x".repeat(20)).validate().is_ok());
        assert!(pending("a@x.com", &"x".repeat(21)).validate().is_err());
    }

    #[test]
    fn test_password_length_counts_characters() {
        // six characters, twelve bytes
        assert!(pending("a@x.com", "пароль").validate().is_ok());
    }

    #[test]
    fn test_invalid_email() {
        let err = pending("not-an-email", "secret1").validate().unwrap_err();
        assert_eq!(field_names(&err), vec!["email_address"]);
    }

    #[test]
    fn test_all_violations_reported() {
        let mut user = pending("", "123");
        user.id = Uuid::nil();

        let err = user.validate().unwrap_err();
        assert_eq!(field_names(&err), vec!["email_address", "id", "password"]);
    }

    #[test]
    fn test_non_v4_id_rejected() {
        let mut user = pending("a@x.com", "secret1");
        user.id = Uuid::from_u128(0x0123_4567_89ab_1def_8123_4567_89ab_cdef);

        let err = user.validate().unwrap_err();
        assert_eq!(field_names(&err), vec!["id"]);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let user = pending("a@x.com", "secret1");
        let rendered = format!("{:?}", user);
        assert!(!rendered.contains("secret1"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_view_projection() {
        let row = User {
            id: Uuid::new_v4(),
            email_address: "a@x.com".to_string(),
            password_hash: "hash".to_string(),
            is_active: true,
            created_at: Utc::now(),
            version: 3,
        };

        let view = ActiveUser::from_row(row.clone());
        assert_eq!(view.id(), row.id);
        assert_eq!(view.email_address(), "a@x.com");
        assert_eq!(view.version(), 3);
    }

    #[test]
    fn test_user_serialization_skips_password_hash() {
        let row = User {
            id: Uuid::new_v4(),
            email_address: "a@x.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            is_active: false,
            created_at: Utc::now(),
            version: 2,
        };

        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["version"], 2);
    }
}
