/// Error taxonomy of the account lifecycle
///
/// Every loader and transition returns [`AccountError`]. Callers match on it
/// exhaustively to decide between a user-facing failure and a retry:
///
/// | Variant | Retry? |
/// |---------|--------|
/// | `StateConflict`, `InvalidVersion` | reload and try again |
/// | `IsActive`, `IsInactive` | no, wrong state |
/// | `Validation`, `AlreadyExists`, `NotFound`, `Mismatch` | no, caller input |
/// | `Hashing`, `Storage` | internal failure |

use std::fmt;

use serde::Serialize;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::auth::password::PasswordError;
use crate::store::StoreError;

/// One rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Flattens validator output into one violation per field, sorted by field
    pub fn from_validation_errors(errors: &ValidationErrors) -> Vec<Self> {
        let mut violations: Vec<Self> = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                errs.first().map(|err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    Self::new(field.to_string(), message)
                })
            })
            .collect();

        violations.sort_by(|a, b| a.field.cmp(&b.field));
        violations
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors raised by the loader, the transition engine and authentication
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// One or more input fields were rejected
    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<FieldViolation>),

    /// The normalized email address is already taken
    #[error("User already exists")]
    AlreadyExists,

    /// No row for the given key
    #[error("User not found")]
    NotFound,

    /// An inactive view was requested but the row is active
    #[error("User is active")]
    IsActive,

    /// An active view was requested but the row is inactive
    #[error("User is inactive")]
    IsInactive,

    /// The caller expected a version the row is no longer (or not yet) at
    #[error("Invalid version: expected {expected}, found {actual}")]
    InvalidVersion { expected: i64, actual: i64 },

    /// A conditional write lost the race; the row moved past `version`
    #[error("State conflict on user {id} at version {version}")]
    StateConflict { id: Uuid, version: i64 },

    /// Password does not match the stored hash
    #[error("Credentials do not match")]
    Mismatch,

    /// Hashing primitive failure
    #[error("Password hashing failed: {0}")]
    Hashing(#[source] PasswordError),

    /// Backing store failure
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl AccountError {
    /// True for the activity invariant violations
    pub fn is_wrong_state(&self) -> bool {
        matches!(self, AccountError::IsActive | AccountError::IsInactive)
    }

    /// True when reloading the row and retrying can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AccountError::StateConflict { .. } | AccountError::InvalidVersion { .. }
        )
    }

    /// True for failures the caller cannot fix
    pub fn is_internal(&self) -> bool {
        matches!(self, AccountError::Hashing(_) | AccountError::Storage(_))
    }
}

impl From<PasswordError> for AccountError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Mismatch => AccountError::Mismatch,
            other => AccountError::Hashing(other),
        }
    }
}

impl From<ValidationErrors> for AccountError {
    fn from(errors: ValidationErrors) -> Self {
        AccountError::Validation(FieldViolation::from_validation_errors(&errors))
    }
}

fn join(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
