/// Registration and login
///
/// # Endpoints
///
/// - `POST /v1/auth/register`: create an active user, publish `new_user`,
///   return a token (201)
/// - `POST /v1/auth/login`: check credentials, return a token
///
/// Login answers wrong passwords and unknown emails with the same 401 body.
/// An inactive account gets a distinct 403.

use accounts_shared::accounts::AccountError;
use accounts_shared::models::user::PendingUser;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email_address: String,

    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email_address: String,

    pub password: String,
}

/// Issued token, returned by both endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub user_id: Uuid,

    pub token: String,
}

const INCORRECT_DETAILS: &str = "Incorrect details";

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    let pending = PendingUser::new(Uuid::new_v4(), req.email_address, req.password);

    let created = state.accounts.create(pending).await?;
    state.publish(&created).await;

    let token = state.issue_token(created.id)?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            user_id: created.id,
            token,
        }),
    ))
}

/// Log in with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = state
        .accounts
        .authenticate(&req.email_address, &req.password)
        .await
        .map_err(login_error)?;

    let token = state.issue_token(user.id())?;

    Ok(Json(TokenResponse {
        user_id: user.id(),
        token,
    }))
}

fn login_error(err: AccountError) -> ApiError {
    match err {
        AccountError::NotFound | AccountError::Mismatch => {
            ApiError::Unauthorized(INCORRECT_DETAILS.to_string())
        }
        AccountError::IsInactive => ApiError::Forbidden("Account is inactive".to_string()),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_collapses_unknown_and_mismatch() {
        let unknown = login_error(AccountError::NotFound);
        let mismatch = login_error(AccountError::Mismatch);

        assert_eq!(unknown.to_string(), mismatch.to_string());
        assert!(matches!(unknown, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_login_error_inactive_is_distinct() {
        assert!(matches!(login_error(AccountError::IsInactive), ApiError::Forbidden(_)));
    }
}
