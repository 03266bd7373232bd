/// Lifecycle transitions on the signed-in user
///
/// Both endpoints load the caller's row in the state they need, apply the
/// transition and publish the matching event. An optional JSON body
/// `{"version": n}` makes the load fail with 409 `stale_state` unless the
/// row is still at version `n`. The body is read whatever its content type;
/// an empty body carries no expectation and anything else that does not
/// parse is a 400.

use accounts_shared::events::DomainEvent;
use axum::{body::Bytes, extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::auth::AuthContext,
};

/// Optional transition request body
#[derive(Debug, Default, Deserialize)]
pub struct TransitionRequest {
    /// Version the caller last saw
    pub version: Option<i64>,
}

/// State of the user after a transition
#[derive(Debug, Serialize, Deserialize)]
pub struct TransitionResponse {
    pub user_id: Uuid,

    pub is_active: bool,

    pub version: i64,
}

fn expected_version(body: &[u8]) -> ApiResult<Option<i64>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let request: TransitionRequest = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid transition body: {}", e)))?;

    Ok(request.version)
}

/// Deactivate the caller's account
pub async fn deactivate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Bytes,
) -> ApiResult<Json<TransitionResponse>> {
    let user = state
        .accounts
        .load_active(auth.user_id, expected_version(&body)?)
        .await?;

    let event = state.accounts.deactivate(user).await?;
    state.publish(&event).await;

    Ok(Json(TransitionResponse {
        user_id: event.user_id(),
        is_active: false,
        version: event.version,
    }))
}

/// Activate the caller's account
pub async fn activate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Bytes,
) -> ApiResult<Json<TransitionResponse>> {
    let user = state
        .accounts
        .load_inactive(auth.user_id, expected_version(&body)?)
        .await?;

    let event = state.accounts.activate(user).await?;
    state.publish(&event).await;

    Ok(Json(TransitionResponse {
        user_id: event.user_id(),
        is_active: true,
        version: event.version,
    }))
}
