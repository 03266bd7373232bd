/// Bearer token authentication
///
/// Validates the `Authorization: Bearer <token>` header and inserts an
/// [`AuthContext`] into the request extensions. Handlers behind the layer
/// read it with `Extension<AuthContext>`.

use accounts_shared::auth::jwt;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{app::AppState, error::ApiError};

/// Caller identity taken from a validated token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
}

pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = jwt::extract_bearer_token(auth_header)
        .ok_or_else(|| ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    req.extensions_mut().insert(AuthContext { user_id: claims.sub });

    Ok(next.run(req).await)
}
