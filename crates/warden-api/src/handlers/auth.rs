//! Auth handlers: login, reset, logout, check, renew, permissions.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use tracing::info;

use crate::dto::request::{LoginRequest, ResetPasswordRequest};
use crate::dto::response::PasswordChangeChallenge;
use crate::error::ApiError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/v1/auth/login
///
/// Responds with the bare token, or with a password change challenge when
/// the account must pick a new password first.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Response, ApiError> {
    let session = state
        .authenticator
        .login(&req.username, &req.password)
        .await?;

    if session.must_change_password {
        info!(username = %session.user.username, "Login requires password change");
        return Ok(Json(PasswordChangeChallenge {
            username: session.user.username,
            must_change_pass: true,
            token: session.token,
        })
        .into_response());
    }

    Ok(session.token.into_response())
}

/// POST /api/v1/auth/reset
pub async fn reset(
    State(state): State<AppState>,
    auth: CurrentUser,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> Result<String, ApiError> {
    state
        .authenticator
        .reset_password(&auth.user, &req.username, &req.password)
        .await?;
    Ok(auth.0.token)
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: CurrentUser,
) -> Result<&'static str, ApiError> {
    state.authenticator.logout(&auth.user).await?;
    Ok("successfully logged out")
}

/// GET /api/v1/auth/check
pub async fn check(_auth: CurrentUser) -> &'static str {
    "ok"
}

/// GET /api/v1/auth/renew
pub async fn renew(State(state): State<AppState>, auth: CurrentUser) -> Result<String, ApiError> {
    let session = state.authenticator.renew(auth.0.user).await?;
    Ok(session.token)
}

/// GET /api/v1/auth/permissions
pub async fn permissions(
    State(state): State<AppState>,
    auth: CurrentUser,
) -> Result<Json<Vec<String>>, ApiError> {
    let resolved = state
        .permission_gate
        .resolver()
        .resolve(&auth.user.role_ids)
        .await?;
    Ok(Json(resolved.permissions.into_iter().collect()))
}
