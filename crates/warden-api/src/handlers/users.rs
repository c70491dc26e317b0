//! User handlers: the tiered listing and the caller's profile.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use crate::dto::response::{ProfileResponse, UserSummary};
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// GET /api/v1/users, tier for `manageUsers`: full user documents.
pub async fn list_full(state: AppState, _auth: CurrentUser) -> Result<Response, ApiError> {
    let users = state.users.list_all().await;
    Ok(Json(users).into_response())
}

/// GET /api/v1/users, tier for everyone else: id and display name only.
pub async fn list_summary(state: AppState, _auth: CurrentUser) -> Result<Response, ApiError> {
    let users = state.users.list_all().await;
    let summaries: Vec<UserSummary> = users.iter().map(UserSummary::from).collect();
    Ok(Json(summaries).into_response())
}

/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    auth: CurrentUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let resolved = state
        .permission_gate
        .resolver()
        .resolve(&auth.user.role_ids)
        .await?;
    let user = &auth.user;

    Ok(Json(ProfileResponse {
        id: user.id,
        username: user.username.clone(),
        fullname: user.fullname.clone(),
        first_login_at: user.first_login_at,
        last_login_at: user.last_login_at,
        roles: resolved.roles,
        permissions: resolved.permissions.into_iter().collect(),
    }))
}
