//! Role handlers.

use axum::Json;
use axum::response::{IntoResponse, Response};

use warden_auth::rbac::PERMISSION_CATALOG;

use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// GET /api/v1/roles/permissions (requires `manageRoles`)
pub async fn permission_catalog(_state: AppState, _auth: CurrentUser) -> Result<Response, ApiError> {
    Ok(Json(PERMISSION_CATALOG).into_response())
}
