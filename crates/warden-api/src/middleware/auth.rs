//! Token authentication middleware.

use axum::extract::{OriginalUri, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticates the request and attaches the caller for
/// [`CurrentUser`](crate::extractors::CurrentUser).
///
/// An `Authorization` value that is not valid UTF-8 is treated as an
/// unreadable bearer header.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .map(|v| v.to_str().unwrap_or_default().to_string());
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let authenticated = state
        .request_authenticator
        .authenticate(authorization.as_deref(), &path)
        .await?;

    request.extensions_mut().insert(authenticated);
    Ok(next.run(request).await)
}
