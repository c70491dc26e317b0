//! `CurrentUser` extractor: the identity attached by the authentication middleware.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use warden_auth::Authenticated;
use warden_core::error::AppError;

use crate::error::ApiError;

/// The authenticated caller of the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Authenticated);

impl std::ops::Deref for CurrentUser {
    type Target = Authenticated;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Authenticated>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                ApiError(AppError::internal(
                    "route is missing the authentication middleware",
                ))
            })
    }
}
