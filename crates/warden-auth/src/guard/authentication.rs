//! Request authentication: bearer extraction, token validation, user
//! resolution, and the single-current-token and password-change checks.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use warden_core::error::{AppError, ErrorKind};
use warden_entity::user::User;
use warden_store::traits::UserDirectory;

use crate::token::{Claims, TokenCodec, TokenError, token_fingerprint};

const BEARER_PREFIX: &str = "Bearer";

/// Why a request failed authentication.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthRejection {
    #[error("missing authorization header")]
    MissingHeader,
    #[error("cannot get token from Authorization header")]
    UnreadableHeader,
    #[error("token failed authorization validation")]
    InvalidToken(TokenError),
    #[error("token user invalid")]
    UnknownUser,
    #[error("token does not match the current token")]
    StaleToken,
    #[error("you must change your password before continuing")]
    PasswordChangeRequired,
}

impl AuthRejection {
    /// Error category, which decides the response status.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingHeader => ErrorKind::Validation,
            Self::StaleToken | Self::PasswordChangeRequired => ErrorKind::Conflict,
            _ => ErrorKind::Authentication,
        }
    }
}

impl From<AuthRejection> for AppError {
    fn from(rejection: AuthRejection) -> Self {
        AppError::new(rejection.kind(), rejection.to_string())
    }
}

/// A request that passed every authentication check.
#[derive(Debug, Clone)]
pub struct Authenticated {
    /// The resolved user, without password hash.
    pub user: User,
    /// The presented token.
    pub token: String,
    /// Its verified claims.
    pub claims: Claims,
}

/// Extracts the token from an `Authorization: Bearer <token>` value.
///
/// Exactly one `"Bearer "` separator is accepted.
pub fn extract_bearer(header: &str) -> Option<&str> {
    if !header.starts_with(BEARER_PREFIX) {
        return None;
    }
    let parts: Vec<&str> = header.split("Bearer ").collect();
    match parts[..] {
        ["", token] if !token.is_empty() => Some(token),
        _ => None,
    }
}

/// Authenticates requests from their `Authorization` header.
#[derive(Debug, Clone)]
pub struct RequestAuthenticator {
    codec: Arc<TokenCodec>,
    users: Arc<dyn UserDirectory>,
    reset_path: String,
}

impl RequestAuthenticator {
    /// Creates an authenticator. Requests to `reset_path` skip the pending
    /// password change check.
    pub fn new(
        codec: Arc<TokenCodec>,
        users: Arc<dyn UserDirectory>,
        reset_path: impl Into<String>,
    ) -> Self {
        Self {
            codec,
            users,
            reset_path: reset_path.into(),
        }
    }

    /// Runs every check against one request.
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
        path: &str,
    ) -> Result<Authenticated, AuthRejection> {
        let header = authorization.ok_or(AuthRejection::MissingHeader)?;
        let token = extract_bearer(header).ok_or(AuthRejection::UnreadableHeader)?;

        let claims = self.codec.decode(token).map_err(|e| {
            warn!(
                reason = e.classification(),
                token = %token_fingerprint(token),
                "Token failed validation"
            );
            AuthRejection::InvalidToken(e)
        })?;

        let user = self
            .users
            .find_by_id(claims.user_id())
            .await
            .ok_or_else(|| {
                warn!(user_id = %claims.sub, "Token subject does not resolve to a user");
                AuthRejection::UnknownUser
            })?;

        if !user.holds_token(token) {
            warn!(
                username = %user.username,
                token = %token_fingerprint(token),
                "Token is not the user's current token"
            );
            return Err(AuthRejection::StaleToken);
        }

        if user.must_change_password && path != self.reset_path {
            debug!(username = %user.username, path, "Password change pending");
            return Err(AuthRejection::PasswordChangeRequired);
        }

        Ok(Authenticated {
            user: user.without_password(),
            token: token.to_string(),
            claims,
        })
    }
}
