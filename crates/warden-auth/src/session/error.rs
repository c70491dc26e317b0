//! Login and session establishment failures.

use thiserror::Error;

use warden_core::error::{AppError, ErrorKind};

/// Why a login, renewal, logout, or password reset did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No user with the given username.
    #[error("User not found")]
    UserNotFound,
    /// The account is disabled.
    #[error("User disabled")]
    UserDisabled,
    /// The account has no stored password hash.
    #[error("Password error")]
    CredentialError,
    /// The password did not match.
    #[error("Wrong password")]
    WrongPassword,
    /// The user record has no username to put in a token.
    #[error("No username!")]
    MissingIdentity,
    /// A password reset was requested for someone other than the caller.
    #[error("Password not flagged for reset")]
    ResetNotPermitted,
    /// The document store rejected or could not apply the write.
    #[error("Database error: {0}")]
    Persistence(String),
    /// Token or hash computation failed.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Short classification for structured logs.
    pub fn classification(&self) -> &'static str {
        match self {
            Self::UserNotFound => "user_not_found",
            Self::UserDisabled => "user_disabled",
            Self::CredentialError => "credential_error",
            Self::WrongPassword => "wrong_password",
            Self::MissingIdentity => "missing_identity",
            Self::ResetNotPermitted => "reset_not_permitted",
            Self::Persistence(_) => "persistence",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let kind = match &err {
            AuthError::Persistence(_) => ErrorKind::Persistence,
            AuthError::Internal(_) => ErrorKind::Internal,
            _ => ErrorKind::Authentication,
        };
        AppError::new(kind, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_failures_are_authentication_errors() {
        for err in [
            AuthError::UserNotFound,
            AuthError::UserDisabled,
            AuthError::CredentialError,
            AuthError::WrongPassword,
            AuthError::MissingIdentity,
            AuthError::ResetNotPermitted,
        ] {
            let app: AppError = err.into();
            assert!(app.is(ErrorKind::Authentication));
        }
    }

    #[test]
    fn test_persistence_failure_maps_to_persistence() {
        let app: AppError = AuthError::Persistence("down".into()).into();
        assert!(app.is(ErrorKind::Persistence));
        assert_eq!(app.message, "Database error: down");
    }
}
