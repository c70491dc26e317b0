//! Login orchestration: credential check, token issuance, persistence.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use warden_entity::user::{User, UserFilter, UserUpdate};
use warden_store::traits::{DocumentStore, UserDirectory};

use crate::password::PasswordHasher;
use crate::token::{TokenCodec, token_fingerprint};

use super::error::AuthError;

/// An established session.
#[derive(Debug, Clone)]
pub struct Session {
    /// The newly issued token, now the user's current token.
    pub token: String,
    /// Whether the user must change their password before doing anything else.
    pub must_change_password: bool,
    /// The authenticated user, without password hash.
    pub user: User,
}

/// Runs the login, renewal, logout, and password reset flows.
#[derive(Debug, Clone)]
pub struct Authenticator {
    codec: Arc<TokenCodec>,
    hasher: Arc<PasswordHasher>,
    users: Arc<dyn UserDirectory>,
    store: Arc<dyn DocumentStore>,
}

impl Authenticator {
    /// Creates an authenticator over the given collaborators.
    pub fn new(
        codec: Arc<TokenCodec>,
        hasher: Arc<PasswordHasher>,
        users: Arc<dyn UserDirectory>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            codec,
            hasher,
            users,
            store,
        }
    }

    /// Authenticates a username and password and establishes a session.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let result = self.check_credentials(username, password).await;
        let user = match result {
            Ok(user) => user,
            Err(e) => {
                warn!(username, reason = e.classification(), "Login rejected");
                return Err(e);
            }
        };

        info!(username, "User authenticated, building token");
        self.establish_session(user).await
    }

    /// Issues a new token for `user` and records it as the current token.
    ///
    /// The session only exists once the store write succeeds.
    pub async fn establish_session(&self, mut user: User) -> Result<Session, AuthError> {
        if user.username.is_empty() {
            warn!(user_id = %user.id, "Refusing to issue token for user without username");
            return Err(AuthError::MissingIdentity);
        }

        let now = Utc::now();
        let token = self
            .codec
            .claims_for(user.id, &user.username, now)
            .and_then(|claims| self.codec.encode(&claims))
            .map_err(|e| AuthError::Internal(e.message))?;

        let update = UserUpdate::session_issued(&user, &token, now);
        self.persist(&UserFilter::Id(user.id), &update, &user.username)
            .await?;
        update.apply(&mut user);

        info!(
            username = %user.username,
            token = %token_fingerprint(&token),
            "Session established"
        );
        Ok(Session {
            token,
            must_change_password: user.must_change_password,
            user: user.without_password(),
        })
    }

    /// Replaces an authenticated user's token with a fresh one.
    ///
    /// The previous token stops being accepted as soon as this succeeds.
    pub async fn renew(&self, user: User) -> Result<Session, AuthError> {
        info!(username = %user.username, "Renewing session");
        self.establish_session(user).await
    }

    /// Clears the user's current token.
    pub async fn logout(&self, user: &User) -> Result<(), AuthError> {
        info!(username = %user.username, "User issued a logout");
        self.persist(
            &UserFilter::Id(user.id),
            &UserUpdate::token_cleared(),
            &user.username,
        )
        .await
    }

    /// Stores a new password chosen by `user` and clears the pending-change flag.
    ///
    /// `username` must name the caller.
    pub async fn reset_password(
        &self,
        user: &User,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        if user.username != username {
            warn!(
                username = %user.username,
                requested = username,
                "Password reset requested for another account"
            );
            return Err(AuthError::ResetNotPermitted);
        }

        let hash = self
            .hasher
            .hash_password(password)
            .map_err(|e| AuthError::Internal(e.message))?;
        self.persist(
            &UserFilter::Id(user.id),
            &UserUpdate::password_reset(hash),
            &user.username,
        )
        .await?;

        info!(username = %user.username, "Password reset");
        Ok(())
    }

    async fn check_credentials(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .users
            .find_by_username(username)
            .await
            .ok_or(AuthError::UserNotFound)?;

        if !user.enabled {
            return Err(AuthError::UserDisabled);
        }

        let stored = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::CredentialError)?;

        if !self.hasher.verify_password(password, stored) {
            return Err(AuthError::WrongPassword);
        }

        Ok(user.without_password())
    }

    /// Writes `update` to the store, then to the user directory so the
    /// caller's next request sees it.
    async fn persist(
        &self,
        filter: &UserFilter,
        update: &UserUpdate,
        username: &str,
    ) -> Result<(), AuthError> {
        match self.store.update_user(filter, update).await {
            Ok(0) => {
                error!(username, "User document missing during update");
                Err(AuthError::Persistence("user document not found".to_string()))
            }
            Ok(_) => {
                self.users.apply(filter, update).await;
                Ok(())
            }
            Err(e) => {
                error!(username, error = %e, "Error updating user document");
                Err(AuthError::Persistence(e.message))
            }
        }
    }
}
