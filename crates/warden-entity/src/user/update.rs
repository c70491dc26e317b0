//! Partial updates and selectors for user documents.

use chrono::{DateTime, Utc};

use warden_core::types::UserId;

use super::model::User;

/// Selects the user document a write applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    /// Match by identifier.
    Id(UserId),
    /// Match by unique username.
    Username(String),
}

impl UserFilter {
    /// Whether `user` is selected by this filter.
    pub fn matches(&self, user: &User) -> bool {
        match self {
            Self::Id(id) => user.id == *id,
            Self::Username(name) => user.username == *name,
        }
    }
}

/// A `$set`-style partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    /// New current token; `Some(None)` clears it.
    pub current_token: Option<Option<String>>,
    /// New salted password digest.
    pub password_hash: Option<String>,
    /// New password-change flag.
    pub must_change_password: Option<bool>,
    /// First login timestamp.
    pub first_login_at: Option<DateTime<Utc>>,
    /// Last login timestamp.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserUpdate {
    /// Update recording a freshly issued token.
    ///
    /// `first_login_at` is only set when the user has never logged in.
    pub fn session_issued(user: &User, token: &str, now: DateTime<Utc>) -> Self {
        Self {
            current_token: Some(Some(token.to_string())),
            last_login_at: Some(now),
            first_login_at: (!user.has_logged_in()).then_some(now),
            ..Self::default()
        }
    }

    /// Update clearing the current token.
    pub fn token_cleared() -> Self {
        Self {
            current_token: Some(None),
            ..Self::default()
        }
    }

    /// Update storing a new password chosen by the user.
    pub fn password_reset(password_hash: String) -> Self {
        Self {
            password_hash: Some(password_hash),
            must_change_password: Some(false),
            ..Self::default()
        }
    }

    /// Apply the set fields to `user`.
    pub fn apply(&self, user: &mut User) {
        if let Some(token) = &self.current_token {
            user.current_token = token.clone();
        }
        if let Some(hash) = &self.password_hash {
            user.password_hash = Some(hash.clone());
        }
        if let Some(flag) = self.must_change_password {
            user.must_change_password = flag;
        }
        if let Some(at) = self.first_login_at {
            user.first_login_at = Some(at);
        }
        if let Some(at) = self.last_login_at {
            user.last_login_at = Some(at);
        }
    }
}
