//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warden_core::types::{RoleId, UserId};

/// A user account as held by the document store.
///
/// Credential fields (`password_hash`, `current_token`) are never serialized,
/// so a `User` can be returned from any handler without leaking them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Stable identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Human-readable name.
    #[serde(default)]
    pub fullname: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Salt-prefixed password digest.
    #[serde(default, skip_serializing)]
    pub password_hash: Option<String>,
    /// Disabled accounts cannot log in.
    pub enabled: bool,
    /// Set when an administrator assigned the password; only the reset route
    /// is reachable until the user picks a new one.
    #[serde(default)]
    pub must_change_password: bool,
    /// Assigned roles, in assignment order.
    #[serde(default)]
    pub role_ids: Vec<RoleId>,
    /// The only token currently accepted for this user.
    #[serde(default, skip_serializing)]
    pub current_token: Option<String>,
    /// First successful login.
    #[serde(default)]
    pub first_login_at: Option<DateTime<Utc>>,
    /// Most recent successful login or renewal.
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create an enabled user with the given credentials and roles.
    pub fn new(username: impl Into<String>, password_hash: String, role_ids: Vec<RoleId>) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            fullname: None,
            email: None,
            password_hash: Some(password_hash),
            enabled: true,
            must_change_password: false,
            role_ids,
            current_token: None,
            first_login_at: None,
            last_login_at: None,
        }
    }

    /// Set the display name.
    pub fn with_fullname(mut self, fullname: impl Into<String>) -> Self {
        self.fullname = Some(fullname.into());
        self
    }

    /// Flag the account for a mandatory password change.
    pub fn with_password_change_required(mut self) -> Self {
        self.must_change_password = true;
        self
    }

    /// Returns the user with its password hash removed.
    pub fn without_password(mut self) -> Self {
        self.password_hash = None;
        self
    }

    /// Whether `token` is the user's current token.
    pub fn holds_token(&self, token: &str) -> bool {
        self.current_token.as_deref() == Some(token)
    }

    /// Whether the user has ever logged in.
    pub fn has_logged_in(&self) -> bool {
        self.first_login_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_are_not_serialized() {
        let mut user = User::new("alice", "salt+digest".to_string(), vec![]);
        user.current_token = Some("a.b.c".to_string());

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("current_token").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn test_holds_token() {
        let mut user = User::new("alice", String::new(), vec![]);
        assert!(!user.holds_token("a.b.c"));
        user.current_token = Some("a.b.c".to_string());
        assert!(user.holds_token("a.b.c"));
        assert!(!user.holds_token("a.b.d"));
    }

    #[test]
    fn test_without_password() {
        let user = User::new("alice", "x".to_string(), vec![]).without_password();
        assert!(user.password_hash.is_none());
    }
}
