//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warden_core::types::UserId;
use warden_entity::user::User;

/// Login response for an account that must change its password first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordChangeChallenge {
    pub username: String,
    #[serde(rename = "mustChangePass")]
    pub must_change_pass: bool,
    pub token: String,
}

/// Abbreviated user listing entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub fullname: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname.clone(),
        }
    }
}

/// The caller's own profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// User ID.
    pub id: UserId,
    /// Username.
    pub username: String,
    /// Display name.
    pub fullname: Option<String>,
    /// First successful login.
    pub first_login_at: Option<DateTime<Utc>>,
    /// Most recent login or renewal.
    pub last_login_at: Option<DateTime<Utc>>,
    /// Names of the assigned roles.
    pub roles: Vec<String>,
    /// Granted permission keys.
    pub permissions: Vec<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status string.
    pub status: String,
    /// Server version.
    pub version: String,
}
