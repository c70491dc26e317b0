//! Claims carried in a session token payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warden_core::types::UserId;

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer.
    pub iss: String,
    /// Subject: the user id.
    pub sub: UserId,
    /// Audience: the username.
    pub aud: String,
    /// Expiration (seconds since epoch).
    pub exp: i64,
    /// Not-before (seconds since epoch).
    pub nbf: i64,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Random nonce making every token unique.
    pub jti: String,
}

impl Claims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> UserId {
        self.sub
    }

    /// Whether the token is still valid at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.exp > now.timestamp()
    }
}
