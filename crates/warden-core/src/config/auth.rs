//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Placeholder signing secret; the server warns when it is still in use.
pub const DEFAULT_TOKEN_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Token signing and validity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signatures (HMAC-SHA256).
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
    /// How long an issued token stays valid, in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,
    /// Value of the `iss` claim.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// The only route reachable while a password change is pending.
    #[serde(default = "default_reset_path")]
    pub reset_path: String,
    /// Password KDF memory cost in KiB.
    #[serde(default = "default_password_memory")]
    pub password_memory_kib: u32,
    /// Password KDF iteration count.
    #[serde(default = "default_password_iterations")]
    pub password_iterations: u32,
}

impl AuthConfig {
    /// Token validity window as a chrono duration.
    ///
    /// Fails when `token_ttl_seconds` is outside the range chrono can
    /// represent.
    pub fn token_ttl(&self) -> Result<chrono::TimeDelta, AppError> {
        i64::try_from(self.token_ttl_seconds)
            .ok()
            .and_then(chrono::TimeDelta::try_seconds)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "auth.token_ttl_seconds out of range: {}",
                    self.token_ttl_seconds
                ))
            })
    }

    /// Whether the signing secret is still the shipped placeholder.
    pub fn uses_default_secret(&self) -> bool {
        self.token_secret == DEFAULT_TOKEN_SECRET
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
            token_ttl_seconds: default_token_ttl(),
            issuer: default_issuer(),
            reset_path: default_reset_path(),
            password_memory_kib: default_password_memory(),
            password_iterations: default_password_iterations(),
        }
    }
}

fn default_token_secret() -> String {
    DEFAULT_TOKEN_SECRET.to_string()
}

fn default_token_ttl() -> u64 {
    86_400
}

fn default_issuer() -> String {
    "warden".to_string()
}

fn default_reset_path() -> String {
    "/api/v1/auth/reset".to_string()
}

fn default_password_memory() -> u32 {
    19_456
}

fn default_password_iterations() -> u32 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_token_ttl_in_range() {
        let config = AuthConfig::default();
        assert_eq!(config.token_ttl().unwrap().num_seconds(), 86_400);
    }

    #[test]
    fn test_token_ttl_out_of_range_is_configuration_error() {
        for seconds in [u64::MAX, i64::MAX as u64] {
            let config = AuthConfig {
                token_ttl_seconds: seconds,
                ..AuthConfig::default()
            };
            let err = config.token_ttl().unwrap_err();
            assert!(err.is(ErrorKind::Configuration));
        }
    }
}
