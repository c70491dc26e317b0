//! Token encoding and verification.
//!
//! A token is `base64(header) "." base64(payload) "." hex(signature)` where
//! the signature is HMAC-SHA256 over the first two segments joined by `.`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, warn};
use uuid::Uuid;

use warden_core::config::AuthConfig;
use warden_core::error::AppError;
use warden_core::types::UserId;

use super::claims::Claims;
use super::error::TokenError;

type HmacSha256 = Hmac<Sha256>;

/// Token header.
#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    typ: String,
}

impl Default for TokenHeader {
    fn default() -> Self {
        Self {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Opaque, log-safe identifier for a token: the first 8 characters of its
/// signature segment.
pub fn token_fingerprint(token: &str) -> String {
    token
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .chars()
        .take(8)
        .collect()
}

/// Builds and verifies signed session tokens.
#[derive(Clone)]
pub struct TokenCodec {
    /// HMAC secret.
    secret: Vec<u8>,
    /// Value written to `iss`.
    issuer: String,
    /// Validity window for issued tokens.
    ttl: chrono::TimeDelta,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenCodec {
    /// Creates a codec from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        Ok(Self {
            secret: config.token_secret.as_bytes().to_vec(),
            issuer: config.issuer.clone(),
            ttl: config.token_ttl()?,
        })
    }

    /// Claims for a new token issued to the given user at `now`.
    pub fn claims_for(
        &self,
        user_id: UserId,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<Claims, AppError> {
        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::internal("token expiry out of range"))?;
        let iat = now.timestamp();
        Ok(Claims {
            iss: self.issuer.clone(),
            sub: user_id,
            aud: username.to_string(),
            exp: expires.timestamp(),
            nbf: iat,
            iat,
            jti: Uuid::new_v4().simple().to_string(),
        })
    }

    /// Serializes and signs `claims`.
    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        let header = STANDARD.encode(serde_json::to_vec(&TokenHeader::default())?);
        let payload = STANDARD.encode(serde_json::to_vec(claims)?);
        let signing_input = format!("{header}.{payload}");
        let signature = hex::encode(self.mac(&signing_input)?.finalize().into_bytes());

        debug!(
            username = %claims.aud,
            ttl_seconds = claims.exp - claims.iat,
            "Built token"
        );
        Ok(format!("{signing_input}.{signature}"))
    }

    /// Verifies `token` against the current time.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        self.decode_at(token, Utc::now())
    }

    /// Verifies `token` as of `now`.
    ///
    /// The signature is always checked before the payload is looked at.
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let segments: Vec<&str> = token.split('.').collect();
        let [header, payload, signature] = segments[..] else {
            return Err(TokenError::Malformed {
                segments: segments.len(),
            });
        };

        let mac = self
            .mac(&format!("{header}.{payload}"))
            .map_err(|_| TokenError::SignatureMismatch)?;
        if !is_lower_hex(signature) {
            warn!("Could not validate token signature, it may not be a token");
            return Err(TokenError::SignatureMismatch);
        }
        let provided = hex::decode(signature).map_err(|_| TokenError::SignatureMismatch)?;
        if mac.verify_slice(&provided).is_err() {
            warn!("Could not validate token signature, it may not be a token");
            return Err(TokenError::SignatureMismatch);
        }

        let claims = STANDARD
            .decode(payload)
            .map_err(|e| TokenError::PayloadUnparseable(e.to_string()))
            .and_then(|bytes| {
                serde_json::from_slice::<Claims>(&bytes)
                    .map_err(|e| TokenError::PayloadUnparseable(e.to_string()))
            })
            .inspect_err(|e| warn!(error = %e, "Error parsing token payload"))?;

        if !claims.is_live_at(now) {
            debug!(exp = claims.exp, "Expired token");
            return Err(TokenError::Expired { exp: claims.exp });
        }

        Ok(claims)
    }

    fn mac(&self, signing_input: &str) -> Result<HmacSha256, AppError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::internal(format!("Invalid token secret: {e}")))?;
        mac.update(signing_input.as_bytes());
        Ok(mac)
    }
}

fn is_lower_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
