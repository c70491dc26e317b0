//! Token verification failures.

use thiserror::Error;

/// Why a presented token was not accepted.
///
/// Callers treat every variant the same way (authentication fails); the
/// distinction only matters for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token does not have exactly three `.`-separated segments.
    #[error("malformed token: expected 3 segments, found {segments}")]
    Malformed {
        /// Number of segments found.
        segments: usize,
    },
    /// The signature does not match the header and payload.
    #[error("token signature mismatch")]
    SignatureMismatch,
    /// The signature matched but the payload could not be decoded.
    #[error("token payload unparseable: {0}")]
    PayloadUnparseable(String),
    /// The token is past its expiry.
    #[error("token expired at {exp}")]
    Expired {
        /// Expiry in seconds since the epoch.
        exp: i64,
    },
}

impl TokenError {
    /// Short classification for structured logs.
    pub fn classification(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => "malformed",
            Self::SignatureMismatch => "signature_mismatch",
            Self::PayloadUnparseable(_) => "payload_unparseable",
            Self::Expired { .. } => "expired",
        }
    }
}
