//! Signed session tokens: claims, encoding, and verification.

pub mod claims;
pub mod codec;
pub mod error;

pub use claims::Claims;
pub use codec::{TokenCodec, token_fingerprint};
pub use error::TokenError;
