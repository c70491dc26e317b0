//! Login, session establishment, renewal, and logout.

pub mod authenticator;
pub mod error;

pub use authenticator::{Authenticator, Session};
pub use error::AuthError;
