//! Custom Axum extractors.

pub mod auth;
pub mod json;

pub use auth::CurrentUser;
pub use json::ValidatedJson;
