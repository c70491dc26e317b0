//! # warden-api
//!
//! HTTP API layer for Warden built on Axum.
//!
//! Provides the auth, role, and user endpoints, the authentication
//! middleware, permission cascades for tiered routes, extractors, DTOs, and
//! error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
