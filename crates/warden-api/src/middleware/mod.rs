//! Axum middleware stack.

pub mod auth;
pub mod cascade;
pub mod logging;
