//! # warden-core
//!
//! Core crate for Warden. Contains configuration schemas, typed identifiers,
//! collection change events, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Warden crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
