//! # warden-entity
//!
//! Domain entity models: user accounts and roles.

pub mod role;
pub mod user;
