//! User domain entities.

pub mod model;
pub mod update;

pub use model::User;
pub use update::{UserFilter, UserUpdate};
