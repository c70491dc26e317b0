//! Role domain entities.

pub mod model;

pub use model::{ADMINISTRATOR_ROLE_DESCRIPTION, ADMINISTRATOR_ROLE_NAME, Role};
