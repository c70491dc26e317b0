//! Role-based access control: the permission catalog, permission
//! resolution across a user's roles, and the built-in role guard.

pub mod catalog;
pub mod guard;
pub mod resolver;

pub use catalog::{PERMISSION_CATALOG, PermissionCategory, PermissionEntry};
pub use guard::ensure_role_mutable;
pub use resolver::{PermissionResolver, ResolvedRoles};
