//! # warden-auth
//!
//! Authentication and authorization core for Warden.
//!
//! - [`password`]: salted Argon2id credential hashing.
//! - [`token`]: signed session tokens.
//! - [`session`]: login, renewal, logout, and password reset.
//! - [`guard`]: per-request authentication and permission gates.
//! - [`rbac`]: permission catalog, resolution, and the built-in role guard.
//! - [`bootstrap`]: startup seeding of the Administrator role and account.

pub mod bootstrap;
pub mod guard;
pub mod password;
pub mod rbac;
pub mod session;
pub mod token;

pub use guard::{
    AuthRejection, Authenticated, GateDecision, PermissionCheck, PermissionGate,
    RequestAuthenticator,
};
pub use password::PasswordHasher;
pub use rbac::{PermissionResolver, ResolvedRoles};
pub use session::{AuthError, Authenticator, Session};
pub use token::{Claims, TokenCodec, TokenError};
