//! Per-request gates: token authentication and permission checks.

pub mod authentication;
pub mod permission;

pub use authentication::{AuthRejection, Authenticated, RequestAuthenticator, extract_bearer};
pub use permission::{GateDecision, PermissionCheck, PermissionGate};
