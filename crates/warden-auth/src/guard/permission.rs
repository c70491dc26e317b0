//! Permission gates with fall-through semantics.
//!
//! A gate never rejects a caller just for lacking a permission. It answers
//! [`GateDecision::Skip`] so the router can try the next handler registered
//! for the same path. Only when every alternative is exhausted does the
//! request fail.

use std::sync::Arc;

use tracing::{debug, error, warn};

use warden_core::error::AppError;
use warden_entity::user::User;

use crate::rbac::{PermissionResolver, catalog};

/// Outcome of a permission gate.
#[derive(Debug, Clone)]
pub enum GateDecision {
    /// Proceed to this route's handler.
    Continue,
    /// Leave this route and try the next one registered for the path.
    Skip,
    /// Stop the request with this error.
    Reject(AppError),
}

impl GateDecision {
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip)
    }
}

/// Builds permission checks over a shared resolver.
#[derive(Debug, Clone)]
pub struct PermissionGate {
    resolver: Arc<PermissionResolver>,
}

impl PermissionGate {
    pub fn new(resolver: Arc<PermissionResolver>) -> Self {
        Self { resolver }
    }

    /// The resolver behind this gate.
    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    /// A reusable check for `key`, to attach to a route.
    pub fn has_permission(&self, key: &'static str) -> PermissionCheck {
        debug_assert!(catalog::is_known(key), "unknown permission key {key}");
        PermissionCheck {
            gate: self.clone(),
            key,
        }
    }

    /// Decides whether `user` may proceed on a route gated by `key`.
    pub async fn check(&self, user: &User, key: &str) -> GateDecision {
        if user.role_ids.is_empty() {
            error!(username = %user.username, "User has no roles");
            return GateDecision::Reject(AppError::integrity(
                "server error checking role permissions",
            ));
        }

        match self.resolver.resolve(&user.role_ids).await {
            Ok(resolved) if resolved.grants(key) => {
                debug!(username = %user.username, permission = key, "Permission granted");
                GateDecision::Continue
            }
            Ok(_) => {
                debug!(
                    username = %user.username,
                    permission = key,
                    "Permission not granted, trying next route"
                );
                GateDecision::Skip
            }
            Err(e) => {
                warn!(
                    username = %user.username,
                    permission = key,
                    error = %e,
                    "Permission check failed"
                );
                GateDecision::Reject(AppError::authorization(format!(
                    "check permission for {key} failed for {}",
                    user.username
                )))
            }
        }
    }
}

/// A gate bound to one permission key.
#[derive(Debug, Clone)]
pub struct PermissionCheck {
    gate: PermissionGate,
    key: &'static str,
}

impl PermissionCheck {
    /// The permission key this check requires.
    pub fn key(&self) -> &'static str {
        self.key
    }

    pub async fn evaluate(&self, user: &User) -> GateDecision {
        self.gate.check(user, self.key).await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use warden_core::error::ErrorKind;
    use warden_core::result::AppResult;
    use warden_core::types::RoleId;
    use warden_entity::role::Role;
    use warden_store::traits::{DocumentStore, RoleDirectory};
    use warden_store::{MemoryDocumentStore, StoreRoleDirectory};

    use super::*;
    use crate::rbac::catalog::{DEV, MANAGE_USERS};

    async fn gate_with_role(keys: &[&str]) -> (PermissionGate, RoleId) {
        let store = Arc::new(MemoryDocumentStore::new());
        let role = store
            .insert_role(Role::new("Support", "", keys.iter().copied()))
            .await
            .unwrap();
        let resolver = PermissionResolver::new(Arc::new(StoreRoleDirectory::new(store)));
        (PermissionGate::new(Arc::new(resolver)), role.id)
    }

    #[tokio::test]
    async fn test_granted_continues() {
        let (gate, role) = gate_with_role(&[MANAGE_USERS]).await;
        let alice = User::new("alice", String::new(), vec![role]);
        assert!(
            gate.has_permission(MANAGE_USERS)
                .evaluate(&alice)
                .await
                .is_continue()
        );
    }

    #[tokio::test]
    async fn test_missing_permission_skips() {
        let (gate, role) = gate_with_role(&[MANAGE_USERS]).await;
        let alice = User::new("alice", String::new(), vec![role]);
        assert!(gate.check(&alice, DEV).await.is_skip());
    }

    #[tokio::test]
    async fn test_no_roles_is_integrity_failure() {
        let (gate, _) = gate_with_role(&[MANAGE_USERS]).await;
        let orphan = User::new("orphan", String::new(), vec![]);
        match gate.check(&orphan, MANAGE_USERS).await {
            GateDecision::Reject(e) => assert!(e.is(ErrorKind::Integrity)),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[derive(Debug)]
    struct BrokenRoles;

    #[async_trait]
    impl RoleDirectory for BrokenRoles {
        async fn list_by_ids(&self, _: &[RoleId]) -> AppResult<Vec<Role>> {
            Err(AppError::persistence("role query failed"))
        }
    }

    #[tokio::test]
    async fn test_lookup_failure_rejects() {
        let gate = PermissionGate::new(Arc::new(PermissionResolver::new(Arc::new(BrokenRoles))));
        let alice = User::new("alice", String::new(), vec![RoleId::new()]);
        match gate.check(&alice, DEV).await {
            GateDecision::Reject(e) => {
                assert!(e.is(ErrorKind::Authorization));
                assert_eq!(e.message, "check permission for dev failed for alice");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }
}
