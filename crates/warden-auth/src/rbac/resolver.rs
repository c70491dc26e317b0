//! Aggregates the permissions granted across a user's roles.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use warden_core::result::AppResult;
use warden_core::types::RoleId;
use warden_store::traits::RoleDirectory;

/// Role names and the union of their granted permission keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedRoles {
    /// Display names of the matched roles, in directory order.
    pub roles: Vec<String>,
    /// Every key granted by at least one role.
    pub permissions: BTreeSet<String>,
}

impl ResolvedRoles {
    /// Whether `key` was granted.
    pub fn grants(&self, key: &str) -> bool {
        self.permissions.contains(key)
    }
}

/// Resolves permissions from the role directory on every call.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    roles: Arc<dyn RoleDirectory>,
}

impl PermissionResolver {
    pub fn new(roles: Arc<dyn RoleDirectory>) -> Self {
        Self { roles }
    }

    /// Loads the roles in `role_ids` and unions their grants.
    pub async fn resolve(&self, role_ids: &[RoleId]) -> AppResult<ResolvedRoles> {
        let roles = self.roles.list_by_ids(role_ids).await?;

        let mut resolved = ResolvedRoles::default();
        for role in &roles {
            resolved.roles.push(role.name.clone());
            resolved
                .permissions
                .extend(role.granted().map(str::to_string));
        }

        debug!(
            roles = resolved.roles.len(),
            permissions = resolved.permissions.len(),
            "Resolved role permissions"
        );
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use warden_entity::role::Role;
    use warden_store::traits::DocumentStore;
    use warden_store::{MemoryDocumentStore, StoreRoleDirectory};

    use super::*;

    async fn setup() -> (Arc<MemoryDocumentStore>, PermissionResolver) {
        let store = Arc::new(MemoryDocumentStore::new());
        let resolver = PermissionResolver::new(Arc::new(StoreRoleDirectory::new(store.clone())));
        (store, resolver)
    }

    #[tokio::test]
    async fn test_union_deduplicates() {
        let (store, resolver) = setup().await;
        let a = store
            .insert_role(Role::new("A", "", ["dev", "manageUsers"]))
            .await
            .unwrap();
        let mut b = Role::new("B", "", ["manageUsers"]);
        b.permissions.insert("manageRoles".to_string(), false);
        let b = store.insert_role(b).await.unwrap();

        let resolved = resolver.resolve(&[a.id, b.id]).await.unwrap();
        assert_eq!(resolved.roles, vec!["A", "B"]);
        assert_eq!(
            resolved.permissions.iter().collect::<Vec<_>>(),
            vec!["dev", "manageUsers"]
        );
        assert!(!resolved.grants("manageRoles"));
    }

    #[tokio::test]
    async fn test_reflects_role_edits_without_restart() {
        let (store, resolver) = setup().await;
        let role = store
            .upsert_role("Ops", "", &["dev"])
            .await
            .unwrap()
            .role;
        assert!(!resolver.resolve(&[role.id]).await.unwrap().grants("manageRoles"));

        store.upsert_role("Ops", "", &["manageRoles"]).await.unwrap();
        assert!(resolver.resolve(&[role.id]).await.unwrap().grants("manageRoles"));
    }

    #[tokio::test]
    async fn test_unknown_roles_resolve_empty() {
        let (_, resolver) = setup().await;
        let resolved = resolver.resolve(&[RoleId::new()]).await.unwrap();
        assert_eq!(resolved, ResolvedRoles::default());
    }
}
