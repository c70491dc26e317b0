//! Document store backed by process memory.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};
use tracing::debug;

use warden_core::error::AppError;
use warden_core::events::{ChangeEvent, ChangeOperation, Collection};
use warden_core::result::AppResult;
use warden_core::types::{RoleId, UserId};
use warden_entity::role::Role;
use warden_entity::user::{User, UserFilter, UserUpdate};

use crate::traits::{DocumentStore, RoleUpsert};

/// Capacity of the change feed; lagging subscribers reload anyway.
const CHANGE_FEED_CAPACITY: usize = 64;

/// In-memory implementation of [`DocumentStore`].
#[derive(Debug)]
pub struct MemoryDocumentStore {
    users: RwLock<HashMap<UserId, User>>,
    roles: RwLock<Vec<Role>>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl MemoryDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            users: RwLock::new(HashMap::new()),
            roles: RwLock::new(Vec::new()),
            changes,
        }
    }

    fn notify(&self, collection: Collection, operation: ChangeOperation) {
        // No subscribers is not an error.
        let _ = self.changes.send(ChangeEvent::new(collection, operation));
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find_users(&self) -> AppResult<Vec<User>> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn count_users(&self) -> AppResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }

    async fn insert_user(&self, user: User) -> AppResult<User> {
        {
            let mut users = self.users.write().await;
            if users.values().any(|u| u.username == user.username) {
                return Err(AppError::persistence(format!(
                    "Duplicate username '{}'",
                    user.username
                )));
            }
            users.insert(user.id, user.clone());
        }
        debug!(user_id = %user.id, "Inserted user document");
        self.notify(Collection::Users, ChangeOperation::Insert);
        Ok(user)
    }

    async fn update_user(&self, filter: &UserFilter, update: &UserUpdate) -> AppResult<u64> {
        let matched = {
            let mut users = self.users.write().await;
            match users.values_mut().find(|u| filter.matches(u)) {
                Some(user) => {
                    update.apply(user);
                    1
                }
                None => 0,
            }
        };
        if matched > 0 {
            self.notify(Collection::Users, ChangeOperation::Update);
        }
        Ok(matched)
    }

    async fn find_roles(&self, ids: &[RoleId]) -> AppResult<Vec<Role>> {
        Ok(self
            .roles
            .read()
            .await
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn insert_role(&self, role: Role) -> AppResult<Role> {
        self.roles.write().await.push(role.clone());
        self.notify(Collection::Roles, ChangeOperation::Insert);
        Ok(role)
    }

    async fn upsert_role(
        &self,
        name: &str,
        description: &str,
        grants: &[&str],
    ) -> AppResult<RoleUpsert> {
        let (role, created) = {
            let mut roles = self.roles.write().await;
            match roles.iter_mut().find(|r| r.name == name) {
                Some(existing) => {
                    existing.description = description.to_string();
                    for key in grants {
                        existing.permissions.insert((*key).to_string(), true);
                    }
                    (existing.clone(), false)
                }
                None => {
                    let role = Role::new(name, description, grants.iter().copied());
                    roles.push(role.clone());
                    (role, true)
                }
            }
        };
        let operation = if created {
            ChangeOperation::Insert
        } else {
            ChangeOperation::Update
        };
        self.notify(Collection::Roles, operation);
        Ok(RoleUpsert { role, created })
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_user_applies_and_notifies() {
        let store = MemoryDocumentStore::new();
        let mut feed = store.subscribe();
        let user = store
            .insert_user(User::new("alice", "h".to_string(), vec![]))
            .await
            .unwrap();
        assert_eq!(feed.recv().await.unwrap().operation, ChangeOperation::Insert);

        let matched = store
            .update_user(&UserFilter::Id(user.id), &UserUpdate::token_cleared())
            .await
            .unwrap();
        assert_eq!(matched, 1);
        let event = feed.recv().await.unwrap();
        assert_eq!(event.collection, Collection::Users);
        assert_eq!(event.operation, ChangeOperation::Update);
    }

    #[tokio::test]
    async fn test_update_unknown_user_matches_nothing() {
        let store = MemoryDocumentStore::new();
        let matched = store
            .update_user(
                &UserFilter::Username("ghost".into()),
                &UserUpdate::token_cleared(),
            )
            .await
            .unwrap();
        assert_eq!(matched, 0);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = MemoryDocumentStore::new();
        store
            .insert_user(User::new("alice", "h".to_string(), vec![]))
            .await
            .unwrap();
        let err = store
            .insert_user(User::new("alice", "h".to_string(), vec![]))
            .await
            .unwrap_err();
        assert!(err.message.contains("Duplicate username"));
    }

    #[tokio::test]
    async fn test_upsert_role_merges_grants() {
        let store = MemoryDocumentStore::new();
        let first = store.upsert_role("Ops", "ops", &["dev"]).await.unwrap();
        assert!(first.created);

        let second = store
            .upsert_role("Ops", "operations", &["manageUsers"])
            .await
            .unwrap();
        assert!(!second.created);
        assert_eq!(second.role.id, first.role.id);
        assert_eq!(second.role.description, "operations");
        assert_eq!(second.role.permissions.get("dev"), Some(&true));
        assert_eq!(second.role.permissions.get("manageUsers"), Some(&true));
    }

    #[tokio::test]
    async fn test_find_roles_ignores_unknown_ids() {
        let store = MemoryDocumentStore::new();
        let role = store
            .insert_role(Role::new("Ops", "", ["dev"]))
            .await
            .unwrap();
        let found = store.find_roles(&[role.id, RoleId::new()]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Ops");
    }
}
