//! Collaborator traits consumed by the auth core.

use async_trait::async_trait;
use tokio::sync::broadcast;

use warden_core::events::ChangeEvent;
use warden_core::result::AppResult;
use warden_core::types::{RoleId, UserId};
use warden_entity::role::Role;
use warden_entity::user::{User, UserFilter, UserUpdate};

/// Outcome of [`DocumentStore::upsert_role`].
#[derive(Debug, Clone)]
pub struct RoleUpsert {
    /// The role after the write.
    pub role: Role,
    /// `true` if the role did not exist and was inserted.
    pub created: bool,
}

/// Persistent storage for user and role documents.
///
/// Every successful write publishes a [`ChangeEvent`] on the feed returned by
/// [`DocumentStore::subscribe`].
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Load every user document.
    async fn find_users(&self) -> AppResult<Vec<User>>;

    /// Count user documents.
    async fn count_users(&self) -> AppResult<u64>;

    /// Insert a new user. Usernames are unique.
    async fn insert_user(&self, user: User) -> AppResult<User>;

    /// Apply `update` to the user selected by `filter`.
    ///
    /// Returns the number of matched documents (0 or 1).
    async fn update_user(&self, filter: &UserFilter, update: &UserUpdate) -> AppResult<u64>;

    /// Load the roles whose ids appear in `ids`. Unknown ids are ignored.
    async fn find_roles(&self, ids: &[RoleId]) -> AppResult<Vec<Role>>;

    /// Insert a new role.
    async fn insert_role(&self, role: Role) -> AppResult<Role>;

    /// Create the role called `name`, or update it in place.
    ///
    /// `grants` are merged into the permission map as `true`; keys already
    /// present and not listed are left as they are.
    async fn upsert_role(
        &self,
        name: &str,
        description: &str,
        grants: &[&str],
    ) -> AppResult<RoleUpsert>;

    /// Subscribe to collection change notifications.
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}

/// Read access to user accounts.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Look up a user by id.
    async fn find_by_id(&self, id: UserId) -> Option<User>;

    /// Look up a user by username.
    async fn find_by_username(&self, username: &str) -> Option<User>;

    /// Every known user.
    async fn list_all(&self) -> Vec<User>;

    /// Apply a write that was just persisted to the document store.
    ///
    /// Called by writers inside this process so their own reads see the
    /// change at once; writes from elsewhere arrive through the change feed.
    async fn apply(&self, filter: &UserFilter, update: &UserUpdate);
}

/// Read access to roles.
#[async_trait]
pub trait RoleDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Load the roles matching `ids`.
    async fn list_by_ids(&self, ids: &[RoleId]) -> AppResult<Vec<Role>>;
}
