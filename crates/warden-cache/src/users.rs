//! User directory cache with a full-reload refresh contract.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use warden_core::events::Collection;
use warden_core::result::AppResult;
use warden_core::types::UserId;
use warden_entity::user::{User, UserFilter, UserUpdate};
use warden_store::traits::{DocumentStore, UserDirectory};

/// View of the users collection at one point in time.
#[derive(Debug, Clone, Default)]
struct Snapshot {
    by_id: HashMap<UserId, User>,
    by_username: HashMap<String, UserId>,
}

impl Snapshot {
    fn build(users: Vec<User>) -> Self {
        let by_username = users.iter().map(|u| (u.username.clone(), u.id)).collect();
        let by_id = users.into_iter().map(|u| (u.id, u)).collect();
        Self { by_id, by_username }
    }

    fn find_mut(&mut self, filter: &UserFilter) -> Option<&mut User> {
        let id = match filter {
            UserFilter::Id(id) => *id,
            UserFilter::Username(name) => *self.by_username.get(name)?,
        };
        self.by_id.get_mut(&id)
    }
}

/// Cached [`UserDirectory`] over a [`DocumentStore`].
///
/// The cache starts empty; call [`UserCache::refresh`] once before serving
/// and [`UserCache::spawn_refresh`] to follow the store's change feed.
#[derive(Debug)]
pub struct UserCache {
    store: Arc<dyn DocumentStore>,
    snapshot: RwLock<Arc<Snapshot>>,
    /// Serializes reloads and write-through updates so an older load never
    /// replaces a newer one.
    reload: Mutex<()>,
}

impl UserCache {
    /// Creates an empty cache over `store`.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
            reload: Mutex::new(()),
        }
    }

    /// Reloads every user from the store and swaps in the new snapshot.
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn refresh(&self) -> AppResult<usize> {
        let _guard = self.reload.lock().await;
        let users = self.store.find_users().await?;
        let count = users.len();
        *self.snapshot.write().await = Arc::new(Snapshot::build(users));
        debug!(count, "User cache refreshed");
        Ok(count)
    }

    /// Spawns a task that reloads the cache whenever the users collection
    /// changes. The task ends when the store's change feed closes.
    pub fn spawn_refresh(self: &Arc<Self>) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        let mut feed = self.store.subscribe();

        tokio::spawn(async move {
            info!("User cache watching users collection");
            loop {
                match feed.recv().await {
                    Ok(event) if event.collection == Collection::Users => {
                        if let Err(e) = cache.refresh().await {
                            error!(error = %e, "Error loading users from store");
                        }
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "User cache lagged behind change feed, reloading");
                        if let Err(e) = cache.refresh().await {
                            error!(error = %e, "Error loading users from store");
                        }
                    }
                    Err(RecvError::Closed) => {
                        info!("Change feed closed, user cache refresh stopped");
                        break;
                    }
                }
            }
        })
    }

    async fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }
}

#[async_trait]
impl UserDirectory for UserCache {
    async fn find_by_id(&self, id: UserId) -> Option<User> {
        self.current().await.by_id.get(&id).cloned()
    }

    async fn find_by_username(&self, username: &str) -> Option<User> {
        let snapshot = self.current().await;
        snapshot
            .by_username
            .get(username)
            .and_then(|id| snapshot.by_id.get(id))
            .cloned()
    }

    async fn list_all(&self) -> Vec<User> {
        self.current().await.by_id.values().cloned().collect()
    }

    async fn apply(&self, filter: &UserFilter, update: &UserUpdate) {
        let _guard = self.reload.lock().await;
        let mut snapshot = self.snapshot.write().await;
        match Arc::make_mut(&mut snapshot).find_mut(filter) {
            Some(user) => update.apply(user),
            None => debug!(?filter, "Write-through update matched no cached user"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use warden_store::MemoryDocumentStore;

    use super::*;

    fn setup() -> (Arc<MemoryDocumentStore>, Arc<UserCache>) {
        let store = Arc::new(MemoryDocumentStore::new());
        let cache = Arc::new(UserCache::new(store.clone()));
        (store, cache)
    }

    #[tokio::test]
    async fn test_empty_until_refreshed() {
        let (store, cache) = setup();
        store
            .insert_user(User::new("alice", "h".to_string(), vec![]))
            .await
            .unwrap();

        assert!(cache.find_by_username("alice").await.is_none());
        assert_eq!(cache.refresh().await.unwrap(), 1);
        assert!(cache.find_by_username("alice").await.is_some());
    }

    #[tokio::test]
    async fn test_lookup_by_id_and_username() {
        let (store, cache) = setup();
        let alice = store
            .insert_user(User::new("alice", "h".to_string(), vec![]))
            .await
            .unwrap();
        cache.refresh().await.unwrap();

        assert_eq!(cache.find_by_id(alice.id).await.unwrap().username, "alice");
        assert_eq!(cache.find_by_username("alice").await.unwrap().id, alice.id);
        assert!(cache.find_by_id(UserId::new()).await.is_none());
        assert_eq!(cache.list_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_apply_is_visible_immediately() {
        let (store, cache) = setup();
        let alice = store
            .insert_user(User::new("alice", "h".to_string(), vec![]))
            .await
            .unwrap();
        cache.refresh().await.unwrap();

        let update = UserUpdate {
            current_token: Some(Some("t".to_string())),
            ..UserUpdate::default()
        };
        cache.apply(&UserFilter::Id(alice.id), &update).await;
        assert!(cache.find_by_id(alice.id).await.unwrap().holds_token("t"));

        cache
            .apply(
                &UserFilter::Username("alice".into()),
                &UserUpdate::token_cleared(),
            )
            .await;
        assert!(cache.find_by_username("alice").await.unwrap().current_token.is_none());
    }

    #[tokio::test]
    async fn test_apply_to_unknown_user_changes_nothing() {
        let (_, cache) = setup();
        cache
            .apply(&UserFilter::Id(UserId::new()), &UserUpdate::token_cleared())
            .await;
        assert!(cache.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_task_follows_change_feed() {
        let (store, cache) = setup();
        let alice = store
            .insert_user(User::new("alice", "h".to_string(), vec![]))
            .await
            .unwrap();
        cache.refresh().await.unwrap();
        let handle = cache.spawn_refresh();

        store
            .update_user(
                &UserFilter::Id(alice.id),
                &UserUpdate {
                    current_token: Some(Some("t".to_string())),
                    ..UserUpdate::default()
                },
            )
            .await
            .unwrap();

        let mut seen = false;
        for _ in 0..50 {
            if cache.find_by_id(alice.id).await.unwrap().holds_token("t") {
                seen = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(seen, "cache never observed the update");
        handle.abort();
    }
}
