//! Read-through role directory over a document store.

use std::sync::Arc;

use async_trait::async_trait;

use warden_core::result::AppResult;
use warden_core::types::RoleId;
use warden_entity::role::Role;

use crate::traits::{DocumentStore, RoleDirectory};

/// Role directory that queries the store on every call.
#[derive(Debug, Clone)]
pub struct StoreRoleDirectory {
    store: Arc<dyn DocumentStore>,
}

impl StoreRoleDirectory {
    /// Creates a directory reading from `store`.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RoleDirectory for StoreRoleDirectory {
    async fn list_by_ids(&self, ids: &[RoleId]) -> AppResult<Vec<Role>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.store.find_roles(ids).await
    }
}
