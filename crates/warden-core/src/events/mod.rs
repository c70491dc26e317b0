//! Collection change notifications emitted by the document store.
//!
//! Consumers such as the user cache subscribe to these events and reload
//! their view of a collection wholesale; events carry no document payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document collection managed by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// User accounts.
    Users,
    /// Roles and their permission maps.
    Roles,
}

/// The kind of write that produced a change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOperation {
    /// A document was inserted.
    Insert,
    /// A document was updated.
    Update,
}

/// Notification that a collection changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Which collection changed.
    pub collection: Collection,
    /// What kind of write occurred.
    pub operation: ChangeOperation,
    /// When the write was applied.
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    /// Create a change event stamped with the current time.
    pub fn new(collection: Collection, operation: ChangeOperation) -> Self {
        Self {
            collection,
            operation,
            timestamp: Utc::now(),
        }
    }
}
