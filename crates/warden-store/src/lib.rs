//! # warden-store
//!
//! Contracts for the collaborators the auth core consumes, plus an
//! in-memory document store used for development and tests.
//!
//! - [`DocumentStore`] persists user and role documents and publishes a
//!   change feed.
//! - [`UserDirectory`] answers user lookups (normally served from a cache).
//! - [`RoleDirectory`] answers role lookups by id, read-through.

pub mod memory;
pub mod roles;
pub mod traits;

pub use memory::MemoryDocumentStore;
pub use roles::StoreRoleDirectory;
pub use traits::{DocumentStore, RoleDirectory, RoleUpsert, UserDirectory};
