//! # warden-cache
//!
//! Process-wide cache of user documents. The cache is replaced wholesale on
//! every reload; readers may briefly observe a snapshot that predates the
//! latest write.

pub mod users;

pub use users::UserCache;
