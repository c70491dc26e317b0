//! Startup seeding of the Administrator role and the initial admin account.

use tracing::info;

use warden_core::config::BootstrapConfig;
use warden_core::result::AppResult;
use warden_core::types::RoleId;
use warden_entity::role::{ADMINISTRATOR_ROLE_DESCRIPTION, ADMINISTRATOR_ROLE_NAME};
use warden_entity::user::User;
use warden_store::traits::DocumentStore;

use crate::password::PasswordHasher;
use crate::rbac::catalog;

/// Username of the seeded account.
pub const ADMIN_USERNAME: &str = "admin";

/// Initial password of the seeded account. It must be changed on first login.
const ADMIN_INITIAL_PASSWORD: &str = "admin";

/// Creates or updates the Administrator role so it grants every catalog
/// permission. Keys already on the role are kept.
pub async fn ensure_admin_role(store: &dyn DocumentStore) -> AppResult<RoleId> {
    let keys: Vec<&str> = catalog::all_keys().collect();
    let upsert = store
        .upsert_role(ADMINISTRATOR_ROLE_NAME, ADMINISTRATOR_ROLE_DESCRIPTION, &keys)
        .await?;

    if upsert.created {
        info!(role_id = %upsert.role.id, "Created Administrator role");
    } else {
        info!(role_id = %upsert.role.id, "Administrator role up to date");
    }
    Ok(upsert.role.id)
}

/// Creates `admin`/`admin` with a pending password change, but only when no
/// user exists yet. Returns whether the account was created.
pub async fn ensure_admin_user(
    store: &dyn DocumentStore,
    hasher: &PasswordHasher,
    admin_role: RoleId,
) -> AppResult<bool> {
    if store.count_users().await? > 0 {
        return Ok(false);
    }

    let hash = hasher.hash_password(ADMIN_INITIAL_PASSWORD)?;
    let admin = User::new(ADMIN_USERNAME, hash, vec![admin_role])
        .with_fullname("Administrator")
        .with_password_change_required();
    store.insert_user(admin).await?;

    info!(username = ADMIN_USERNAME, "Created initial admin user");
    Ok(true)
}

/// Runs the seeding steps enabled in `config`.
pub async fn run(
    config: &BootstrapConfig,
    store: &dyn DocumentStore,
    hasher: &PasswordHasher,
) -> AppResult<()> {
    if !config.ensure_admin_role {
        return Ok(());
    }
    let role = ensure_admin_role(store).await?;
    if config.ensure_admin_user {
        ensure_admin_user(store, hasher, role).await?;
    }
    Ok(())
}
