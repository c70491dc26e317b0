//! Protection for the built-in Administrator role.

use tracing::warn;

use warden_core::error::AppError;
use warden_entity::role::Role;

/// Rejects any edit or deletion of the Administrator role.
pub fn ensure_role_mutable(role: &Role) -> Result<(), AppError> {
    if role.is_administrator() {
        warn!(role_id = %role.id, "Refused change to Administrator role");
        return Err(AppError::authorization("Cannot edit Administrator role!"));
    }
    Ok(())
}
