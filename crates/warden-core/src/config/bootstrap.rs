//! First-start seeding configuration.

use serde::{Deserialize, Serialize};

/// Controls creation of the built-in Administrator role and initial user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Upsert the Administrator role with every catalog permission at startup.
    #[serde(default = "default_true")]
    pub ensure_admin_role: bool,
    /// Create `admin`/`admin` (flagged for password change) when no users exist.
    #[serde(default = "default_true")]
    pub ensure_admin_user: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            ensure_admin_role: true,
            ensure_admin_user: true,
        }
    }
}

fn default_true() -> bool {
    true
}
