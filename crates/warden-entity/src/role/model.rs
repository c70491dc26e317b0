//! Role entity model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use warden_core::types::RoleId;

/// Name of the built-in privileged role.
pub const ADMINISTRATOR_ROLE_NAME: &str = "Administrator";

/// Description given to the built-in privileged role.
pub const ADMINISTRATOR_ROLE_DESCRIPTION: &str = "Full access";

/// A named bundle of permission grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Stable identifier.
    pub id: RoleId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Permission key to grant flag. Keys mapped to `false` grant nothing.
    #[serde(default)]
    pub permissions: BTreeMap<String, bool>,
}

impl Role {
    /// Create a role granting exactly `keys`.
    pub fn new<I, S>(name: impl Into<String>, description: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: RoleId::new(),
            name: name.into(),
            description: description.into(),
            permissions: keys.into_iter().map(|k| (k.into(), true)).collect(),
        }
    }

    /// Permission keys this role grants.
    pub fn granted(&self) -> impl Iterator<Item = &str> {
        self.permissions
            .iter()
            .filter(|(_, granted)| **granted)
            .map(|(key, _)| key.as_str())
    }

    /// Whether this is the built-in Administrator role.
    pub fn is_administrator(&self) -> bool {
        self.name == ADMINISTRATOR_ROLE_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granted_skips_false_entries() {
        let mut role = Role::new("Support", "", ["manageUsers"]);
        role.permissions.insert("dev".to_string(), false);

        let granted: Vec<&str> = role.granted().collect();
        assert_eq!(granted, vec!["manageUsers"]);
    }

    #[test]
    fn test_is_administrator() {
        assert!(Role::new(ADMINISTRATOR_ROLE_NAME, "", Vec::<String>::new()).is_administrator());
        assert!(!Role::new("Support", "", Vec::<String>::new()).is_administrator());
    }
}
