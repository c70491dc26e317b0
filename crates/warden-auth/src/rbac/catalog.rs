//! Static catalog of every permission key, grouped by category.

use serde::Serialize;

/// Example permission, used by demonstration routes.
pub const EXAMPLE_PERMISSION: &str = "examplePermission";
/// Create, edit, and delete roles.
pub const MANAGE_ROLES: &str = "manageRoles";
/// Create, edit, and delete users.
pub const MANAGE_USERS: &str = "manageUsers";
/// Developer tooling.
pub const DEV: &str = "dev";

/// One permission key with its display metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PermissionEntry {
    pub title: &'static str,
    pub description: &'static str,
    pub value: &'static str,
}

/// A named group of permission keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PermissionCategory {
    pub category: &'static str,
    pub children: &'static [PermissionEntry],
}

/// Every permission the system knows about.
pub static PERMISSION_CATALOG: &[PermissionCategory] = &[
    PermissionCategory {
        category: "General",
        children: &[PermissionEntry {
            title: "Example",
            description: "Example permission",
            value: EXAMPLE_PERMISSION,
        }],
    },
    PermissionCategory {
        category: "Administrative",
        children: &[
            PermissionEntry {
                title: "Manage Roles",
                description: "Create, edit and delete roles",
                value: MANAGE_ROLES,
            },
            PermissionEntry {
                title: "Manage Users",
                description: "Create, edit and delete users",
                value: MANAGE_USERS,
            },
            PermissionEntry {
                title: "Developer",
                description: "Access to developer tools",
                value: DEV,
            },
        ],
    },
];

/// Every key in the catalog, in catalog order.
pub fn all_keys() -> impl Iterator<Item = &'static str> {
    PERMISSION_CATALOG
        .iter()
        .flat_map(|category| category.children.iter())
        .map(|entry| entry.value)
}

/// Whether `key` names a catalog permission.
pub fn is_known(key: &str) -> bool {
    all_keys().any(|k| k == key)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_keys_are_unique() {
        let keys: Vec<&str> = all_keys().collect();
        let unique: HashSet<&str> = keys.iter().copied().collect();
        assert_eq!(keys.len(), unique.len());
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_is_known() {
        assert!(is_known(MANAGE_USERS));
        assert!(!is_known("launchMissiles"));
    }

    #[test]
    fn test_serializes_grouped() {
        let json = serde_json::to_value(PERMISSION_CATALOG).unwrap();
        assert_eq!(json[1]["category"], "Administrative");
        assert_eq!(json[1]["children"][0]["value"], MANAGE_ROLES);
    }
}
