//! User directory built from the settings document.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::access::permissions::TableAccess;

/// Permission label that marks a user as an administrator.
pub const ADMIN_PERMISSION: &str = "admin";

/// A configured user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    /// Plain-text password. `None` means the user cannot log in.
    pub password: Option<String>,
    pub tables: TableAccess,
    /// Never empty once validated.
    pub permissions: BTreeSet<String>,
}

impl UserRecord {
    pub fn is_admin(&self) -> bool {
        self.permissions.contains(ADMIN_PERMISSION)
    }

    pub fn verify_password(&self, candidate: &str) -> bool {
        matches!(&self.password, Some(password) if password == candidate)
    }
}

/// Username → record lookup.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: BTreeMap<String, Arc<UserRecord>>,
}

impl UserDirectory {
    pub fn new(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let users = records
            .into_iter()
            .map(|r| (r.username.clone(), Arc::new(r)))
            .collect();
        Self { users }
    }

    pub fn get(&self, username: &str) -> Option<Arc<UserRecord>> {
        self.users.get(username).cloned()
    }

    /// Record for `username` if `password` matches it.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<Arc<UserRecord>> {
        self.users
            .get(username)
            .filter(|user| user.verify_password(password))
            .cloned()
    }

    /// At least one admin carries a password.
    pub fn has_admin_credential(&self) -> bool {
        self.users
            .values()
            .any(|user| user.is_admin() && user.password.is_some())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, password: Option<&str>, permissions: &[&str]) -> UserRecord {
        UserRecord {
            username: name.to_string(),
            password: password.map(str::to_string),
            tables: TableAccess::All,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_authenticate() {
        let dir = UserDirectory::new([
            record("admin", Some("secret"), &["admin"]),
            record("guest", None, &["read"]),
        ]);

        assert!(dir.authenticate("admin", "secret").is_some());
        assert!(dir.authenticate("admin", "wrong").is_none());
        assert!(dir.authenticate("nobody", "secret").is_none());
        // A user without a password can never log in.
        assert!(dir.authenticate("guest", "").is_none());
    }

    #[test]
    fn test_admin_credential() {
        let dir = UserDirectory::new([
            record("admin", None, &["admin"]),
            record("clerk", Some("pw"), &["read"]),
        ]);
        assert!(!dir.has_admin_credential());

        let dir = UserDirectory::new([record("ops", Some("pw"), &["read", "admin"])]);
        assert!(dir.has_admin_credential());
    }
}
