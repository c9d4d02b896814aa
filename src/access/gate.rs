//! Per-request access decisions.
//!
//! Combines the session store with the user directory to decide whether a
//! request for the table listing or for a single table may proceed.

use std::sync::Arc;

use crate::access::permissions::has_access;
use crate::access::users::{UserDirectory, UserRecord};
use crate::observability::metrics;
use crate::session::SessionStore;

/// What a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource<'a> {
    /// The table listing.
    Root,
    /// Rows of one table.
    Table(&'a str),
}

/// Outcome of [`AccessGate::check`]. Redirects are normal control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow(Grant),
    RedirectToLogin,
    RedirectToRoot,
}

/// What an allowed request may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    /// Protection is off: no filtering at all.
    Unrestricted,
    /// Logged-in user; tables are filtered through their permissions.
    User(Arc<UserRecord>),
}

impl Grant {
    /// Keep only the tables this grant may read, preserving order.
    pub fn filter_tables(&self, tables: Vec<String>) -> Vec<String> {
        match self {
            Grant::Unrestricted => tables,
            Grant::User(user) => tables.into_iter().filter(|t| has_access(user, t)).collect(),
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Grant::Unrestricted => None,
            Grant::User(user) => Some(&user.username),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccessGate {
    protection: bool,
    sessions: Arc<SessionStore>,
    users: Arc<UserDirectory>,
}

impl AccessGate {
    pub fn new(protection: bool, sessions: Arc<SessionStore>, users: Arc<UserDirectory>) -> Self {
        Self {
            protection,
            sessions,
            users,
        }
    }

    pub fn protection(&self) -> bool {
        self.protection
    }

    pub fn check(&self, address: &str, resource: Resource<'_>) -> Decision {
        if !self.protection {
            return Decision::Allow(Grant::Unrestricted);
        }

        if !self.sessions.is_authenticated(address) {
            metrics::record_access_denied("unauthenticated");
            return Decision::RedirectToLogin;
        }

        // The session may vanish between the two reads (sweep or logout), and
        // a session may name a user missing from the directory. Both are
        // treated as not logged in.
        let Some(user) = self
            .sessions
            .lookup_user(address)
            .and_then(|name| self.users.get(&name))
        else {
            tracing::debug!(client = %address, "Session without a known user, redirecting to login");
            metrics::record_access_denied("unauthenticated");
            return Decision::RedirectToLogin;
        };

        match resource {
            Resource::Root => Decision::Allow(Grant::User(user)),
            Resource::Table(table) if has_access(&user, table) => Decision::Allow(Grant::User(user)),
            Resource::Table(table) => {
                tracing::info!(client = %address, user = %user.username, table = %table, "Table access denied");
                metrics::record_access_denied("forbidden_table");
                Decision::RedirectToRoot
            }
        }
    }

    /// Table listing for `address`, or `None` when it must log in first.
    pub fn list_tables(&self, address: &str, tables: Vec<String>) -> Option<Vec<String>> {
        match self.check(address, Resource::Root) {
            Decision::Allow(grant) => Some(grant.filter_tables(tables)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::permissions::TableAccess;

    fn record(name: &str, tables: &[&str]) -> UserRecord {
        UserRecord {
            username: name.to_string(),
            password: Some(format!("{name}-pw")),
            tables: TableAccess::from_names(tables.iter().copied()),
            permissions: ["read".to_string()].into_iter().collect(),
        }
    }

    fn gate(protection: bool) -> (AccessGate, Arc<SessionStore>) {
        let users = Arc::new(UserDirectory::new([
            record("clerk", &["orders"]),
            record("root", &["*"]),
        ]));
        let sessions = Arc::new(SessionStore::new(protection, users.clone()));
        (AccessGate::new(protection, sessions.clone(), users), sessions)
    }

    fn all_tables() -> Vec<String> {
        vec!["customers".to_string(), "orders".to_string(), "items".to_string()]
    }

    #[test]
    fn test_unprotected_allows_everything() {
        let (gate, _) = gate(false);
        for addr in ["10.0.0.1", "192.168.1.7"] {
            assert_eq!(gate.list_tables(addr, all_tables()), Some(all_tables()));
            assert_eq!(
                gate.check(addr, Resource::Table("customers")),
                Decision::Allow(Grant::Unrestricted)
            );
        }
    }

    #[test]
    fn test_anonymous_is_redirected_to_login() {
        let (gate, _) = gate(true);
        assert_eq!(gate.check("10.0.0.1", Resource::Root), Decision::RedirectToLogin);
        assert_eq!(gate.check("10.0.0.1", Resource::Table("orders")), Decision::RedirectToLogin);
        assert_eq!(gate.list_tables("10.0.0.1", all_tables()), None);
    }

    #[test]
    fn test_explicit_tables() {
        let (gate, sessions) = gate(true);
        sessions.login("10.0.0.1", "clerk", "clerk-pw").unwrap();

        assert_eq!(gate.check("10.0.0.1", Resource::Table("customers")), Decision::RedirectToRoot);
        assert!(matches!(
            gate.check("10.0.0.1", Resource::Table("orders")),
            Decision::Allow(Grant::User(ref u)) if u.username == "clerk"
        ));
        assert_eq!(
            gate.list_tables("10.0.0.1", all_tables()),
            Some(vec!["orders".to_string()])
        );
    }

    #[test]
    fn test_wildcard_user_sees_all_tables() {
        let (gate, sessions) = gate(true);
        sessions.login("10.0.0.2", "root", "root-pw").unwrap();

        assert_eq!(gate.list_tables("10.0.0.2", all_tables()), Some(all_tables()));
        assert!(matches!(
            gate.check("10.0.0.2", Resource::Table("created_later")),
            Decision::Allow(_)
        ));
    }

    #[test]
    fn test_session_for_unknown_user_redirects_to_login() {
        let users = Arc::new(UserDirectory::new([record("clerk", &["orders"])]));
        // Sessions written without protection are not checked against the directory.
        let sessions = Arc::new(SessionStore::new(false, users.clone()));
        sessions.login("10.0.0.3", "ghost", "").unwrap();

        let gate = AccessGate::new(true, sessions, users);
        assert_eq!(gate.check("10.0.0.3", Resource::Root), Decision::RedirectToLogin);
    }

    #[test]
    fn test_sweep_returns_everyone_to_login() {
        let (gate, sessions) = gate(true);
        sessions.login("10.0.0.1", "clerk", "clerk-pw").unwrap();
        sessions.clear();
        assert_eq!(gate.check("10.0.0.1", Resource::Root), Decision::RedirectToLogin);
    }
}
