//! Table-level permission evaluation.

use std::collections::BTreeSet;

use crate::access::users::UserRecord;

/// Table name that grants access to every table, present or future.
pub const WILDCARD: &str = "*";

/// Tables a user may read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAccess {
    /// Every table.
    All,
    /// Exactly these tables (case-sensitive).
    Only(BTreeSet<String>),
}

impl TableAccess {
    /// Build from the names listed in a user record. A `"*"` anywhere in the
    /// list widens the grant to every table.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tables = BTreeSet::new();
        for name in names {
            let name = name.into();
            if name == WILDCARD {
                return TableAccess::All;
            }
            tables.insert(name);
        }
        TableAccess::Only(tables)
    }

    pub fn allows(&self, table: &str) -> bool {
        match self {
            TableAccess::All => true,
            TableAccess::Only(tables) => tables.contains(table),
        }
    }
}

/// Whether `user` may read `table`.
pub fn has_access(user: &UserRecord, table: &str) -> bool {
    user.tables.allows(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(tables: &[&str]) -> UserRecord {
        UserRecord {
            username: "u".to_string(),
            password: Some("pw".to_string()),
            tables: TableAccess::from_names(tables.iter().copied()),
            permissions: ["read".to_string()].into_iter().collect(),
        }
    }

    #[test]
    fn test_wildcard_allows_everything() {
        let u = user(&["orders", "*"]);
        assert_eq!(u.tables, TableAccess::All);
        for table in ["orders", "customers", "not_created_yet", "", "*"] {
            assert!(has_access(&u, table), "{table} should be allowed");
        }
    }

    #[test]
    fn test_explicit_tables_exact_match() {
        let u = user(&["orders"]);
        assert!(has_access(&u, "orders"));
        assert!(!has_access(&u, "customers"));
        assert!(!has_access(&u, "Orders"));
        assert!(!has_access(&u, "order"));
    }

    #[test]
    fn test_empty_table_list_denies() {
        let u = user(&[]);
        assert!(!has_access(&u, "orders"));
    }
}
