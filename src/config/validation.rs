//! Settings validation.
//!
//! Turns a parsed [`SettingsDocument`] into a [`Settings`] snapshot. Checks run
//! in a fixed order and the first failure is returned; a snapshot only exists
//! once every check has passed.
//!
//! Order:
//! 1. database file exists
//! 2. every user record declares `password`, `tables` and non-empty `permissions`
//! 3. with protection on, some admin user has a non-empty password
//! 4. with auto-logout on, the interval is a positive integer
//! 5. host and port resolve

use std::collections::BTreeSet;
use std::time::Duration;

use crate::access::permissions::TableAccess;
use crate::access::users::{UserDirectory, UserRecord};
use crate::config::loader::{SettingsError, UserField};
use crate::config::schema::{
    IntervalValue, PortValue, Settings, SettingsDocument, DEFAULT_HOST, DEFAULT_KEYWORD,
    DEFAULT_PORT,
};

pub fn validate_settings(document: SettingsDocument) -> Result<Settings, SettingsError> {
    if !document.database_filepath.exists() {
        return Err(SettingsError::MissingDatabase {
            path: document.database_filepath,
        });
    }

    let users = validate_users(&document)?;

    if document.password_protection && !users.has_admin_credential() {
        return Err(SettingsError::InvalidAdminCredential);
    }

    let auto_logout = if document.log_out_users {
        Some(validate_interval(document.log_out_users_after.as_ref())?)
    } else {
        None
    };

    let port = resolve_port(&document.port)?;
    let host = resolve_host(&document.host);

    Ok(Settings {
        database_path: document.database_filepath,
        protection: document.password_protection,
        auto_logout,
        host,
        port,
        debug: document.debug,
        users,
    })
}

fn validate_users(document: &SettingsDocument) -> Result<UserDirectory, SettingsError> {
    let mut records = Vec::with_capacity(document.users.len());

    for (username, entry) in &document.users {
        let invalid = |field| SettingsError::InvalidUserRecord {
            username: username.clone(),
            field,
        };

        let password = entry.password.clone().ok_or_else(|| invalid(UserField::Password))?;
        let tables = entry.tables.as_ref().ok_or_else(|| invalid(UserField::Tables))?;
        let permissions: BTreeSet<String> = entry
            .permissions
            .iter()
            .flatten()
            .cloned()
            .collect();
        if permissions.is_empty() {
            return Err(invalid(UserField::Permissions));
        }

        records.push(UserRecord {
            username: username.clone(),
            password: password.filter(|p| !p.is_empty()),
            tables: TableAccess::from_names(tables.iter().cloned()),
            permissions,
        });
    }

    Ok(UserDirectory::new(records))
}

/// Ten years. Longer intervals cannot be scheduled on the runtime clock.
const MAX_LOGOUT_INTERVAL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

fn validate_interval(value: Option<&IntervalValue>) -> Result<Duration, SettingsError> {
    match value {
        Some(IntervalValue::Seconds(secs)) if (1..=MAX_LOGOUT_INTERVAL_SECS).contains(secs) => {
            Ok(Duration::from_secs(*secs as u64))
        }
        _ => Err(SettingsError::InvalidLogoutInterval),
    }
}

fn resolve_port(value: &PortValue) -> Result<u16, SettingsError> {
    match value {
        PortValue::Text(text) if text == DEFAULT_KEYWORD => Ok(DEFAULT_PORT),
        PortValue::Text(text) => text
            .trim()
            .parse::<u16>()
            .map_err(|_| SettingsError::InvalidPort(text.clone())),
        PortValue::Number(n) => u16::try_from(*n).map_err(|_| SettingsError::InvalidPort(n.to_string())),
    }
}

fn resolve_host(value: &str) -> String {
    if value == DEFAULT_KEYWORD {
        DEFAULT_HOST.to_string()
    } else {
        value.to_string()
    }
}
