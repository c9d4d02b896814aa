//! Configuration schema definitions.
//!
//! Two layers live here:
//! - [`SettingsDocument`]: the raw document exactly as written on disk. Field
//!   names follow the upper-case keys of the settings file and every value the
//!   validator needs to inspect is kept loose (optional, untagged).
//! - [`Settings`]: the validated, immutable snapshot handed to the rest of the
//!   process.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::access::users::UserDirectory;

/// Keyword accepted by `HOST` and `PORT` to select the built-in default.
pub const DEFAULT_KEYWORD: &str = "default";

/// Address bound when `HOST` is `"default"`.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Port bound when `PORT` is `"default"`.
pub const DEFAULT_PORT: u16 = 5000;

/// Raw settings document.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsDocument {
    /// Path to the SQLite database being viewed.
    #[serde(rename = "DATABASE_FILEPATH")]
    pub database_filepath: PathBuf,

    /// Enforce login and per-user table permissions.
    #[serde(rename = "PASSWORD_PROTECTION")]
    pub password_protection: bool,

    /// Periodically log out every session.
    #[serde(rename = "LOG_OUT_USERS", default)]
    pub log_out_users: bool,

    /// Period of the logout sweep, in seconds.
    #[serde(rename = "LOG_OUT_USERS_AFTER", default)]
    pub log_out_users_after: Option<IntervalValue>,

    #[serde(rename = "HOST", default = "default_keyword")]
    pub host: String,

    #[serde(rename = "PORT", default)]
    pub port: PortValue,

    #[serde(rename = "DEBUG", default)]
    pub debug: bool,

    #[serde(default)]
    pub users: BTreeMap<String, UserEntry>,
}

fn default_keyword() -> String {
    DEFAULT_KEYWORD.to_string()
}

/// `LOG_OUT_USERS_AFTER` as written. Anything that is not an integer is kept
/// so validation can reject it with a precise error instead of a parse error.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IntervalValue {
    Seconds(i64),
    Other(serde::de::IgnoredAny),
}

/// `PORT` as written: a number or a string (`"default"` or a numeric literal).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(i64),
    Text(String),
}

impl Default for PortValue {
    fn default() -> Self {
        PortValue::Text(DEFAULT_KEYWORD.to_string())
    }
}

/// One entry of the `users` mapping.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserEntry {
    /// `None` when the key is absent, `Some(None)` when it is explicitly null.
    #[serde(default, deserialize_with = "present")]
    pub password: Option<Option<String>>,

    #[serde(default)]
    pub tables: Option<Vec<String>>,

    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

/// Distinguishes a present-but-null field from an absent one.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Validated configuration snapshot. Never mutated after load.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Existing SQLite database file.
    pub database_path: PathBuf,

    /// Whether login and table permissions are enforced.
    pub protection: bool,

    /// Sweep period when auto-logout is enabled.
    pub auto_logout: Option<Duration>,

    /// Resolved bind host.
    pub host: String,

    /// Resolved bind port.
    pub port: u16,

    pub debug: bool,

    pub users: UserDirectory,
}

impl Settings {
    /// Period of the session sweep, if one should run at all.
    ///
    /// The sweep only runs when protection is on; without protection there is
    /// nothing to log out of.
    pub fn sweep_interval(&self) -> Option<Duration> {
        if self.protection {
            self.auto_logout
        } else {
            None
        }
    }

    /// `host:port` string suitable for binding a listener.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_entry_null_password_is_present() {
        let entry: UserEntry = serde_json::from_str(
            r#"{"password": null, "tables": ["*"], "permissions": ["read"]}"#,
        )
        .unwrap();
        assert_eq!(entry.password, Some(None));

        let entry: UserEntry =
            serde_json::from_str(r#"{"tables": ["*"], "permissions": ["read"]}"#).unwrap();
        assert_eq!(entry.password, None);
    }

    #[test]
    fn test_interval_value_keeps_non_integers() {
        let value: IntervalValue = serde_json::from_str("3600").unwrap();
        assert!(matches!(value, IntervalValue::Seconds(3600)));

        let value: IntervalValue = serde_json::from_str("\"hour\"").unwrap();
        assert!(matches!(value, IntervalValue::Other(_)));

        let value: IntervalValue = serde_json::from_str("1.5").unwrap();
        assert!(matches!(value, IntervalValue::Other(_)));
    }

    #[test]
    fn test_bind_address_brackets_ipv6() {
        let settings = Settings {
            database_path: PathBuf::from("db.sqlite"),
            protection: false,
            auto_logout: Some(Duration::from_secs(60)),
            host: "::1".to_string(),
            port: 8080,
            debug: false,
            users: UserDirectory::default(),
        };
        assert_eq!(settings.bind_address(), "[::1]:8080");
        assert_eq!(settings.sweep_interval(), None);
    }
}
