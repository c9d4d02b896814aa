//! Settings loading from disk.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::schema::{Settings, SettingsDocument};
use crate::config::validation::validate_settings;

/// Field of a user record that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Password,
    Tables,
    Permissions,
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UserField::Password => "password",
            UserField::Tables => "tables",
            UserField::Permissions => "permissions",
        };
        f.write_str(name)
    }
}

/// Underlying parser failure of a malformed settings document.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

/// 1-based position inside the settings document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Fatal settings error. The process never starts serving after one of these.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings file not found at {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read settings file {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("malformed settings file {} ({}): {source}", .path.display(), describe(.location))]
    Malformed {
        path: PathBuf,
        location: Option<Location>,
        source: ParseError,
    },

    #[error("database file not found at {}", .path.display())]
    MissingDatabase { path: PathBuf },

    #[error("password protection is enabled but no user with the `admin` permission has a password")]
    InvalidAdminCredential,

    #[error("user `{username}` has a missing or empty `{field}` field")]
    InvalidUserRecord { username: String, field: UserField },

    #[error("LOG_OUT_USERS_AFTER must be a positive integer number of seconds")]
    InvalidLogoutInterval,

    #[error("PORT must be \"default\" or an integer between 0 and 65535, got `{0}`")]
    InvalidPort(String),
}

fn describe(location: &Option<Location>) -> String {
    match location {
        Some(loc) => loc.to_string(),
        None => "unknown location".to_string(),
    }
}

/// Document syntax, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
            _ => Format::Json,
        }
    }
}

/// Load and validate settings from a JSON (or `.toml`) file.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    if !path.is_file() {
        return Err(SettingsError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let document = parse_document(path, &content)?;
    validate_settings(document)
}

/// Parse the raw document without semantic validation.
pub fn parse_document(path: &Path, content: &str) -> Result<SettingsDocument, SettingsError> {
    let malformed = |location, source| SettingsError::Malformed {
        path: path.to_path_buf(),
        location,
        source,
    };

    match Format::for_path(path) {
        Format::Json => serde_json::from_str(content).map_err(|e| {
            let location = (e.line() > 0).then(|| Location {
                line: e.line(),
                column: e.column(),
            });
            malformed(location, ParseError::Json(e))
        }),
        Format::Toml => toml::from_str(content).map_err(|e| {
            let location = e.span().map(|span| offset_to_location(content, span.start));
            malformed(location, ParseError::Toml(e))
        }),
    }
}

fn offset_to_location(content: &str, offset: usize) -> Location {
    let before = &content[..offset.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map(|tail| tail.chars().count() + 1)
        .unwrap_or(1);
    Location { line, column }
}
