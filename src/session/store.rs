//! Address-keyed session store.
//!
//! A client is identified by its network address alone; there are no tokens
//! or cookies. Clients behind the same NAT or proxy therefore share one
//! session slot.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::access::users::UserDirectory;
use crate::observability::metrics;

/// One live session. Only entries with `authenticated` set count as logged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    pub address: String,
    pub username: String,
    pub authenticated: bool,
}

/// Recoverable, per-request authentication failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("a user is already logged in from this address")]
    AlreadyLoggedIn,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("no user is logged in from this address")]
    NotLoggedIn,
}

impl AuthError {
    /// Stable machine-readable code.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::AlreadyLoggedIn => "already_logged_in",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::NotLoggedIn => "not_logged_in",
        }
    }
}

/// Process-wide session table. Every operation holds the lock for its whole
/// duration, so login, logout and sweep never observe a partial update.
#[derive(Debug)]
pub struct SessionStore {
    protection: bool,
    users: Arc<UserDirectory>,
    entries: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new(protection: bool, users: Arc<UserDirectory>) -> Self {
        Self {
            protection,
            users,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_authenticated(&self, address: &str) -> bool {
        self.read().get(address).is_some_and(|entry| entry.authenticated)
    }

    /// Bind `username` to `address`.
    ///
    /// With protection off the entry is written unconditionally. With it on,
    /// an address holding a session is refused even for a different user.
    pub fn login(&self, address: &str, username: &str, password: &str) -> Result<(), AuthError> {
        let mut entries = self.write();

        if self.protection {
            if entries.contains_key(address) {
                tracing::warn!(client = %address, user = %username, "Login refused: address already has a session");
                metrics::record_login(AuthError::AlreadyLoggedIn.reason());
                return Err(AuthError::AlreadyLoggedIn);
            }
            if self.users.authenticate(username, password).is_none() {
                tracing::warn!(client = %address, user = %username, "Login refused: invalid credentials");
                metrics::record_login(AuthError::InvalidCredentials.reason());
                return Err(AuthError::InvalidCredentials);
            }
        }

        entries.insert(
            address.to_string(),
            SessionEntry {
                address: address.to_string(),
                username: username.to_string(),
                authenticated: true,
            },
        );
        tracing::info!(client = %address, user = %username, "User logged in");
        metrics::record_login("success");
        metrics::record_sessions(entries.len());
        Ok(())
    }

    pub fn logout(&self, address: &str) -> Result<(), AuthError> {
        let mut entries = self.write();
        match entries.remove(address) {
            Some(entry) => {
                tracing::info!(client = %address, user = %entry.username, "User logged out");
                metrics::record_logout();
                metrics::record_sessions(entries.len());
                Ok(())
            }
            None => Err(AuthError::NotLoggedIn),
        }
    }

    pub fn lookup_user(&self, address: &str) -> Option<String> {
        self.read()
            .get(address)
            .filter(|entry| entry.authenticated)
            .map(|entry| entry.username.clone())
    }

    /// Drop every session at once. Returns how many were dropped.
    pub fn clear(&self) -> usize {
        let cleared = std::mem::take(&mut *self.write());
        metrics::record_sessions(0);
        cleared.len()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A poisoned lock still guards a whole map; keep serving from it.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, SessionEntry>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, SessionEntry>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}
