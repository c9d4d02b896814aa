//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! POST /login  → store.rs (verify credentials, bind address → user)
//! POST /logout → store.rs (unbind address)
//! every request → store.rs (is_authenticated / lookup_user)
//!
//! sweeper.rs (background task, only with protection + auto-logout):
//!     every LOG_OUT_USERS_AFTER seconds → store.clear()
//! ```
//!
//! # Design Decisions
//! - The client network address is the session key; one session per address
//! - Expiry is all-or-nothing through the sweep, never per entry
//! - The store is the only shared mutable state in the process

pub mod store;
pub mod sweeper;

pub use store::{AuthError, SessionEntry, SessionStore};
pub use sweeper::Sweeper;
