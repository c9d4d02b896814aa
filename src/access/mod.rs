//! Access control subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (client address, resource)
//!     → gate.rs: protection off?            → Allow (unfiltered)
//!     → session store: authenticated?       → no: redirect to /login
//!     → users.rs: resolve the user record   → missing: redirect to /login
//!     → permissions.rs: table allowed?      → no: redirect to /
//!     → Allow (listing filtered per table)
//! ```
//!
//! # Design Decisions
//! - Access denial is a redirect, never an error
//! - The `"*"` table name becomes `TableAccess::All` at load time, so the
//!   wildcard is never compared as a table name afterwards

pub mod gate;
pub mod permissions;
pub mod users;

pub use gate::{AccessGate, Decision, Grant, Resource};
pub use permissions::{has_access, TableAccess};
pub use users::{UserDirectory, UserRecord};
