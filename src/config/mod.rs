//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (JSON, or TOML by extension)
//!     → loader.rs (read & deserialize into SettingsDocument)
//!     → validation.rs (semantic checks, default resolution)
//!     → Settings (validated, immutable)
//!     → shared via Arc with the session store and access gate
//! ```
//!
//! # Design Decisions
//! - Settings are loaded once at startup and never reloaded
//! - Any settings error is fatal; the server never binds with a bad snapshot
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_settings, SettingsError, UserField};
pub use schema::{Settings, SettingsDocument};
