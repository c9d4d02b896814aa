//! Browser-facing viewer for a local SQLite database with optional
//! address-keyed login and per-user table permissions.

pub mod access;
pub mod config;
pub mod db;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod session;

pub use config::Settings;
pub use http::HttpServer;
pub use lifecycle::{Application, Shutdown};
