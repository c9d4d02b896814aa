//! Read-only access to the viewed database.
//!
//! # Data Flow
//! ```text
//! HTTP handler (after the access gate allowed the request)
//!     → TableSource::list_tables / read_table   (blocking, run off the reactor)
//!     → rows.rs (column fix-ups: user_id, items)
//!     → JSON response
//! ```

pub mod rows;
pub mod sqlite;

use serde_json::{Map, Value};

pub use sqlite::SqliteTables;

/// One table row as a column → value object.
pub type Row = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("table `{0}` does not exist")]
    UnknownTable(String),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("database task failed: {0}")]
    Task(String),
}

/// Source of table names and rows.
pub trait TableSource: Send + Sync + 'static {
    fn list_tables(&self) -> Result<Vec<String>, DatabaseError>;

    fn read_table(&self, table: &str) -> Result<Vec<Row>, DatabaseError>;
}
