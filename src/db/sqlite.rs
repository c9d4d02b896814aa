//! SQLite table source.

use std::path::PathBuf;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde_json::Value;

use crate::db::rows::shape_row;
use crate::db::{DatabaseError, Row, TableSource};

const LIST_TABLES_SQL: &str = "SELECT name FROM sqlite_master WHERE type = 'table'";

/// Opens a fresh read-only connection for every call.
#[derive(Debug, Clone)]
pub struct SqliteTables {
    path: PathBuf,
}

impl SqliteTables {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn connect(&self) -> Result<Connection, DatabaseError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Ok(Connection::open_with_flags(&self.path, flags)?)
    }
}

fn table_names(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare(LIST_TABLES_SQL)?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(bytes.iter().map(|b| format!("{b:02x}")).collect()),
    }
}

impl TableSource for SqliteTables {
    fn list_tables(&self) -> Result<Vec<String>, DatabaseError> {
        let conn = self.connect()?;
        table_names(&conn)
    }

    fn read_table(&self, table: &str) -> Result<Vec<Row>, DatabaseError> {
        let conn = self.connect()?;
        if !table_names(&conn)?.iter().any(|name| name == table) {
            return Err(DatabaseError::UnknownTable(table.to_string()));
        }

        let sql = format!("SELECT * FROM \"{}\"", table.replace('"', "\"\""));
        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(str::to_string).collect();

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Row::new();
            for (i, column) in columns.iter().enumerate() {
                record.insert(column.clone(), to_json(row.get_ref(i)?));
            }
            shape_row(&mut record);
            out.push(record);
        }
        Ok(out)
    }
}
