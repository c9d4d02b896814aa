//! Row post-processing applied before rows are rendered.

use serde_json::Value;

use crate::db::Row;

/// Column always rendered as an integer.
pub const USER_ID_COLUMN: &str = "user_id";

/// Column holding JSON text that is rendered as structured JSON.
pub const ITEMS_COLUMN: &str = "items";

pub fn shape_row(row: &mut Row) {
    if let Some(value) = row.get_mut(USER_ID_COLUMN) {
        if let Some(id) = as_integer(value) {
            *value = Value::from(id);
        }
    }

    if let Some(value) = row.get_mut(ITEMS_COLUMN) {
        if let Value::String(text) = value {
            if let Ok(decoded) = serde_json::from_str::<Value>(text) {
                *value = decoded;
            }
        }
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}
