//! Queries for the settings table (forum-wide counters and timestamps).

use boardmend_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension};

pub use boardmend_core::constants::{
    SETTING_CALENDAR_UPDATED as CALENDAR_UPDATED, SETTING_TOTAL_MESSAGES as TOTAL_MESSAGES,
    SETTING_TOTAL_TOPICS as TOTAL_TOPICS,
};

/// Read a setting value.
pub fn get_setting(conn: &Connection, variable: &str) -> Result<Option<String>, StorageError> {
    conn.query_row(
        "SELECT value FROM settings WHERE variable = ?1",
        params![variable],
        |row| row.get(0),
    )
    .optional()
    .map_err(StorageError::sqlite)
}

/// Read a setting as an integer; missing or non-numeric values read as None.
pub fn get_setting_i64(conn: &Connection, variable: &str) -> Result<Option<i64>, StorageError> {
    Ok(get_setting(conn, variable)?.and_then(|v| v.parse().ok()))
}
