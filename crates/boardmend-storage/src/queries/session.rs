//! Queries for the repair_session key/value table.

use boardmend_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension};

pub fn get(conn: &Connection, key: &str) -> Result<Option<String>, StorageError> {
    conn.query_row(
        "SELECT value FROM repair_session WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .map_err(StorageError::sqlite)
}

pub fn upsert(conn: &Connection, key: &str, value: &str, updated_at: i64) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO repair_session (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, updated_at],
    )
    .map_err(StorageError::sqlite)?;
    Ok(())
}

pub fn delete(conn: &Connection, key: &str) -> Result<(), StorageError> {
    conn.execute("DELETE FROM repair_session WHERE key = ?1", params![key])
        .map_err(StorageError::sqlite)?;
    Ok(())
}
