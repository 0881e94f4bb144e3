//! `SessionStore` persisted in the forum database's `repair_session` table,
//! so a paused run survives process restarts.

use boardmend_core::errors::SessionError;
use boardmend_core::traits::SessionStore;
use rusqlite::Connection;

use crate::queries::session as session_queries;

pub struct SqliteSessionStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteSessionStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

fn backend(e: impl std::fmt::Display) -> SessionError {
    SessionError::Backend {
        message: e.to_string(),
    }
}

impl SessionStore for SqliteSessionStore<'_> {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        session_queries::get(self.conn, key).map_err(backend)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        session_queries::upsert(self.conn, key, value, epoch_now()).map_err(backend)
    }

    fn clear(&self, key: &str) -> Result<(), SessionError> {
        session_queries::delete(self.conn, key).map_err(backend)
    }
}

fn epoch_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
