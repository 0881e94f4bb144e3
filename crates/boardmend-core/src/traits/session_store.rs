//! Key/value session storage for resumable repair state.

use std::sync::Mutex;

use rustc_hash::FxHashMap;

use crate::errors::SessionError;

/// String key/value store that survives between invocations.
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn clear(&self, key: &str) -> Result<(), SessionError>;
}

/// Process-local store, used by tests and single-process drivers.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<FxHashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, FxHashMap<String, String>>, SessionError> {
        self.entries.lock().map_err(|_| SessionError::Backend {
            message: "session lock poisoned".to_string(),
        })
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), SessionError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
