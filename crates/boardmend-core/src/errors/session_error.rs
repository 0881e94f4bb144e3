//! Session persistence errors.

use super::error_code::{self, BoardmendErrorCode};

/// Errors raised while loading, saving or matching persisted repair state.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session backend failure: {message}")]
    Backend { message: String },

    #[error("stored state under {key} is unreadable: {message}")]
    Decode { key: String, message: String },

    #[error("no paused repair run to resume")]
    NothingToResume,

    #[error("stored run is a {stored} run, request asked for {requested}")]
    ModeMismatch { stored: String, requested: String },

    #[error(
        "stored run is at rule {stored_rule} offset {stored_offset}, \
         request asked for rule {requested_rule} offset {requested_offset}"
    )]
    CursorMismatch {
        stored_rule: usize,
        stored_offset: i64,
        requested_rule: usize,
        requested_offset: i64,
    },
}

impl BoardmendErrorCode for SessionError {
    fn error_code(&self) -> &'static str {
        error_code::SESSION_ERROR
    }
}
