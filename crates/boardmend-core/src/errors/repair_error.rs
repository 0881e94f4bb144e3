//! Top-level repair errors.

use super::error_code::{self, BoardmendErrorCode};
use super::{CatalogError, ConfigError, SessionError, StorageError};

/// Structural failures that terminate a repair run.
/// Aggregates subsystem errors via `From` conversions.
///
/// Integrity findings are never represented here; they travel as data.
#[derive(Debug, thiserror::Error)]
pub enum RepairError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("rule {rule} could not be repaired: {message}")]
    Remediation { rule: String, message: String },

    #[error("could not write output: {0}")]
    Output(#[from] std::io::Error),
}

impl BoardmendErrorCode for RepairError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Catalog(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Session(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Remediation { .. } => error_code::REMEDIATION_FAILED,
            Self::Output(_) => error_code::OUTPUT_ERROR,
        }
    }
}
