//! Rule catalog errors.

use super::error_code::{self, BoardmendErrorCode};

/// Malformed rule definitions. Raised while the catalog is built, before any
/// query runs.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate rule id: {id}")]
    DuplicateRule { id: String },

    #[error("rule {rule} forces unknown rule {forced}")]
    UnknownForcedRule { rule: String, forced: String },

    #[error("rule {rule} declares a range plan with step 0")]
    ZeroStep { rule: String },

    #[error("rule {rule} has an empty {field}")]
    EmptyQuery { rule: String, field: &'static str },

    #[error("rule {rule} bulk statement has no {{ids}} placeholder")]
    MissingIdsPlaceholder { rule: String },

    #[error("rule {rule} is inconsistent: {message}")]
    Inconsistent { rule: String, message: &'static str },

    #[error("unknown rule id: {id}")]
    UnknownRule { id: String },
}

impl BoardmendErrorCode for CatalogError {
    fn error_code(&self) -> &'static str {
        error_code::CATALOG_ERROR
    }
}
