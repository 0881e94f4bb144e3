//! BoardmendErrorCode trait for operator-facing error reporting.

/// Every error enum implements this to provide a structured error code.
///
/// Codes for structural failures (catalog, storage, session, config) are kept
/// distinct so an operator can tell "the tool is broken" apart from
/// "the data is broken", which never surfaces as an error at all.
pub trait BoardmendErrorCode {
    /// Returns the error code string (e.g., "STORAGE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted operator string: `[ERROR_CODE] message`.
    fn operator_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CATALOG_ERROR: &str = "CATALOG_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const SESSION_ERROR: &str = "SESSION_ERROR";
pub const REMEDIATION_FAILED: &str = "REMEDIATION_FAILED";
pub const OUTPUT_ERROR: &str = "OUTPUT_ERROR";
