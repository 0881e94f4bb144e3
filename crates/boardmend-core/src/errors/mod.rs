//! Error handling for boardmend.
//! One error enum per subsystem, `thiserror` only.

pub mod catalog_error;
pub mod config_error;
pub mod error_code;
pub mod repair_error;
pub mod session_error;
pub mod storage_error;

pub use catalog_error::CatalogError;
pub use config_error::ConfigError;
pub use error_code::BoardmendErrorCode;
pub use repair_error::RepairError;
pub use session_error::SessionError;
pub use storage_error::StorageError;
