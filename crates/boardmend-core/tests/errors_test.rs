//! Error code and conversion tests.

use boardmend_core::errors::{
    BoardmendErrorCode, CatalogError, RepairError, SessionError, StorageError,
};

#[test]
fn structural_errors_carry_distinct_codes() {
    let storage: RepairError = StorageError::sqlite("no such table: topics").into();
    let catalog: RepairError = CatalogError::DuplicateRule {
        id: "missing_topics".to_string(),
    }
    .into();
    let session: RepairError = SessionError::NothingToResume.into();

    assert_eq!(storage.error_code(), "STORAGE_ERROR");
    assert_eq!(catalog.error_code(), "CATALOG_ERROR");
    assert_eq!(session.error_code(), "SESSION_ERROR");
}

#[test]
fn migration_failure_has_its_own_code() {
    let err = StorageError::MigrationFailed {
        version: 2,
        message: "syntax error".to_string(),
    };
    assert_eq!(err.error_code(), "MIGRATION_FAILED");
}

#[test]
fn operator_string_includes_underlying_message() {
    let err: RepairError = StorageError::sqlite("no such table: topics").into();
    let s = err.operator_string();
    assert!(s.starts_with("[STORAGE_ERROR]"));
    assert!(s.contains("no such table: topics"));
}

#[test]
fn output_failures_are_not_repair_failures() {
    let err: RepairError = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed").into();
    assert_eq!(err.error_code(), "OUTPUT_ERROR");
    assert_ne!(err.error_code(), "REMEDIATION_FAILED");
}
