//! SQL execution capability.

use crate::errors::StorageError;
use crate::types::{Row, SqlValue};

/// Synchronous SQL execution against the forum store.
///
/// Every method counts toward `query_count`, which the checkpoint controller
/// uses to enforce the per-invocation query ceiling.
pub trait SqlExecutor {
    /// Run a query returning a single integer. NULL or no row reads as 0.
    fn query_scalar(&self, sql: &str, params: &[SqlValue]) -> Result<i64, StorageError>;

    /// Run a query and buffer every row.
    fn query_rows(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, StorageError>;

    /// Run a query and hand each row to `f` as it is read, without buffering.
    /// Returns the number of rows visited.
    fn for_each_row(
        &self,
        sql: &str,
        params: &[SqlValue],
        f: &mut dyn FnMut(&Row) -> Result<(), StorageError>,
    ) -> Result<u64, StorageError>;

    /// Run a write statement. Returns the number of affected rows.
    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<usize, StorageError>;

    /// Run an INSERT and return the new row id.
    fn insert(&self, sql: &str, params: &[SqlValue]) -> Result<i64, StorageError>;

    /// Queries issued through this executor so far.
    fn query_count(&self) -> u64;
}
