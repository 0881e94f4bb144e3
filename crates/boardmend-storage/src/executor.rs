//! `SqlExecutor` over a rusqlite connection.

use std::cell::Cell;
use std::sync::Arc;

use boardmend_core::errors::StorageError;
use boardmend_core::traits::SqlExecutor;
use boardmend_core::types::{Row, SqlValue};
use rusqlite::{params_from_iter, Connection, OptionalExtension};

/// Counts every statement it runs so the checkpoint controller can enforce a
/// per-invocation query ceiling.
pub struct SqliteExecutor<'c> {
    conn: &'c Connection,
    queries: Cell<u64>,
}

impl<'c> SqliteExecutor<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            queries: Cell::new(0),
        }
    }

    pub fn connection(&self) -> &'c Connection {
        self.conn
    }

    fn bump(&self) {
        self.queries.set(self.queries.get() + 1);
    }
}

fn column_names(stmt: &rusqlite::Statement<'_>) -> Arc<[String]> {
    stmt.column_names().into_iter().map(String::from).collect()
}

fn read_row(row: &rusqlite::Row<'_>, columns: &Arc<[String]>) -> Result<Row, StorageError> {
    let mut values = Vec::with_capacity(columns.len());
    for idx in 0..columns.len() {
        values.push(row.get::<_, SqlValue>(idx).map_err(StorageError::sqlite)?);
    }
    Ok(Row::new(Arc::clone(columns), values))
}

impl SqlExecutor for SqliteExecutor<'_> {
    fn query_scalar(&self, sql: &str, params: &[SqlValue]) -> Result<i64, StorageError> {
        self.bump();
        let value: Option<Option<i64>> = self
            .conn
            .query_row(sql, params_from_iter(params.iter()), |row| row.get(0))
            .optional()
            .map_err(StorageError::sqlite)?;
        Ok(value.flatten().unwrap_or(0))
    }

    fn query_rows(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, StorageError> {
        let mut rows = Vec::new();
        self.for_each_row(sql, params, &mut |row| {
            rows.push(row.clone());
            Ok(())
        })?;
        Ok(rows)
    }

    fn for_each_row(
        &self,
        sql: &str,
        params: &[SqlValue],
        f: &mut dyn FnMut(&Row) -> Result<(), StorageError>,
    ) -> Result<u64, StorageError> {
        self.bump();
        let mut stmt = self.conn.prepare(sql).map_err(StorageError::sqlite)?;
        let columns = column_names(&stmt);
        let mut rows = stmt
            .query(params_from_iter(params.iter()))
            .map_err(StorageError::sqlite)?;

        let mut visited = 0u64;
        while let Some(row) = rows.next().map_err(StorageError::sqlite)? {
            f(&read_row(row, &columns)?)?;
            visited += 1;
        }
        Ok(visited)
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<usize, StorageError> {
        self.bump();
        self.conn
            .execute(sql, params_from_iter(params.iter()))
            .map_err(StorageError::sqlite)
    }

    fn insert(&self, sql: &str, params: &[SqlValue]) -> Result<i64, StorageError> {
        self.execute(sql, params)?;
        Ok(self.conn.last_insert_rowid())
    }

    fn query_count(&self) -> u64 {
        self.queries.get()
    }
}
