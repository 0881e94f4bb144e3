//! Result rows handed from the SQL collaborator to the repair engine.

use std::sync::Arc;

use crate::errors::StorageError;

/// Dynamically typed SQL value.
pub type SqlValue = rusqlite::types::Value;

/// One result row: shared column names plus owned values.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<SqlValue>,
}

impl Row {
    pub fn new(columns: Arc<[String]>, values: Vec<SqlValue>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, SqlValue)>,
        S: Into<String>,
    {
        let (columns, values): (Vec<String>, Vec<SqlValue>) =
            pairs.into_iter().map(|(c, v)| (c.into(), v)).unzip();
        Self {
            columns: columns.into(),
            values,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.values[idx])
    }

    fn require(&self, column: &str) -> Result<&SqlValue, StorageError> {
        self.get(column).ok_or_else(|| StorageError::ColumnMissing {
            column: column.to_string(),
        })
    }

    /// Integer value of `column`. NULL reads as 0, matching the forum's
    /// "0 means none" convention for ids and aggregates.
    pub fn get_i64(&self, column: &str) -> Result<i64, StorageError> {
        match self.require(column)? {
            SqlValue::Integer(v) => Ok(*v),
            SqlValue::Null => Ok(0),
            SqlValue::Real(v) => Ok(*v as i64),
            SqlValue::Text(s) => s.trim().parse::<i64>().map_err(|_| StorageError::ColumnType {
                column: column.to_string(),
                expected: "integer",
                found: "text",
            }),
            SqlValue::Blob(_) => Err(StorageError::ColumnType {
                column: column.to_string(),
                expected: "integer",
                found: "blob",
            }),
        }
    }

    /// Text value of `column`. NULL reads as the empty string.
    pub fn get_text(&self, column: &str) -> Result<String, StorageError> {
        match self.require(column)? {
            SqlValue::Text(s) => Ok(s.clone()),
            SqlValue::Null => Ok(String::new()),
            SqlValue::Integer(v) => Ok(v.to_string()),
            SqlValue::Real(v) => Ok(v.to_string()),
            SqlValue::Blob(_) => Err(StorageError::ColumnType {
                column: column.to_string(),
                expected: "text",
                found: "blob",
            }),
        }
    }

    /// Render `column` for a human-facing message.
    pub fn display(&self, column: &str) -> String {
        match self.get(column) {
            Some(SqlValue::Integer(v)) => v.to_string(),
            Some(SqlValue::Real(v)) => v.to_string(),
            Some(SqlValue::Text(s)) => s.clone(),
            Some(SqlValue::Blob(b)) => format!("<{} bytes>", b.len()),
            Some(SqlValue::Null) | None => "0".to_string(),
        }
    }
}
