//! Runs a rule's detection query.

use boardmend_core::errors::StorageError;
use boardmend_core::traits::SqlExecutor;
use boardmend_core::types::{Row, SqlValue};

use super::cursor::Window;
use crate::catalog::{DetectMode, RangePlan, Rule};

/// Result of one detection query.
#[derive(Debug, Clone, PartialEq)]
pub enum Detected {
    Count(i64),
    Rows(Vec<Row>),
}

impl Detected {
    /// A zero count or empty row-set means the rule currently holds.
    pub fn is_clean(&self) -> bool {
        self.violations() == 0
    }

    pub fn violations(&self) -> usize {
        match self {
            Self::Count(n) => (*n).max(0) as usize,
            Self::Rows(rows) => rows.len(),
        }
    }

    pub fn rows(&self) -> &[Row] {
        match self {
            Self::Count(_) => &[],
            Self::Rows(rows) => rows,
        }
    }
}

/// Bind parameters for an optional window.
pub fn window_params(window: Option<Window>) -> Vec<SqlValue> {
    window.map(|w| w.params().to_vec()).unwrap_or_default()
}

/// Side-effect free detection over the forum store.
pub struct ViolationDetector<'a> {
    db: &'a dyn SqlExecutor,
}

impl<'a> ViolationDetector<'a> {
    pub fn new(db: &'a dyn SqlExecutor) -> Self {
        Self { db }
    }

    /// Execute `rule`'s detection query, bound to `window` for range rules.
    pub fn detect(&self, rule: &Rule, window: Option<Window>) -> Result<Detected, StorageError> {
        self.run(rule.detect.query, rule.detect.mode, window)
    }

    /// Execute an arbitrary query of the rule in row-set mode.
    pub fn detect_with(&self, query: &str, window: Option<Window>) -> Result<Detected, StorageError> {
        self.run(query, DetectMode::RowSet, window)
    }

    /// Largest id of a range rule's domain. An empty domain reads as 0.
    pub fn range_max(&self, plan: &RangePlan) -> Result<i64, StorageError> {
        self.db.query_scalar(plan.max_query, &[])
    }

    fn run(&self, query: &str, mode: DetectMode, window: Option<Window>) -> Result<Detected, StorageError> {
        let params = window_params(window);
        match mode {
            DetectMode::Count => self.db.query_scalar(query, &params).map(Detected::Count),
            DetectMode::RowSet => self.db.query_rows(query, &params).map(Detected::Rows),
        }
    }
}
