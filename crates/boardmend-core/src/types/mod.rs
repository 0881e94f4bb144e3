//! Shared value types.

pub mod identifiers;
pub mod row;

pub use identifiers::RuleId;
pub use row::{Row, SqlValue};
