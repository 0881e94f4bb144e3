//! Category/board lookup and creation used by the salvage area.

use crate::errors::StorageError;

/// Finds and creates forum containers. Only the salvage area calls this.
pub trait BoardCreator {
    /// Lowest-id category named exactly `name`.
    fn find_category(&self, name: &str) -> Result<Option<i64>, StorageError>;

    /// Lowest-id board named exactly `name` inside `category_id`.
    fn find_board(&self, category_id: i64, name: &str) -> Result<Option<i64>, StorageError>;

    /// Create a category and return its id.
    fn create_category(&self, name: &str) -> Result<i64, StorageError>;

    /// Create a top-level board inside `category_id` and return its id.
    fn create_board(
        &self,
        category_id: i64,
        name: &str,
        description: &str,
    ) -> Result<i64, StorageError>;
}
