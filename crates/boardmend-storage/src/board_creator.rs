//! `BoardCreator` backed by the forum tables.

use boardmend_core::errors::StorageError;
use boardmend_core::traits::BoardCreator;
use rusqlite::Connection;

use crate::queries::containers;

pub struct SqliteBoardCreator<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteBoardCreator<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl BoardCreator for SqliteBoardCreator<'_> {
    fn find_category(&self, name: &str) -> Result<Option<i64>, StorageError> {
        containers::find_category_by_name(self.conn, name)
    }

    fn find_board(&self, category_id: i64, name: &str) -> Result<Option<i64>, StorageError> {
        containers::find_board_by_name(self.conn, category_id, name)
    }

    fn create_category(&self, name: &str) -> Result<i64, StorageError> {
        let id = containers::insert_category(self.conn, name)?;
        tracing::info!(id_cat = id, name, "created category");
        Ok(id)
    }

    fn create_board(
        &self,
        category_id: i64,
        name: &str,
        description: &str,
    ) -> Result<i64, StorageError> {
        let id = containers::insert_board(self.conn, category_id, name, description)?;
        tracing::info!(id_board = id, id_cat = category_id, name, "created board");
        Ok(id)
    }
}
