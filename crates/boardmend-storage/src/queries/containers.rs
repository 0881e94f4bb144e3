//! Queries for categories and boards.

use boardmend_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension};

/// New container ids are taken above every id still referenced, so a
/// missing category or board never comes back as the salvage one.
const UNCLAIMED_CATEGORY_ID: &str = "SELECT COALESCE(MAX(id), 0) + 1 FROM (
    SELECT MAX(id_cat) AS id FROM categories
    UNION ALL SELECT MAX(id_cat) FROM boards
)";

const UNCLAIMED_BOARD_ID: &str = "SELECT COALESCE(MAX(id), 0) + 1 FROM (
    SELECT MAX(id_board) AS id FROM boards
    UNION ALL SELECT MAX(id_parent) FROM boards
    UNION ALL SELECT MAX(id_board) FROM topics
    UNION ALL SELECT MAX(id_board) FROM messages
    UNION ALL SELECT MAX(id_board) FROM log_boards
    UNION ALL SELECT MAX(id_board) FROM log_mark_read
    UNION ALL SELECT MAX(id_board) FROM log_notify
    UNION ALL SELECT MAX(id_board) FROM log_reported
    UNION ALL SELECT MAX(id_board) FROM calendar
)";

/// Insert a category at the end of the category order. Returns its id.
pub fn insert_category(conn: &Connection, name: &str) -> Result<i64, StorageError> {
    conn.execute(
        &format!(
            "INSERT INTO categories (id_cat, name, cat_order)
             VALUES (({UNCLAIMED_CATEGORY_ID}), ?1,
                     (SELECT COALESCE(MAX(cat_order), 0) + 1 FROM categories))"
        ),
        params![name],
    )
    .map_err(StorageError::sqlite)?;
    Ok(conn.last_insert_rowid())
}

/// Insert a top-level board at the end of its category. Returns its id.
pub fn insert_board(
    conn: &Connection,
    category_id: i64,
    name: &str,
    description: &str,
) -> Result<i64, StorageError> {
    conn.execute(
        &format!(
            "INSERT INTO boards (id_board, id_cat, id_parent, child_level, board_order, name, description)
             VALUES (({UNCLAIMED_BOARD_ID}), ?1, 0, 0,
                     (SELECT COALESCE(MAX(board_order), 0) + 1 FROM boards WHERE id_cat = ?1),
                     ?2, ?3)"
        ),
        params![category_id, name, description],
    )
    .map_err(StorageError::sqlite)?;
    Ok(conn.last_insert_rowid())
}

/// Find a category by exact name.
pub fn find_category_by_name(conn: &Connection, name: &str) -> Result<Option<i64>, StorageError> {
    conn.query_row(
        "SELECT id_cat FROM categories WHERE name = ?1 ORDER BY id_cat LIMIT 1",
        params![name],
        |row| row.get(0),
    )
    .optional()
    .map_err(StorageError::sqlite)
}

/// Find a board by exact name within a category.
pub fn find_board_by_name(
    conn: &Connection,
    category_id: i64,
    name: &str,
) -> Result<Option<i64>, StorageError> {
    conn.query_row(
        "SELECT id_board FROM boards WHERE id_cat = ?1 AND name = ?2 ORDER BY id_board LIMIT 1",
        params![category_id, name],
        |row| row.get(0),
    )
    .optional()
    .map_err(StorageError::sqlite)
}
