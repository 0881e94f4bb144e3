//! SqliteSessionStore and SqliteBoardCreator tests.

use boardmend_core::traits::{BoardCreator, SessionStore};
use boardmend_storage::queries::{containers, settings};
use boardmend_storage::{DatabaseManager, SqliteBoardCreator, SqliteSessionStore};
use boardmend_core::errors::RepairError;
use tempfile::TempDir;

#[test]
fn session_values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("forum.db");
    {
        let db = DatabaseManager::open(&path).unwrap();
        db.with_conn(|conn| {
            let store = SqliteSessionStore::new(conn);
            store.set("repair_run", "{\"a\":1}")?;
            store.set("repair_run", "{\"a\":2}")?;
            Ok::<_, RepairError>(())
        })
        .unwrap();
    }
    let db = DatabaseManager::open(&path).unwrap();
    db.with_conn(|conn| {
        let store = SqliteSessionStore::new(conn);
        assert_eq!(store.get("repair_run")?.as_deref(), Some("{\"a\":2}"));
        store.clear("repair_run")?;
        assert_eq!(store.get("repair_run")?, None);
        Ok::<_, RepairError>(())
    })
    .unwrap();
}

#[test]
fn board_creator_appends_board_in_category() {
    let db = DatabaseManager::open_in_memory().unwrap();
    db.with_conn(|conn| {
        let creator = SqliteBoardCreator::new(conn);
        let cat = creator.create_category("Salvage Area")?;
        let b1 = creator.create_board(cat, "Salvaged Topics", "desc")?;
        let b2 = creator.create_board(cat, "Other", "")?;
        assert_ne!(b1, b2);
        assert_eq!(creator.find_category("Salvage Area")?, Some(cat));
        assert_eq!(creator.find_category("Nowhere")?, None);
        assert_eq!(creator.find_board(cat, "Salvaged Topics")?, Some(b1));
        assert_eq!(creator.find_board(cat + 1, "Salvaged Topics")?, None);
        assert_eq!(containers::find_board_by_name(conn, cat, "Other")?, Some(b2));
        Ok::<_, RepairError>(())
    })
    .unwrap();
}

#[test]
fn new_containers_skip_ids_still_referenced() {
    let db = DatabaseManager::open_in_memory().unwrap();
    db.with_conn(|conn| {
        conn.execute_batch(
            "INSERT INTO boards (id_board, id_cat, name) VALUES (2, 7, 'Homeless');
             INSERT INTO topics (id_topic, id_board) VALUES (1, 12);
             INSERT INTO log_mark_read (id_member, id_board) VALUES (1, 30);",
        )
        .map_err(boardmend_core::errors::StorageError::sqlite)?;
        let creator = SqliteBoardCreator::new(conn);
        let cat = creator.create_category("Salvage Area")?;
        let board = creator.create_board(cat, "Salvaged Topics", "")?;
        assert_eq!(cat, 8);
        assert_eq!(board, 31);
        Ok::<_, RepairError>(())
    })
    .unwrap();
}

#[test]
fn settings_read_back_as_integers() {
    let db = DatabaseManager::open_in_memory().unwrap();
    db.with_conn(|conn| {
        assert_eq!(settings::get_setting_i64(conn, settings::TOTAL_TOPICS)?, None);
        conn.execute_batch(
            "INSERT INTO settings (variable, value) VALUES ('total_topics', '5'), ('total_messages', 'n/a');",
        )
        .unwrap();
        assert_eq!(settings::get_setting_i64(conn, settings::TOTAL_TOPICS)?, Some(5));
        assert_eq!(settings::get_setting(conn, settings::TOTAL_MESSAGES)?.as_deref(), Some("n/a"));
        assert_eq!(settings::get_setting_i64(conn, settings::TOTAL_MESSAGES)?, None);
        Ok::<_, RepairError>(())
    })
    .unwrap();
}
