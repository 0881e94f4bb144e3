//! Shared fixtures for the repair integration tests.
#![allow(dead_code)]

use boardmend_core::config::BoardmendConfig;
use boardmend_core::traits::MemorySessionStore;
use boardmend_repair::engine::MemoryProbe;
use boardmend_repair::{
    EnglishMessages, ExecutionMode, RepairMode, RepairOutcome, RepairSession, RuleCatalog,
};
use boardmend_storage::migrations::run_migrations;
use boardmend_storage::{SqliteBoardCreator, SqliteExecutor};
use rusqlite::Connection;

/// Probe that never reports memory pressure.
pub struct NoMemoryPressure;

impl MemoryProbe for NoMemoryPressure {
    fn resident_bytes(&self) -> Option<u64> {
        None
    }
}

pub static NO_MEMORY_PRESSURE: NoMemoryPressure = NoMemoryPressure;

/// In-memory forum database with `seed` applied.
pub fn forum_db(seed: &str) -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    conn.execute_batch(seed).unwrap();
    conn
}

/// Budgets generous enough that nothing pauses.
pub fn unbounded_config() -> BoardmendConfig {
    let mut config = BoardmendConfig::default();
    config.checkpoint.time_budget_ms = Some(600_000);
    config.checkpoint.max_queries = Some(u64::MAX);
    config
}

/// Budgets that pause after every unit of work.
pub fn one_query_config() -> BoardmendConfig {
    let mut config = unbounded_config();
    config.checkpoint.max_queries = Some(1);
    config
}

/// Everything a `RepairSession` borrows, owned in one place.
pub struct Harness<'c> {
    pub exec: SqliteExecutor<'c>,
    pub creator: SqliteBoardCreator<'c>,
    pub store: MemorySessionStore,
    pub messages: EnglishMessages,
    pub catalog: RuleCatalog,
    pub config: BoardmendConfig,
}

impl<'c> Harness<'c> {
    pub fn new(conn: &'c Connection, config: BoardmendConfig) -> Self {
        Self::with_catalog(conn, config, RuleCatalog::forum().unwrap())
    }

    pub fn with_catalog(conn: &'c Connection, config: BoardmendConfig, catalog: RuleCatalog) -> Self {
        Self {
            exec: SqliteExecutor::new(conn),
            creator: SqliteBoardCreator::new(conn),
            store: MemorySessionStore::new(),
            messages: EnglishMessages::new(),
            catalog,
            config,
        }
    }

    pub fn session(&self) -> RepairSession<'_> {
        RepairSession::new(
            &self.catalog,
            &self.exec,
            &self.messages,
            &self.creator,
            &self.store,
            &self.config,
        )
        .with_execution_mode(ExecutionMode::Interactive)
        .with_memory_probe(&NO_MEMORY_PRESSURE)
    }

    /// Start a walk and keep re-invoking on `Continue` until it finishes.
    /// Returns the final outcome and the number of invocations.
    pub fn drive(&self, mode: RepairMode) -> (RepairOutcome, usize) {
        let session = self.session();
        let mut outcome = session.begin(mode).unwrap();
        let mut invocations = 1;
        while let RepairOutcome::Continue(next) = outcome {
            assert_eq!(next.mode, mode);
            assert!(next.progress_percent <= 100);
            outcome = session.invoke(next.request()).unwrap();
            invocations += 1;
            assert!(invocations < 10_000, "repair walk does not converge");
        }
        (outcome, invocations)
    }

    pub fn detect(&self) -> (Vec<String>, Vec<String>) {
        match self.drive(RepairMode::Detect).0 {
            RepairOutcome::Detected { broken, messages } => (
                broken.into_iter().map(|id| id.to_string()).collect(),
                messages,
            ),
            other => panic!("expected a detect result, got {other:?}"),
        }
    }

    pub fn fix(&self) -> Vec<String> {
        match self.drive(RepairMode::Fix).0 {
            RepairOutcome::Repaired { fixed, .. } => fixed.into_iter().map(|id| id.to_string()).collect(),
            other => panic!("expected a fix result, got {other:?}"),
        }
    }
}

/// Render every row of `sql` as one line, for whole-table comparisons.
pub fn dump(conn: &Connection, sql: &str) -> Vec<String> {
    let mut stmt = conn.prepare(sql).unwrap();
    let width = stmt.column_count();
    let lines: Vec<String> = stmt
        .query_map([], |row| {
            let mut cells = Vec::with_capacity(width);
            for idx in 0..width {
                let v: rusqlite::types::Value = row.get(idx)?;
                cells.push(format!("{v:?}"));
            }
            Ok(cells.join("|"))
        })
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    lines
}

pub fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

/// A healthy forum: one category, one board, two members, one topic with two
/// replies and a subject index entry.
pub const HEALTHY_FORUM: &str = "
    INSERT INTO categories (id_cat, name) VALUES (1, 'General');
    INSERT INTO boards (id_board, id_cat, name) VALUES (1, 1, 'Lobby');
    INSERT INTO members (id_member, member_name) VALUES (1, 'alice'), (2, 'bob');
    INSERT INTO membergroups (id_group, group_name) VALUES (1, 'Admins');
    INSERT INTO topics (id_topic, id_board, id_first_msg, id_last_msg, id_member_started, id_member_updated, num_replies)
        VALUES (1, 1, 1, 3, 1, 2, 2);
    INSERT INTO messages (id_msg, id_topic, id_board, id_member, subject) VALUES
        (1, 1, 1, 1, 'Welcome'), (2, 1, 1, 2, 'Re: Welcome'), (3, 1, 1, 2, 'Re: Welcome');
    INSERT INTO log_search_subjects (word, id_topic) VALUES ('welcome', 1);
";
