//! V003: Key/value table holding paused repair state between invocations.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS repair_session (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
) STRICT;
"#;
