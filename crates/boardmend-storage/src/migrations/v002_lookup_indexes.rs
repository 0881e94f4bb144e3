//! V002: Indexes backing the orphan lookups and range windows.

pub const MIGRATION_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_messages_topic ON messages(id_topic);
CREATE INDEX IF NOT EXISTS idx_messages_member ON messages(id_member);
CREATE INDEX IF NOT EXISTS idx_topics_board ON topics(id_board);
CREATE INDEX IF NOT EXISTS idx_topics_poll ON topics(id_poll) WHERE id_poll != 0;
CREATE INDEX IF NOT EXISTS idx_boards_cat ON boards(id_cat);
CREATE INDEX IF NOT EXISTS idx_boards_parent ON boards(id_parent);
CREATE INDEX IF NOT EXISTS idx_log_polls_poll ON log_polls(id_poll);
CREATE INDEX IF NOT EXISTS idx_log_polls_member ON log_polls(id_member);
CREATE INDEX IF NOT EXISTS idx_calendar_topic ON calendar(id_topic);
CREATE INDEX IF NOT EXISTS idx_pm_recipients_member ON pm_recipients(id_member);
CREATE INDEX IF NOT EXISTS idx_search_subjects_topic ON log_search_subjects(id_topic);
CREATE INDEX IF NOT EXISTS idx_reported_comments_report ON log_reported_comments(id_report);
"#;
