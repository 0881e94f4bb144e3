//! V001: Forum tables.
//! Ids of 0 mean "none" (guest member, top-level board, no poll).
//! No foreign keys are declared; referential integrity is the repair
//! engine's job.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS members (
    id_member INTEGER PRIMARY KEY,
    member_name TEXT NOT NULL DEFAULT '',
    real_name TEXT NOT NULL DEFAULT '',
    date_registered INTEGER NOT NULL DEFAULT 0
) STRICT;

CREATE TABLE IF NOT EXISTS membergroups (
    id_group INTEGER PRIMARY KEY,
    group_name TEXT NOT NULL DEFAULT ''
) STRICT;

CREATE TABLE IF NOT EXISTS categories (
    id_cat INTEGER PRIMARY KEY,
    name TEXT NOT NULL DEFAULT '',
    cat_order INTEGER NOT NULL DEFAULT 0
) STRICT;

CREATE TABLE IF NOT EXISTS boards (
    id_board INTEGER PRIMARY KEY,
    id_cat INTEGER NOT NULL DEFAULT 0,
    id_parent INTEGER NOT NULL DEFAULT 0,
    child_level INTEGER NOT NULL DEFAULT 0,
    board_order INTEGER NOT NULL DEFAULT 0,
    name TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    num_topics INTEGER NOT NULL DEFAULT 0,
    num_posts INTEGER NOT NULL DEFAULT 0
) STRICT;

CREATE TABLE IF NOT EXISTS topics (
    id_topic INTEGER PRIMARY KEY,
    is_sticky INTEGER NOT NULL DEFAULT 0,
    id_board INTEGER NOT NULL DEFAULT 0,
    id_first_msg INTEGER NOT NULL DEFAULT 0,
    id_last_msg INTEGER NOT NULL DEFAULT 0,
    id_member_started INTEGER NOT NULL DEFAULT 0,
    id_member_updated INTEGER NOT NULL DEFAULT 0,
    id_poll INTEGER NOT NULL DEFAULT 0,
    num_replies INTEGER NOT NULL DEFAULT 0,
    num_views INTEGER NOT NULL DEFAULT 0,
    unapproved_posts INTEGER NOT NULL DEFAULT 0,
    approved INTEGER NOT NULL DEFAULT 1
) STRICT;

CREATE TABLE IF NOT EXISTS messages (
    id_msg INTEGER PRIMARY KEY,
    id_topic INTEGER NOT NULL DEFAULT 0,
    id_board INTEGER NOT NULL DEFAULT 0,
    id_member INTEGER NOT NULL DEFAULT 0,
    poster_time INTEGER NOT NULL DEFAULT 0,
    poster_name TEXT NOT NULL DEFAULT '',
    subject TEXT NOT NULL DEFAULT '',
    body TEXT NOT NULL DEFAULT '',
    approved INTEGER NOT NULL DEFAULT 1
) STRICT;

CREATE TABLE IF NOT EXISTS polls (
    id_poll INTEGER PRIMARY KEY,
    question TEXT NOT NULL DEFAULT '',
    voting_locked INTEGER NOT NULL DEFAULT 0,
    max_votes INTEGER NOT NULL DEFAULT 1,
    id_member INTEGER NOT NULL DEFAULT 0,
    poster_name TEXT NOT NULL DEFAULT ''
) STRICT;

CREATE TABLE IF NOT EXISTS poll_choices (
    id_poll INTEGER NOT NULL,
    id_choice INTEGER NOT NULL,
    label TEXT NOT NULL DEFAULT '',
    votes INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (id_poll, id_choice)
) STRICT;

CREATE TABLE IF NOT EXISTS log_polls (
    id_poll INTEGER NOT NULL,
    id_member INTEGER NOT NULL DEFAULT 0,
    id_choice INTEGER NOT NULL DEFAULT 0
) STRICT;

CREATE TABLE IF NOT EXISTS calendar (
    id_event INTEGER PRIMARY KEY,
    start_date TEXT NOT NULL DEFAULT '',
    id_board INTEGER NOT NULL DEFAULT 0,
    id_topic INTEGER NOT NULL DEFAULT 0,
    title TEXT NOT NULL DEFAULT '',
    id_member INTEGER NOT NULL DEFAULT 0
) STRICT;

CREATE TABLE IF NOT EXISTS log_topics (
    id_member INTEGER NOT NULL,
    id_topic INTEGER NOT NULL,
    id_msg INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (id_member, id_topic)
) STRICT;

CREATE TABLE IF NOT EXISTS log_boards (
    id_member INTEGER NOT NULL,
    id_board INTEGER NOT NULL,
    id_msg INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (id_member, id_board)
) STRICT;

CREATE TABLE IF NOT EXISTS log_mark_read (
    id_member INTEGER NOT NULL,
    id_board INTEGER NOT NULL,
    id_msg INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (id_member, id_board)
) STRICT;

CREATE TABLE IF NOT EXISTS log_notify (
    id_member INTEGER NOT NULL,
    id_topic INTEGER NOT NULL DEFAULT 0,
    id_board INTEGER NOT NULL DEFAULT 0,
    sent INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (id_member, id_topic, id_board)
) STRICT;

CREATE TABLE IF NOT EXISTS personal_messages (
    id_pm INTEGER PRIMARY KEY,
    id_member_from INTEGER NOT NULL DEFAULT 0,
    from_name TEXT NOT NULL DEFAULT '',
    msgtime INTEGER NOT NULL DEFAULT 0,
    subject TEXT NOT NULL DEFAULT '',
    body TEXT NOT NULL DEFAULT ''
) STRICT;

CREATE TABLE IF NOT EXISTS pm_recipients (
    id_pm INTEGER NOT NULL,
    id_member INTEGER NOT NULL,
    bcc INTEGER NOT NULL DEFAULT 0,
    is_read INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (id_pm, id_member)
) STRICT;

CREATE TABLE IF NOT EXISTS log_search_subjects (
    word TEXT NOT NULL,
    id_topic INTEGER NOT NULL,
    PRIMARY KEY (word, id_topic)
) STRICT;

CREATE TABLE IF NOT EXISTS log_reported (
    id_report INTEGER PRIMARY KEY,
    id_msg INTEGER NOT NULL DEFAULT 0,
    id_topic INTEGER NOT NULL DEFAULT 0,
    id_board INTEGER NOT NULL DEFAULT 0,
    id_member INTEGER NOT NULL DEFAULT 0,
    subject TEXT NOT NULL DEFAULT '',
    time_started INTEGER NOT NULL DEFAULT 0,
    closed INTEGER NOT NULL DEFAULT 0
) STRICT;

CREATE TABLE IF NOT EXISTS log_reported_comments (
    id_comment INTEGER PRIMARY KEY,
    id_report INTEGER NOT NULL DEFAULT 0,
    id_member INTEGER NOT NULL DEFAULT 0,
    comment TEXT NOT NULL DEFAULT '',
    time_sent INTEGER NOT NULL DEFAULT 0
) STRICT;

CREATE TABLE IF NOT EXISTS log_group_requests (
    id_request INTEGER PRIMARY KEY,
    id_member INTEGER NOT NULL DEFAULT 0,
    id_group INTEGER NOT NULL DEFAULT 0,
    time_applied INTEGER NOT NULL DEFAULT 0,
    reason TEXT NOT NULL DEFAULT ''
) STRICT;

CREATE TABLE IF NOT EXISTS settings (
    variable TEXT PRIMARY KEY,
    value TEXT NOT NULL DEFAULT ''
) STRICT;
"#;
