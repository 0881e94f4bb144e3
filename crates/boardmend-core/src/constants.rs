//! Shared constants for the boardmend repair engine.

/// Default wall-clock budget for one invocation, in milliseconds.
pub const DEFAULT_TIME_BUDGET_MS: u64 = 3_000;

/// Hard ceiling on queries issued by one invocation before a forced pause.
pub const DEFAULT_MAX_QUERIES: u64 = 1_000;

/// Default process memory ceiling (RSS) in megabytes.
pub const DEFAULT_MEMORY_LIMIT_MB: u64 = 128;

/// Headroom kept below the memory ceiling, in megabytes.
pub const DEFAULT_MEMORY_MARGIN_MB: u64 = 16;

/// Accumulated message count above which the loop heuristic may pause.
pub const DEFAULT_MESSAGE_THRESHOLD: usize = 400;

/// Loop count above which a large message backlog forces a pause.
pub const DEFAULT_LOOP_THRESHOLD: u32 = 20;

/// Maximum ids bound into a single `IN (...)` list.
pub const DEFAULT_BULK_CHUNK_SIZE: usize = 500;

/// Rows buffered by the subject index rebuild before a flush.
pub const DEFAULT_INDEX_BATCH_SIZE: usize = 200;

/// Longest word stored in the subject search index.
pub const MAX_SUBJECT_WORD_LEN: usize = 20;

/// Session key holding the serialized in-flight repair run.
pub const SESSION_KEY_RUN: &str = "repair_run";

/// Session key holding the rule ids confirmed for fixing by the last detect pass.
pub const SESSION_KEY_TO_FIX: &str = "repair_to_fix";

/// `settings` row holding the approved message total.
pub const SETTING_TOTAL_MESSAGES: &str = "total_messages";

/// `settings` row holding the approved topic total.
pub const SETTING_TOTAL_TOPICS: &str = "total_topics";

/// `settings` row stamped whenever totals are recomputed.
pub const SETTING_CALENDAR_UPDATED: &str = "calendar_updated";
