//! Checkpoint (pause/resume budget) configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Budgets that decide when a repair invocation yields control.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Wall-clock budget per invocation in milliseconds. Default: 3000.
    pub time_budget_ms: Option<u64>,
    /// Query ceiling per invocation. Default: 1000.
    pub max_queries: Option<u64>,
    /// Process memory ceiling in megabytes. Default: 128.
    pub memory_limit_mb: Option<u64>,
    /// Headroom below the memory ceiling in megabytes. Default: 16.
    pub memory_margin_mb: Option<u64>,
    /// Message backlog size that arms the loop heuristic. Default: 400.
    pub message_threshold: Option<usize>,
    /// Loop count that, with a large backlog, forces a pause. Default: 20.
    pub loop_threshold: Option<u32>,
    /// When false the engine runs to completion in one invocation.
    pub pause_enabled: Option<bool>,
}

impl CheckpointConfig {
    pub fn effective_time_budget(&self) -> Duration {
        Duration::from_millis(
            self.time_budget_ms
                .unwrap_or(constants::DEFAULT_TIME_BUDGET_MS),
        )
    }

    pub fn effective_max_queries(&self) -> u64 {
        self.max_queries.unwrap_or(constants::DEFAULT_MAX_QUERIES)
    }

    pub fn effective_memory_limit_bytes(&self) -> u64 {
        self.memory_limit_mb
            .unwrap_or(constants::DEFAULT_MEMORY_LIMIT_MB)
            * 1024
            * 1024
    }

    pub fn effective_memory_margin_bytes(&self) -> u64 {
        self.memory_margin_mb
            .unwrap_or(constants::DEFAULT_MEMORY_MARGIN_MB)
            * 1024
            * 1024
    }

    pub fn effective_message_threshold(&self) -> usize {
        self.message_threshold
            .unwrap_or(constants::DEFAULT_MESSAGE_THRESHOLD)
    }

    pub fn effective_loop_threshold(&self) -> u32 {
        self.loop_threshold.unwrap_or(constants::DEFAULT_LOOP_THRESHOLD)
    }

    pub fn effective_pause_enabled(&self) -> bool {
        self.pause_enabled.unwrap_or(true)
    }
}
