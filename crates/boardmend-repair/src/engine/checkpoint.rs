//! Pause decisions between units of work.

use std::fmt;
use std::time::Instant;

use boardmend_core::config::CheckpointConfig;
use serde::{Deserialize, Serialize};

/// Who is driving the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// A request/response caller that must get control back regularly.
    #[default]
    Interactive,
    /// A scheduled task; may run to completion when pausing is disabled.
    Background,
}

/// Why an invocation yielded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseReason {
    QueryCeiling,
    Memory,
    TimeBudget,
    MessageBacklog,
}

impl fmt::Display for PauseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::QueryCeiling => "query ceiling reached",
            Self::Memory => "memory ceiling reached",
            Self::TimeBudget => "time budget spent",
            Self::MessageBacklog => "message backlog too large",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Running,
    Paused(PauseReason),
}

/// Resident set size of the current process.
pub trait MemoryProbe {
    /// Bytes currently resident, or None when unknown.
    fn resident_bytes(&self) -> Option<u64>;
}

/// Reads `VmRSS` from `/proc/self/status`. Reports None on other platforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcStatus;

impl MemoryProbe for ProcStatus {
    #[cfg(target_os = "linux")]
    fn resident_bytes(&self) -> Option<u64> {
        let content = std::fs::read_to_string("/proc/self/status").ok()?;
        vm_rss_bytes(&content)
    }

    #[cfg(not(target_os = "linux"))]
    fn resident_bytes(&self) -> Option<u64> {
        None
    }
}

/// Resident bytes from a `/proc/<pid>/status` listing. The kernel reports
/// `VmRSS` in kB whatever the page size.
pub fn vm_rss_bytes(status: &str) -> Option<u64> {
    let line = status.lines().find(|line| line.starts_with("VmRSS:"))?;
    let mut fields = line["VmRSS:".len()..].split_whitespace();
    let kb = fields.next()?.parse::<u64>().ok()?;
    match fields.next() {
        Some("kB") | None => Some(kb * 1024),
        Some(_) => None,
    }
}

/// Budgets for a single invocation, measured from its start.
pub struct CheckpointController<'a> {
    config: &'a CheckpointConfig,
    mode: ExecutionMode,
    probe: &'a dyn MemoryProbe,
    started: Instant,
    queries_at_start: u64,
}

impl<'a> CheckpointController<'a> {
    pub fn start(
        config: &'a CheckpointConfig,
        mode: ExecutionMode,
        probe: &'a dyn MemoryProbe,
        queries_at_start: u64,
    ) -> Self {
        Self {
            config,
            mode,
            probe,
            started: Instant::now(),
            queries_at_start,
        }
    }

    /// Evaluate the budgets in priority order.
    pub fn evaluate(&self, queries_now: u64, messages: usize, loop_count: u32) -> Decision {
        if self.mode == ExecutionMode::Background && !self.config.effective_pause_enabled() {
            return Decision::Running;
        }

        let issued = queries_now.saturating_sub(self.queries_at_start);
        if issued >= self.config.effective_max_queries() {
            return Decision::Paused(PauseReason::QueryCeiling);
        }

        if let Some(rss) = self.probe.resident_bytes() {
            let margin = self.config.effective_memory_margin_bytes();
            if rss.saturating_add(margin) > self.config.effective_memory_limit_bytes() {
                return Decision::Paused(PauseReason::Memory);
            }
        }

        if self.started.elapsed() > self.config.effective_time_budget() {
            return Decision::Paused(PauseReason::TimeBudget);
        }

        if messages > self.config.effective_message_threshold()
            && loop_count > self.config.effective_loop_threshold()
        {
            return Decision::Paused(PauseReason::MessageBacklog);
        }

        Decision::Running
    }
}
