//! Pause decisions with injected memory readings.

use std::time::Duration;

use boardmend_core::config::CheckpointConfig;
use boardmend_repair::engine::{vm_rss_bytes, CheckpointController, Decision, MemoryProbe};
use boardmend_repair::{ExecutionMode, PauseReason};

struct FixedRss(Option<u64>);

impl MemoryProbe for FixedRss {
    fn resident_bytes(&self) -> Option<u64> {
        self.0
    }
}

const MB: u64 = 1024 * 1024;

fn config() -> CheckpointConfig {
    CheckpointConfig {
        time_budget_ms: Some(60_000),
        max_queries: Some(100),
        memory_limit_mb: Some(128),
        memory_margin_mb: Some(16),
        message_threshold: Some(400),
        loop_threshold: Some(20),
        pause_enabled: None,
    }
}

#[test]
fn runs_while_within_budget() {
    let config = config();
    let probe = FixedRss(Some(32 * MB));
    let ctl = CheckpointController::start(&config, ExecutionMode::Interactive, &probe, 10);
    assert_eq!(ctl.evaluate(109, 0, 1), Decision::Running);
}

#[test]
fn query_ceiling_counts_from_invocation_start() {
    let config = config();
    let probe = FixedRss(None);
    let ctl = CheckpointController::start(&config, ExecutionMode::Interactive, &probe, 10);
    assert_eq!(ctl.evaluate(110, 0, 1), Decision::Paused(PauseReason::QueryCeiling));
}

#[test]
fn memory_margin_counts_against_the_limit() {
    let config = config();
    let under = FixedRss(Some(112 * MB));
    let over = FixedRss(Some(112 * MB + 1));
    let ctl = CheckpointController::start(&config, ExecutionMode::Interactive, &under, 0);
    assert_eq!(ctl.evaluate(1, 0, 1), Decision::Running);
    let ctl = CheckpointController::start(&config, ExecutionMode::Interactive, &over, 0);
    assert_eq!(ctl.evaluate(1, 0, 1), Decision::Paused(PauseReason::Memory));
}

#[test]
fn query_ceiling_wins_over_memory() {
    let config = config();
    let probe = FixedRss(Some(512 * MB));
    let ctl = CheckpointController::start(&config, ExecutionMode::Interactive, &probe, 0);
    assert_eq!(ctl.evaluate(100, 0, 1), Decision::Paused(PauseReason::QueryCeiling));
}

#[test]
fn time_budget_expires() {
    let mut config = config();
    config.time_budget_ms = Some(1);
    let probe = FixedRss(None);
    let ctl = CheckpointController::start(&config, ExecutionMode::Interactive, &probe, 0);
    std::thread::sleep(Duration::from_millis(5));
    assert_eq!(ctl.evaluate(1, 0, 1), Decision::Paused(PauseReason::TimeBudget));
}

#[test]
fn message_backlog_needs_both_thresholds() {
    let config = config();
    let probe = FixedRss(None);
    let ctl = CheckpointController::start(&config, ExecutionMode::Interactive, &probe, 0);
    assert_eq!(ctl.evaluate(1, 401, 20), Decision::Running);
    assert_eq!(ctl.evaluate(1, 400, 21), Decision::Running);
    assert_eq!(ctl.evaluate(1, 401, 21), Decision::Paused(PauseReason::MessageBacklog));
}

#[test]
fn background_without_pausing_never_yields() {
    let mut config = config();
    config.pause_enabled = Some(false);
    let probe = FixedRss(Some(u64::MAX));
    let ctl = CheckpointController::start(&config, ExecutionMode::Background, &probe, 0);
    assert_eq!(ctl.evaluate(u64::MAX, usize::MAX, u32::MAX), Decision::Running);

    let ctl = CheckpointController::start(&config, ExecutionMode::Interactive, &probe, 0);
    assert_eq!(ctl.evaluate(1, 0, 1), Decision::Paused(PauseReason::Memory));
}

#[test]
fn vm_rss_is_read_in_kilobytes() {
    let status = "Name:\tboardmend\nVmPeak:\t  90000 kB\nVmRSS:\t   20480 kB\nThreads:\t1\n";
    assert_eq!(vm_rss_bytes(status), Some(20 * MB));
    assert_eq!(vm_rss_bytes("Name:\tkthreadd\n"), None);
    assert_eq!(vm_rss_bytes("VmRSS:\t12 pages\n"), None);
}
