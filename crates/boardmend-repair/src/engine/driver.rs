//! Walks the catalog one unit at a time until it finishes or must pause.

use boardmend_core::config::BoardmendConfig;
use boardmend_core::constants::{
    SETTING_CALENDAR_UPDATED, SETTING_TOTAL_MESSAGES, SETTING_TOTAL_TOPICS,
};
use boardmend_core::errors::{RepairError, StorageError};
use boardmend_core::traits::{BoardCreator, Localizer, SqlExecutor};
use boardmend_core::types::{Row, SqlValue};
use serde::{Deserialize, Serialize};

use super::checkpoint::{CheckpointController, Decision, ExecutionMode, MemoryProbe, PauseReason};
use super::cursor::{RepairMode, Window};
use super::detector::{Detected, ViolationDetector};
use super::remediator::{self, RepairContext};
use super::run::RepairRun;
use crate::catalog::{MessageSpec, Rule, RuleCatalog};

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Paused(PauseReason),
    Finished,
}

/// Forum-wide totals written after a completed fix walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumTotals {
    pub messages: i64,
    pub topics: i64,
}

pub struct RepairEngine<'a> {
    catalog: &'a RuleCatalog,
    db: &'a dyn SqlExecutor,
    localizer: &'a dyn Localizer,
    creator: &'a dyn BoardCreator,
    config: &'a BoardmendConfig,
    mode: ExecutionMode,
    probe: &'a dyn MemoryProbe,
}

impl<'a> RepairEngine<'a> {
    pub fn new(
        catalog: &'a RuleCatalog,
        db: &'a dyn SqlExecutor,
        localizer: &'a dyn Localizer,
        creator: &'a dyn BoardCreator,
        config: &'a BoardmendConfig,
        mode: ExecutionMode,
        probe: &'a dyn MemoryProbe,
    ) -> Self {
        Self {
            catalog,
            db,
            localizer,
            creator,
            config,
            mode,
            probe,
        }
    }

    /// Advance `run` until the catalog is done or a budget is exhausted.
    pub fn run(&self, run: &mut RepairRun) -> Result<StepOutcome, RepairError> {
        let controller = CheckpointController::start(
            &self.config.checkpoint,
            self.mode,
            self.probe,
            self.db.query_count(),
        );
        run.loop_count = 0;
        let mut pending: Vec<i64> = Vec::new();

        while let Some(rule) = self.catalog.rules().get(run.cursor.rule_index) {
            if run.mode == RepairMode::Fix && !run.is_broken(rule.id) {
                run.cursor.advance_rule();
                continue;
            }

            let rule_done = match rule.range {
                None => {
                    self.unit(rule, None, run, &mut pending)?;
                    true
                }
                Some(plan) => {
                    if run.cursor.step_max.is_none() {
                        let max = ViolationDetector::new(self.db).range_max(&plan)?;
                        tracing::debug!(rule = rule.id, max, step = plan.step, "range discovered");
                        run.cursor.step_max = Some(max);
                    }
                    if !run.cursor.range_exhausted() {
                        let window = run.cursor.window(plan.step);
                        self.unit(rule, Some(window), run, &mut pending)?;
                        run.cursor.advance_window(plan.step);
                    }
                    run.cursor.range_exhausted()
                }
            };

            if rule_done {
                self.flush(rule, run, &mut pending)?;
                tracing::info!(
                    rule = rule.id,
                    mode = %run.mode,
                    broken = run.is_broken(rule.id),
                    "rule finished"
                );
                run.cursor.advance_rule();
            }
            run.loop_count += 1;

            if run.cursor.rule_index >= self.catalog.len() {
                break;
            }
            let decision = controller.evaluate(self.db.query_count(), run.messages.len(), run.loop_count);
            if let Decision::Paused(reason) = decision {
                self.flush(rule, run, &mut pending)?;
                tracing::info!(
                    rule_index = run.cursor.rule_index,
                    sub_offset = run.cursor.sub_offset,
                    %reason,
                    "pausing repair run"
                );
                return Ok(StepOutcome::Paused(reason));
            }
        }

        Ok(StepOutcome::Finished)
    }

    /// One window (or whole rule) of work.
    fn unit(
        &self,
        rule: &Rule,
        window: Option<Window>,
        run: &mut RepairRun,
        pending: &mut Vec<i64>,
    ) -> Result<(), RepairError> {
        match run.mode {
            RepairMode::Detect => {
                let detected = ViolationDetector::new(self.db).detect(rule, window)?;
                self.record_findings(rule, &detected, run)?;
            }
            RepairMode::Fix => {
                let found = {
                    let mut ctx = RepairContext::new(
                        self.db,
                        self.localizer,
                        self.creator,
                        &mut run.salvage,
                        &self.config.repair,
                    );
                    remediator::remediate(&mut ctx, rule, window, pending)?
                };
                if found == 0 {
                    tracing::debug!(rule = rule.id, ?window, "nothing left to repair");
                    return Ok(());
                }
                run.record_fixed(rule.id);
                for forced in rule.forces {
                    if run.mark_broken(forced) {
                        tracing::debug!(rule = rule.id, forced, "forced rule marked broken");
                    }
                }
            }
        }
        Ok(())
    }

    fn flush(&self, rule: &Rule, run: &mut RepairRun, pending: &mut Vec<i64>) -> Result<(), RepairError> {
        if pending.is_empty() {
            return Ok(());
        }
        let mut ctx = RepairContext::new(
            self.db,
            self.localizer,
            self.creator,
            &mut run.salvage,
            &self.config.repair,
        );
        remediator::flush_collected(&mut ctx, rule, pending)?;
        Ok(())
    }

    fn record_findings(&self, rule: &Rule, detected: &Detected, run: &mut RepairRun) -> Result<(), StorageError> {
        if detected.is_clean() {
            return Ok(());
        }
        match rule.message {
            MessageSpec::Static(key) => {
                if run.mark_broken(rule.id) {
                    run.messages.push(self.localizer.render(key, &[]));
                }
            }
            MessageSpec::PerRow { key, columns } => {
                run.mark_broken(rule.id);
                for row in detected.rows() {
                    run.messages.push(render_row(self.localizer, key, columns, row));
                }
            }
            MessageSpec::Predicate(check) => {
                for row in detected.rows() {
                    if check(row, self.localizer, &mut run.messages)? {
                        run.mark_broken(rule.id);
                    }
                }
            }
        }
        Ok(())
    }

    /// Recompute forum totals once a fix walk completes.
    pub fn recount_totals(&self) -> Result<ForumTotals, StorageError> {
        let messages = self
            .db
            .query_scalar("SELECT COUNT(*) FROM messages WHERE approved = 1", &[])?;
        let topics = self
            .db
            .query_scalar("SELECT COUNT(*) FROM topics WHERE approved = 1", &[])?;
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;

        for (variable, value) in [
            (SETTING_TOTAL_MESSAGES, messages),
            (SETTING_TOTAL_TOPICS, topics),
            (SETTING_CALENDAR_UPDATED, now),
        ] {
            self.db.execute(
                "INSERT INTO settings (variable, value) VALUES (?1, ?2)
                 ON CONFLICT(variable) DO UPDATE SET value = excluded.value",
                &[SqlValue::Text(variable.to_string()), SqlValue::Text(value.to_string())],
            )?;
        }
        self.db.execute(
            "UPDATE boards SET
                 num_topics = (SELECT COUNT(*) FROM topics AS t
                               WHERE t.id_board = boards.id_board AND t.approved = 1),
                 num_posts = (SELECT COUNT(*) FROM messages AS m
                              WHERE m.id_board = boards.id_board AND m.approved = 1)",
            &[],
        )?;
        tracing::info!(messages, topics, "forum totals recomputed");
        Ok(ForumTotals { messages, topics })
    }
}

fn render_row(localizer: &dyn Localizer, key: &str, columns: &[&str], row: &Row) -> String {
    let values: Vec<String> = columns.iter().map(|c| row.display(c)).collect();
    let args: Vec<&dyn std::fmt::Display> = values.iter().map(|v| v as &dyn std::fmt::Display).collect();
    localizer.render(key, &args)
}
