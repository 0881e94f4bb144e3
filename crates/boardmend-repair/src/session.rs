//! Invocation boundary: loads and stores the run between round trips.

use boardmend_core::config::BoardmendConfig;
use boardmend_core::constants::{SESSION_KEY_RUN, SESSION_KEY_TO_FIX};
use boardmend_core::errors::{RepairError, SessionError};
use boardmend_core::traits::{BoardCreator, Localizer, SessionStore, SqlExecutor};
use boardmend_core::types::RuleId;
use serde::{Deserialize, Serialize};

use crate::catalog::RuleCatalog;
use crate::engine::{
    BatchCursor, ExecutionMode, ForumTotals, MemoryProbe, PauseReason, ProcStatus, RepairEngine,
    RepairMode, RepairRun, StepOutcome,
};

/// What the caller asks for. `(0, 0)` starts a new run; anything else
/// continues the stored one and must match its cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairRequest {
    pub mode: RepairMode,
    pub rule_index: usize,
    pub sub_offset: i64,
}

impl RepairRequest {
    pub fn start(mode: RepairMode) -> Self {
        Self {
            mode,
            rule_index: 0,
            sub_offset: 0,
        }
    }

    fn is_start(&self) -> bool {
        BatchCursor::at(self.rule_index, self.sub_offset).is_start()
    }
}

/// Directive to re-invoke with the same cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continuation {
    pub mode: RepairMode,
    pub rule_index: usize,
    pub sub_offset: i64,
    pub progress_percent: u8,
    pub reason: PauseReason,
}

impl Continuation {
    pub fn request(&self) -> RepairRequest {
        RepairRequest {
            mode: self.mode,
            rule_index: self.rule_index,
            sub_offset: self.sub_offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RepairOutcome {
    Continue(Continuation),
    /// Detect walk finished. `broken` is in catalog order.
    Detected {
        broken: Vec<RuleId>,
        messages: Vec<String>,
    },
    /// Fix walk finished.
    Repaired {
        fixed: Vec<RuleId>,
        totals: ForumTotals,
    },
}

/// Ties the engine to a session store.
pub struct RepairSession<'a> {
    catalog: &'a RuleCatalog,
    db: &'a dyn SqlExecutor,
    localizer: &'a dyn Localizer,
    creator: &'a dyn BoardCreator,
    store: &'a dyn SessionStore,
    config: &'a BoardmendConfig,
    mode: ExecutionMode,
    probe: &'a dyn MemoryProbe,
}

static PROC_STATUS: ProcStatus = ProcStatus;

impl<'a> RepairSession<'a> {
    pub fn new(
        catalog: &'a RuleCatalog,
        db: &'a dyn SqlExecutor,
        localizer: &'a dyn Localizer,
        creator: &'a dyn BoardCreator,
        store: &'a dyn SessionStore,
        config: &'a BoardmendConfig,
    ) -> Self {
        Self {
            catalog,
            db,
            localizer,
            creator,
            store,
            config,
            mode: ExecutionMode::Interactive,
            probe: &PROC_STATUS,
        }
    }

    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_memory_probe(mut self, probe: &'a dyn MemoryProbe) -> Self {
        self.probe = probe;
        self
    }

    /// Start a fresh walk in `mode`.
    pub fn begin(&self, mode: RepairMode) -> Result<RepairOutcome, RepairError> {
        self.invoke(RepairRequest::start(mode))
    }

    /// Confirm every catalog rule for fixing, then start a fix walk.
    pub fn begin_fix_all(&self) -> Result<RepairOutcome, RepairError> {
        let all: Vec<RuleId> = self.catalog.ids().map(RuleId::from).collect();
        self.confirm(&all)?;
        self.begin(RepairMode::Fix)
    }

    /// Store `rules` as the confirmed-broken set for the next fix walk.
    pub fn confirm(&self, rules: &[RuleId]) -> Result<(), SessionError> {
        let json = serde_json::to_string(rules).map_err(|e| SessionError::Decode {
            key: SESSION_KEY_TO_FIX.to_string(),
            message: e.to_string(),
        })?;
        self.store.set(SESSION_KEY_TO_FIX, &json)
    }

    /// Confirmed-broken set from the last detect walk, if any.
    pub fn confirmed(&self) -> Result<Option<Vec<RuleId>>, SessionError> {
        let Some(json) = self.store.get(SESSION_KEY_TO_FIX)? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| SessionError::Decode {
                key: SESSION_KEY_TO_FIX.to_string(),
                message: e.to_string(),
            })
    }

    /// The paused run, if one is stored.
    pub fn stored_run(&self) -> Result<Option<RepairRun>, SessionError> {
        self.store
            .get(SESSION_KEY_RUN)?
            .map(|json| RepairRun::from_json(&json))
            .transpose()
    }

    /// Continue the stored run from its own cursor.
    pub fn resume(&self) -> Result<RepairOutcome, RepairError> {
        let run = self.stored_run()?.ok_or(SessionError::NothingToResume)?;
        self.drive(run)
    }

    /// Run one invocation.
    pub fn invoke(&self, request: RepairRequest) -> Result<RepairOutcome, RepairError> {
        let run = if request.is_start() {
            match request.mode {
                RepairMode::Detect => RepairRun::detect(),
                RepairMode::Fix => RepairRun::fix(self.confirmed()?.unwrap_or_default()),
            }
        } else {
            let run = self.stored_run()?.ok_or(SessionError::NothingToResume)?;
            check_matches(&run, &request)?;
            run
        };
        self.drive(run)
    }

    fn drive(&self, mut run: RepairRun) -> Result<RepairOutcome, RepairError> {
        let engine = RepairEngine::new(
            self.catalog,
            self.db,
            self.localizer,
            self.creator,
            self.config,
            self.mode,
            self.probe,
        );

        match engine.run(&mut run)? {
            StepOutcome::Paused(reason) => {
                self.store.set(SESSION_KEY_RUN, &run.to_json()?)?;
                Ok(RepairOutcome::Continue(Continuation {
                    mode: run.mode,
                    rule_index: run.cursor.rule_index,
                    sub_offset: run.cursor.sub_offset,
                    progress_percent: run.cursor.progress_percent(self.catalog.len()),
                    reason,
                }))
            }
            StepOutcome::Finished => {
                self.store.clear(SESSION_KEY_RUN)?;
                match run.mode {
                    RepairMode::Detect => {
                        let broken: Vec<RuleId> = self
                            .catalog
                            .ids()
                            .filter(|id| run.is_broken(id))
                            .map(RuleId::from)
                            .collect();
                        self.confirm(&broken)?;
                        tracing::info!(broken = broken.len(), messages = run.messages.len(), "detect walk finished");
                        Ok(RepairOutcome::Detected {
                            broken,
                            messages: run.messages,
                        })
                    }
                    RepairMode::Fix => {
                        self.store.clear(SESSION_KEY_TO_FIX)?;
                        let totals = engine.recount_totals()?;
                        tracing::info!(fixed = run.fixed.len(), "fix walk finished");
                        Ok(RepairOutcome::Repaired {
                            fixed: run.fixed,
                            totals,
                        })
                    }
                }
            }
        }
    }
}

fn check_matches(run: &RepairRun, request: &RepairRequest) -> Result<(), SessionError> {
    if run.mode != request.mode {
        return Err(SessionError::ModeMismatch {
            stored: run.mode.to_string(),
            requested: request.mode.to_string(),
        });
    }
    if run.cursor.rule_index != request.rule_index || run.cursor.sub_offset != request.sub_offset {
        return Err(SessionError::CursorMismatch {
            stored_rule: run.cursor.rule_index,
            stored_offset: run.cursor.sub_offset,
            requested_rule: request.rule_index,
            requested_offset: request.sub_offset,
        });
    }
    Ok(())
}
