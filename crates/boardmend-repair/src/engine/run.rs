//! Serializable state of one logical repair operation.

use std::collections::BTreeSet;

use boardmend_core::errors::SessionError;
use boardmend_core::types::RuleId;
use serde::{Deserialize, Serialize};

use super::cursor::{BatchCursor, RepairMode};
use super::salvage::SalvageArea;

/// Accumulated state carried across pauses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairRun {
    pub mode: RepairMode,
    pub broken: BTreeSet<RuleId>,
    pub messages: Vec<String>,
    pub cursor: BatchCursor,
    /// Units processed by the current invocation.
    pub loop_count: u32,
    /// Rules whose remediation ran, in the order they first ran.
    #[serde(default)]
    pub fixed: Vec<RuleId>,
    #[serde(default)]
    pub salvage: SalvageArea,
}

impl RepairRun {
    pub fn detect() -> Self {
        Self::new(RepairMode::Detect, BTreeSet::new())
    }

    /// A fix walk over the confirmed-broken `to_fix` set.
    pub fn fix(to_fix: impl IntoIterator<Item = RuleId>) -> Self {
        Self::new(RepairMode::Fix, to_fix.into_iter().collect())
    }

    fn new(mode: RepairMode, broken: BTreeSet<RuleId>) -> Self {
        Self {
            mode,
            broken,
            messages: Vec::new(),
            cursor: BatchCursor::default(),
            loop_count: 0,
            fixed: Vec::new(),
            salvage: SalvageArea::default(),
        }
    }

    /// Mark `id` broken. Returns true when it was not already.
    pub fn mark_broken(&mut self, id: &str) -> bool {
        self.broken.insert(RuleId::from(id))
    }

    pub fn is_broken(&self, id: &str) -> bool {
        self.broken.contains(&RuleId::from(id))
    }

    pub fn record_fixed(&mut self, id: &str) {
        if !self.fixed.iter().any(|f| f == id) {
            self.fixed.push(RuleId::from(id));
        }
    }

    pub fn to_json(&self) -> Result<String, SessionError> {
        serde_json::to_string(self).map_err(|e| SessionError::Decode {
            key: boardmend_core::constants::SESSION_KEY_RUN.to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        serde_json::from_str(json).map_err(|e| SessionError::Decode {
            key: boardmend_core::constants::SESSION_KEY_RUN.to_string(),
            message: e.to_string(),
        })
    }
}
