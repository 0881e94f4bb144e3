//! Remediation tuning.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Chunk sizes used by the bulk and streaming remediation strategies.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RepairConfig {
    /// Ids per `IN (...)` list. Default: 500.
    pub bulk_chunk_size: Option<usize>,
    /// Rows per subject index flush. Default: 200.
    pub index_batch_size: Option<usize>,
}

impl RepairConfig {
    pub fn effective_bulk_chunk_size(&self) -> usize {
        self.bulk_chunk_size
            .unwrap_or(constants::DEFAULT_BULK_CHUNK_SIZE)
    }

    pub fn effective_index_batch_size(&self) -> usize {
        self.index_batch_size
            .unwrap_or(constants::DEFAULT_INDEX_BATCH_SIZE)
    }
}
