//! The resumable repair engine.

pub mod checkpoint;
pub mod cursor;
pub mod detector;
pub mod driver;
pub mod remediator;
pub mod run;
pub mod salvage;

pub use checkpoint::{
    vm_rss_bytes, CheckpointController, Decision, ExecutionMode, MemoryProbe, PauseReason,
    ProcStatus,
};
pub use cursor::{BatchCursor, RepairMode, Window};
pub use detector::{Detected, ViolationDetector};
pub use driver::{ForumTotals, RepairEngine, StepOutcome};
pub use remediator::RepairContext;
pub use run::RepairRun;
pub use salvage::SalvageArea;
