//! Rule-driven forum integrity scanner with a resumable, budgeted repair walk.

pub mod catalog;
pub mod engine;
pub mod messages;
pub mod session;

pub use catalog::{Rule, RuleCatalog};
pub use engine::{ExecutionMode, MemoryProbe, PauseReason, RepairMode, RepairRun};
pub use messages::EnglishMessages;
pub use session::{Continuation, RepairOutcome, RepairRequest, RepairSession};
