//! Collaborator traits consumed by the repair engine.

pub mod board_creator;
pub mod localizer;
pub mod session_store;
pub mod sql_executor;

pub use board_creator::BoardCreator;
pub use localizer::Localizer;
pub use session_store::{MemorySessionStore, SessionStore};
pub use sql_executor::SqlExecutor;
