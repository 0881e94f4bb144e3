//! SQLite persistence layer for the forum store the repair engine inspects.

pub mod board_creator;
pub mod connection;
pub mod executor;
pub mod migrations;
pub mod queries;
pub mod session;

pub use board_creator::SqliteBoardCreator;
pub use connection::DatabaseManager;
pub use executor::SqliteExecutor;
pub use session::SqliteSessionStore;
