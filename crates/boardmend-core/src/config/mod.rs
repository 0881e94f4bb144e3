//! Configuration system for boardmend.
//! TOML-based, layered resolution: CLI > env > project file > defaults.

pub mod boardmend_config;
pub mod checkpoint_config;
pub mod repair_config;

pub use boardmend_config::{BoardmendConfig, CliOverrides};
pub use checkpoint_config::CheckpointConfig;
pub use repair_config::RepairConfig;
