//! Top-level boardmend configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{CheckpointConfig, RepairConfig};
use crate::errors::ConfigError;

/// Project config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "boardmend.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`BOARDMEND_*`)
/// 3. Project config (`boardmend.toml` in the root directory)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BoardmendConfig {
    pub checkpoint: CheckpointConfig,
    pub repair: RepairConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub time_budget_ms: Option<u64>,
    pub max_queries: Option<u64>,
    pub no_pause: bool,
}

impl BoardmendConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(CONFIG_FILE_NAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from an explicit TOML file, then apply env and CLI layers.
    pub fn load_file(path: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        Self::merge_toml_file(&mut config, path)?;
        Self::apply_env_overrides(&mut config);
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &BoardmendConfig) -> Result<(), ConfigError> {
        let zero_checks: [(&str, bool); 5] = [
            ("checkpoint.time_budget_ms", config.checkpoint.time_budget_ms == Some(0)),
            ("checkpoint.max_queries", config.checkpoint.max_queries == Some(0)),
            ("checkpoint.memory_limit_mb", config.checkpoint.memory_limit_mb == Some(0)),
            ("repair.bulk_chunk_size", config.repair.bulk_chunk_size == Some(0)),
            ("repair.index_batch_size", config.repair.index_batch_size == Some(0)),
        ];
        for (field, is_zero) in zero_checks {
            if is_zero {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if config.checkpoint.effective_memory_margin_bytes()
            >= config.checkpoint.effective_memory_limit_bytes()
        {
            return Err(ConfigError::ValidationFailed {
                field: "checkpoint.memory_margin_mb".to_string(),
                message: "must be smaller than checkpoint.memory_limit_mb".to_string(),
            });
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut BoardmendConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: BoardmendConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut BoardmendConfig, other: &BoardmendConfig) {
        let (b, o) = (&mut base.checkpoint, &other.checkpoint);
        if o.time_budget_ms.is_some() {
            b.time_budget_ms = o.time_budget_ms;
        }
        if o.max_queries.is_some() {
            b.max_queries = o.max_queries;
        }
        if o.memory_limit_mb.is_some() {
            b.memory_limit_mb = o.memory_limit_mb;
        }
        if o.memory_margin_mb.is_some() {
            b.memory_margin_mb = o.memory_margin_mb;
        }
        if o.message_threshold.is_some() {
            b.message_threshold = o.message_threshold;
        }
        if o.loop_threshold.is_some() {
            b.loop_threshold = o.loop_threshold;
        }
        if o.pause_enabled.is_some() {
            b.pause_enabled = o.pause_enabled;
        }

        if other.repair.bulk_chunk_size.is_some() {
            base.repair.bulk_chunk_size = other.repair.bulk_chunk_size;
        }
        if other.repair.index_batch_size.is_some() {
            base.repair.index_batch_size = other.repair.index_batch_size;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `BOARDMEND_CHECKPOINT_TIME_BUDGET_MS`, `BOARDMEND_REPAIR_BULK_CHUNK_SIZE`, etc.
    fn apply_env_overrides(config: &mut BoardmendConfig) {
        if let Some(v) = env_parse::<u64>("BOARDMEND_CHECKPOINT_TIME_BUDGET_MS") {
            config.checkpoint.time_budget_ms = Some(v);
        }
        if let Some(v) = env_parse::<u64>("BOARDMEND_CHECKPOINT_MAX_QUERIES") {
            config.checkpoint.max_queries = Some(v);
        }
        if let Some(v) = env_parse::<u64>("BOARDMEND_CHECKPOINT_MEMORY_LIMIT_MB") {
            config.checkpoint.memory_limit_mb = Some(v);
        }
        if let Some(v) = env_parse::<bool>("BOARDMEND_CHECKPOINT_PAUSE_ENABLED") {
            config.checkpoint.pause_enabled = Some(v);
        }
        if let Some(v) = env_parse::<usize>("BOARDMEND_REPAIR_BULK_CHUNK_SIZE") {
            config.repair.bulk_chunk_size = Some(v);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut BoardmendConfig, cli: &CliOverrides) {
        if let Some(v) = cli.time_budget_ms {
            config.checkpoint.time_budget_ms = Some(v);
        }
        if let Some(v) = cli.max_queries {
            config.checkpoint.max_queries = Some(v);
        }
        if cli.no_pause {
            config.checkpoint.pause_enabled = Some(false);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}
