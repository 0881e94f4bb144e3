//! Tests for the boardmend configuration system.

use std::sync::Mutex;
use std::time::Duration;

use boardmend_core::config::{BoardmendConfig, CliOverrides};
use boardmend_core::errors::ConfigError;

/// Serializes tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn clear_env_vars() {
    for key in [
        "BOARDMEND_CHECKPOINT_TIME_BUDGET_MS",
        "BOARDMEND_CHECKPOINT_MAX_QUERIES",
        "BOARDMEND_CHECKPOINT_MEMORY_LIMIT_MB",
        "BOARDMEND_CHECKPOINT_PAUSE_ENABLED",
        "BOARDMEND_REPAIR_BULK_CHUNK_SIZE",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn defaults_when_nothing_configured() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();
    let dir = tempfile::TempDir::new().unwrap();

    let config = BoardmendConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.checkpoint.effective_time_budget(), Duration::from_secs(3));
    assert_eq!(config.checkpoint.effective_max_queries(), 1000);
    assert!(config.checkpoint.effective_pause_enabled());
    assert_eq!(config.repair.effective_bulk_chunk_size(), 500);
    assert_eq!(config.repair.effective_index_batch_size(), 200);
}

#[test]
fn layered_resolution_cli_beats_env_beats_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("boardmend.toml"),
        r#"
[checkpoint]
time_budget_ms = 1500
max_queries = 250
loop_threshold = 7

[repair]
bulk_chunk_size = 50
"#,
    )
    .unwrap();

    std::env::set_var("BOARDMEND_CHECKPOINT_MAX_QUERIES", "400");
    std::env::set_var("BOARDMEND_CHECKPOINT_TIME_BUDGET_MS", "900");

    let cli = CliOverrides {
        time_budget_ms: Some(100),
        ..Default::default()
    };
    let config = BoardmendConfig::load(dir.path(), Some(&cli)).unwrap();
    clear_env_vars();

    assert_eq!(config.checkpoint.time_budget_ms, Some(100), "CLI wins");
    assert_eq!(config.checkpoint.max_queries, Some(400), "env beats file");
    assert_eq!(config.checkpoint.loop_threshold, Some(7), "file beats default");
    assert_eq!(config.repair.bulk_chunk_size, Some(50));
}

#[test]
fn no_pause_flag_disables_pausing() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();
    let dir = tempfile::TempDir::new().unwrap();
    let cli = CliOverrides {
        no_pause: true,
        ..Default::default()
    };
    let config = BoardmendConfig::load(dir.path(), Some(&cli)).unwrap();
    assert!(!config.checkpoint.effective_pause_enabled());
}

#[test]
fn zero_budget_is_rejected() {
    let err = BoardmendConfig::from_toml("[checkpoint]\nmax_queries = 0\n").unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, .. } => {
            assert_eq!(field, "checkpoint.max_queries");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn margin_must_fit_below_limit() {
    let err = BoardmendConfig::from_toml(
        "[checkpoint]\nmemory_limit_mb = 32\nmemory_margin_mb = 32\n",
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { .. }));
}

#[test]
fn invalid_toml_reports_parse_error() {
    let err = BoardmendConfig::from_toml("[checkpoint\n").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn unknown_keys_are_ignored() {
    let config = BoardmendConfig::from_toml("[checkpoint]\nshiny = true\n").unwrap();
    assert!(config.checkpoint.time_budget_ms.is_none());
}

#[test]
fn toml_roundtrip_keeps_values() {
    let config = BoardmendConfig::from_toml("[checkpoint]\ntime_budget_ms = 42\n").unwrap();
    let text = config.to_toml().unwrap();
    let back = BoardmendConfig::from_toml(&text).unwrap();
    assert_eq!(back.checkpoint.time_budget_ms, Some(42));
}

#[test]
fn explicit_file_must_exist() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = BoardmendConfig::load_file(&dir.path().join("missing.toml"), None).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}
