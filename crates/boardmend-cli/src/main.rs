//! `boardmend`: scan a forum database for integrity violations and repair them.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use boardmend_core::config::{BoardmendConfig, CliOverrides};
use boardmend_core::errors::{BoardmendErrorCode, RepairError};
use boardmend_core::tracing::init_tracing;
use boardmend_repair::{
    EnglishMessages, ExecutionMode, RepairOutcome, RepairMode, RepairSession, RuleCatalog,
};
use boardmend_storage::queries::settings;
use boardmend_storage::{DatabaseManager, SqliteBoardCreator, SqliteExecutor, SqliteSessionStore};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "boardmend")]
#[command(about = "Find and repair referential damage in a forum database", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Explicit config file (default: ./boardmend.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Run to completion in one invocation instead of pausing
    #[arg(long, global = true)]
    no_pause: bool,

    /// Wall-clock budget per invocation
    #[arg(long, global = true)]
    time_budget_ms: Option<u64>,

    /// Query ceiling per invocation
    #[arg(long, global = true)]
    max_queries: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan every rule and report what is broken
    Detect(WalkArgs),

    /// Repair the rules confirmed by the last detect walk
    Fix(FixArgs),

    /// Continue a paused walk from its stored cursor
    Resume(WalkArgs),

    /// Show the paused run, the confirmed set and the last recount
    Status(DbArg),

    /// List the rules in catalog order
    Rules,
}

#[derive(Args, Debug)]
struct DbArg {
    /// Forum database file
    #[arg(long)]
    db: PathBuf,
}

#[derive(Args, Debug)]
struct WalkArgs {
    /// Forum database file
    #[arg(long)]
    db: PathBuf,

    /// Stop after one invocation and print the continuation
    #[arg(long)]
    single_step: bool,
}

#[derive(Args, Debug)]
struct FixArgs {
    #[command(flatten)]
    walk: WalkArgs,

    /// Fix every rule, not only the confirmed ones
    #[arg(long)]
    all: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let stdout = io::stdout();
    match run(&cli, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.error_code(), "{e}");
            eprintln!("{}", e.operator_string());
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<BoardmendConfig, RepairError> {
    let overrides = CliOverrides {
        time_budget_ms: cli.time_budget_ms,
        max_queries: cli.max_queries,
        no_pause: cli.no_pause,
    };
    let config = match &cli.config {
        Some(path) => BoardmendConfig::load_file(path, Some(&overrides))?,
        None => BoardmendConfig::load(&std::env::current_dir().unwrap_or_default(), Some(&overrides))?,
    };
    Ok(config)
}

fn run(cli: &Cli, out: &mut dyn Write) -> Result<(), RepairError> {
    let catalog = RuleCatalog::forum()?;

    let (walk, start) = match &cli.command {
        Commands::Rules => return print_rules(&catalog, out),
        Commands::Status(arg) => return print_status(&catalog, &arg.db, out),
        Commands::Detect(walk) => (walk, Start::Begin(RepairMode::Detect)),
        Commands::Fix(fix) if fix.all => (&fix.walk, Start::FixAll),
        Commands::Fix(fix) => (&fix.walk, Start::Begin(RepairMode::Fix)),
        Commands::Resume(walk) => (walk, Start::Resume),
    };

    let config = load_config(cli)?;
    let execution = if cli.no_pause {
        ExecutionMode::Background
    } else {
        ExecutionMode::Interactive
    };
    let db = DatabaseManager::open(&walk.db)?;
    let messages = EnglishMessages::new();

    db.with_conn(|conn| {
        let exec = SqliteExecutor::new(conn);
        let creator = SqliteBoardCreator::new(conn);
        let store = SqliteSessionStore::new(conn);
        let session = RepairSession::new(&catalog, &exec, &messages, &creator, &store, &config)
            .with_execution_mode(execution);

        let mut outcome = match start {
            Start::Begin(mode) => session.begin(mode)?,
            Start::FixAll => session.begin_fix_all()?,
            Start::Resume => session.resume()?,
        };
        while let RepairOutcome::Continue(next) = outcome {
            tracing::info!(
                mode = %next.mode,
                rule = next.rule_index,
                offset = next.sub_offset,
                progress = next.progress_percent,
                reason = %next.reason,
                "paused"
            );
            if walk.single_step {
                return write_report(out, &RepairOutcome::Continue(next));
            }
            outcome = session.invoke(next.request())?;
        }
        write_report(out, &outcome)
    })
}

#[derive(Debug, Clone, Copy)]
enum Start {
    Begin(RepairMode),
    FixAll,
    Resume,
}

fn print_rules(catalog: &RuleCatalog, out: &mut dyn Write) -> Result<(), RepairError> {
    for (idx, rule) in catalog.rules().iter().enumerate() {
        let step = rule
            .range
            .map(|plan| plan.step.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "{idx:>2}  {:<32} {:<22} step={step}",
            rule.id,
            rule.remediation.name()
        )?;
    }
    Ok(())
}

fn print_status(catalog: &RuleCatalog, db: &Path, out: &mut dyn Write) -> Result<(), RepairError> {
    let config = BoardmendConfig::default();
    let messages = EnglishMessages::new();
    let db = DatabaseManager::open(db)?;
    db.with_conn(|conn| {
        let exec = SqliteExecutor::new(conn);
        let creator = SqliteBoardCreator::new(conn);
        let store = SqliteSessionStore::new(conn);
        let session = RepairSession::new(catalog, &exec, &messages, &creator, &store, &config);

        let paused = match session.stored_run()? {
            Some(run) => writeln!(
                out,
                "paused {} walk at rule {} offset {} ({}%)",
                run.mode,
                run.cursor.rule_index,
                run.cursor.sub_offset,
                run.cursor.progress_percent(catalog.len())
            ),
            None => writeln!(out, "no paused walk"),
        };
        paused?;

        if let Some(confirmed) = session.confirmed()? {
            let ids: Vec<&str> = confirmed.iter().map(|id| id.as_str()).collect();
            writeln!(out, "confirmed for fixing: {}", ids.join(", "))?;
        }

        let totals = (
            settings::get_setting_i64(conn, settings::TOTAL_MESSAGES)?,
            settings::get_setting_i64(conn, settings::TOTAL_TOPICS)?,
        );
        if let (Some(messages), Some(topics)) = totals {
            writeln!(out, "last recount: {messages} message(s), {topics} topic(s)")?;
        }
        Ok(())
    })
}

fn write_report(out: &mut dyn Write, outcome: &RepairOutcome) -> Result<(), RepairError> {
    let written = match outcome {
        RepairOutcome::Continue(next) => writeln!(
            out,
            "paused at rule {} offset {} ({}%, {}); run `boardmend resume` to continue",
            next.rule_index, next.sub_offset, next.progress_percent, next.reason
        ),
        RepairOutcome::Detected { broken, .. } if broken.is_empty() => writeln!(out, "no errors found"),
        RepairOutcome::Detected { broken, messages } => {
            for message in messages {
                writeln!(out, "{message}")?;
            }
            writeln!(
                out,
                "{} rule(s) broken: {}",
                broken.len(),
                broken.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
            )
        }
        RepairOutcome::Repaired { fixed, totals } => {
            for id in fixed {
                writeln!(out, "fixed {id}")?;
            }
            writeln!(
                out,
                "repair complete: {} message(s), {} topic(s)",
                totals.messages, totals.topics
            )
        }
    };
    Ok(written?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ORPHAN_MESSAGE: &str = "
        INSERT INTO categories (id_cat, name) VALUES (1, 'General');
        INSERT INTO boards (id_board, id_cat, name) VALUES (1, 1, 'Lobby');
        INSERT INTO members (id_member, member_name) VALUES (1, 'alice');
        INSERT INTO messages (id_msg, id_topic, id_board, id_member, subject)
            VALUES (1, 42, 1, 1, 'Hello');
    ";

    fn seeded_db(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("forum.db");
        let db = DatabaseManager::open(&path).unwrap();
        db.with_conn(|conn| {
            conn.execute_batch(ORPHAN_MESSAGE)
                .map_err(boardmend_core::errors::StorageError::sqlite)
        })
        .unwrap();
        path
    }

    fn invoke(args: &[&str]) -> String {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut out = Vec::new();
        run(&cli, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "boardmend", "fix", "--db", "f.db", "--all", "--no-pause", "--max-queries", "50",
        ])
        .unwrap();
        assert!(cli.no_pause);
        assert_eq!(cli.max_queries, Some(50));
        assert!(matches!(cli.command, Commands::Fix(FixArgs { all: true, .. })));
    }

    #[test]
    fn walk_commands_require_a_database() {
        assert!(Cli::try_parse_from(["boardmend", "detect"]).is_err());
    }

    #[test]
    fn rules_lists_the_whole_catalog() {
        let listing = invoke(&["boardmend", "rules"]);
        assert_eq!(listing.lines().count(), 33);
        assert!(listing.lines().next().unwrap().contains("zero_topics"));
    }

    #[test]
    fn detect_then_fix_repairs_an_orphan_message() {
        let dir = TempDir::new().unwrap();
        let db = seeded_db(&dir);
        let db = db.to_str().unwrap();

        let report = invoke(&["boardmend", "detect", "--db", db, "--no-pause"]);
        assert!(report.contains("Message #1 is in non-existent topic #42."), "{report}");
        assert!(report.contains("missing_topics"));

        let report = invoke(&["boardmend", "fix", "--db", db, "--no-pause"]);
        assert!(report.contains("fixed missing_topics"), "{report}");
        assert!(report.contains("1 message(s), 1 topic(s)"));

        let report = invoke(&["boardmend", "detect", "--db", db, "--no-pause"]);
        assert_eq!(report.trim(), "no errors found");
    }

    #[test]
    fn status_reports_confirmed_set_and_recount() {
        let dir = TempDir::new().unwrap();
        let db = seeded_db(&dir);
        let db = db.to_str().unwrap();

        assert_eq!(invoke(&["boardmend", "status", "--db", db]).trim(), "no paused walk");

        invoke(&["boardmend", "detect", "--db", db, "--no-pause"]);
        let status = invoke(&["boardmend", "status", "--db", db]);
        assert!(status.contains("confirmed for fixing: missing_topics"), "{status}");

        invoke(&["boardmend", "fix", "--db", db, "--no-pause"]);
        let status = invoke(&["boardmend", "status", "--db", db]);
        assert!(status.contains("last recount: 1 message(s), 1 topic(s)"), "{status}");
        assert!(!status.contains("confirmed"));
    }

    #[test]
    fn single_step_stops_at_the_first_pause() {
        let dir = TempDir::new().unwrap();
        let db = seeded_db(&dir);
        let db = db.to_str().unwrap();

        let report = invoke(&[
            "boardmend", "detect", "--db", db, "--single-step", "--max-queries", "1",
        ]);
        assert!(report.starts_with("paused at rule 1 offset 0"), "{report}");

        let report = invoke(&["boardmend", "resume", "--db", db, "--max-queries", "1000000"]);
        assert!(report.contains("missing_topics"), "{report}");
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failures_are_output_errors() {
        let cli = Cli::try_parse_from(["boardmend", "rules"]).unwrap();
        let err = run(&cli, &mut ClosedPipe).unwrap_err();
        assert_eq!(err.error_code(), "OUTPUT_ERROR");
        assert!(err.operator_string().contains("stdout closed"));
    }
}
