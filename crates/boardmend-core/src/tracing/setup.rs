//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the boardmend tracing/logging system.
///
/// Reads `BOARDMEND_LOG` for per-subsystem log levels, e.g.
/// `BOARDMEND_LOG=boardmend_repair=debug,boardmend_storage=warn`.
/// Falls back to `boardmend=info` if unset or invalid.
///
/// Calling it more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("BOARDMEND_LOG")
            .unwrap_or_else(|_| EnvFilter::new("boardmend=info"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}
