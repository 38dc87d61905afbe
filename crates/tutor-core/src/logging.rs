//! Structured logging setup.
//!
//! The TUI owns stdout/stderr while it runs, so logs go to
//! `${TUTOR_HOME}/logs/tutor.log` through a non-blocking appender.
//! `RUST_LOG` takes precedence over the configured level.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

/// File name of the session log inside the logs directory.
pub const LOG_FILE_NAME: &str = "tutor.log";

/// Installs the global tracing subscriber writing to `dir/tutor.log`.
///
/// Keep the returned guard alive for the lifetime of the process; dropping it
/// flushes buffered lines. A second call leaves the first subscriber in place.
pub fn init(dir: &Path, level: &str) -> Result<WorkerGuard> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer)
        .compact();

    // try_init is a no-op if a global default is already set
    let _ = subscriber.try_init();

    Ok(guard)
}
