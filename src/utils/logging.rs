/// Tracing setup
///
/// The TUI screens own the terminal, so they log to a daily-rolling file in the
/// app data directory. One-shot subcommands log to stderr.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::utils::constants::APP_NAME;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Rolling file, for full-screen sessions
    File,
    Stderr,
}

/// Directory holding the rolling log files
pub fn log_dir() -> Result<PathBuf> {
    let dir = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .context("Could not determine a directory for log files")?
        .join(APP_NAME)
        .join("logs");

    std::fs::create_dir_all(&dir)
        .context("Failed to create log directory")?;

    Ok(dir)
}

/// Build the filter: RUST_LOG wins over the configured level
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered file output is flushed.
pub fn init_logging(level: &str, target: LogTarget) -> Result<Option<WorkerGuard>> {
    let filter = build_filter(level);

    match target {
        LogTarget::File => {
            let appender = tracing_appender::rolling::daily(log_dir()?, format!("{}.log", APP_NAME));
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_target(true).with_writer(writer))
                .try_init()
                .context("Failed to install tracing subscriber")?;

            Ok(Some(guard))
        }
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
                .try_init()
                .context("Failed to install tracing subscriber")?;

            Ok(None)
        }
    }
}
