//! Tracing setup.
//!
//! The TUI owns the terminal, so interactive runs log to a daily rolling
//! file. Headless commands log to stderr instead.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "movie-quest";
const DEFAULT_FILTER: &str = "movie_quest=info,warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `<data_dir>/logs`, falling back to `./.logs`.
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "moviequest", "movie-quest")
        .map(|dirs| dirs.data_local_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from(".logs"))
}

/// Initialize file logging. Keep the returned guard alive until exit so
/// buffered lines get flushed.
pub fn init_file_logging() -> std::io::Result<(WorkerGuard, PathBuf)> {
    let dir = log_dir();
    std::fs::create_dir_all(&dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .init();

    tracing::info!(dir = %dir.display(), "Logging initialized");
    Ok((guard, dir))
}

/// Initialize stderr logging for non-interactive commands.
pub fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
