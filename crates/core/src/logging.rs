//! Process-wide tracing setup.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter directives for every layer, e.g. `lodestone_core=debug`. Defaults to `info`.
pub const LOG_FILTER_ENV: &str = "LODESTONE_LOG";

/// Directory holding rolling log files: `$LODESTONE_LOG_DIR`, or `~/.lodestone/logs`.
pub fn log_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LODESTONE_LOG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lodestone")
        .join("logs")
}

pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    init_logging_in(&log_dir(), component, to_stderr)
}

/// Installs the global subscriber writing to a daily file in `dir`, plus
/// stderr when `to_stderr` is set.
///
/// When `dir` is unusable, file logging is disabled with a note on stderr.
/// A subscriber installed earlier stays in place.
pub fn init_logging_in(dir: &Path, component: &str, to_stderr: bool) -> WorkerGuard {
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("lodestone: cannot create log directory {}: {e}", dir.display());
    }

    // Files like cli.2024-01-21.log
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(component)
        .filename_suffix("log")
        .build(dir);
    let (writer, guard) = match appender {
        Ok(appender) => tracing_appender::non_blocking(appender),
        Err(e) => {
            eprintln!("lodestone: file logging disabled: {e}");
            tracing_appender::non_blocking(std::io::sink())
        }
    };

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);
    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .without_time()
            .with_target(false)
    });

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init();
    if installed.is_err() {
        tracing::debug!("Subscriber already installed, {} keeps it", component);
    }

    guard
}
