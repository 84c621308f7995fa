//! Diagnostic log file.
//!
//! The terminal gets colored status lines from [`crate::ui`]; this module
//! sends `tracing` events to `~/.jar-manager/logs/jar-manager.log`
//! (appended across runs). `RUST_LOG` overrides the default `info` filter.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_FILE: &str = "jar-manager.log";

/// Keeps the background writer alive; dropping it flushes the file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
    path: PathBuf,
}

impl LoggingGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".jar-manager")
        .join("logs")
}

pub fn init_logging(log_dir: &Path) -> io::Result<LoggingGuard> {
    fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .map_err(io::Error::other)?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
        path: log_dir.join(LOG_FILE),
    })
}
