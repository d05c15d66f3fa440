//! Logging infrastructure.
//!
//! Every component logs through `tracing` with a bracketed component prefix
//! (`[Assembler]`, `[Denoise]`, `[Batch]`). This module installs the global
//! subscriber:
//! - Respects the `RUST_LOG` environment variable
//! - Falls back to the configured level
//! - Optionally mirrors output into a daily-rolling file in the logs folder
//!
//! # Example
//!
//! ```no_run
//! use dub_core::config::Settings;
//! use dub_core::logging::init_from_settings;
//!
//! // Keep the guard alive for the lifetime of the program.
//! let _guard = init_from_settings(&Settings::default());
//! tracing::info!("[Assembler] Ready");
//! ```

mod types;

pub use types::LogLevel;

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Settings;

/// File name prefix for rolling log files.
const LOG_FILE_PREFIX: &str = "dub_core.log";

/// Initialize global tracing subscriber for application-wide logging.
///
/// Outputs to stderr. Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(build_filter(default_level))
        .init();
}

/// Initialize tracing with an additional rolling log file in `logs_dir`.
///
/// Returns the writer guard; dropping it flushes and stops the file writer.
pub fn init_tracing_with_file(default_level: LogLevel, logs_dir: impl AsRef<Path>) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(logs_dir.as_ref(), LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(build_filter(default_level))
        .init();

    guard
}

/// Initialize tracing from the `[logging]` and `[paths]` settings.
///
/// With `log_to_file` set, output is also written under `paths.logs_folder`
/// and the returned guard must be kept alive.
pub fn init_from_settings(settings: &Settings) -> Option<WorkerGuard> {
    match log_file_dir(settings) {
        Some(dir) => Some(init_tracing_with_file(settings.logging.level, dir)),
        None => {
            init_tracing(settings.logging.level);
            None
        }
    }
}

fn log_file_dir(settings: &Settings) -> Option<PathBuf> {
    settings
        .logging
        .log_to_file
        .then(|| PathBuf::from(&settings.paths.logs_folder))
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

fn build_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_filter_str()))
}
