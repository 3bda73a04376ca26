//! Logging setup shared by every Slotbook binary.
//!
//! Installs a `tracing-subscriber` registry with a console `fmt` layer, an optional daily
//! rolling file, and an `EnvFilter` built from `RUST_LOG` when set, else from the configured level.

use slotbook_config::LoggingConfig;
use std::{env, str::FromStr};
use tracing::{info, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_PREFIX: &str = "slotbook.log";

/// Parses `trace`/`debug`/`info`/`warn`/`error` case-insensitively, falling back to INFO.
pub fn parse_level(raw: &str) -> Level {
    Level::from_str(raw.trim()).unwrap_or(Level::INFO)
}

// A non-empty RUST_LOG replaces the configured level entirely.
fn build_filter(level: Level, rust_log: Option<&str>) -> EnvFilter {
    if let Some(spec) = rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        match EnvFilter::try_new(spec) {
            Ok(filter) => return filter,
            Err(err) => eprintln!("Ignoring RUST_LOG={}: {}", spec, err),
        }
    }
    EnvFilter::new(format!("error,slotbook={0},tower_http={0}", level))
}

/// Console logging at `level`.
pub fn init_with_level(level: Level) {
    init_with_options(level, None);
}

/// Console logging plus, when `directory` is set, a daily rolling file in it.
///
/// The returned guard flushes the file writer on drop and has to live as long as the process.
pub fn init_with_options(level: Level, directory: Option<&str>) -> Option<WorkerGuard> {
    let (file_layer, guard) = match directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // try_init: tests and embedding binaries may already have a subscriber.
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true),
        )
        .with(file_layer)
        .with(build_filter(level, env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .try_init();

    match result {
        Ok(()) => {
            info!("Logging initialized at level: {}", level);
            if let Some(dir) = directory {
                info!("Writing daily log files to {}", dir);
            }
        }
        Err(err) => warn!("Logging already initialized: {}", err),
    }
    guard
}

/// Initialises logging from the `[logging]` configuration section.
pub fn init_from_config(config: &LoggingConfig) -> Option<WorkerGuard> {
    init_with_options(parse_level(&config.level), config.directory.as_deref())
}
