use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use chrono::{DateTime, Local};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

fn log_file_name(started: DateTime<Local>) -> String {
    format!("subwatch_{}.log", started.format("%Y%m%d_%H%M%S"))
}

fn open_log_file(dir: &Path) -> anyhow::Result<(PathBuf, File)> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(log_file_name(Local::now()));
    let file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok((path, file))
}

/// Initialize logging to stderr and, when `log_dir` is given, to a per-run
/// file inside it.
///
/// Uses the `RUST_LOG` env var if set, otherwise falls back to the provided level.
/// Returns the log file path if one was opened.
pub fn init(log_level: &str, log_dir: Option<&Path>) -> Option<PathBuf> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let (file_layer, log_path, open_error) = match log_dir.map(open_log_file) {
        Some(Ok((path, file))) => (
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            ),
            Some(path),
            None,
        ),
        Some(Err(e)) => (None, None, Some(e)),
        None => (None, None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    if let Some(e) = open_error {
        warn!("Logging to stderr only: {e:#}");
    }
    log_path
}
