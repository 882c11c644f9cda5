//! Logging setup for the `flipdl` binary.
//!
//! Normal runs log everything from the pipeline to a file under the XDG state
//! directory so the terminal stays free for the progress line. If that file
//! cannot be opened, warnings and errors go to stderr in a short form instead.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// File filter when `RUST_LOG` is unset or invalid.
const FILE_FILTER: &str = "info,flipdl_core=debug,flipdl=debug";

/// Stderr filter when `RUST_LOG` is unset or invalid.
const STDERR_FILTER: &str = "warn";

fn env_filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// `$XDG_STATE_HOME/flipdl/flipdl.log`, with its directory created.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("flipdl")?;
    let path = xdg_dirs
        .place_state_file("flipdl.log")
        .context("create log directory")?;
    Ok(path)
}

/// Appends timestamped records to the log file and returns its path.
///
/// Records carry the thread id so pages fetched by different workers can be
/// told apart. Returns Err when the file cannot be opened.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter_or(FILE_FILTER))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_ids(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "logging to {}",
        path.display()
    );
    Ok(path)
}

/// Short `LEVEL message` lines on stderr, colored when stderr is a terminal.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter_or(STDERR_FILTER))
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .without_time()
        .with_target(false)
        .compact()
        .try_init();
}
