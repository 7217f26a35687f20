//! tracing subscriber setup
//!
//! The filter comes from `MOVIEFLIX_LOG`, then the config's `log_filter`,
//! then `info`. The TUI owns the terminal, so in TUI mode events go to
//! `movieflix.log` in the data directory. CLI mode logs to stderr.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "MOVIEFLIX_LOG";
const DEFAULT_FILTER: &str = "info";

/// Filter from env, then config, then the default
pub fn filter(config_filter: Option<&str>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }
    config_filter
        .and_then(|f| EnvFilter::try_new(f).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// `<data dir>/movieflix/movieflix.log`
pub fn log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("movieflix").join("movieflix.log"))
}

/// Log to a file so the alternate screen stays clean
pub fn init_tui(config_filter: Option<&str>) -> Result<Option<PathBuf>> {
    let Some(path) = log_path() else {
        return Ok(None);
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Could not open log file {}", path.display()))?;

    fmt()
        .with_env_filter(filter(config_filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Could not install logger: {}", e))?;
    Ok(Some(path))
}

/// Log to stderr, leaving stdout for command output
pub fn init_cli(config_filter: Option<&str>, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        filter(config_filter)
    };
    // A second init (tests) is harmless
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
