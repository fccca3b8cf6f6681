//! File logging.
//!
//! The terminal belongs to the UI, so tracing output goes to the configured
//! error log instead of stderr.

use crate::error::TuiError;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TASKBOARD_LOG";
pub const DEFAULT_DIRECTIVES: &str = "taskboard=info";

pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber, appending to `path`.
pub fn init(path: &Path) -> Result<(), TuiError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| TuiError::Logging(e.to_string()))?;

    tracing::info!(log_path = %path.display(), "logging initialized");
    Ok(())
}
