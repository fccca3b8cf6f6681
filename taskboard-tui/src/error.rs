//! Error types for the dashboard.

use crate::config::ConfigError;
use crate::persistence::PersistenceError;
use crate::source::SourceError;
use taskboard_cache::CacheError;

#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}
