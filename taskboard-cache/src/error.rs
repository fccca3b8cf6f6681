//! Error types for the query cache.

use crate::key::QueryKey;
use thiserror::Error;

/// Failure reported by a producer.
///
/// The cache stores it on the entry and hands the same `Arc` to every
/// subscriber; it never escapes as a panic or an `Err` from `subscribe`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ProducerError {
    message: String,
}

impl ProducerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Misuse of the cache API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Query key must have at least one non-empty segment")]
    EmptyKey,

    #[error("No cache entry for key {0}")]
    UnknownKey(QueryKey),

    #[error("Cache entry for key {0} was dropped")]
    Closed(QueryKey),
}
