//! Cache entries and their status.

use crate::error::ProducerError;
use crate::key::QueryKey;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Lifecycle status of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryStatus {
    /// Created, no fetch started yet.
    Idle,
    /// First fetch in flight and no data cached.
    Loading,
    /// Last committed fetch succeeded.
    Success,
    /// Last committed fetch failed; earlier data may still be present.
    Error,
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QueryStatus::Idle => "idle",
            QueryStatus::Loading => "loading",
            QueryStatus::Success => "success",
            QueryStatus::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Immutable snapshot of one cached query.
///
/// Data and error are shared behind `Arc`, so cloning a snapshot is cheap
/// and a changed `Arc` pointer means the value was replaced.
#[derive(Debug)]
pub struct CacheEntry<T> {
    pub key: QueryKey,
    pub data: Option<Arc<T>>,
    pub status: QueryStatus,
    pub error: Option<Arc<ProducerError>>,
    /// Monotonic time of the last successful fetch, used for staleness.
    pub last_fetched_at: Option<Instant>,
    /// Wall-clock time of the last successful fetch, for display.
    pub updated_at: Option<DateTime<Utc>>,
    /// A fetch for this key is in flight.
    pub is_fetching: bool,
}

impl<T> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            data: self.data.clone(),
            status: self.status,
            error: self.error.clone(),
            last_fetched_at: self.last_fetched_at,
            updated_at: self.updated_at,
            is_fetching: self.is_fetching,
        }
    }
}

impl<T> CacheEntry<T> {
    pub(crate) fn idle(key: QueryKey) -> Self {
        Self {
            key,
            data: None,
            status: QueryStatus::Idle,
            error: None,
            last_fetched_at: None,
            updated_at: None,
            is_fetching: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().map(ProducerError::message)
    }

    /// Time since the last successful fetch, or `None` if there was none.
    pub fn age(&self) -> Option<Duration> {
        self.last_fetched_at
            .map(|at| Instant::now().saturating_duration_since(at))
    }

    /// Whether data older than `stale_time` should be refetched.
    ///
    /// An entry that has never fetched successfully is always stale.
    pub fn is_stale(&self, stale_time: Duration) -> bool {
        match self.age() {
            Some(age) => age > stale_time,
            None => true,
        }
    }

    pub(crate) fn begin_fetch(&mut self) {
        self.is_fetching = true;
        if self.data.is_none() {
            self.status = QueryStatus::Loading;
        }
    }

    pub(crate) fn commit_success(&mut self, data: T) {
        self.data = Some(Arc::new(data));
        self.status = QueryStatus::Success;
        self.error = None;
        self.last_fetched_at = Some(Instant::now());
        self.updated_at = Some(Utc::now());
        self.is_fetching = false;
    }

    pub(crate) fn commit_error(&mut self, error: ProducerError) {
        self.status = QueryStatus::Error;
        self.error = Some(Arc::new(error));
        self.is_fetching = false;
    }
}
