//! Query bindings between the task source and the query cache.
//!
//! The dashboard reads two keys: `"tasks"` for the table and
//! `"dashboardMetrics"` for the metric cards. Each is wrapped in a
//! [`LiveQuery`] that owns the subscription and the last snapshot the UI
//! rendered, so the UI can pause (drop the subscription) and still draw
//! what it had.

use crate::config::TuiConfig;
use crate::source::TaskSource;
use std::sync::Arc;
use taskboard_cache::{
    from_fn, CacheEntry, CacheError, Producer, QueryCache, QueryKey, QueryOptions, Subscription,
};
use taskboard_core::{DashboardMetrics, Task};
use tracing::debug;

pub const TASKS_KEY: &str = "tasks";
pub const METRICS_KEY: &str = "dashboardMetrics";

pub fn tasks_producer(source: Arc<dyn TaskSource>) -> Arc<dyn Producer<Vec<Task>>> {
    Arc::new(from_fn(move || {
        let source = Arc::clone(&source);
        async move { source.fetch_tasks().await.map_err(Into::into) }
    }))
}

pub fn metrics_producer(source: Arc<dyn TaskSource>) -> Arc<dyn Producer<DashboardMetrics>> {
    Arc::new(from_fn(move || {
        let source = Arc::clone(&source);
        async move { source.fetch_metrics().await.map_err(Into::into) }
    }))
}

/// One cached query as seen by a single consumer.
pub struct LiveQuery<T: Send + Sync + 'static> {
    cache: QueryCache<T>,
    key: QueryKey,
    producer: Arc<dyn Producer<T>>,
    options: QueryOptions,
    subscription: Option<Subscription<T>>,
    snapshot: Option<CacheEntry<T>>,
}

impl<T: Send + Sync + 'static> LiveQuery<T> {
    pub fn new(
        cache: QueryCache<T>,
        key: impl Into<QueryKey>,
        producer: Arc<dyn Producer<T>>,
        options: QueryOptions,
    ) -> Self {
        Self {
            cache,
            key: key.into(),
            producer,
            options,
            subscription: None,
            snapshot: None,
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn options(&self) -> QueryOptions {
        self.options
    }

    pub fn cache(&self) -> &QueryCache<T> {
        &self.cache
    }

    /// Subscribe if not already subscribed.
    pub fn attach(&mut self) -> Result<(), CacheError> {
        if self.subscription.is_some() {
            return Ok(());
        }
        let mut subscription =
            self.cache
                .subscribe_shared(self.key.clone(), Arc::clone(&self.producer), self.options)?;
        self.snapshot = Some(subscription.latest());
        self.subscription = Some(subscription);
        debug!(key = %self.key, "query attached");
        Ok(())
    }

    /// Unsubscribe, keeping the last snapshot for display.
    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            debug!(key = %self.key, "query detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Pull the newest snapshot. Returns true if it changed.
    pub fn sync(&mut self) -> bool {
        match &mut self.subscription {
            Some(subscription) if subscription.has_changed() => {
                self.snapshot = Some(subscription.latest());
                true
            }
            _ => false,
        }
    }

    /// Wait for the next change and store it.
    pub async fn changed(&mut self) -> Result<(), CacheError> {
        let Some(subscription) = self.subscription.as_mut() else {
            return Err(CacheError::UnknownKey(self.key.clone()));
        };
        let entry = subscription.changed().await?;
        self.snapshot = Some(entry);
        Ok(())
    }

    pub fn snapshot(&self) -> Option<&CacheEntry<T>> {
        self.snapshot.as_ref()
    }

    pub fn data(&self) -> Option<&T> {
        self.snapshot.as_ref().and_then(CacheEntry::data)
    }

    /// True until the first fetch settles.
    pub fn is_loading(&self) -> bool {
        self.snapshot
            .as_ref()
            .map_or(true, |entry| entry.data.is_none() && entry.error.is_none())
    }

    pub fn refetch(&self) -> Result<(), CacheError> {
        self.cache.refetch(self.key.clone())
    }

    pub fn invalidate(&self) -> bool {
        self.cache.invalidate(self.key.clone())
    }
}

/// The dashboard's two queries, sharing one task source.
pub struct DashboardQueries {
    pub tasks: LiveQuery<Vec<Task>>,
    pub metrics: LiveQuery<DashboardMetrics>,
}

impl DashboardQueries {
    pub fn new(config: &TuiConfig, source: Arc<dyn TaskSource>) -> Self {
        let cache_config = config.cache_config();
        Self {
            tasks: LiveQuery::new(
                QueryCache::new(cache_config.clone()),
                TASKS_KEY,
                tasks_producer(Arc::clone(&source)),
                config.tasks_query_options(),
            ),
            metrics: LiveQuery::new(
                QueryCache::new(cache_config),
                METRICS_KEY,
                metrics_producer(source),
                config.metrics_query_options(),
            ),
        }
    }

    pub fn attach(&mut self) -> Result<(), CacheError> {
        self.tasks.attach()?;
        self.metrics.attach()
    }

    pub fn detach(&mut self) {
        self.tasks.detach();
        self.metrics.detach();
    }

    /// Pull new snapshots for both queries. Returns true if either changed.
    pub fn sync(&mut self) -> bool {
        let tasks = self.tasks.sync();
        let metrics = self.metrics.sync();
        tasks || metrics
    }

    /// Manual refresh of both keys.
    pub fn refetch_all(&self) -> Result<(), CacheError> {
        self.tasks.refetch()?;
        self.metrics.refetch()
    }

    /// Mark both keys stale after a task was created.
    pub fn invalidate_all(&self) {
        self.tasks.invalidate();
        self.metrics.invalidate();
    }
}
