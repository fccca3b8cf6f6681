//! Polling query cache.
//!
//! Entries live in a map guarded by a `std::sync::Mutex` that is only held
//! for synchronous bookkeeping, never across an `.await`. Producers, refetch
//! timers and pending evictions run as spawned Tokio tasks that hold a
//! `Weak` reference back to the cache, so dropping the last
//! [`QueryCache`] handle stops all of them.
//!
//! Every fetch is stamped with a generation drawn from a cache-wide counter.
//! Only the fetch whose generation is recorded on the entry may commit, which
//! makes the most recently *initiated* fetch win regardless of the order in
//! which fetches settle.

use crate::config::{CacheConfig, CacheStats, QueryOptions};
use crate::entry::CacheEntry;
use crate::error::{CacheError, ProducerError};
use crate::key::QueryKey;
use crate::producer::Producer;
use futures_util::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

type SubscriberId = u64;

/// Error stored on an entry whose producer panicked.
pub const PRODUCER_PANICKED: &str = "producer panicked";

/// Client-side store of query results keyed by [`QueryKey`].
///
/// Cloning is cheap; clones share the same entries. Methods that start
/// background work must be called from within a Tokio runtime.
///
/// # Example
///
/// ```ignore
/// let cache = QueryCache::new(CacheConfig::default());
/// let mut tasks = cache.subscribe(
///     "tasks",
///     from_fn(|| async { source.fetch_tasks().await }),
///     QueryOptions::new().with_refetch_interval(Duration::from_secs(5)),
/// )?;
///
/// let entry = tasks.wait_for(|e| !e.is_loading()).await?;
/// ```
pub struct QueryCache<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for QueryCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<T> {
    state: Mutex<State<T>>,
    config: CacheConfig,
}

struct State<T> {
    entries: HashMap<QueryKey, Slot<T>>,
    /// Source of fetch generations, subscriber ids and eviction tokens.
    sequence: u64,
    stats: CacheStats,
}

impl<T> State<T> {
    fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }
}

struct Slot<T> {
    sender: watch::Sender<CacheEntry<T>>,
    producer: Arc<dyn Producer<T>>,
    /// Refetch interval requested by each subscriber.
    subscribers: HashMap<SubscriberId, Duration>,
    in_flight: Option<InFlight>,
    invalidated: bool,
    timer: Option<RefetchTimer>,
    eviction: Option<PendingEviction>,
}

struct InFlight {
    generation: u64,
    handle: JoinHandle<()>,
}

struct RefetchTimer {
    period: Duration,
    handle: JoinHandle<()>,
}

struct PendingEviction {
    token: u64,
    handle: JoinHandle<()>,
}

impl<T> Slot<T> {
    fn new(key: QueryKey, producer: Arc<dyn Producer<T>>) -> Self {
        let (sender, _) = watch::channel(CacheEntry::idle(key));
        Self {
            sender,
            producer,
            subscribers: HashMap::new(),
            in_flight: None,
            invalidated: false,
            timer: None,
            eviction: None,
        }
    }

    fn snapshot(&self) -> CacheEntry<T> {
        self.sender.borrow().clone()
    }

    /// Smallest non-zero interval among subscribers.
    fn polling_period(&self) -> Option<Duration> {
        self.subscribers
            .values()
            .copied()
            .filter(|period| !period.is_zero())
            .min()
    }

    fn abort_all(&mut self) {
        if let Some(fetch) = self.in_flight.take() {
            fetch.handle.abort();
        }
        if let Some(timer) = self.timer.take() {
            timer.handle.abort();
        }
        if let Some(eviction) = self.eviction.take() {
            eviction.handle.abort();
        }
    }
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        for slot in state.entries.values_mut() {
            slot.abort_all();
        }
    }
}

impl<T: Send + Sync + 'static> Inner<T> {
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a fetch for `key`.
    ///
    /// Returns false if the key has no entry, or if a fetch is in flight and
    /// `supersede` is false. With `supersede`, the in-flight fetch is aborted
    /// and its generation retired.
    fn start_fetch(self: &Arc<Self>, state: &mut State<T>, key: &QueryKey, supersede: bool) -> bool {
        let Some(slot) = state.entries.get_mut(key) else {
            return false;
        };
        if let Some(previous) = &slot.in_flight {
            if !supersede {
                return false;
            }
            previous.handle.abort();
            debug!(key = %key, generation = previous.generation, "superseding in-flight fetch");
        }

        state.sequence += 1;
        let generation = state.sequence;
        state.stats.fetches += 1;

        let producer = Arc::clone(&slot.producer);
        let weak = Arc::downgrade(self);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            // A panicking producer still settles the fetch so polling resumes.
            let result = match AssertUnwindSafe(producer.produce()).catch_unwind().await {
                Ok(result) => result,
                Err(_) => Err(ProducerError::new(PRODUCER_PANICKED)),
            };
            if let Some(inner) = weak.upgrade() {
                inner.commit(&task_key, generation, result);
            }
        });

        slot.in_flight = Some(InFlight { generation, handle });
        slot.sender.send_modify(CacheEntry::begin_fetch);
        debug!(key = %key, generation, "fetch started");
        true
    }

    fn commit(&self, key: &QueryKey, generation: u64, result: Result<T, ProducerError>) {
        let mut guard = self.lock();
        let state = &mut *guard;
        let Some(slot) = state.entries.get_mut(key) else {
            debug!(key = %key, generation, "entry evicted, dropping fetch result");
            return;
        };
        if !matches!(&slot.in_flight, Some(fetch) if fetch.generation == generation) {
            state.stats.discarded += 1;
            debug!(key = %key, generation, "dropping superseded fetch result");
            return;
        }
        slot.in_flight = None;

        match result {
            Ok(data) => {
                slot.invalidated = false;
                slot.sender.send_modify(|entry| entry.commit_success(data));
                debug!(key = %key, generation, "fetch committed");
            }
            Err(error) => {
                state.stats.failures += 1;
                warn!(key = %key, generation, error = %error, "producer failed");
                slot.sender.send_modify(|entry| entry.commit_error(error));
            }
        }
    }

    fn scheduled_refetch(self: &Arc<Self>, key: &QueryKey) {
        let mut guard = self.lock();
        if !self.start_fetch(&mut guard, key, false) {
            trace!(key = %key, "scheduled refetch skipped, fetch already in flight");
        }
    }

    /// Align the refetch timer with the current subscribers' intervals.
    fn reschedule_timer(self: &Arc<Self>, slot: &mut Slot<T>, key: &QueryKey) {
        let period = slot.polling_period();
        if let (Some(period), Some(timer)) = (period, &slot.timer) {
            if timer.period == period {
                return;
            }
        }
        if let Some(timer) = slot.timer.take() {
            timer.handle.abort();
            debug!(key = %key, "refetch timer cancelled");
        }
        let Some(period) = period else {
            return;
        };

        let weak = Arc::downgrade(self);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                inner.scheduled_refetch(&task_key);
            }
        });
        slot.timer = Some(RefetchTimer { period, handle });
        debug!(key = %key, period_ms = period.as_millis() as u64, "refetch timer scheduled");
    }

    fn unsubscribe(self: &Arc<Self>, key: &QueryKey, id: SubscriberId) {
        let mut guard = self.lock();
        let state = &mut *guard;
        let token = state.next_sequence();
        let Some(slot) = state.entries.get_mut(key) else {
            return;
        };
        if slot.subscribers.remove(&id).is_none() {
            return;
        }
        self.reschedule_timer(slot, key);
        if !slot.subscribers.is_empty() {
            return;
        }

        let gc_time = self.config.gc_time;
        if gc_time.is_zero() {
            state.entries.remove(key);
            state.stats.evictions += 1;
            debug!(key = %key, "entry evicted");
            return;
        }

        let weak = Arc::downgrade(self);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(gc_time).await;
            if let Some(inner) = weak.upgrade() {
                inner.collect(&task_key, token);
            }
        });
        slot.eviction = Some(PendingEviction { token, handle });
        trace!(key = %key, gc_ms = gc_time.as_millis() as u64, "eviction scheduled");
    }

    fn collect(&self, key: &QueryKey, token: u64) {
        let mut guard = self.lock();
        let state = &mut *guard;
        let expired = state.entries.get(key).is_some_and(|slot| {
            slot.subscribers.is_empty()
                && slot.eviction.as_ref().map(|e| e.token) == Some(token)
        });
        if expired {
            state.entries.remove(key);
            state.stats.evictions += 1;
            debug!(key = %key, "entry evicted");
        }
    }
}

impl<T: Send + Sync + 'static> QueryCache<T> {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    entries: HashMap::new(),
                    sequence: 0,
                    stats: CacheStats::default(),
                }),
                config,
            }),
        }
    }

    /// Create a cache with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(CacheConfig::default())
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    /// Subscribe to `key`, fetching through `producer` when needed.
    ///
    /// - No entry: one is created in `Loading` and the producer is invoked.
    /// - Fetch in flight: the subscriber joins it; no second call is made.
    /// - Entry fresh (age <= `stale_time`): returned as is.
    /// - Entry stale: returned as is while a background refetch starts.
    ///
    /// The latest subscriber's producer is used for later fetches of `key`.
    pub fn subscribe<K, P>(
        &self,
        key: K,
        producer: P,
        options: QueryOptions,
    ) -> Result<Subscription<T>, CacheError>
    where
        K: Into<QueryKey>,
        P: Producer<T> + 'static,
    {
        self.subscribe_shared(key, Arc::new(producer), options)
    }

    /// Like [`subscribe`](Self::subscribe) with an already shared producer.
    pub fn subscribe_shared<K>(
        &self,
        key: K,
        producer: Arc<dyn Producer<T>>,
        options: QueryOptions,
    ) -> Result<Subscription<T>, CacheError>
    where
        K: Into<QueryKey>,
    {
        let key = key.into();
        key.validate()?;

        let mut guard = self.inner.lock();
        let state = &mut *guard;
        let id = state.next_sequence();

        let (receiver, needs_fetch) = match state.entries.get_mut(&key) {
            Some(slot) => {
                if let Some(eviction) = slot.eviction.take() {
                    eviction.handle.abort();
                }
                slot.producer = producer;
                slot.subscribers.insert(id, options.refetch_interval);
                let receiver = slot.sender.subscribe();

                let entry = slot.snapshot();
                let needs_fetch = if slot.in_flight.is_some() {
                    state.stats.deduplicated += 1;
                    trace!(key = %key, "joined in-flight fetch");
                    false
                } else if slot.invalidated || entry.is_stale(options.stale_time) {
                    if entry.data.is_some() {
                        state.stats.stale_hits += 1;
                    } else {
                        state.stats.misses += 1;
                    }
                    true
                } else {
                    state.stats.hits += 1;
                    false
                };
                (receiver, needs_fetch)
            }
            None => {
                state.stats.misses += 1;
                let mut slot = Slot::new(key.clone(), producer);
                slot.subscribers.insert(id, options.refetch_interval);
                let receiver = slot.sender.subscribe();
                state.entries.insert(key.clone(), slot);
                (receiver, true)
            }
        };

        if needs_fetch {
            self.inner.start_fetch(state, &key, false);
        }
        if let Some(slot) = state.entries.get_mut(&key) {
            self.inner.reschedule_timer(slot, &key);
        }

        Ok(Subscription {
            inner: Arc::downgrade(&self.inner),
            key,
            id,
            receiver,
            active: true,
        })
    }

    /// Snapshot of the entry for `key`, if one exists.
    pub fn get_entry<K: Into<QueryKey>>(&self, key: K) -> Option<CacheEntry<T>> {
        let key = key.into();
        self.inner.lock().entries.get(&key).map(Slot::snapshot)
    }

    /// Start a fresh fetch for `key`, superseding any fetch in flight.
    pub fn refetch<K: Into<QueryKey>>(&self, key: K) -> Result<(), CacheError> {
        let key = key.into();
        let mut guard = self.inner.lock();
        if !guard.entries.contains_key(&key) {
            return Err(CacheError::UnknownKey(key));
        }
        self.inner.start_fetch(&mut guard, &key, true);
        Ok(())
    }

    /// Mark `key` stale. Subscribed keys refetch right away.
    ///
    /// Returns false if there is no entry for `key`.
    pub fn invalidate<K: Into<QueryKey>>(&self, key: K) -> bool {
        let key = key.into();
        let mut guard = self.inner.lock();
        let state = &mut *guard;
        let Some(slot) = state.entries.get_mut(&key) else {
            return false;
        };
        slot.invalidated = true;
        let subscribed = !slot.subscribers.is_empty();
        debug!(key = %key, subscribed, "entry invalidated");
        if subscribed {
            self.inner.start_fetch(state, &key, false);
        }
        true
    }

    /// Drop every entry and cancel all timers, evictions and fetches.
    pub fn clear(&self) {
        let mut guard = self.inner.lock();
        for (_, mut slot) in guard.entries.drain() {
            slot.abort_all();
        }
        debug!("query cache cleared");
    }

    pub fn subscriber_count<K: Into<QueryKey>>(&self, key: K) -> usize {
        let key = key.into();
        self.inner
            .lock()
            .entries
            .get(&key)
            .map_or(0, |slot| slot.subscribers.len())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.inner.lock();
        CacheStats {
            entry_count: state.entries.len() as u64,
            ..state.stats.clone()
        }
    }
}

/// Live handle on one cache entry.
///
/// Every status, data or error change is published to the handle as soon
/// as the cache applies it. Dropping the handle unsubscribes.
pub struct Subscription<T: Send + Sync + 'static> {
    inner: Weak<Inner<T>>,
    key: QueryKey,
    id: SubscriberId,
    receiver: watch::Receiver<CacheEntry<T>>,
    active: bool,
}

impl<T: Send + Sync + 'static> Subscription<T> {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Current snapshot, without marking it seen.
    pub fn current(&self) -> CacheEntry<T> {
        self.receiver.borrow().clone()
    }

    /// Current snapshot, marking it seen.
    pub fn latest(&mut self) -> CacheEntry<T> {
        self.receiver.borrow_and_update().clone()
    }

    /// Whether a change has been published since the last seen snapshot.
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Wait for the next change and return the new snapshot.
    pub async fn changed(&mut self) -> Result<CacheEntry<T>, CacheError> {
        if self.receiver.changed().await.is_err() {
            return Err(CacheError::Closed(self.key.clone()));
        }
        Ok(self.receiver.borrow_and_update().clone())
    }

    /// Wait until `predicate` holds for the entry.
    pub async fn wait_for<F>(&mut self, predicate: F) -> Result<CacheEntry<T>, CacheError>
    where
        F: FnMut(&CacheEntry<T>) -> bool,
    {
        match self.receiver.wait_for(predicate).await {
            Ok(entry) => Ok(entry.clone()),
            Err(_) => Err(CacheError::Closed(self.key.clone())),
        }
    }

    /// Remove this consumer's interest in the key.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(inner) = self.inner.upgrade() {
            inner.unsubscribe(&self.key, self.id);
        }
    }
}

impl<T: Send + Sync + 'static> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.release();
    }
}
