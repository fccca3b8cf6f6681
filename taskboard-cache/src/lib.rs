//! Taskboard Cache - Polling Query Cache
//!
//! A client-side store that fetches named resources through async
//! producers and keeps consumers informed of every status change.
//!
//! # Design Philosophy
//!
//! Caches that hide their staleness lead to subtle bugs. Every read here is
//! a [`CacheEntry`] snapshot that carries its status, the last error, and
//! when the data was fetched. Consumers say how much staleness they accept
//! through [`QueryOptions::stale_time`]; older data is still served, but a
//! background refetch starts (stale-while-revalidate).
//!
//! Guarantees:
//!
//! - At most one producer call per key is in flight; concurrent subscribers
//!   share it.
//! - The most recently *initiated* fetch wins, whatever order fetches
//!   settle in.
//! - A failed fetch keeps the last good data and never stops polling.
//! - Polling and pending evictions stop once the last subscriber leaves.

pub mod config;
pub mod entry;
pub mod error;
pub mod key;
pub mod producer;
pub mod query_cache;

pub use config::{CacheConfig, CacheStats, QueryOptions};
pub use entry::{CacheEntry, QueryStatus};
pub use error::{CacheError, ProducerError};
pub use key::QueryKey;
pub use producer::{from_fn, FnProducer, Producer};
pub use query_cache::{QueryCache, Subscription, PRODUCER_PANICKED};
