//! # lodecache
//!
//! Pluggable key-value cache engine.
//!
//! ## Architecture
//! - **LinkedSlab**: arena-backed doubly linked list, slot indices instead of pointers
//! - **FIFO / LRU**: AHash index over the list, O(1) get/put/remove
//! - **TimeAware**: LRU plus a write timestamp per key
//! - **ObservableCache**: stale-policy eviction loop and listener fan-out around any cache
//! - **Listeners**: broadcast, aggregate stats, per-key stats
//!
//! Caches are single-threaded: every operation, eviction and notification runs
//! to completion on the calling thread. Stale entries are only evicted as a
//! side effect of `put` (and of `get`, for read-time policies).

#![warn(missing_docs)]

mod builder;
mod clock;
mod error;
mod fifo;
mod list;
mod lru;
mod observable;
mod policy;
mod time_aware;
mod traits;

pub mod listener;

pub use builder::{CacheBuilder, DynCache, Strategy};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use fifo::FifoCache;
pub use list::{Iter, LinkedSlab, SlotId};
pub use listener::{BroadcastListener, CacheListener, KeyStatsListener, StatsListener};
pub use lru::LruCache;
pub use observable::ObservableCache;
pub use policy::{CapacityPolicy, ExpirePolicy, FnPolicy, NeverStale, StalePolicy};
pub use time_aware::TimeAwareCache;
pub use traits::{Cache, EldestEntry};
