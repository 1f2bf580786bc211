//! Time-to-live caches shared by the resolver, discovery and debrid stages.
//!
//! Stores are injected as trait objects so components never reach for
//! process globals. Entries are only ever dropped by [`Sweep::sweep`];
//! reads check validity themselves and treat stale entries as absent.

mod memory;
mod sweeper;
mod types;

pub use memory::MemoryCache;
pub use sweeper::{spawn_sweeper, sweep_all};
pub use types::*;

use std::time::Duration;

/// Key/value store with per-store expiry.
pub trait CacheStore<K, V>: Send + Sync {
    /// Get a value if present and still within the TTL.
    fn get(&self, key: &K) -> Option<V>;

    /// Store a value stamped with the current time.
    fn set(&self, key: K, value: V);

    /// Store a value that is already expired.
    ///
    /// Used for empty lookups: the value is kept for inspection but the
    /// next read misses, so the lookup is retried.
    fn set_expired(&self, key: K, value: V);

    /// Remove a key regardless of its age.
    fn remove(&self, key: &K);

    /// Number of stored entries, including expired ones not yet swept.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Time-to-live applied to entries of this store.
    fn ttl(&self) -> Duration;
}

/// A store that can drop its expired entries.
pub trait Sweep: Send + Sync {
    /// Store name for logging.
    fn name(&self) -> &str;

    /// Remove expired entries, returning how many were removed.
    fn sweep(&self) -> usize;
}
