//! Cache entry types and validity rules.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cached value plus the moment it was stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    pub value: V,
    pub stored_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    /// Entry stamped with the current time.
    pub fn new(value: V) -> Self {
        Self {
            value,
            stored_at: Utc::now(),
        }
    }

    /// Entry stamped at the Unix epoch, so it is never valid for any TTL.
    pub fn expired(value: V) -> Self {
        Self {
            value,
            stored_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// Whether an entry is still valid at `now` under the given TTL.
///
/// Valid iff `now - stored_at < ttl`.
pub fn is_valid<V>(entry: &CacheEntry<V>, ttl: Duration, now: DateTime<Utc>) -> bool {
    let age = now.signed_duration_since(entry.stored_at);
    match chrono::Duration::from_std(ttl) {
        Ok(ttl) => age < ttl,
        // TTL too large to represent: never expires.
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_entry_is_valid() {
        let entry = CacheEntry::new("value");
        assert!(is_valid(&entry, Duration::from_secs(60), Utc::now()));
    }

    #[test]
    fn test_entry_expires_at_ttl_boundary() {
        let stored_at = Utc::now();
        let entry = CacheEntry {
            value: 1,
            stored_at,
        };
        let ttl = Duration::from_secs(30);

        let just_before = stored_at + chrono::Duration::seconds(29);
        let exactly = stored_at + chrono::Duration::seconds(30);

        assert!(is_valid(&entry, ttl, just_before));
        assert!(!is_valid(&entry, ttl, exactly));
    }

    #[test]
    fn test_expired_entry_is_never_valid() {
        let entry = CacheEntry::expired(vec![1, 2, 3]);
        assert!(!is_valid(&entry, Duration::from_secs(24 * 3600), Utc::now()));
    }
}
