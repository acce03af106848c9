//! TTL store for resolved lookups.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::clock::Clock;

/// A resolved lookup: the id on the other platform, or `None` for a verified
/// not-found. Absence is cached like any other answer.
pub(crate) type CachedLookup = Option<u64>;

struct CacheEntry {
    value: CachedLookup,
    expires_at: Instant,
}

/// Keyed store with per-entry deadlines and passive expiry.
///
/// Expired entries read as absent but stay in the map until the same key is
/// written again; there is no background sweep.
pub(crate) struct LookupCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl LookupCache {
    pub(crate) fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// Look up a live entry. Expired entries read as absent.
    pub(crate) fn get(&self, key: &str) -> Option<CachedLookup> {
        let entry = self.entries.get(key)?;
        if entry.expires_at <= self.clock.now() {
            return None;
        }
        Some(entry.value)
    }

    /// Store `value` under `key`, replacing any previous entry wholesale.
    pub(crate) fn set(&self, key: String, value: CachedLookup) {
        let expires_at = self.clock.now() + self.ttl;
        self.entries.insert(key, CacheEntry { value, expires_at });
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}
