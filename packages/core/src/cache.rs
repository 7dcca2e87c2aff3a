//! Keyed in-memory TTL cache for upstream response payloads.
//!
//! One `TtlCache` instance exists per resource kind (movie detail,
//! trending list), each with its own TTL. Instances are constructed in
//! `main` and shared as `Arc<tokio::sync::Mutex<TtlCache<T>>>` — the
//! mutex is the mutual-exclusion discipline required because Axum
//! handlers run on a multi-threaded runtime.
//!
//! Entries are only ever replaced wholesale by a refresh; there is no
//! eviction and no capacity bound. The key space (movie ids plus two
//! time windows) is naturally bounded in practice, not formally capped.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::models::TimeWindow;

/// Cache key for a single-movie detail response.
pub fn movie_key(id: u64) -> String {
    format!("movie-{}", id)
}

/// Cache key for a trending-list response.
pub fn trending_key(window: TimeWindow) -> String {
    format!("trending-{}", window.as_str())
}

/// A cached payload and the instant it was fetched from upstream.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    payload: T,
    fetched_at: Instant,
}

impl<T> CacheEntry<T> {
    pub fn fetched_at(&self) -> Instant {
        self.fetched_at
    }
}

/// In-memory TTL cache mapping derived string keys to response payloads.
#[derive(Debug)]
pub struct TtlCache<T: Clone> {
    entries: HashMap<String, CacheEntry<T>>,
    ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the entry for `key` regardless of age. Callers that use
    /// this directly must check freshness themselves via [`Self::is_fresh`].
    pub fn get(&self, key: &str) -> Option<&CacheEntry<T>> {
        self.entries.get(key)
    }

    /// Returns a clone of the payload only when the entry is still fresh.
    /// A stale entry is a miss; it stays in place until overwritten.
    pub fn get_fresh(&self, key: &str) -> Option<T> {
        self.entries
            .get(key)
            .filter(|entry| self.is_fresh(entry))
            .map(|entry| entry.payload.clone())
    }

    /// Unconditionally insert or overwrite the entry for `key`,
    /// stamped with the current instant.
    pub fn put(&mut self, key: String, payload: T) {
        self.put_at(key, payload, Instant::now());
    }

    /// Insert with an explicit fetch timestamp. Exists so tests can
    /// exercise expiry without sleeping.
    pub fn put_at(&mut self, key: String, payload: T, fetched_at: Instant) {
        self.entries.insert(key, CacheEntry { payload, fetched_at });
    }

    /// Freshness check: strictly `age < ttl`. An entry exactly at the
    /// TTL boundary is stale and must be treated as a miss.
    pub fn is_fresh(&self, entry: &CacheEntry<T>) -> bool {
        entry.fetched_at.elapsed() < self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
