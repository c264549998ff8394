//! In-memory query cache backed by `DashMap` for concurrent access.

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// A single cached value with its freshness bookkeeping.
struct CacheEntry {
    value: String,
    /// When the value was last written.
    updated_at: Instant,
    /// When the value was last written or read.
    accessed_at: Instant,
    /// Set by `mark_stale`; cleared by the next write.
    expired: bool,
}

/// A cache lookup result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheHit {
    pub value: String,
    /// The entry is older than the stale window and should be refetched
    /// when the source is refetchable.
    pub is_stale: bool,
}

/// Thread-safe query cache keyed by request signature.
///
/// Entries are stored as serialized JSON strings. An entry is *stale* once it
/// is older than `stale_time`; it is still returned, flagged, so the caller can
/// decide whether to refetch. An entry that has not been touched for
/// `gc_time` is evicted lazily on the next lookup.
pub struct MemoryCache {
    store: DashMap<String, CacheEntry>,
    stale_time: Duration,
    gc_time: Duration,
}

impl MemoryCache {
    /// Creates a new cache with the given stale and eviction windows.
    pub fn new(stale_time: Duration, gc_time: Duration) -> Self {
        Self {
            store: DashMap::new(),
            stale_time,
            gc_time,
        }
    }

    /// Returns the cached value for `key`, or `None` if missing or evicted.
    pub fn get(&self, key: &str) -> Option<CacheHit> {
        let mut entry = self.store.get_mut(key)?;
        let now = Instant::now();
        if now.duration_since(entry.accessed_at) > self.gc_time {
            drop(entry);
            self.store.remove(key);
            tracing::debug!("cache evict {}", key);
            return None;
        }
        entry.accessed_at = now;
        Some(CacheHit {
            value: entry.value.clone(),
            is_stale: entry.expired || now.duration_since(entry.updated_at) > self.stale_time,
        })
    }

    /// Inserts or overwrites a cache entry. The entry starts fresh.
    ///
    /// Also sweeps every other entry idle for longer than `gc_time`.
    pub fn set(&self, key: String, value: String) {
        let now = Instant::now();
        let gc_time = self.gc_time;
        self.store
            .retain(|_, e| now.duration_since(e.accessed_at) <= gc_time);
        self.store.insert(
            key,
            CacheEntry {
                value,
                updated_at: now,
                accessed_at: now,
                expired: false,
            },
        );
    }

    /// Flags an entry as stale without dropping its value, so the next
    /// reader refetches but still sees what was cached. Returns whether the
    /// entry existed.
    pub fn mark_stale(&self, key: &str) -> bool {
        match self.store.get_mut(key) {
            Some(mut entry) => {
                entry.expired = true;
                true
            }
            None => false,
        }
    }

    /// Whether a non-evicted entry exists for `key`. Does not count as an access.
    pub fn contains(&self, key: &str) -> bool {
        self.store
            .get(key)
            .map(|e| e.accessed_at.elapsed() <= self.gc_time)
            .unwrap_or(false)
    }

    /// Rewrites every entry whose key starts with `prefix`. `f` returns the
    /// new value, or `None` to leave the entry as it is. Rewritten entries
    /// keep their original write time. Returns how many entries changed.
    pub fn update_matching<F>(&self, prefix: &str, mut f: F) -> usize
    where
        F: FnMut(&str, &str) -> Option<String>,
    {
        let mut updated = 0;
        for mut entry in self.store.iter_mut() {
            if !entry.key().starts_with(prefix) {
                continue;
            }
            let key = entry.key().clone();
            if let Some(next) = f(&key, &entry.value) {
                entry.value = next;
                updated += 1;
            }
        }
        updated
    }

    /// Returns the values of all live entries whose key starts with `prefix`.
    pub fn values_matching(&self, prefix: &str) -> Vec<String> {
        self.store
            .iter()
            .filter(|e| e.key().starts_with(prefix) && e.accessed_at.elapsed() <= self.gc_time)
            .map(|e| e.value.clone())
            .collect()
    }

    /// Removes a single entry.
    pub fn invalidate(&self, key: &str) {
        self.store.remove(key);
    }

    /// Removes every entry whose key starts with `prefix`.
    pub fn invalidate_prefix(&self, prefix: &str) {
        self.store.retain(|k, _| !k.starts_with(prefix));
    }

    /// Removes all entries from the cache.
    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
