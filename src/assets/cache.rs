use std::num::NonZeroUsize;

use lru::LruCache;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Completion marker stored per key. The decoded payload is owned elsewhere.
pub struct Loaded;

/// Capacity-bounded LRU set of completed resource keys.
#[derive(Debug)]
pub struct ResourceCache {
    entries: LruCache<String, Loaded>,
}

impl ResourceCache {
    /// Create a cache holding at most `capacity` keys (a zero capacity is treated as one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Look up `key`, moving it to the most-recently-used position on a hit.
    pub fn get(&mut self, key: &str) -> Option<Loaded> {
        self.entries.get(key).copied()
    }

    /// Membership test that leaves recency untouched.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Insert or refresh `key`. Returns the key evicted to make room, if any.
    pub fn put(&mut self, key: impl Into<String>) -> Option<String> {
        let key = key.into();
        match self.entries.push(key.clone(), Loaded) {
            Some((evicted, _)) if evicted != key => {
                tracing::debug!(evicted = %evicted, inserted = %key, "cache eviction");
                Some(evicted)
            }
            _ => None,
        }
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Keys ordered least-recently-used first.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.entries.iter().rev().map(|(k, _)| k.clone()).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
