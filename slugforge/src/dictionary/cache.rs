//! N-way LRU cache of filtered dictionary views.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;

use crate::dictionary::FilteredDictionary;

const WAYS: usize = 16;
const WAY_SIZE: usize = 1024;

/// A striped LRU cache keyed by the selector's 64-bit hash. Each way is
/// protected by its own mutex, so concurrent readers only contend when their
/// keys collide on a way.
pub(crate) struct FilteredViewCache {
    ways: Vec<Mutex<LruCache<u64, Arc<FilteredDictionary>>>>,
}

impl FilteredViewCache {
    pub(crate) fn new() -> Self {
        // WAY_SIZE is a nonzero constant.
        let way_size = NonZeroUsize::new(WAY_SIZE).unwrap();
        let ways = (0..WAYS)
            .map(|_| Mutex::new(LruCache::new(way_size)))
            .collect();
        Self { ways }
    }

    fn way(&self, key: u64) -> &Mutex<LruCache<u64, Arc<FilteredDictionary>>> {
        &self.ways[(key % self.ways.len() as u64) as usize]
    }

    /// Returns the cached view for `key`, computing and inserting it on a
    /// miss. The view is computed outside the lock; when two callers race on
    /// the same key, the last insertion wins and the values are equivalent.
    pub(crate) fn get_or_insert<F>(&self, key: u64, compute: F) -> Arc<FilteredDictionary>
    where
        F: FnOnce() -> Arc<FilteredDictionary>,
    {
        {
            let mut way = self.way(key).lock().unwrap();
            if let Some(cached) = way.get(&key) {
                return Arc::clone(cached);
            }
        }
        let view = compute();
        let mut way = self.way(key).lock().unwrap();
        way.put(key, Arc::clone(&view));
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::pattern::placeholder::CaseType;

    fn view(max_length: usize) -> Arc<FilteredDictionary> {
        Arc::new(FilteredDictionary::new(
            Arc::new(vec![]),
            CaseType::Lower,
            vec![],
            max_length,
        ))
    }

    #[test]
    fn caches_computed_views() {
        let cache = FilteredViewCache::new();
        let first = cache.get_or_insert(42, || view(1));
        let second = cache.get_or_insert(42, || view(2));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.max_length(), 1);
    }

    #[test]
    fn distinct_keys_compute_distinct_views() {
        let cache = FilteredViewCache::new();
        let first = cache.get_or_insert(1, || view(1));
        let second = cache.get_or_insert(2, || view(2));
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
