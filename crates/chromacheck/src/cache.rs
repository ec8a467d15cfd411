//! Bounded memoization for derived color quantities.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use lru::LruCache;

use crate::color::{Hsl, ParsedColor};
use crate::Float;

/// The default capacity of the parse cache. It is the largest of the four
/// caches because authored color strings vastly outnumber distinct derived
/// quantities.
pub(crate) const PARSE_CAPACITY: usize = 512;

/// The default capacity of the conversion, luminance, and contrast caches.
pub(crate) const DERIVED_CAPACITY: usize = 256;

// ====================================================================================================================

/// Point-in-time statistics for a single cache.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CacheStats {
    /// The current number of entries.
    pub size: usize,
    /// The maximum number of entries.
    pub capacity: usize,
    /// The fill fraction, i.e., size over capacity.
    pub utilization: Float,
}

// ====================================================================================================================

/// A bounded cache with least-recently-used eviction.
///
/// This type is a thin wrapper around [`lru::LruCache`] that pins down the
/// memoization contract: [`get`](Self::get) and [`set`](Self::set) promote
/// the touched entry to most recently used, whereas [`has`](Self::has) is a
/// pure membership test that leaves the recency order alone. At capacity,
/// `set` with a novel key evicts exactly the least recently used entry.
pub struct BoundedCache<K: Hash + Eq, V> {
    entries: LruCache<K, V>,
}

impl<K: Hash + Eq, V> std::fmt::Debug for BoundedCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<K: Hash + Eq, V> BoundedCache<K, V> {
    /// Instantiate a new cache holding at most `capacity` entries. A zero
    /// capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Look up the value for the key, promoting its entry to most recently
    /// used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert or update the entry for the key and promote it to most
    /// recently used. If the key is novel and the cache is at capacity, the
    /// least recently used entry is evicted first.
    pub fn set(&mut self, key: K, value: V) {
        self.entries.put(key, value);
    }

    /// Determine whether the cache has an entry for the key, without touching
    /// the recency order.
    pub fn has(&self, key: &K) -> bool {
        self.entries.contains(key)
    }

    /// Evict all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Determine whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Take a snapshot of this cache's statistics.
    pub fn stats(&self) -> CacheStats {
        let size = self.len();
        let capacity = self.capacity();

        CacheStats {
            size,
            capacity,
            utilization: size as Float / capacity as Float,
        }
    }
}

// ====================================================================================================================

/// Lock the cache, recovering the guard if another thread panicked while
/// holding it. Cached entries are idempotent derivations, so a poisoned
/// cache is still coherent.
pub(crate) fn lock<K: Hash + Eq, V>(
    cache: &Mutex<BoundedCache<K, V>>,
) -> MutexGuard<'_, BoundedCache<K, V>> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The four named caches backing a contrast engine, one per computation
/// kind.
///
/// Each cache sits behind its own mutex, so a lookup in one kind never
/// blocks on a computation of another. Locks are held only for the lookup or
/// insertion itself, never across a computation; concurrent callers may
/// redundantly compute the same key and idempotently overwrite each other.
#[derive(Debug)]
pub(crate) struct EngineCaches {
    /// Normalized color string to parse outcome. Failed parses are cached
    /// too, so repeated malformed input stays cheap.
    pub(crate) parse: Mutex<BoundedCache<String, Option<ParsedColor>>>,
    /// Opaque RGB coordinates to their HSL reading.
    pub(crate) conversion: Mutex<BoundedCache<[u8; 3], Hsl>>,
    /// Opaque RGB coordinates to relative luminance.
    pub(crate) luminance: Mutex<BoundedCache<[u8; 3], Float>>,
    /// Ordered pair of opaque RGB coordinates to contrast ratio.
    pub(crate) contrast: Mutex<BoundedCache<([u8; 3], [u8; 3]), Float>>,
}

impl EngineCaches {
    pub(crate) fn new() -> Self {
        Self::with_capacities(PARSE_CAPACITY, DERIVED_CAPACITY, DERIVED_CAPACITY, DERIVED_CAPACITY)
    }

    pub(crate) fn with_capacities(
        parse: usize,
        conversion: usize,
        luminance: usize,
        contrast: usize,
    ) -> Self {
        Self {
            parse: Mutex::new(BoundedCache::new(parse)),
            conversion: Mutex::new(BoundedCache::new(conversion)),
            luminance: Mutex::new(BoundedCache::new(luminance)),
            contrast: Mutex::new(BoundedCache::new(contrast)),
        }
    }

    /// Evict all entries from all four caches.
    pub(crate) fn clear(&self) {
        lock(&self.parse).clear();
        lock(&self.conversion).clear();
        lock(&self.luminance).clear();
        lock(&self.contrast).clear();
    }
}

// ====================================================================================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut cache = BoundedCache::new(4);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"one"), None);

        cache.set("one", 1);
        cache.set("two", 2);
        assert_eq!(cache.get(&"one"), Some(&1));
        assert_eq!(cache.get(&"two"), Some(&2));
        assert_eq!(cache.len(), 2);

        // An update replaces the value without growing the cache.
        cache.set("one", 11);
        assert_eq!(cache.get(&"one"), Some(&11));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_eviction_is_least_recently_used() {
        let mut cache = BoundedCache::new(2);
        cache.set("one", 1);
        cache.set("two", 2);

        // Touching "one" makes "two" the eviction candidate.
        assert_eq!(cache.get(&"one"), Some(&1));
        cache.set("three", 3);

        assert_eq!(cache.len(), 2);
        assert!(cache.has(&"one"));
        assert!(!cache.has(&"two"));
        assert!(cache.has(&"three"));
    }

    #[test]
    fn test_has_does_not_promote() {
        let mut cache = BoundedCache::new(2);
        cache.set("one", 1);
        cache.set("two", 2);

        // Unlike get, has must not protect "one" from eviction.
        assert!(cache.has(&"one"));
        cache.set("three", 3);

        assert!(!cache.has(&"one"));
        assert!(cache.has(&"two"));
        assert!(cache.has(&"three"));
    }

    #[test]
    fn test_clear_and_stats() {
        let mut cache = BoundedCache::new(4);
        cache.set(1, 1.0);
        cache.set(2, 2.0);

        let stats = cache.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.capacity, 4);
        assert_eq!(stats.utilization, 0.5);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().utilization, 0.0);
    }

    #[test]
    fn test_zero_capacity_is_bumped() {
        let mut cache = BoundedCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.set("only", 1);
        cache.set("other", 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_engine_caches_clear() {
        let caches = EngineCaches::with_capacities(4, 4, 4, 4);
        lock(&caches.parse).set("red".to_string(), None);
        lock(&caches.luminance).set([255, 0, 0], 0.2126);

        caches.clear();
        assert!(lock(&caches.parse).is_empty());
        assert!(lock(&caches.luminance).is_empty());
    }
}
