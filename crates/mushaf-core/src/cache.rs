//! Two-level memo cache for work that variants repeat
//!
//! - L1: a small hot map, evicting the entry stored longest ago
//! - L2: a larger LRU behind it; L2 hits are promoted back into L1
//!
//! Variants built from the same script and font usually need the same
//! subset plan, so the subsetter keeps one of these keyed by
//! [`SubsetCacheKey`]. Caching never changes a result, only how fast it
//! arrives.

use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::hash::Hash;
use std::num::NonZeroUsize;

use crate::script::FontId;

/// Subset plans are identified by font and closure contents
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct SubsetCacheKey {
    pub font: FontId,
    pub closure_hash: u64,
}

#[derive(Debug, Clone)]
struct Slot<V> {
    value: V,
    stored_at: u64,
    hits: u32,
}

/// Small hot map
pub struct L1Cache<K: Hash + Eq + Clone, V: Clone> {
    slots: RwLock<HashMap<K, Slot<V>>>,
    clock: Mutex<u64>,
    max_size: usize,
}

impl<K: Hash + Eq + Clone, V: Clone> L1Cache<K, V> {
    pub fn new(max_size: usize) -> Self {
        Self {
            slots: RwLock::new(HashMap::with_capacity(max_size)),
            clock: Mutex::new(0),
            max_size: max_size.max(1),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let mut slots = self.slots.write();
        slots.get_mut(key).map(|slot| {
            slot.hits += 1;
            slot.value.clone()
        })
    }

    pub fn insert(&self, key: K, value: V) {
        let stored_at = {
            let mut clock = self.clock.lock();
            *clock += 1;
            *clock
        };

        let mut slots = self.slots.write();
        if slots.len() >= self.max_size && !slots.contains_key(&key) {
            let oldest = slots
                .iter()
                .min_by_key(|(_, slot)| slot.stored_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                slots.remove(&oldest);
            }
        }

        slots.insert(
            key,
            Slot {
                value,
                stored_at,
                hits: 0,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    pub fn clear(&self) {
        self.slots.write().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let slots = self.slots.read();
        CacheStats {
            size: slots.len(),
            capacity: self.max_size,
            total_hits: slots.values().map(|slot| slot.hits).sum(),
        }
    }
}

const DEFAULT_L2_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
    Some(v) => v,
    None => unreachable!(),
};

/// LRU backing store
pub struct L2Cache<K: Hash + Eq + Clone, V: Clone> {
    lru: Mutex<LruCache<K, Slot<V>>>,
    capacity: NonZeroUsize,
}

impl<K: Hash + Eq + Clone, V: Clone> L2Cache<K, V> {
    /// A zero capacity falls back to the default
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(DEFAULT_L2_CAPACITY);
        Self {
            lru: Mutex::new(LruCache::new(capacity)),
            capacity,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let mut lru = self.lru.lock();
        lru.get_mut(key).map(|slot| {
            slot.hits += 1;
            slot.value.clone()
        })
    }

    pub fn insert(&self, key: K, value: V) {
        self.lru.lock().put(
            key,
            Slot {
                value,
                stored_at: 0,
                hits: 0,
            },
        );
    }

    pub fn clear(&self) {
        self.lru.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let lru = self.lru.lock();
        CacheStats {
            size: lru.len(),
            capacity: self.capacity.get(),
            total_hits: lru.iter().map(|(_, slot)| slot.hits).sum(),
        }
    }
}

/// L1 in front of L2, with request counters
pub struct MultiLevelCache<K: Hash + Eq + Clone, V: Clone> {
    l1: L1Cache<K, V>,
    l2: L2Cache<K, V>,
    metrics: Mutex<CacheMetrics>,
}

impl<K: Hash + Eq + Clone, V: Clone> MultiLevelCache<K, V> {
    pub fn new(l1_size: usize, l2_size: usize) -> Self {
        Self {
            l1: L1Cache::new(l1_size),
            l2: L2Cache::new(l2_size),
            metrics: Mutex::new(CacheMetrics::default()),
        }
    }

    /// L1 first, then L2 with promotion
    pub fn get(&self, key: &K) -> Option<V> {
        let found = if let Some(value) = self.l1.get(key) {
            self.metrics.lock().l1_hits += 1;
            Some(value)
        } else if let Some(value) = self.l2.get(key) {
            self.metrics.lock().l2_hits += 1;
            self.l1.insert(key.clone(), value.clone());
            Some(value)
        } else {
            self.metrics.lock().misses += 1;
            None
        };
        self.metrics.lock().total_requests += 1;
        found
    }

    pub fn insert(&self, key: K, value: V) {
        self.l1.insert(key.clone(), value.clone());
        self.l2.insert(key, value);
    }

    /// Return the cached value or compute, store and return it
    ///
    /// Errors are returned as-is and never cached.
    pub fn get_or_try_insert<E>(&self, key: K, compute: impl FnOnce() -> Result<V, E>) -> Result<V, E> {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = compute()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    pub fn clear(&self) {
        self.l1.clear();
        self.l2.clear();
    }

    pub fn metrics(&self) -> CacheMetrics {
        self.metrics.lock().clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub total_hits: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheMetrics {
    pub total_requests: u64,
    pub l1_hits: u64,
    pub l2_hits: u64,
    pub misses: u64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            (self.l1_hits + self.l2_hits) as f64 / self.total_requests as f64
        }
    }
}
