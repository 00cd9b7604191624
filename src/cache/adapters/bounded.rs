//! Bounded in-process cache region backed by an LRU map.

use crate::cache::{CacheError, CacheKey, CacheResult, RecordCache};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
struct Region<V> {
    entries: LruCache<CacheKey, V>,
    generation: u64,
}

impl<V> Region<V> {
    const fn advance(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

/// Thread-safe least-recently-used cache region.
#[derive(Debug)]
pub struct LruRecordCache<V> {
    region: &'static str,
    state: Mutex<Region<V>>,
}

impl<V> LruRecordCache<V> {
    /// Creates an empty region holding at most `capacity` entries.
    #[must_use]
    pub fn new(region: &'static str, capacity: NonZeroUsize) -> Self {
        Self {
            region,
            state: Mutex::new(Region {
                entries: LruCache::new(capacity),
                generation: 0,
            }),
        }
    }

    /// Returns the number of cached entries.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when the region lock is poisoned.
    pub fn len(&self) -> CacheResult<usize> {
        Ok(self.lock()?.entries.len())
    }

    /// Returns whether the region is empty.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when the region lock is poisoned.
    pub fn is_empty(&self) -> CacheResult<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> CacheResult<MutexGuard<'_, Region<V>>> {
        self.state
            .lock()
            .map_err(|_| CacheError::Poisoned(self.region))
    }
}

impl<V> RecordCache<V> for LruRecordCache<V>
where
    V: Clone + Send,
{
    fn region(&self) -> &'static str {
        self.region
    }

    fn get(&self, key: CacheKey) -> CacheResult<Option<V>> {
        Ok(self.lock()?.entries.get(&key).cloned())
    }

    fn put(&self, key: CacheKey, value: V) -> CacheResult<()> {
        self.lock()?.entries.put(key, value);
        Ok(())
    }

    fn put_if_current(&self, key: CacheKey, value: V, generation: u64) -> CacheResult<bool> {
        let mut state = self.lock()?;
        if state.generation != generation {
            return Ok(false);
        }
        state.entries.put(key, value);
        Ok(true)
    }

    fn generation(&self) -> CacheResult<u64> {
        Ok(self.lock()?.generation)
    }

    fn invalidate(&self, key: CacheKey) -> CacheResult<()> {
        let mut state = self.lock()?;
        state.entries.pop(&key);
        state.advance();
        Ok(())
    }

    fn invalidate_all(&self) -> CacheResult<()> {
        let mut state = self.lock()?;
        state.entries.clear();
        state.advance();
        Ok(())
    }
}
