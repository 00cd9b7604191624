//! Cache region that never stores anything.

use crate::cache::{CacheKey, CacheResult, RecordCache};

/// Cache used when caching is switched off; every read is a miss.
#[derive(Debug, Clone, Copy)]
pub struct DisabledCache {
    region: &'static str,
}

impl DisabledCache {
    /// Creates a disabled region.
    #[must_use]
    pub const fn new(region: &'static str) -> Self {
        Self { region }
    }
}

impl<V> RecordCache<V> for DisabledCache {
    fn region(&self) -> &'static str {
        self.region
    }

    fn get(&self, _key: CacheKey) -> CacheResult<Option<V>> {
        Ok(None)
    }

    fn put(&self, _key: CacheKey, _value: V) -> CacheResult<()> {
        Ok(())
    }

    fn put_if_current(&self, _key: CacheKey, _value: V, _generation: u64) -> CacheResult<bool> {
        Ok(false)
    }

    fn generation(&self) -> CacheResult<u64> {
        Ok(0)
    }

    fn invalidate(&self, _key: CacheKey) -> CacheResult<()> {
        Ok(())
    }

    fn invalidate_all(&self) -> CacheResult<()> {
        Ok(())
    }
}
