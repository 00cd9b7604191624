//! Read-through record cache.
//!
//! The cache is a transient, best-effort copy of stored records. It is never
//! the source of truth: reads populate it on a miss, and every mutation
//! invalidates the affected entry instead of updating it in place.
//!
//! Entries are addressed by [`CacheKey`], which can only be built from a
//! record's numeric identifier. Request payloads therefore cannot be used as
//! cache keys, and every invalidating call has to pass the bare id.

pub mod adapters;

use crate::content::domain::MessageId;
use crate::error::{Classify, ErrorKind};
use crate::registration::domain::GuildId;
use std::fmt;
use std::future::Future;
use thiserror::Error;

/// Bare numeric key of a cached record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(i64);

impl CacheKey {
    /// Returns the raw key value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<GuildId> for CacheKey {
    fn from(id: GuildId) -> Self {
        Self(id.value())
    }
}

impl From<MessageId> for CacheKey {
    fn from(id: MessageId) -> Self {
        Self(id.value())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors returned by cache adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    /// The cache region's internal lock was poisoned by a panicking holder.
    #[error("cache region '{0}' is poisoned")]
    Poisoned(&'static str),
}

impl Classify for CacheError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Internal
    }
}

/// Keyed record cache contract.
///
/// One instance backs one cache region (one record kind).
pub trait RecordCache<V>: Send + Sync {
    /// Returns the region name used in diagnostics.
    fn region(&self) -> &'static str;

    /// Returns the cached value for `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backing store is unusable.
    fn get(&self, key: CacheKey) -> CacheResult<Option<V>>;

    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backing store is unusable.
    fn put(&self, key: CacheKey, value: V) -> CacheResult<()>;

    /// Stores `value` under `key` unless the region was invalidated after
    /// `generation` was read. Returns whether the value was stored.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backing store is unusable.
    fn put_if_current(&self, key: CacheKey, value: V, generation: u64) -> CacheResult<bool>;

    /// Returns the region's invalidation counter.
    ///
    /// Every [`RecordCache::invalidate`] and [`RecordCache::invalidate_all`]
    /// advances it.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backing store is unusable.
    fn generation(&self) -> CacheResult<u64>;

    /// Drops the entry for `key`. Missing entries are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backing store is unusable.
    fn invalidate(&self, key: CacheKey) -> CacheResult<()>;

    /// Drops every entry in the region.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backing store is unusable.
    fn invalidate_all(&self) -> CacheResult<()>;
}

/// Returns the cached value for `key`, or runs `loader` and caches its result.
///
/// Loader failures are returned unchanged and nothing is cached for them. A
/// loaded value is only cached when no invalidation reached the region while
/// the loader ran, so a read racing a write never re-caches the old record.
///
/// # Errors
///
/// Returns the loader's error, or a [`CacheError`] converted into `E`.
pub async fn get_or_load<V, E, F, Fut>(
    cache: &dyn RecordCache<V>,
    key: CacheKey,
    loader: F,
) -> Result<V, E>
where
    V: Clone,
    E: From<CacheError>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    if let Some(hit) = cache.get(key)? {
        tracing::trace!(region = cache.region(), %key, "cache hit");
        return Ok(hit);
    }

    let generation = cache.generation()?;
    let loaded = loader().await?;
    if cache.put_if_current(key, loaded.clone(), generation)? {
        tracing::trace!(region = cache.region(), %key, "cache populated");
    } else {
        tracing::trace!(region = cache.region(), %key, "stale load not cached");
    }
    Ok(loaded)
}

/// Invalidates the entry for a record id.
///
/// Accepts only the record's id type so callers holding a full payload must
/// extract the key explicitly.
///
/// # Errors
///
/// Returns [`CacheError`] when the backing store is unusable.
pub fn invalidate<V, K>(cache: &dyn RecordCache<V>, id: K) -> CacheResult<()>
where
    K: Into<CacheKey>,
{
    let key = id.into();
    cache.invalidate(key)?;
    tracing::trace!(region = cache.region(), %key, "cache entry invalidated");
    Ok(())
}
