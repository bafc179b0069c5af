//! View cache for portal collection reads
//!
//! A time-boxed key/value store used to avoid redundant remote reads
//! between navigations. Values are type-erased and downcast on read, so
//! one cache instance can hold the board's work-item list next to a
//! user's job list under distinct string keys.
//!
//! The cache is an explicit dependency of the state containers: it is
//! constructed by the embedding application and injected, never reached
//! through a module singleton. Teardown on logout is a plain drop, and
//! tests can hand each container its own instance.

use moka::future::Cache;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

/// Default number of cached collections
const DEFAULT_CAPACITY: u64 = 64;

/// Default entry lifetime
const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Time-boxed, type-erased view cache
///
/// Writes overwrite, reads are clone-on-read, entries expire after the
/// configured TTL. Cloning the cache clones a handle to the same store.
#[derive(Clone)]
pub struct ViewCache {
    inner: Cache<String, Arc<dyn Any + Send + Sync>>,
}

impl std::fmt::Debug for ViewCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

impl ViewCache {
    /// Create a cache with the default capacity and TTL
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_CAPACITY, DEFAULT_TTL)
    }

    /// Create a cache with explicit capacity and entry lifetime
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Store a value under `key`, replacing any previous entry
    pub async fn insert<T>(&self, key: impl Into<String>, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.inner.insert(key.into(), Arc::new(value)).await;
    }

    /// Fetch the value under `key`, if present, unexpired, and of type `T`
    #[must_use]
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.inner
            .get(key)
            .await
            .and_then(|arc| arc.downcast_ref::<T>().cloned())
    }

    /// Drop the entry under `key`, forcing the next read to miss
    pub async fn invalidate(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    /// Drop every entry
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Whether an unexpired entry exists under `key`
    #[must_use]
    pub async fn contains(&self, key: &str) -> bool {
        self.inner.get(key).await.is_some()
    }

    /// Approximate number of live entries
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

impl Default for ViewCache {
    fn default() -> Self {
        Self::new()
    }
}
