//! In-process cache of normalized series, keyed by `(SeriesId, TimeWindow)`.
//!
//! Bounded LRU with a per-entry TTL. Only present series are stored: an absent
//! result is retried on the next request.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::domain::{CanonicalSeries, SeriesId, TimeWindow};

pub type CacheKey = (SeriesId, TimeWindow);

/// Upper bound on entries; `LruCache::new` allocates the full capacity up front.
pub const MAX_CAPACITY: usize = 100_000;

struct Entry {
    value: CanonicalSeries,
    /// `None`: the TTL does not fit in an `Instant`, never expires.
    expires_at: Option<Instant>,
}

pub struct SeriesCache {
    inner: Mutex<LruCache<CacheKey, Entry>>,
    ttl: Duration,
}

impl SeriesCache {
    /// `capacity` is clamped to `1..=MAX_CAPACITY`. A zero `ttl` disables caching.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let cap = NonZeroUsize::new(capacity.clamp(1, MAX_CAPACITY)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(cap)),
            ttl,
        }
    }

    pub fn disabled() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub fn get(&self, id: &SeriesId, window: TimeWindow) -> Option<CanonicalSeries> {
        if !self.is_enabled() {
            return None;
        }
        let key = (id.clone(), window);
        let mut guard = self.inner.lock().ok()?;
        if let Some(entry) = guard.get(&key)
            && entry.expires_at.is_none_or(|t| Instant::now() <= t)
        {
            tracing::trace!(%id, %window, "cache hit");
            return Some(entry.value.clone());
        }
        // Expired (or missing): drop it.
        guard.pop(&key);
        None
    }

    pub fn put(&self, id: &SeriesId, window: TimeWindow, value: CanonicalSeries) {
        if !self.is_enabled() {
            return;
        }
        let expires_at = Instant::now().checked_add(self.ttl);
        if let Ok(mut guard) = self.inner.lock() {
            guard.put((id.clone(), window), Entry { value, expires_at });
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.clear();
        }
    }
}
