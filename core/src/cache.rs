//! Keyed cache of fetch results for the views.
//!
//! # Design
//! A `QueryKey` names a fetch by its resource and every parameter that
//! affects the result, so changing a filter is a different key rather than a
//! stale read of the old one.
//!
//! Each key owns one slot behind an async lock. A fetch holds the lock for
//! the whole round-trip, which bounds every key to at most one request in
//! flight: a second fetch of the same key waits and then reuses the result.
//! Invalidation bumps the slot's epoch without taking the lock, so an entry
//! invalidated while its fetch is still running comes back already stale.
//!
//! The cache holds a bounded number of keys. When a new key would exceed the
//! bound, the least recently fetched keys with no fetch in flight are dropped.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(resource: &str) -> Self {
        Self(vec![resource.to_string()])
    }

    pub fn with(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    pub fn resource(&self) -> &str {
        &self.0[0]
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// What the cache currently knows about one key.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// Never fetched.
    Idle,
    /// A fetch is in flight.
    Loading,
    Failed(ApiError),
    /// `stale` is set once the key has been invalidated; the data is still
    /// shown until the next fetch replaces it.
    Ready { data: T, stale: bool },
}

struct Fetched<T> {
    epoch: u64,
    result: Result<T, ApiError>,
}

struct Slot<T> {
    epoch: AtomicU64,
    data: AsyncMutex<Option<Fetched<T>>>,
}

impl<T> Slot<T> {
    fn new() -> Self {
        Self {
            epoch: AtomicU64::new(0),
            data: AsyncMutex::new(None),
        }
    }
}

/// Keys kept by `QueryCache::new`.
pub const DEFAULT_CAPACITY: usize = 64;

struct Entry<T> {
    slot: Arc<Slot<T>>,
    used: u64,
}

struct Slots<T> {
    entries: HashMap<QueryKey, Entry<T>>,
    tick: u64,
}

impl<T> Slots<T> {
    /// Drop idle entries, least recently used first, until there is room for
    /// one more. An entry whose slot is shared has a fetch or a snapshot in
    /// progress and is kept.
    fn evict(&mut self, capacity: usize) {
        if self.entries.len() < capacity {
            return;
        }
        let mut idle: Vec<(u64, QueryKey)> = self
            .entries
            .iter()
            .filter(|(_, entry)| Arc::strong_count(&entry.slot) == 1)
            .map(|(key, entry)| (entry.used, key.clone()))
            .collect();
        idle.sort_unstable_by_key(|(used, _)| *used);
        let excess = self.entries.len() + 1 - capacity;
        for (_, key) in idle.into_iter().take(excess) {
            debug!(%key, "evicted");
            self.entries.remove(&key);
        }
    }
}

pub struct QueryCache<T> {
    slots: Mutex<Slots<T>>,
    capacity: usize,
}

impl<T: Clone> QueryCache<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A cache that keeps at most `capacity` keys (at least one) once their
    /// fetches have settled.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Mutex::new(Slots {
                entries: HashMap::new(),
                tick: 0,
            }),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Slots<T>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self, key: &QueryKey) -> Arc<Slot<T>> {
        let mut slots = self.lock();
        slots.tick += 1;
        let tick = slots.tick;
        if let Some(entry) = slots.entries.get_mut(key) {
            entry.used = tick;
            return entry.slot.clone();
        }
        slots.evict(self.capacity);
        let slot = Arc::new(Slot::new());
        slots.entries.insert(
            key.clone(),
            Entry {
                slot: slot.clone(),
                used: tick,
            },
        );
        slot
    }

    fn existing(&self, key: &QueryKey) -> Option<Arc<Slot<T>>> {
        self.lock().entries.get(key).map(|entry| entry.slot.clone())
    }

    /// Return fresh cached data for `key`, or run `fetcher` and store its
    /// result. Failures are stored for rendering but never served: the next
    /// fetch tries again.
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let slot = self.slot(key);
        let mut data = slot.data.lock().await;
        if let Some(Fetched { epoch, result: Ok(value) }) = data.as_ref() {
            if *epoch == slot.epoch.load(Ordering::Acquire) {
                debug!(%key, "cache hit");
                return Ok(value.clone());
            }
        }
        Self::run(&slot, &mut data, key, fetcher).await
    }

    /// Fetch `key` unconditionally.
    pub async fn refetch<F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let slot = self.slot(key);
        let mut data = slot.data.lock().await;
        Self::run(&slot, &mut data, key, fetcher).await
    }

    async fn run<F, Fut>(
        slot: &Slot<T>,
        data: &mut Option<Fetched<T>>,
        key: &QueryKey,
        fetcher: F,
    ) -> Result<T, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let epoch = slot.epoch.load(Ordering::Acquire);
        debug!(%key, "fetching");
        let result = fetcher().await;
        *data = Some(Fetched {
            epoch,
            result: result.clone(),
        });
        result
    }

    /// Mark `key` stale. Returns whether the key was known.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        match self.existing(key) {
            Some(slot) => {
                slot.epoch.fetch_add(1, Ordering::AcqRel);
                debug!(%key, "invalidated");
                true
            }
            None => false,
        }
    }

    /// Mark every key under `prefix` stale. Returns how many were affected.
    pub fn invalidate_prefix(&self, prefix: &QueryKey) -> usize {
        let slots = self.lock();
        let mut count = 0;
        for (key, entry) in slots.entries.iter() {
            if key.starts_with(prefix) {
                entry.slot.epoch.fetch_add(1, Ordering::AcqRel);
                count += 1;
            }
        }
        debug!(%prefix, count, "invalidated by prefix");
        count
    }

    pub fn is_stale(&self, key: &QueryKey) -> bool {
        matches!(self.state(key), QueryState::Ready { stale: true, .. })
    }

    /// Snapshot for the render pass. Never waits.
    pub fn state(&self, key: &QueryKey) -> QueryState<T> {
        let Some(slot) = self.existing(key) else {
            return QueryState::Idle;
        };
        let Ok(data) = slot.data.try_lock() else {
            return QueryState::Loading;
        };
        match data.as_ref() {
            None => QueryState::Idle,
            Some(Fetched { result: Err(err), .. }) => QueryState::Failed(err.clone()),
            Some(Fetched { epoch, result: Ok(value) }) => QueryState::Ready {
                data: value.clone(),
                stale: *epoch != slot.epoch.load(Ordering::Acquire),
            },
        }
    }
}

impl<T: Clone> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
