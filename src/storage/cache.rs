use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace, warn};

use crate::{
    error::{ErrorHandler, ErrorSeverity, StorageError},
    message::LogEntry,
    traits::{LogStore, StorageResult},
};

pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogCacheOptions {
    /// Number of ring slots, i.e. how many of the most recently written
    /// entries stay resident (default: 1000)
    pub capacity: usize,
    /// Drop every cached entry when the backing store rejects an append,
    /// so the cache never serves entries that are not durable (default: true)
    pub invalidate_on_store_failure: bool,
}

impl Default for LogCacheOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            invalidate_on_store_failure: true,
        }
    }
}

impl LogCacheOptions {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    pub fn invalidate_on_store_failure(mut self, enabled: bool) -> Self {
        self.invalidate_on_store_failure = enabled;
        self
    }
}

/// Point-in-time copy of the cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

struct RingState {
    slots: Vec<Option<Arc<LogEntry>>>,
    // next slot to be written
    current: usize,
    // log index of the entry in slot `current - 1`
    last_index: u64,
    // occupied slots, 0 while nothing is cached
    resident: usize,
}

impl RingState {
    fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            current: 0,
            last_index: 0,
            resident: 0,
        }
    }

    /// Slot that holds `index` if writes were strictly sequential.
    ///
    /// Indices above the last cached one, or more than `capacity - 1` behind
    /// it, cannot be resident and map to no slot.
    fn slot_for(&self, index: u64) -> Option<usize> {
        if self.resident == 0 || index > self.last_index {
            return None;
        }
        let n = self.slots.len();
        let distance = self.last_index - index;
        if distance >= n as u64 {
            return None;
        }
        // offset is negative when the lookup wraps behind slot 0
        let offset = self.current as i64 - 1 - distance as i64;
        Some(offset.rem_euclid(n as i64) as usize)
    }

    fn lookup(&self, index: u64) -> Option<Arc<LogEntry>> {
        let slot = self.slot_for(index)?;
        // A mismatch means the index was skipped; the store is authoritative.
        self.slots[slot]
            .as_ref()
            .filter(|entry| entry.index == index)
            .cloned()
    }

    /// Append `entry` at the cursor. Returns true when the ring had to be
    /// reset first because `entry` does not extend the cached indices.
    fn push(&mut self, entry: &LogEntry) -> bool {
        // Cached indices stay strictly increasing, so a cached copy of an
        // index is always its latest write.
        let rewound = self.resident > 0 && entry.index <= self.last_index;
        if rewound {
            self.reset();
        }
        if self.slots[self.current].is_none() {
            self.resident += 1;
        }
        self.slots[self.current] = Some(Arc::new(entry.clone()));
        self.last_index = entry.index;
        self.current = (self.current + 1) % self.slots.len();
        rewound
    }

    fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.current = 0;
        self.last_index = 0;
        self.resident = 0;
    }

    fn len(&self) -> usize {
        self.resident
    }
}

/// Write-through ring buffer cache of the most recent log entries.
///
/// `LogCache` implements [`LogStore`] itself and can replace the store it
/// wraps anywhere: every write reaches the store, reads are answered from the
/// ring when the slot holds exactly the requested index and from the store
/// otherwise. `first_index` and `last_index` are never cached.
///
/// Entries must be written in strictly increasing index order for the cache
/// to be effective. Out-of-order writes only cause misses.
///
/// # Example
///
/// ```rust
/// use raft_log_cache::{LogCache, LogEntry, LogStore, MemoryLogStore};
///
/// let cache = LogCache::new(128, MemoryLogStore::new()).unwrap();
/// cache.store_log(&LogEntry::new(1, 1, b"set x 1".to_vec())).unwrap();
/// assert_eq!(cache.get_log(1).unwrap().command, b"set x 1".to_vec());
/// ```
pub struct LogCache<S> {
    store: S,
    options: LogCacheOptions,
    state: RwLock<RingState>,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

impl<S: LogStore> LogCache<S> {
    pub fn new(capacity: usize, store: S) -> StorageResult<Self> {
        Self::with_options(LogCacheOptions::with_capacity(capacity), store)
    }

    pub fn with_options(options: LogCacheOptions, store: S) -> StorageResult<Self> {
        if options.capacity == 0 {
            return Err(StorageError::InvalidCapacity(options.capacity));
        }
        info!(
            "Created log cache: capacity={}, invalidate_on_store_failure={}",
            options.capacity, options.invalidate_on_store_failure
        );
        Ok(Self {
            store,
            state: RwLock::new(RingState::new(options.capacity)),
            options,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        })
    }

    pub fn capacity(&self) -> usize {
        self.options.capacity
    }

    pub fn options(&self) -> &LogCacheOptions {
        &self.options
    }

    /// The wrapped backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.state.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }

    /// Drop every cached entry. The backing store is not touched.
    pub fn invalidate(&self) {
        let mut state = self.state.write();
        self.reset_locked(&mut state);
    }

    fn get_from_cache(&self, index: u64) -> Option<Arc<LogEntry>> {
        self.state.read().lookup(index)
    }

    fn cache_logs(&self, entries: &[LogEntry]) {
        if entries.is_empty() {
            return;
        }
        let mut state = self.state.write();
        for entry in entries {
            let previous = state.last_index;
            if state.push(entry) {
                self.invalidations.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "Log cache reset: index {} does not follow cached index {}",
                    entry.index, previous
                );
            }
        }
    }

    fn reset_locked(&self, state: &mut RingState) {
        state.reset();
        self.invalidations.fetch_add(1, Ordering::Relaxed);
        debug!("Log cache invalidated");
    }

    fn report_store_failure(&self, operation: &str, err: &StorageError) {
        match err.severity() {
            ErrorSeverity::Fatal => error!("[FATAL] {} failed: {}", operation, err.context()),
            ErrorSeverity::Recoverable => {
                warn!("[RECOVERABLE] {} failed: {}", operation, err.context())
            }
            ErrorSeverity::Ignorable => debug!("{} failed: {}", operation, err.context()),
        }
    }
}

impl<S: LogStore> LogStore for LogCache<S> {
    fn get_log(&self, index: u64) -> StorageResult<LogEntry> {
        if let Some(entry) = self.get_from_cache(index) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!("Log cache hit: index={}", index);
            return Ok(entry.as_ref().clone());
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        trace!("Log cache miss: index={}", index);
        self.store.get_log(index)
    }

    fn store_logs(&self, entries: &[LogEntry]) -> StorageResult<()> {
        self.cache_logs(entries);

        let result = self.store.store_logs(entries);
        if let Err(err) = &result {
            self.report_store_failure("Append log entries", err);
            if self.options.invalidate_on_store_failure {
                self.invalidate();
            } else {
                warn!(
                    "Log cache retains {} entries the store did not persist",
                    entries.len()
                );
            }
        }
        result
    }

    fn first_index(&self) -> StorageResult<u64> {
        self.store.first_index()
    }

    fn last_index(&self) -> StorageResult<u64> {
        self.store.last_index()
    }

    fn delete_range(&self, min: u64, max: u64) -> StorageResult<()> {
        // Held across the store call so a concurrent append cannot re-cache
        // entries that are about to be deleted.
        let mut state = self.state.write();
        self.reset_locked(&mut state);
        let result = self.store.delete_range(min, max);
        drop(state);

        if let Err(err) = &result {
            self.report_store_failure("Delete log range", err);
        }
        result
    }
}
