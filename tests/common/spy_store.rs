use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use raft_log_cache::{LogEntry, LogStore, MemoryLogStore, StorageError, StorageResult};

/// Store wrapper that counts reads and can be told to reject writes.
#[derive(Default)]
pub struct SpyStore {
    inner: MemoryLogStore,
    reads: AtomicU64,
    appends: AtomicU64,
    fail_appends: AtomicBool,
    fail_deletes: AtomicBool,
}

impl SpyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `get_log` calls that reached this store.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn appends(&self) -> u64 {
        self.appends.load(Ordering::SeqCst)
    }

    pub fn set_fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

impl LogStore for SpyStore {
    fn get_log(&self, index: u64) -> StorageResult<LogEntry> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_log(index)
    }

    fn store_logs(&self, entries: &[LogEntry]) -> StorageResult<()> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(StorageError::StorageFull);
        }
        self.inner.store_logs(entries)
    }

    fn first_index(&self) -> StorageResult<u64> {
        self.inner.first_index()
    }

    fn last_index(&self) -> StorageResult<u64> {
        self.inner.last_index()
    }

    fn delete_range(&self, min: u64, max: u64) -> StorageResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(std::io::Error::new(std::io::ErrorKind::Other, "delete failed").into());
        }
        self.inner.delete_range(min, max)
    }
}

pub fn create_test_entry(index: u64, term: u64) -> LogEntry {
    LogEntry::new(index, term, format!("command_{}", index).into_bytes())
}

pub fn create_test_entries(indices: impl IntoIterator<Item = u64>) -> Vec<LogEntry> {
    indices.into_iter().map(|i| create_test_entry(i, 1)).collect()
}
