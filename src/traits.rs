use std::sync::Arc;

use crate::error::StorageError;
use crate::message::LogEntry;

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable, append-only log storage.
///
/// Implementations own their durability and internal synchronisation; every
/// method may block on I/O.
///
/// - `get_log`: Read the entry at `index`, `StorageError::LogNotFound` if absent.
/// - `store_logs`: Durably append entries, supplied in increasing index order.
/// - `store_log`: Append a single entry.
/// - `first_index` / `last_index`: Bounds of the retained log, 0 when empty.
/// - `delete_range`: Remove every entry with index in `[min, max]`.
pub trait LogStore: Send + Sync {
    fn get_log(&self, index: u64) -> StorageResult<LogEntry>;

    fn store_logs(&self, entries: &[LogEntry]) -> StorageResult<()>;

    fn store_log(&self, entry: &LogEntry) -> StorageResult<()> {
        self.store_logs(std::slice::from_ref(entry))
    }

    fn first_index(&self) -> StorageResult<u64>;

    fn last_index(&self) -> StorageResult<u64>;

    fn delete_range(&self, min: u64, max: u64) -> StorageResult<()>;
}

impl<T: LogStore + ?Sized> LogStore for Arc<T> {
    fn get_log(&self, index: u64) -> StorageResult<LogEntry> {
        (**self).get_log(index)
    }

    fn store_logs(&self, entries: &[LogEntry]) -> StorageResult<()> {
        (**self).store_logs(entries)
    }

    fn store_log(&self, entry: &LogEntry) -> StorageResult<()> {
        (**self).store_log(entry)
    }

    fn first_index(&self) -> StorageResult<u64> {
        (**self).first_index()
    }

    fn last_index(&self) -> StorageResult<u64> {
        (**self).last_index()
    }

    fn delete_range(&self, min: u64, max: u64) -> StorageResult<()> {
        (**self).delete_range(min, max)
    }
}

impl<T: LogStore + ?Sized> LogStore for Box<T> {
    fn get_log(&self, index: u64) -> StorageResult<LogEntry> {
        (**self).get_log(index)
    }

    fn store_logs(&self, entries: &[LogEntry]) -> StorageResult<()> {
        (**self).store_logs(entries)
    }

    fn store_log(&self, entry: &LogEntry) -> StorageResult<()> {
        (**self).store_log(entry)
    }

    fn first_index(&self) -> StorageResult<u64> {
        (**self).first_index()
    }

    fn last_index(&self) -> StorageResult<u64> {
        (**self).last_index()
    }

    fn delete_range(&self, min: u64, max: u64) -> StorageResult<()> {
        (**self).delete_range(min, max)
    }
}
