use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::{
    error::StorageError,
    message::LogEntry,
    traits::{LogStore, StorageResult},
};

/// In-memory log store (tests and single-process deployments).
#[derive(Default)]
pub struct MemoryLogStore {
    log: RwLock<BTreeMap<u64, LogEntry>>, // entries keyed by log index
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.log.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.read().is_empty()
    }
}

impl LogStore for MemoryLogStore {
    fn get_log(&self, index: u64) -> StorageResult<LogEntry> {
        self.log
            .read()
            .get(&index)
            .cloned()
            .ok_or(StorageError::LogNotFound(index))
    }

    fn store_logs(&self, entries: &[LogEntry]) -> StorageResult<()> {
        let mut log = self.log.write();
        for entry in entries {
            log.insert(entry.index, entry.clone());
        }
        Ok(())
    }

    fn first_index(&self) -> StorageResult<u64> {
        Ok(self.log.read().keys().next().copied().unwrap_or(0))
    }

    fn last_index(&self) -> StorageResult<u64> {
        Ok(self.log.read().keys().next_back().copied().unwrap_or(0))
    }

    fn delete_range(&self, min: u64, max: u64) -> StorageResult<()> {
        if min > max {
            return Ok(());
        }
        let mut log = self.log.write();
        let doomed: Vec<u64> = log.range(min..=max).map(|(idx, _)| *idx).collect();
        for idx in &doomed {
            log.remove(idx);
        }
        debug!("Deleted {} log entries in [{}, {}]", doomed.len(), min, max);
        Ok(())
    }
}
