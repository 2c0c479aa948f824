//! Write-through ring buffer cache for append-only Raft log storage.
//!
//! [`LogCache`] wraps any [`LogStore`] and keeps the most recently appended
//! entries in a fixed-size ring so that reads of the log tail (the common
//! case when replicating to followers or applying committed entries) skip
//! the backing store. The cache is itself a `LogStore`; callers cannot
//! observe a functional difference from using the store directly.

pub mod error;
pub mod message;
pub mod storage;
pub mod traits;

pub use error::{ErrorHandler, ErrorSeverity, StorageError};
pub use message::LogEntry;
pub use storage::{CacheStats, DEFAULT_CACHE_CAPACITY, LogCache, LogCacheOptions, MemoryLogStore};
pub use traits::{LogStore, StorageResult};

// 类型定义
pub type Command = Vec<u8>;
