use std::sync::Arc;

use thiserror::Error;

/// Errors surfaced by a [`LogStore`](crate::LogStore) and by the cache in front of it.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Log entry at index {0} not found")]
    LogNotFound(u64),

    #[error("Storage full")]
    StorageFull,

    #[error("Consistency check failed: {0}")]
    Consistency(String),

    #[error("Backend error: {0}")]
    Backend(#[from] anyhow::Error),

    #[error("Invalid cache capacity {0}, must be at least 1")]
    InvalidCapacity(usize),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(Arc::new(err))
    }
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::LogNotFound(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Fatal,       // the store can no longer be trusted for this operation
    Recoverable, // retry or fall back is possible
    Ignorable,   // log only
}

pub trait ErrorHandler {
    fn severity(&self) -> ErrorSeverity;
    fn context(&self) -> String;
}

impl ErrorHandler for StorageError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            StorageError::Io(_) => ErrorSeverity::Fatal,
            StorageError::LogNotFound(_) => ErrorSeverity::Ignorable,
            StorageError::StorageFull => ErrorSeverity::Fatal,
            StorageError::Consistency(_) => ErrorSeverity::Fatal,
            StorageError::Backend(_) => ErrorSeverity::Recoverable,
            StorageError::InvalidCapacity(_) => ErrorSeverity::Fatal,
        }
    }

    fn context(&self) -> String {
        match self {
            StorageError::Io(e) => format!("IO error: {}", e),
            StorageError::LogNotFound(idx) => format!("Log entry at index {} not found", idx),
            StorageError::StorageFull => "Storage full".to_string(),
            StorageError::Consistency(msg) => format!("Consistency check failed: {}", msg),
            StorageError::Backend(e) => format!("Backend error: {:#}", e),
            StorageError::InvalidCapacity(cap) => format!("Invalid cache capacity {}", cap),
        }
    }
}
