pub mod cache;
pub mod memory;

pub use cache::{CacheStats, DEFAULT_CACHE_CAPACITY, LogCache, LogCacheOptions};
pub use memory::MemoryLogStore;
