use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::StdRng};
use raft_log_cache::{LogCache, LogEntry, LogStore, MemoryLogStore};

const SEEDS: u64 = 24;
const OPS_PER_SEED: usize = 150;

/// Every read through the cache must equal a read of the store it wraps,
/// whatever mix of appends, gaps, rewinds and deletes came before.
#[test]
fn test_cache_reads_match_store_for_random_histories() {
    let _ = tracing_subscriber::fmt::try_init();

    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let capacity = rng.random_range(1..=8);
        let store = Arc::new(MemoryLogStore::new());
        let cache = LogCache::new(capacity, store.clone()).unwrap();

        let mut last_written = 0u64;
        let mut highest_seen = 0u64;

        for op in 0..OPS_PER_SEED {
            let roll = rng.random_range(0..100);
            if roll < 15 {
                let min = rng.random_range(0..=highest_seen);
                let max = min + rng.random_range(0..=4);
                cache.delete_range(min, max).unwrap();
            } else {
                let start = if roll < 30 {
                    // rewrite part of the existing log, as after a raft conflict
                    rng.random_range(0..=last_written)
                } else {
                    last_written + 1 + rng.random_range(0..=2)
                };
                let count = rng.random_range(1..=5u64);
                let term = rng.random_range(0..4);
                let entries: Vec<LogEntry> = (start..start + count)
                    .map(|i| LogEntry::new(i, term, format!("{}:{}", term, i).into_bytes()))
                    .collect();
                if entries.len() == 1 && rng.random_bool(0.5) {
                    cache.store_log(&entries[0]).unwrap();
                } else {
                    cache.store_logs(&entries).unwrap();
                }
                last_written = start + count - 1;
                highest_seen = highest_seen.max(last_written);
            }

            for index in 0..=highest_seen + 2 {
                assert_eq!(
                    cache.get_log(index).ok(),
                    store.get_log(index).ok(),
                    "seed {} capacity {} op {} index {}",
                    seed,
                    capacity,
                    op,
                    index
                );
            }
        }
    }
}
