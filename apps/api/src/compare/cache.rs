//! Memoized diffing keyed by the `(original, optimized)` pair.
//!
//! Diffs are pure, so the only invalidation is a different input pair.
//! Eviction drops the least recently used tenth once the cache is full.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::compare::diff::{diff_words, DiffRun};

type PairKey = (String, String);

struct CacheEntry {
    runs: Arc<[DiffRun]>,
    last_access: u64,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<PairKey, CacheEntry>,
    clock: u64,
    stats: CacheStats,
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

pub struct DiffCache {
    inner: Mutex<CacheInner>,
    max_size: usize,
}

impl DiffCache {
    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            max_size: max_size.max(1),
        }
    }

    /// Returns the run sequence for the pair, computing it at most once while cached.
    ///
    /// The lock is not held while diffing; if two callers miss on the same pair
    /// concurrently, the first insert wins and both get equal runs.
    pub async fn runs(&self, original: &str, optimized: &str) -> Arc<[DiffRun]> {
        let key = (original.to_string(), optimized.to_string());
        {
            let mut guard = self.inner.lock().await;
            let inner = &mut *guard;
            inner.clock += 1;
            let now = inner.clock;

            if let Some(entry) = inner.entries.get_mut(&key) {
                entry.last_access = now;
                let runs = Arc::clone(&entry.runs);
                inner.stats.hits += 1;
                debug!("Diff cache hit ({} runs)", runs.len());
                return runs;
            }
            inner.stats.misses += 1;
        }

        let runs: Arc<[DiffRun]> = diff_words(original, optimized).into();

        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        inner.clock += 1;
        let now = inner.clock;
        if let Some(entry) = inner.entries.get_mut(&key) {
            entry.last_access = now;
            return Arc::clone(&entry.runs);
        }

        if inner.entries.len() >= self.max_size {
            self.evict(inner);
        }
        inner.entries.insert(
            key,
            CacheEntry {
                runs: Arc::clone(&runs),
                last_access: now,
            },
        );
        runs
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    fn evict(&self, inner: &mut CacheInner) {
        let evict_count = (self.max_size / 10).max(1);
        let mut by_age: Vec<_> = inner
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.last_access))
            .collect();
        by_age.sort_by_key(|(_, access)| *access);

        for (key, _) in by_age.into_iter().take(evict_count) {
            inner.entries.remove(&key);
            inner.stats.evictions += 1;
        }
    }
}
