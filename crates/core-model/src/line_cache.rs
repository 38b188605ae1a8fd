//! Bounded LRU cache of built screen-line blocks.
//!
//! Rebuilding the display lines of a large block (wrap toggles, pane resizes
//! bouncing between two widths) is the most expensive step outside frame
//! composition. The cache is keyed by a 64-bit hash of the rendered text plus
//! the wrap width and mode, and owned by the caller rather than kept in a
//! global.

use std::hash::BuildHasher;
use std::num::NonZeroUsize;
use std::sync::Arc;

use ahash::RandomState;
use lru::LruCache;

/// Shared display lines of one rendered block.
pub type ScreenLines = Arc<Vec<String>>;

// Fixed seeds keep content hashes stable across cache instances.
const SEEDS: (u64, u64, u64, u64) = (
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
);

fn hasher() -> RandomState {
    RandomState::with_seeds(SEEDS.0, SEEDS.1, SEEDS.2, SEEDS.3)
}

/// Hash of a rendered block used as the content part of a cache key.
pub fn content_hash(rendered: &str) -> u64 {
    hasher().hash_one(rendered)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenLineKey {
    pub content: u64,
    pub width: usize,
    pub wrap: bool,
}

impl ScreenLineKey {
    pub fn new(content: u64, width: usize, wrap: bool) -> Self {
        // width is irrelevant without wrap
        Self {
            content,
            width: if wrap { width } else { 0 },
            wrap,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

pub struct ScreenLineCache {
    inner: LruCache<ScreenLineKey, ScreenLines, RandomState>,
    stats: CacheStats,
}

impl ScreenLineCache {
    /// Create a cache holding at most `capacity` blocks (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: LruCache::with_hasher(cap, hasher()),
            stats: CacheStats::default(),
        }
    }

    pub fn get_or_build(
        &mut self,
        key: ScreenLineKey,
        build: impl FnOnce() -> Vec<String>,
    ) -> ScreenLines {
        if let Some(lines) = self.inner.get(&key) {
            self.stats.hits += 1;
            return Arc::clone(lines);
        }
        self.stats.misses += 1;
        let lines = Arc::new(build());
        self.inner.put(key, Arc::clone(&lines));
        lines
    }

    pub fn contains(&self, key: &ScreenLineKey) -> bool {
        self.inner.contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.cap().get()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl std::fmt::Debug for ScreenLineCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenLineCache")
            .field("len", &self.inner.len())
            .field("capacity", &self.capacity())
            .field("stats", &self.stats)
            .finish()
    }
}
