//! Per-path memoization of merge results
//!
//! The merge computation is pure, so caching is purely an optimization:
//! repeated queries for the same path (a language server analyzing an open
//! project, a watch loop re-linting) skip re-folding the layer list. Entries
//! are keyed by normalized path and are only ever invalidated wholesale;
//! layers are atomic per load, so there is no per-entry invalidation.

use crate::merge::EffectiveConfig;
use dashmap::DashMap;
use std::sync::Arc;

/// Concurrent path -> effective configuration cache
#[derive(Debug, Default)]
pub struct EffectiveConfigCache {
    entries: DashMap<String, Arc<EffectiveConfig>>,
}

impl EffectiveConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `path`, computing it on first request
    ///
    /// The entry API holds the key's shard lock while `compute` runs, so two
    /// callers racing on the same uncached path perform a single computation
    /// and the loser observes the winner's result.
    pub fn get_or_compute(
        &self,
        path: &str,
        compute: impl FnOnce() -> EffectiveConfig,
    ) -> Arc<EffectiveConfig> {
        self.entries
            .entry(path.to_string())
            .or_insert_with(|| Arc::new(compute()))
            .clone()
    }

    /// Look up a cached value without computing
    pub fn get(&self, path: &str) -> Option<Arc<EffectiveConfig>> {
        self.entries.get(path).map(|entry| entry.clone())
    }

    /// Discard every cached entry
    pub fn invalidate_all(&self) {
        self.entries.clear();
    }

    /// Number of cached paths
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
