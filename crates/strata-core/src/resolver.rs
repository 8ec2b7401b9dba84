//! Composition API: load layers, then resolve paths against them
//!
//! [`ConfigResolver`] is the façade embedding tools use. Loading normalizes
//! every raw layer up front and fails fast on the first malformed entry;
//! once loading succeeded, resolution has no error path. The resolver holds
//! an immutable snapshot (layer list + cache) behind a lock, and a reload
//! swaps in a whole new snapshot atomically so concurrent callers never
//! observe a mix of pre- and post-reload results for the same path.

use crate::cache::EffectiveConfigCache;
use crate::glob::normalize_path;
use crate::layer::{Layer, PresetRegistry, RawLayer};
use crate::merge::EffectiveConfig;
use crate::result::Result;
use crate::{ignore, merge};
use indexmap::IndexMap;
use rayon::prelude::*;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// One immutable layer list plus the cache of results derived from it
#[derive(Debug)]
struct Snapshot {
    layers: Vec<Layer>,
    cache: EffectiveConfigCache,
}

impl Snapshot {
    fn new(layers: Vec<Layer>) -> Self {
        Self {
            layers,
            cache: EffectiveConfigCache::new(),
        }
    }

    fn resolve(&self, path: &str) -> Arc<EffectiveConfig> {
        let path = normalize_path(path);
        self.cache.get_or_compute(&path, || {
            if ignore::is_ignored(&path, &self.layers) {
                debug!(path = %path, "path globally ignored");
                EffectiveConfig::ignored_path()
            } else {
                merge::resolve(&path, &self.layers)
            }
        })
    }
}

/// Resolves per-file effective configurations from an ordered layer list
#[derive(Debug)]
pub struct ConfigResolver {
    inner: RwLock<Arc<Snapshot>>,
}

impl ConfigResolver {
    /// Normalize and load an ordered layer list
    ///
    /// Fails on the first malformed layer; no resolver is produced from a
    /// layer list containing any error.
    pub fn load(raw_layers: &[RawLayer], registry: &dyn PresetRegistry) -> Result<Self> {
        let layers = normalize_all(raw_layers, registry)?;
        info!(layers = layers.len(), "layer list loaded");
        Ok(Self {
            inner: RwLock::new(Arc::new(Snapshot::new(layers))),
        })
    }

    /// Compute (or return the memoized) effective configuration for a path
    pub fn resolve(&self, path: &str) -> Arc<EffectiveConfig> {
        self.snapshot().resolve(path)
    }

    /// Resolve a batch of paths in parallel
    ///
    /// The returned map preserves the input order. All paths resolve against
    /// the same snapshot even if a reload happens concurrently.
    pub fn resolve_all<S: AsRef<str> + Sync>(
        &self,
        paths: &[S],
    ) -> IndexMap<String, Arc<EffectiveConfig>> {
        let snapshot = self.snapshot();
        paths
            .par_iter()
            .map(|path| {
                let path = path.as_ref();
                (path.to_string(), snapshot.resolve(path))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }

    /// Replace the layer list, discarding every cached result
    ///
    /// The new list is fully normalized before anything is swapped; on error
    /// the previous layers and cache stay in effect.
    pub fn reload(&self, raw_layers: &[RawLayer], registry: &dyn PresetRegistry) -> Result<()> {
        let layers = normalize_all(raw_layers, registry)?;
        info!(layers = layers.len(), "layer list reloaded, cache discarded");
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(Snapshot::new(layers));
        Ok(())
    }

    /// Number of layers in the current list
    pub fn layer_count(&self) -> usize {
        self.snapshot().layers.len()
    }

    /// Number of paths with a cached result
    pub fn cached_paths(&self) -> usize {
        self.snapshot().cache.len()
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Normalize every raw layer, fail-fast on the first error
fn normalize_all(raw_layers: &[RawLayer], registry: &dyn PresetRegistry) -> Result<Vec<Layer>> {
    raw_layers
        .iter()
        .enumerate()
        .map(|(id, raw)| Layer::normalize(id, raw, registry))
        .collect()
}
