//! Directory-keyed module cache shared across finder instances.
//!
//! Many unrelated finders may scan the same directory. They share one
//! `PathCache` (passed in at construction) so that modules are loaded once per
//! directory instead of once per finder.

use dashmap::DashMap;
use lodestone_api::ModuleHandle;
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::Arc;

static SHARED: Lazy<Arc<PathCache>> = Lazy::new(|| Arc::new(PathCache::new()));

/// Thread-safe mapping from directory path to its last discovered module set.
///
/// Entries never expire. Writes are insert-or-overwrite; the last writer wins.
#[derive(Debug, Default)]
pub struct PathCache {
    entries: DashMap<PathBuf, Arc<[ModuleHandle]>>,
}

impl PathCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Process-wide instance, for binaries that want one cache for every finder.
    pub fn shared() -> Arc<PathCache> {
        Arc::clone(&SHARED)
    }

    pub fn get(&self, dir: &Path) -> Option<Vec<ModuleHandle>> {
        self.entries.get(dir).map(|modules| modules.to_vec())
    }

    pub fn insert(&self, dir: impl Into<PathBuf>, modules: Vec<ModuleHandle>) {
        self.entries.insert(dir.into(), modules.into());
    }

    pub fn contains(&self, dir: &Path) -> bool {
        self.entries.contains_key(dir)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Directories currently cached
    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }
}
