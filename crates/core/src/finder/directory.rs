//! Directory module finder.
//!
//! Scans the top level of one directory for files in the library extension
//! group, then the executable extension group, loads each of them and
//! deduplicates by module identity. Successful scans are published to the
//! injected [`PathCache`], keyed by canonical directory. Cached requests are
//! served from that entry whenever it exists, whichever finder published it.

use crate::cache::PathCache;
use crate::config::DiscoveryConfig;
use crate::finder::cached::{CachedFinder, Scan, distinct};
use crate::loader::{ModuleLoader, NativeModuleLoader};
use lodestone_api::{Finder, FinderError, FinderResult, ModuleHandle, ModuleKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub struct DirectoryScan {
    dir: PathBuf,
    config: DiscoveryConfig,
    loader: Arc<dyn ModuleLoader>,
    path_cache: Arc<PathCache>,
    name: String,
}

impl DirectoryScan {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Path cache key: the canonical directory, or the path as given when it
    /// cannot be resolved.
    pub fn cache_key(&self) -> PathBuf {
        std::fs::canonicalize(&self.dir).unwrap_or_else(|_| self.dir.clone())
    }

    /// Candidate files in scan order: libraries first, then executables,
    /// each group sorted by file name.
    pub fn candidates(&self) -> FinderResult<Vec<(PathBuf, ModuleKind)>> {
        match std::fs::metadata(&self.dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(FinderError::DirectoryNotFound(self.dir.clone())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FinderError::DirectoryNotFound(self.dir.clone()));
            }
            Err(e) => return Err(FinderError::io(&self.dir, e)),
        }

        let mut libraries = Vec::new();
        let mut executables = Vec::new();

        let entries = std::fs::read_dir(&self.dir).map_err(|e| FinderError::io(&self.dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| FinderError::io(&self.dir, e))?;
            let path = entry.path();
            // Follows symlinks, so aliases of module files are candidates too.
            if !path.is_file() {
                continue;
            }
            match self.config.classify(&path) {
                Some(ModuleKind::Library) => libraries.push(path),
                Some(ModuleKind::Executable) => executables.push(path),
                None => {}
            }
        }

        libraries.sort();
        executables.sort();

        Ok(libraries
            .into_iter()
            .map(|p| (p, ModuleKind::Library))
            .chain(executables.into_iter().map(|p| (p, ModuleKind::Executable)))
            .collect())
    }
}

impl Scan for DirectoryScan {
    type Item = ModuleHandle;

    fn scan(&self) -> FinderResult<Vec<ModuleHandle>> {
        let start = Instant::now();
        let candidates = self.candidates()?;
        debug!(
            "{} candidate module files in {}",
            candidates.len(),
            self.dir.display()
        );

        let mut modules = Vec::with_capacity(candidates.len());
        for (path, kind) in candidates {
            modules.push(self.loader.load(&path, kind)?);
        }
        let modules = distinct(modules);

        self.path_cache.insert(self.cache_key(), modules.clone());
        info!(
            "Discovered {} modules in {} with {} loader in {:?}",
            modules.len(),
            self.dir.display(),
            self.loader.name(),
            start.elapsed()
        );
        Ok(modules)
    }

    fn cached(&self) -> Option<Vec<ModuleHandle>> {
        self.path_cache.get(&self.cache_key())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Finder over the modules of one directory.
pub struct DirectoryModuleFinder {
    inner: CachedFinder<DirectoryScan>,
}

impl DirectoryModuleFinder {
    /// Finder with the default configuration and the native loader.
    pub fn new(dir: impl Into<PathBuf>, path_cache: Arc<PathCache>) -> FinderResult<Self> {
        Self::with_config(dir, path_cache, DiscoveryConfig::default())
    }

    pub fn with_config(
        dir: impl Into<PathBuf>,
        path_cache: Arc<PathCache>,
        config: DiscoveryConfig,
    ) -> FinderResult<Self> {
        Self::with_loader(dir, path_cache, config, Arc::new(NativeModuleLoader))
    }

    /// Fully specified finder. Performs no I/O; an empty path or an invalid
    /// configuration is rejected here.
    pub fn with_loader(
        dir: impl Into<PathBuf>,
        path_cache: Arc<PathCache>,
        config: DiscoveryConfig,
        loader: Arc<dyn ModuleLoader>,
    ) -> FinderResult<Self> {
        let dir = dir.into();
        if dir.as_os_str().is_empty() {
            return Err(FinderError::Config("directory path is empty".to_string()));
        }
        config.validate()?;

        let name = format!("directory finder ({})", dir.display());
        Ok(Self {
            inner: CachedFinder::new(DirectoryScan {
                dir,
                config,
                loader,
                path_cache,
                name,
            }),
        })
    }

    pub fn dir(&self) -> &Path {
        self.inner.scanner().dir()
    }

    pub fn is_populated(&self) -> bool {
        self.inner.is_populated()
    }

    /// Directory scans run by this instance.
    pub fn scan_count(&self) -> usize {
        self.inner.scan_count()
    }
}

impl Finder<ModuleHandle> for DirectoryModuleFinder {
    fn find_all(&self, from_cache: bool) -> FinderResult<Vec<ModuleHandle>> {
        self.inner.find_all(from_cache)
    }
}
