//! Generic cached finder.
//!
//! The finder is either Unpopulated (nothing scanned yet) or Populated (the
//! cache holds the deduplicated result of the last successful scan). There is
//! no way back to Unpopulated. All state access and the scan itself happen
//! under one per-instance lock, so a caller arriving during a scan waits for
//! it and then reads its result.
//!
//! A scan may expose a cache that lives below the finder and is shared with
//! other finders. When it holds an entry, cached requests are answered from
//! it and the instance cache is brought in line with it.

use indexmap::IndexSet;
use lodestone_api::{Finder, FinderResult};
use parking_lot::Mutex;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, warn};

/// The expensive half of a finder.
pub trait Scan: Send + Sync {
    type Item: Clone + Eq + Hash + Send + Sync;

    /// Performs a full scan. Must not have side effects on failure.
    fn scan(&self) -> FinderResult<Vec<Self::Item>>;

    /// A result cached below this finder. When present it answers
    /// `from_cache` requests ahead of the finder's own cache.
    fn cached(&self) -> Option<Vec<Self::Item>> {
        None
    }

    /// Scanner name (for logging/debugging)
    fn name(&self) -> &str;
}

struct FinderState<T> {
    items: Vec<T>,
    found: bool,
}

impl<T: Clone + Eq + Hash> FinderState<T> {
    fn populate(&mut self, items: Vec<T>) -> Vec<T> {
        self.items = distinct(items);
        self.found = true;
        self.items.clone()
    }
}

/// Removes duplicates, keeping the first occurrence of each item.
pub fn distinct<T: Eq + Hash>(items: Vec<T>) -> Vec<T> {
    items.into_iter().collect::<IndexSet<_>>().into_iter().collect()
}

/// Thread-safe finder caching the result of a [`Scan`].
pub struct CachedFinder<S: Scan> {
    scanner: S,
    state: Mutex<FinderState<S::Item>>,
    scans: AtomicUsize,
}

impl<S: Scan> CachedFinder<S> {
    /// Creates an Unpopulated finder. No scan happens here.
    pub fn new(scanner: S) -> Self {
        Self {
            scanner,
            state: Mutex::new(FinderState {
                items: Vec::new(),
                found: false,
            }),
            scans: AtomicUsize::new(0),
        }
    }

    pub fn scanner(&self) -> &S {
        &self.scanner
    }

    pub fn is_populated(&self) -> bool {
        self.state.lock().found
    }

    /// Number of times the scan has been invoked, failed attempts included.
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    fn rescan(&self, state: &mut FinderState<S::Item>) -> FinderResult<Vec<S::Item>> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        let start = Instant::now();
        debug!("Scanning with {}", self.scanner.name());

        match self.scanner.scan() {
            Ok(items) => {
                let items = state.populate(items);
                debug!(
                    "{} found {} items in {:?}",
                    self.scanner.name(),
                    items.len(),
                    start.elapsed()
                );
                Ok(items)
            }
            Err(e) => {
                warn!("{} scan failed: {}", self.scanner.name(), e);
                Err(e)
            }
        }
    }
}

impl<S: Scan> Finder<S::Item> for CachedFinder<S> {
    fn find_all(&self, from_cache: bool) -> FinderResult<Vec<S::Item>> {
        let mut state = self.state.lock();

        if from_cache {
            if let Some(items) = self.scanner.cached() {
                debug!("{} adopted {} cached items", self.scanner.name(), items.len());
                return Ok(state.populate(items));
            }
            if state.found {
                return Ok(state.items.clone());
            }
        }

        self.rescan(&mut state)
    }
}
