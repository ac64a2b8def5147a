use crate::error::FinderResult;
use crate::models::{ModuleHandle, TypeDescriptor};

/// A component that performs a discovery scan and can serve cached or fresh results.
///
/// Both operations return a fully materialized `Vec`. With `from_cache = true`
/// the last successful scan is served if there is one; otherwise a fresh scan
/// runs and replaces the cache.
pub trait Finder<T>: Send + Sync {
    /// Returns every discovered item.
    fn find_all(&self, from_cache: bool) -> FinderResult<Vec<T>>;

    /// Returns the discovered items accepted by `predicate`, in discovery order.
    ///
    /// The predicate runs after cache resolution and its outcome is never cached.
    fn find(&self, predicate: &dyn Fn(&T) -> bool, from_cache: bool) -> FinderResult<Vec<T>> {
        Ok(self
            .find_all(from_cache)?
            .into_iter()
            .filter(|item| predicate(item))
            .collect())
    }
}

/// Finder over loadable modules.
pub type ModuleFinder = dyn Finder<ModuleHandle>;

/// Finder over type descriptors.
pub type TypeFinder = dyn Finder<TypeDescriptor>;
