//! Finder implementations.
//!
//! [`CachedFinder`] is the shared core; the concrete finders only provide a
//! [`Scan`] and delegate everything else to it.

pub mod cached;
pub mod derived;
pub mod directory;

pub use cached::{CachedFinder, Scan};
pub use derived::{DerivedTypeFinder, DerivedTypeScan};
pub use directory::{DirectoryModuleFinder, DirectoryScan};
