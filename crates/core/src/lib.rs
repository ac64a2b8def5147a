//! Discovery-and-cache core.
//!
//! ```text
//! ┌──────────────────────────┐   from_cache=true   ┌──────────────────────────┐
//! │  DerivedTypeFinder<B>    │────────────────────▶│  DirectoryModuleFinder   │
//! │  (per-instance cache)    │                     │  (per-instance cache)    │
//! └────────────┬─────────────┘                     └────────────┬─────────────┘
//!              │ types_of(module)                               │
//!              ▼                                                ▼
//! ┌──────────────────────────┐                     ┌──────────────────────────┐
//! │  TypeCatalog             │                     │  PathCache (shared)      │
//! │  (TypeRegistry)          │                     │  ModuleLoader            │
//! └──────────────────────────┘                     └──────────────────────────┘
//! ```
//!
//! Every finder is built on [`finder::CachedFinder`], which owns the
//! populated/unpopulated state and serializes scans per instance.

pub mod cache;
pub mod config;
pub mod finder;
pub mod hierarchy;
pub mod loader;
pub mod logging;
pub mod registry;

pub use cache::PathCache;
pub use config::DiscoveryConfig;
pub use finder::{CachedFinder, DerivedTypeFinder, DerivedTypeScan, DirectoryModuleFinder, Scan};
pub use loader::{ModuleLoader, NativeModuleLoader};
pub use registry::{RegistryManifest, TypeCatalog, TypeRegistry};

pub use lodestone_api::{FinderError, FinderResult};
