//! Derived-type finder.
//!
//! Pulls the module universe from a module finder (always from its cache),
//! enumerates every type of every module through a [`TypeCatalog`] and keeps
//! the concrete strict subtypes of the base type `B`.

use crate::finder::cached::{CachedFinder, Scan, distinct};
use crate::hierarchy::{TypeIndex, derives_from};
use crate::registry::TypeCatalog;
use lodestone_api::{
    Finder, FinderError, FinderResult, ModuleFinder, TypeDescriptor, TypeKey, TypeKind, TypeRef,
};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Scan for the concrete subtypes of a base type given at runtime.
///
/// [`DerivedTypeFinder`] fixes the base at compile time; use this scan with a
/// [`CachedFinder`] directly when the base is only known at runtime.
pub struct DerivedTypeScan {
    modules: Arc<ModuleFinder>,
    catalog: Arc<dyn TypeCatalog>,
    base: TypeRef,
    base_kind: TypeKind,
    name: String,
}

impl DerivedTypeScan {
    pub fn new(
        modules: Arc<ModuleFinder>,
        catalog: Arc<dyn TypeCatalog>,
        base: TypeRef,
        base_kind: TypeKind,
    ) -> FinderResult<Self> {
        if base.name.trim().is_empty() {
            return Err(FinderError::Config("base type name is empty".to_string()));
        }
        let name = format!("derived type finder ({base})");
        Ok(Self {
            modules,
            catalog,
            base,
            base_kind,
            name,
        })
    }

    pub fn base(&self) -> &TypeRef {
        &self.base
    }
}

impl Scan for DerivedTypeScan {
    type Item = TypeDescriptor;

    fn scan(&self) -> FinderResult<Vec<TypeDescriptor>> {
        let start = Instant::now();
        let modules = self.modules.find_all(true)?;

        // Any module failing to enumerate aborts the whole scan.
        let mut universe = Vec::new();
        for module in &modules {
            universe.extend(self.catalog.types_of(module)?);
        }

        let index = TypeIndex::new(&universe);
        let derived: Vec<TypeDescriptor> = universe
            .iter()
            .filter(|ty| derives_from(ty, &self.base, self.base_kind, &index))
            .cloned()
            .collect();
        let derived = distinct(derived);

        info!(
            "Found {} types deriving from {} among {} types in {} modules in {:?}",
            derived.len(),
            self.base,
            universe.len(),
            modules.len(),
            start.elapsed()
        );
        Ok(derived)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Finder over the concrete types deriving from `B`.
pub struct DerivedTypeFinder<B: TypeKey> {
    inner: CachedFinder<DerivedTypeScan>,
    _base: PhantomData<fn() -> B>,
}

impl<B: TypeKey> DerivedTypeFinder<B> {
    /// Creates an Unpopulated finder. A base key with an empty name is rejected.
    pub fn new(modules: Arc<ModuleFinder>, catalog: Arc<dyn TypeCatalog>) -> FinderResult<Self> {
        let scan = DerivedTypeScan::new(modules, catalog, B::type_ref(), B::kind())?;
        Ok(Self {
            inner: CachedFinder::new(scan),
            _base: PhantomData,
        })
    }

    pub fn base(&self) -> &TypeRef {
        self.inner.scanner().base()
    }

    pub fn is_populated(&self) -> bool {
        self.inner.is_populated()
    }

    pub fn scan_count(&self) -> usize {
        self.inner.scan_count()
    }
}

impl<B: TypeKey> Finder<TypeDescriptor> for DerivedTypeFinder<B> {
    fn find_all(&self, from_cache: bool) -> FinderResult<Vec<TypeDescriptor>> {
        self.inner.find_all(from_cache)
    }
}
