use lodestone_api::{FinderResult, TypeKey};
use lodestone_core::{
    DerivedTypeFinder, DirectoryModuleFinder, DiscoveryConfig, PathCache, TypeCatalog,
};
use lodestone_entity::{EntityManager, EntityRegisterMarker, RegisterFactories};
use std::path::PathBuf;
use std::sync::Arc;

/// Module finder for `dir` backed by the process-wide path cache.
///
/// Finders built here share discovered modules with every other finder
/// built here for the same directory.
pub fn module_finder(
    dir: impl Into<PathBuf>,
    config: DiscoveryConfig,
) -> FinderResult<Arc<DirectoryModuleFinder>> {
    let dir = dir.into();
    tracing::debug!("Building module finder for {}", dir.display());
    Ok(Arc::new(DirectoryModuleFinder::with_config(
        dir,
        PathCache::shared(),
        config,
    )?))
}

/// Derived-type finder for `B` over the modules of `dir`.
pub fn derived_type_finder<B: TypeKey>(
    dir: impl Into<PathBuf>,
    config: DiscoveryConfig,
    catalog: Arc<dyn TypeCatalog>,
) -> FinderResult<Arc<DerivedTypeFinder<B>>> {
    let modules = module_finder(dir, config)?;
    Ok(Arc::new(DerivedTypeFinder::<B>::new(modules, catalog)?))
}

/// Entity manager over the entity registers found in `dir`. Not yet initialized.
pub fn entity_manager(
    dir: impl Into<PathBuf>,
    config: DiscoveryConfig,
    catalog: Arc<dyn TypeCatalog>,
    factories: RegisterFactories,
) -> FinderResult<EntityManager> {
    let finder = derived_type_finder::<EntityRegisterMarker>(dir, config, catalog)?;
    Ok(EntityManager::new(finder, factories))
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(lodestone_core::logging::init_logging(component, to_stderr))
}
