//! Build-time type registry.
//!
//! Types cannot be reflected out of native modules, so every discoverable
//! type is registered up front, attributed to the module (by name) that
//! declares it. A [`TypeCatalog`] then answers "which types does this loaded
//! module declare" during a derived-type scan.

pub mod manifest;

pub use manifest::{ModuleManifest, RegistryManifest};

use indexmap::IndexMap;
use lodestone_api::{FinderError, FinderResult, ModuleHandle, TypeDescriptor};
use parking_lot::RwLock;
use std::path::Path;

/// Enumerates the types declared by a module.
pub trait TypeCatalog: Send + Sync {
    fn types_of(&self, module: &ModuleHandle) -> FinderResult<Vec<TypeDescriptor>>;
}

#[derive(Debug, Default)]
struct RegistryInner {
    modules: IndexMap<String, ModuleManifest>,
    types: IndexMap<String, Vec<TypeDescriptor>>,
}

/// Thread-safe in-memory type registry.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    inner: RwLock<RegistryInner>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module and the modules it depends on. Re-registering a
    /// module replaces its dependency list.
    pub fn register_module<I, S>(&self, name: impl Into<String>, dependencies: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let manifest = ModuleManifest {
            name: name.clone(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
        };
        self.inner.write().modules.insert(name, manifest);
        self
    }

    /// Registers a type under its module, registering the module if needed.
    /// A type with the same identity replaces the earlier registration.
    pub fn register_type(&self, ty: TypeDescriptor) -> &Self {
        let mut inner = self.inner.write();
        if !inner.modules.contains_key(&ty.module) {
            inner
                .modules
                .insert(ty.module.clone(), ModuleManifest::new(ty.module.clone()));
        }
        let declared = inner.types.entry(ty.module.clone()).or_default();
        match declared.iter_mut().find(|existing| **existing == ty) {
            Some(existing) => *existing = ty,
            None => declared.push(ty),
        }
        self
    }

    pub fn register_types(&self, types: impl IntoIterator<Item = TypeDescriptor>) -> &Self {
        for ty in types {
            self.register_type(ty);
        }
        self
    }

    pub fn from_manifest(manifest: RegistryManifest) -> Self {
        let registry = Self::new();
        for module in manifest.modules {
            registry.register_module(module.name, module.dependencies);
        }
        registry.register_types(manifest.types);
        registry
    }

    /// Reads a JSON manifest from disk.
    pub fn load_manifest(path: &Path) -> FinderResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FinderError::io(path, e))?;
        let manifest: RegistryManifest = serde_json::from_str(&content).map_err(|e| {
            FinderError::Config(format!("invalid manifest {}: {e}", path.display()))
        })?;
        Ok(Self::from_manifest(manifest))
    }

    pub fn to_manifest(&self) -> RegistryManifest {
        let inner = self.inner.read();
        RegistryManifest {
            modules: inner.modules.values().cloned().collect(),
            types: inner.types.values().flatten().cloned().collect(),
        }
    }

    pub fn module_count(&self) -> usize {
        self.inner.read().modules.len()
    }

    pub fn type_count(&self) -> usize {
        self.inner.read().types.values().map(Vec::len).sum()
    }
}

impl TypeCatalog for TypeRegistry {
    fn types_of(&self, module: &ModuleHandle) -> FinderResult<Vec<TypeDescriptor>> {
        let inner = self.inner.read();
        let Some(manifest) = inner.modules.get(module.name()) else {
            return Ok(Vec::new());
        };

        if let Some(missing) = manifest
            .dependencies
            .iter()
            .find(|dep| !inner.modules.contains_key(dep.as_str()))
        {
            return Err(FinderError::TypeEnumeration {
                module: module.name().to_string(),
                reason: format!("unresolved dependency {missing}"),
            });
        }

        Ok(inner.types.get(module.name()).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestone_api::{ModuleKind, TypeRef};
    use std::path::PathBuf;

    fn handle(name: &str) -> ModuleHandle {
        ModuleHandle::new(PathBuf::from(format!("/mods/{name}.dll")), ModuleKind::Library, 0)
    }

    #[test]
    fn test_types_attributed_by_module_name() {
        let registry = TypeRegistry::new();
        registry
            .register_type(TypeDescriptor::class("zoo", "zoo.Dog"))
            .register_type(TypeDescriptor::class("zoo", "zoo.Cat"))
            .register_type(TypeDescriptor::class("farm", "farm.Cow"));

        let zoo: Vec<_> = registry
            .types_of(&handle("zoo"))
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(zoo, vec!["zoo.Dog", "zoo.Cat"]);
        assert_eq!(registry.module_count(), 2);
        assert_eq!(registry.type_count(), 3);
    }

    #[test]
    fn test_unregistered_module_has_no_types() {
        let registry = TypeRegistry::new();
        assert!(registry.types_of(&handle("native")).unwrap().is_empty());
    }

    #[test]
    fn test_reregistering_type_replaces_it() {
        let registry = TypeRegistry::new();
        registry.register_type(TypeDescriptor::class("zoo", "zoo.Dog"));
        registry.register_type(
            TypeDescriptor::class("zoo", "zoo.Dog").extends(TypeRef::new("zoo.Animal")),
        );
        let types = registry.types_of(&handle("zoo")).unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].base, Some(TypeRef::new("zoo.Animal")));
    }

    #[test]
    fn test_unresolved_dependency_fails_enumeration() {
        let registry = TypeRegistry::new();
        registry.register_module("plugins", ["shared"]);
        registry.register_type(TypeDescriptor::class("plugins", "plugins.Export"));

        let err = registry.types_of(&handle("plugins")).unwrap_err();
        assert!(matches!(
            err,
            FinderError::TypeEnumeration { ref module, .. } if module == "plugins"
        ));

        registry.register_module("shared", Vec::<String>::new());
        assert_eq!(registry.types_of(&handle("plugins")).unwrap().len(), 1);
    }

    #[test]
    fn test_manifest_round_trip_through_file() {
        let registry = TypeRegistry::new();
        registry.register_module("app", ["core"]);
        registry.register_module("core", Vec::<String>::new());
        registry.register_type(TypeDescriptor::interface("core", "core.Entity"));
        registry.register_type(
            TypeDescriptor::class("app", "app.User").implements(TypeRef::new("core.Entity")),
        );

        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("types.json");
        std::fs::write(&path, serde_json::to_string_pretty(&registry.to_manifest()).unwrap())
            .unwrap();

        let loaded = TypeRegistry::load_manifest(&path).unwrap();
        assert_eq!(loaded.module_count(), 2);
        assert_eq!(loaded.type_count(), 2);
        assert_eq!(loaded.types_of(&handle("app")).unwrap()[0].name, "app.User");
    }

    #[test]
    fn test_invalid_manifest_is_config_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("types.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            TypeRegistry::load_manifest(&path),
            Err(FinderError::Config(_))
        ));
    }
}
