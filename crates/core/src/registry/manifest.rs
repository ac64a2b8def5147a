use lodestone_api::TypeDescriptor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl ModuleManifest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
        }
    }
}

/// Serializable description of a [`super::TypeRegistry`].
///
/// ```json
/// {
///   "modules": [{ "name": "app", "dependencies": ["core"] }, { "name": "core" }],
///   "types": [{ "name": "app.User", "module": "app", "interfaces": [{ "name": "core.Entity" }] }]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryManifest {
    #[serde(default)]
    pub modules: Vec<ModuleManifest>,
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}
