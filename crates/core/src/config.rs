//! Discovery configuration.
//!
//! Defaults follow the host platform: the dynamic library extension and,
//! where the platform has one, the executable extension. Both groups can be
//! overridden through `LODESTONE_LIBRARY_EXT` / `LODESTONE_EXECUTABLE_EXT`
//! (comma separated) or by the caller.

use lodestone_api::{FinderError, FinderResult, ModuleKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const LIBRARY_EXT_ENV: &str = "LODESTONE_LIBRARY_EXT";
pub const EXECUTABLE_EXT_ENV: &str = "LODESTONE_EXECUTABLE_EXT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Extensions (without the dot) recognized as dynamic libraries
    pub library_extensions: Vec<String>,
    /// Extensions (without the dot) recognized as executables
    pub executable_extensions: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        let executable = std::env::consts::EXE_EXTENSION;
        Self {
            library_extensions: vec![std::env::consts::DLL_EXTENSION.to_string()],
            executable_extensions: if executable.is_empty() {
                Vec::new()
            } else {
                vec![executable.to_string()]
            },
        }
    }
}

impl DiscoveryConfig {
    pub fn new(
        library_extensions: impl IntoIterator<Item = impl Into<String>>,
        executable_extensions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            library_extensions: library_extensions.into_iter().map(Into::into).collect(),
            executable_extensions: executable_extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Default configuration overlaid with the environment.
    pub fn from_env() -> FinderResult<Self> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(LIBRARY_EXT_ENV) {
            config.library_extensions = split_extensions(&value);
        }
        if let Ok(value) = std::env::var(EXECUTABLE_EXT_ENV) {
            config.executable_extensions = split_extensions(&value);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FinderResult<()> {
        if self.library_extensions.is_empty() && self.executable_extensions.is_empty() {
            return Err(FinderError::Config(
                "at least one module extension is required".to_string(),
            ));
        }
        let all = self
            .library_extensions
            .iter()
            .chain(&self.executable_extensions);
        for ext in all {
            if ext.trim().is_empty() || ext.contains(['/', '\\']) {
                return Err(FinderError::Config(format!("invalid module extension: {ext:?}")));
            }
        }
        Ok(())
    }

    /// Which group `path` belongs to, if any. Matching is ASCII case-insensitive
    /// and a leading dot in the configured extension is ignored.
    pub fn classify(&self, path: &Path) -> Option<ModuleKind> {
        let ext = path.extension()?.to_str()?;
        let hit = |list: &[String]| {
            list.iter()
                .any(|candidate| candidate.trim_start_matches('.').eq_ignore_ascii_case(ext))
        };
        if hit(&self.library_extensions) {
            Some(ModuleKind::Library)
        } else if hit(&self.executable_extensions) {
            Some(ModuleKind::Executable)
        } else {
            None
        }
    }
}

fn split_extensions(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().trim_start_matches('.').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
