use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Which extension group a module was discovered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Library,
    Executable,
}

impl ModuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Library => "library",
            ModuleKind::Executable => "executable",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loaded module.
///
/// Identity is the canonical absolute path: two handles loaded through
/// different aliases of the same file compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleHandle {
    /// Canonical absolute path of the module file
    pub path: PathBuf,
    /// Symbolic name (file stem), used to attribute types to the module
    pub name: String,
    pub kind: ModuleKind,
    /// File size in bytes at load time
    pub size_bytes: u64,
}

impl ModuleHandle {
    pub fn new(path: PathBuf, kind: ModuleKind, size_bytes: u64) -> Self {
        let name = module_name(&path);
        Self {
            path,
            name,
            kind,
            size_bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// File stem of a module path, or the full file name when there is no stem.
pub fn module_name(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl PartialEq for ModuleHandle {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for ModuleHandle {}

impl Hash for ModuleHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl fmt::Display for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path.display())
    }
}
