use std::path::PathBuf;

/// Errors raised by finders.
///
/// Scan failures (`DirectoryNotFound`, `Io`, `ModuleLoad`, `TypeEnumeration`)
/// are reported to the caller that triggered the scan and never touch an
/// existing cache. `Config` is raised eagerly when a finder is built or used
/// with invalid arguments.
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load module {}: {reason}", path.display())]
    ModuleLoad { path: PathBuf, reason: String },
    #[error("Failed to enumerate types of module {module}: {reason}")]
    TypeEnumeration { module: String, reason: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl FinderError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FinderError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error came out of a scan, as opposed to a rejected configuration.
    pub fn is_scan_failure(&self) -> bool {
        !matches!(self, FinderError::Config(_))
    }
}

pub type FinderResult<T> = std::result::Result<T, FinderError>;
