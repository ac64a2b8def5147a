//! Module loading.
//!
//! Loading validates that a file is a native binary module and produces a
//! [`ModuleHandle`] keyed by the canonical path. Handles are never unloaded.

use lodestone_api::{FinderError, FinderResult, ModuleHandle, ModuleKind};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Loads a single module file.
pub trait ModuleLoader: Send + Sync {
    fn load(&self, path: &Path, kind: ModuleKind) -> FinderResult<ModuleHandle>;

    /// Loader name (for logging/debugging)
    fn name(&self) -> &str;
}

const ELF_MAGIC: &[u8] = b"\x7fELF";
const PE_MAGIC: &[u8] = b"MZ";
const MACHO_MAGICS: [[u8; 4]; 5] = [
    [0xfe, 0xed, 0xfa, 0xce],
    [0xfe, 0xed, 0xfa, 0xcf],
    [0xce, 0xfa, 0xed, 0xfe],
    [0xcf, 0xfa, 0xed, 0xfe],
    [0xca, 0xfe, 0xba, 0xbe],
];

/// Binary container format recognized from a file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryFormat {
    Elf,
    Pe,
    MachO,
}

pub fn detect_format(header: &[u8]) -> Option<BinaryFormat> {
    if header.starts_with(ELF_MAGIC) {
        Some(BinaryFormat::Elf)
    } else if header.starts_with(PE_MAGIC) {
        Some(BinaryFormat::Pe)
    } else if MACHO_MAGICS.iter().any(|m| header.starts_with(m)) {
        Some(BinaryFormat::MachO)
    } else {
        None
    }
}

/// Loader accepting ELF, PE and Mach-O files.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeModuleLoader;

impl NativeModuleLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ModuleLoader for NativeModuleLoader {
    fn load(&self, path: &Path, kind: ModuleKind) -> FinderResult<ModuleHandle> {
        let canonical = path.canonicalize().map_err(|e| FinderError::ModuleLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut file = File::open(&canonical).map_err(|e| FinderError::ModuleLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let size_bytes = file
            .metadata()
            .map_err(|e| FinderError::io(&canonical, e))?
            .len();

        let mut header = [0u8; 4];
        let read = read_prefix(&mut file, &mut header).map_err(|e| FinderError::io(&canonical, e))?;
        if detect_format(&header[..read]).is_none() {
            return Err(FinderError::ModuleLoad {
                path: path.to_path_buf(),
                reason: "not a native binary module".to_string(),
            });
        }

        Ok(ModuleHandle::new(canonical, kind, size_bytes))
    }

    fn name(&self) -> &str {
        "native"
    }
}

/// Reads up to `buf.len()` bytes, stopping early at end of file.
fn read_prefix(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}
