use lodestone_core::DiscoveryConfig;
use std::fs;
use std::path::Path;

/// Minimal PE header, enough for the native loader to accept the file.
pub const PE_HEADER: &[u8] = b"MZ\x90\x00\x03\x00\x00\x00";

#[allow(dead_code)]
pub fn dll_exe_config() -> DiscoveryConfig {
    DiscoveryConfig::new(["dll"], ["exe"])
}

/// Writes a module file accepted by the native loader.
#[allow(dead_code)]
pub fn write_module(dir: &Path, file_name: &str) {
    fs::write(dir.join(file_name), PE_HEADER).unwrap();
}

/// Creates `alias` as another name for `target` in `dir`.
#[cfg(unix)]
#[allow(dead_code)]
pub fn alias_module(dir: &Path, target: &str, alias: &str) {
    std::os::unix::fs::symlink(dir.join(target), dir.join(alias)).unwrap();
}
