mod entities;
mod modules;
mod output;
mod types;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use lodestone_core::{DiscoveryConfig, TypeRegistry};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Manifest looked up in the scanned directory when `--manifest` is not given.
pub const DEFAULT_MANIFEST: &str = "lodestone.json";

#[derive(Parser)]
#[command(
    name = "lodestone",
    version,
    about = "Discover modules and derived types in a plugin directory",
    long_about = "Lodestone scans a flat directory for native modules (libraries first, then \
                  executables) and resolves the types they declare through a type manifest, \
                  listing every concrete type deriving from a given base."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the modules found in a directory
    Modules {
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// List the concrete types deriving from a base type
    #[command(
        long_about = "Resolves the types declared by every module of the directory through the \
                            type manifest and lists the concrete strict subtypes of --base. \
                            With --arity the base is an open generic definition."
    )]
    Types {
        #[command(flatten)]
        scan: ScanArgs,
        /// Full name of the base type
        #[arg(long)]
        base: String,
        /// Generic arity of an open generic base
        #[arg(long, default_value_t = 0)]
        arity: usize,
        /// Treat the base as an interface
        #[arg(long)]
        interface: bool,
    },
    /// List entity register types, grouped by module
    Entities {
        #[command(flatten)]
        scan: ScanArgs,
    },
}

#[derive(Args, Clone)]
pub struct ScanArgs {
    /// Directory to scan (top level only)
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,
    /// Library extensions, overriding the platform default (repeatable)
    #[arg(long = "library-ext", value_name = "EXT")]
    pub library_ext: Vec<String>,
    /// Executable extensions, overriding the platform default (repeatable)
    #[arg(long = "executable-ext", value_name = "EXT")]
    pub executable_ext: Vec<String>,
    /// Type manifest (JSON). Defaults to DIR/lodestone.json
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
    /// Also log to stderr
    #[arg(long, short)]
    pub verbose: bool,
}

impl ScanArgs {
    /// Environment-derived configuration with command-line overrides.
    pub fn config(&self) -> anyhow::Result<DiscoveryConfig> {
        let mut config = DiscoveryConfig::from_env()?;
        if !self.library_ext.is_empty() {
            config.library_extensions = self.library_ext.clone();
        }
        if !self.executable_ext.is_empty() {
            config.executable_extensions = self.executable_ext.clone();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn registry(&self) -> anyhow::Result<TypeRegistry> {
        let path = self
            .manifest
            .clone()
            .unwrap_or_else(|| self.dir.join(DEFAULT_MANIFEST));
        load_registry(&path, self.manifest.is_some())
    }
}

/// An explicitly requested manifest must exist; the default one is optional.
fn load_registry(path: &Path, required: bool) -> anyhow::Result<TypeRegistry> {
    if !required && !path.exists() {
        warn!("No type manifest at {}, no types will be resolved", path.display());
        return Ok(TypeRegistry::new());
    }
    TypeRegistry::load_manifest(path)
        .with_context(|| format!("loading type manifest {}", path.display()))
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Modules { scan } | Commands::Types { scan, .. } | Commands::Entities { scan } => {
            scan.verbose
        }
    };
    let _guard = lodestone_runtime::init_logging("cli", verbose);

    match cli.command {
        Commands::Modules { scan } => modules::run(&scan),
        Commands::Types {
            scan,
            base,
            arity,
            interface,
        } => types::run(&scan, &base, arity, interface),
        Commands::Entities { scan } => entities::run(&scan),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_types_command() {
        let cli = Cli::try_parse_from([
            "lodestone",
            "types",
            "/plugins",
            "--base",
            "data.Repository",
            "--arity",
            "1",
            "--interface",
            "--library-ext",
            "dll",
            "--library-ext",
            "so",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Types {
                scan,
                base,
                arity,
                interface,
            } => {
                assert_eq!(scan.dir, PathBuf::from("/plugins"));
                assert_eq!(scan.library_ext, vec!["dll", "so"]);
                assert!(scan.json);
                assert_eq!(base, "data.Repository");
                assert_eq!(arity, 1);
                assert!(interface);
            }
            _ => panic!("expected types command"),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "lodestone",
            "modules",
            "/plugins",
            "--library-ext",
            "dll",
            "--executable-ext",
            "exe",
        ])
        .unwrap();
        let Commands::Modules { scan } = cli.command else {
            panic!("expected modules command");
        };
        let config = scan.config().unwrap();
        assert_eq!(config.library_extensions, vec!["dll"]);
        assert_eq!(config.executable_extensions, vec!["exe"]);
    }

    #[test]
    fn test_default_manifest_is_optional() {
        let temp = tempfile::tempdir().unwrap();
        let registry = load_registry(&temp.path().join(DEFAULT_MANIFEST), false).unwrap();
        assert_eq!(registry.type_count(), 0);
        assert!(load_registry(&temp.path().join("explicit.json"), true).is_err());
    }
}
