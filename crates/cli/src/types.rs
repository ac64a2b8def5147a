use crate::ScanArgs;
use crate::output::{TypeRow, print_rows};
use lodestone_api::{Finder, TypeKind, TypeRef};
use lodestone_core::{CachedFinder, DerivedTypeScan};
use std::sync::Arc;
use tracing::info;

pub fn run(scan: &ScanArgs, base: &str, arity: usize, interface: bool) -> anyhow::Result<()> {
    let modules = lodestone_runtime::module_finder(&scan.dir, scan.config()?)?;
    let registry = Arc::new(scan.registry()?);

    let base = if arity > 0 {
        TypeRef::open(base, arity)
    } else {
        TypeRef::new(base)
    };
    let kind = if interface {
        TypeKind::Interface
    } else {
        TypeKind::Class
    };

    // The base is only known at runtime, so drive the scan directly.
    let finder = CachedFinder::new(DerivedTypeScan::new(modules, registry, base, kind)?);

    info!("Resolving types in {}...", scan.dir.display());
    let types = finder.find_all(false)?;

    let rows: Vec<TypeRow> = types.iter().map(TypeRow::from).collect();
    print_rows(rows, scan.json, "No derived types found.")
}
