use crate::ScanArgs;
use crate::output::{TypeRow, print_rows};
use lodestone_api::Finder;
use lodestone_entity::EntityRegisterMarker;
use std::sync::Arc;
use tracing::info;

pub fn run(scan: &ScanArgs) -> anyhow::Result<()> {
    let registry = Arc::new(scan.registry()?);
    let finder = lodestone_runtime::derived_type_finder::<EntityRegisterMarker>(
        &scan.dir,
        scan.config()?,
        registry,
    )?;

    info!("Looking for entity registers in {}...", scan.dir.display());
    let mut registers = finder.find_all(false)?;
    registers.sort_by(|a, b| a.module.cmp(&b.module));

    let rows: Vec<TypeRow> = registers.iter().map(TypeRow::from).collect();
    print_rows(rows, scan.json, "No entity registers found.")
}
