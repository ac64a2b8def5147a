use crate::ScanArgs;
use crate::output::{ModuleRow, print_rows};
use lodestone_api::Finder;
use tracing::info;

pub fn run(scan: &ScanArgs) -> anyhow::Result<()> {
    let finder = lodestone_runtime::module_finder(&scan.dir, scan.config()?)?;

    info!("Scanning modules in {}...", scan.dir.display());
    let modules = finder.find_all(false)?;

    let rows: Vec<ModuleRow> = modules.iter().map(ModuleRow::from).collect();
    print_rows(rows, scan.json, "No modules found.")
}
