use lodestone_api::{ModuleHandle, TypeDescriptor};
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Tabled, Serialize)]
pub struct ModuleRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Size")]
    pub size: String,
    #[tabled(rename = "Path")]
    pub path: String,
}

impl From<&ModuleHandle> for ModuleRow {
    fn from(module: &ModuleHandle) -> Self {
        Self {
            name: module.name.clone(),
            kind: module.kind.to_string(),
            size: format_size(module.size_bytes),
            path: module.path.display().to_string(),
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct TypeRow {
    #[tabled(rename = "Type")]
    pub name: String,
    #[tabled(rename = "Module")]
    pub module: String,
    #[tabled(rename = "Base")]
    pub base: String,
}

impl From<&TypeDescriptor> for TypeRow {
    fn from(ty: &TypeDescriptor) -> Self {
        Self {
            name: ty.name.clone(),
            module: ty.module.clone(),
            base: ty.base.as_ref().map(ToString::to_string).unwrap_or_default(),
        }
    }
}

pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    }
}

/// Prints rows as a table, or as a JSON array with `json`.
pub fn print_rows<R: Tabled + Serialize>(
    rows: Vec<R>,
    json: bool,
    empty: &str,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if rows.is_empty() {
        println!("{}", empty);
    } else {
        println!("{}", Table::new(rows));
    }
    Ok(())
}
