use super::ui;
use crate::core::config::AppConfig;
use crate::core::normalize::normalize_workbook;
use anyhow::{Context, Result};

pub fn run(config: &AppConfig) -> Result<()> {
    let paths = &config.paths;
    let table = normalize_workbook(&paths.workbook, &paths.table)
        .with_context(|| format!("Failed to normalize {}", paths.workbook.display()))?;

    println!(
        "{} {} funds, {} columns -> {}",
        ui::style_text("Normalized", ui::StyleType::Label),
        table.len(),
        table.headers.len(),
        paths.table.display()
    );
    Ok(())
}
