//! `fivebind check`: assemble everything, write nothing.

use std::path::Path;

use anyhow::Result;
use fivebind_emit::Provenance;

use super::generate::{assemble_units, current_user};
use crate::config::FivebindConfig;

/// Validate the descriptor source against the configured conventions.
pub fn run(config: &FivebindConfig, base_dir: &Path) -> Result<()> {
    let table = config.load_table(base_dir)?;
    let units = assemble_units(config, &table, &[], Provenance::now(&current_user()))?;
    let functions: usize = units.iter().map(|u| u.function_count).sum();
    println!(
        "ok: {} modules, {functions} functions from {}",
        units.len(),
        config.source_label()
    );
    Ok(())
}
