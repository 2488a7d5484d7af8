//! Generates the stdlib wrappers from the bundled header into `OUT_DIR`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use fivebind_emit::{AssembleOptions, CallingConvention, ConventionPlan, Provenance};

fn main() -> Result<()> {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);
    let header = manifest_dir.join("stdlib.h");
    println!("cargo:rerun-if-changed={}", header.display());

    let table = fivebind_core::load_header(&header, fivebind_core::DEFAULT_SYMBOL_PREFIX)
        .with_context(|| format!("parsing {}", header.display()))?;

    let plan = ConventionPlan::new()
        .with("csg", CallingConvention::Receiver)
        .with("transforms", CallingConvention::Receiver)
        .with("shapes", CallingConvention::Free)
        .with("generators", CallingConvention::Free);
    let user = std::env::var("USER").unwrap_or_else(|_| "cargo".to_string());
    let options =
        AssembleOptions::new("stdlib.h", Provenance::now(&user)).with_import_root("crate");

    let mut units = fivebind_emit::assemble_table(&table, &plan, &options)?;
    units.push(fivebind_emit::text_unit(&options));

    for unit in &units {
        let path = out_dir.join(unit.file_name());
        std::fs::write(&path, &unit.source).with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}
