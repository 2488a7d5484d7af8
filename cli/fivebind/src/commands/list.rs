//! `fivebind list`: show the modules of the descriptor source.

use std::path::Path;

use anyhow::{bail, Result};
use fivebind_emit::text::TEXT_MODULE_NAME;
use fivebind_emit::CallingConvention;
use serde::Serialize;

use crate::config::FivebindConfig;

#[derive(Debug, Serialize)]
struct ModuleSummary {
    name: String,
    functions: usize,
    /// `None` when the module is skipped.
    convention: Option<CallingConvention>,
    hand_written: bool,
}

/// Print every module, its function count and the convention it is generated with.
pub fn run(config: &FivebindConfig, base_dir: &Path, format: &str) -> Result<()> {
    let summaries = summarize(config, base_dir)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&summaries)?),
        "text" => {
            println!("{:<16} {:>9}  CONVENTION", "MODULE", "FUNCTIONS");
            for s in &summaries {
                let convention = match (s.hand_written, s.convention) {
                    (true, _) => "hand-written".to_string(),
                    (false, Some(c)) => c.to_string(),
                    (false, None) => "skipped".to_string(),
                };
                println!("{:<16} {:>9}  {convention}", s.name, s.functions);
            }
        }
        other => bail!("unknown format '{other}' (expected text or json)"),
    }
    Ok(())
}

fn summarize(config: &FivebindConfig, base_dir: &Path) -> Result<Vec<ModuleSummary>> {
    let table = config.load_table(base_dir)?;
    let plan = config.plan();

    let mut summaries: Vec<ModuleSummary> = table
        .modules()
        .filter(|m| !plan.is_excluded(&m.name))
        .map(|m| ModuleSummary {
            name: m.name.clone(),
            functions: m.len(),
            convention: plan.for_module(&m.name),
            hand_written: false,
        })
        .collect();
    if config.output.text {
        summaries.push(ModuleSummary {
            name: TEXT_MODULE_NAME.to_string(),
            functions: 1,
            convention: None,
            hand_written: true,
        });
    }
    Ok(summaries)
}
