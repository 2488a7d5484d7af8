//! `fivebind generate`: assemble every configured module and write it out.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use fivebind_core::DescriptorTable;
use fivebind_emit::text::TEXT_MODULE_NAME;
use fivebind_emit::{AssembleOptions, AssembledUnit, EmitError, Provenance};
use log::info;
use tempfile::NamedTempFile;

use crate::config::FivebindConfig;

/// Generate bindings for `selected` modules (all configured ones if empty).
///
/// Every unit is assembled before anything is written, so a schema error
/// leaves the output directory untouched.
pub fn run(
    config: &FivebindConfig,
    base_dir: &Path,
    output: Option<&Path>,
    selected: &[String],
    dry_run: bool,
) -> Result<()> {
    let table = config.load_table(base_dir)?;
    let provenance = Provenance::now(&current_user());
    let units = assemble_units(config, &table, selected, provenance)?;
    if units.is_empty() {
        println!("No modules selected, nothing to generate.");
        return Ok(());
    }

    if dry_run {
        for unit in &units {
            println!("// ---- {} ----", unit.file_name());
            print!("{}", unit.source);
        }
        return Ok(());
    }

    let out_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| base_dir.join(&config.output.dir));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    for unit in &units {
        let path = write_atomic(&out_dir, &unit.file_name(), &unit.source)?;
        info!("wrote {} ({} functions)", path.display(), unit.function_count);
    }
    if config.output.index {
        write_atomic(&out_dir, "mod.rs", &render_index(&planned_modules(config, &table)))?;
    }

    let functions: usize = units.iter().map(|u| u.function_count).sum();
    println!(
        "Generated {} modules ({functions} functions) -> {}",
        units.len(),
        out_dir.display()
    );
    Ok(())
}

/// Assemble the requested units in memory.
pub(crate) fn assemble_units(
    config: &FivebindConfig,
    table: &DescriptorTable,
    selected: &[String],
    provenance: Provenance,
) -> Result<Vec<AssembledUnit>> {
    let source = config.source_label();

    let mut options = AssembleOptions::new(&source, provenance).with_naming(config.naming.clone());
    if let Some(root) = &config.output.import_root {
        options = options.with_import_root(root);
    }
    if config.output.text && table.module(TEXT_MODULE_NAME).is_some() {
        info!("table section '{TEXT_MODULE_NAME}' is superseded by the hand-written text unit");
    }

    let mut units = if selected.is_empty() {
        fivebind_emit::assemble_table(table, &config.plan(), &options).map_err(schema_context)?
    } else {
        let wanted: Vec<String> = selected
            .iter()
            .filter(|name| !(config.output.text && name.as_str() == TEXT_MODULE_NAME))
            .cloned()
            .collect();
        for name in &wanted {
            if table.module(name).is_none() {
                bail!("module '{name}' not found in {source}");
            }
        }
        let plan = config.plan_for(&wanted)?;

        let mut units = Vec::new();
        for module in table.modules().filter(|m| wanted.contains(&m.name)) {
            let Some(convention) = plan.for_module(&module.name) else {
                continue;
            };
            let source =
                fivebind_emit::assemble(module, convention, &options).map_err(schema_context)?;
            units.push(AssembledUnit {
                module: module.name.clone(),
                convention: Some(convention),
                function_count: module.len(),
                source,
            });
        }
        units
    };

    let text_selected = selected.is_empty() || selected.iter().any(|s| s == TEXT_MODULE_NAME);
    if config.output.text && text_selected {
        units.push(fivebind_emit::text_unit(&options));
    }
    Ok(units)
}

/// Every module a full run writes, in output order.
fn planned_modules(config: &FivebindConfig, table: &DescriptorTable) -> Vec<String> {
    let plan = config.plan();
    let mut modules: Vec<String> = table
        .modules()
        .filter(|m| plan.for_module(&m.name).is_some())
        .map(|m| m.name.clone())
        .collect();
    if config.output.text {
        modules.push(TEXT_MODULE_NAME.to_string());
    }
    modules
}

fn schema_context(e: EmitError) -> anyhow::Error {
    if e.is_schema_error() {
        anyhow::Error::new(e).context("descriptor table failed schema validation")
    } else {
        anyhow::Error::new(e)
    }
}

/// Identity recorded in the provenance banner.
pub(crate) fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

fn render_index(modules: &[String]) -> String {
    let mut out = String::from(
        "//\n\
         // Module index for the generated libfive stdlib bindings.\n\
         //\n\
         // DO NOT EDIT BY HAND!\n\
         //\n\n",
    );
    for module in modules {
        out.push_str(&format!("pub mod {module};\n"));
    }
    out
}

/// Write `contents` to `dir/name` through a temporary file in the same directory.
fn write_atomic(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;
    tmp.persist(&path)
        .with_context(|| format!("persisting {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "\
LIBFIVE_SECTION(shapes)
LIBFIVE_STDLIB circle(tfloat r, tvec2 center);
LIBFIVE_SECTION(csg)
LIBFIVE_STDLIB union(libfive_tree a, libfive_tree b);
LIBFIVE_SECTION(extras)
LIBFIVE_STDLIB twist(libfive_tree t, tfloat amount);
";

    const TEXT_SECTION: &str = "\
LIBFIVE_SECTION(text)
LIBFIVE_STDLIB text(const char* txt, tvec2 pos);
";

    const BASIC: &str = r#"
[source]
header = "stdlib.h"

[output]
dir = "out"
import-root = "crate"
index = true

[modules]
shapes = "free"
csg = "receiver"
"#;

    fn setup(config_toml: &str) -> (tempfile::TempDir, FivebindConfig) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stdlib.h"), HEADER).unwrap();
        let config = FivebindConfig::parse(config_toml).unwrap();
        (dir, config)
    }

    fn units_for(
        config: &FivebindConfig,
        dir: &Path,
        selected: &[&str],
    ) -> Result<Vec<AssembledUnit>> {
        let table = config.load_table(dir)?;
        let selected: Vec<String> = selected.iter().map(|s| s.to_string()).collect();
        assemble_units(config, &table, &selected, Provenance::fixed("t", "u"))
    }

    fn module_names(units: &[AssembledUnit]) -> Vec<&str> {
        units.iter().map(|u| u.module.as_str()).collect()
    }

    #[test]
    fn unlisted_modules_are_skipped() {
        let (dir, config) = setup(BASIC);
        let units = units_for(&config, dir.path(), &[]).unwrap();
        assert_eq!(module_names(&units), ["shapes", "csg", "text"]);
    }

    #[test]
    fn default_convention_covers_unlisted_modules() {
        let with_default =
            BASIC.replace("index = true", "index = true\ndefault-convention = \"receiver\"");
        let (dir, config) = setup(&with_default);
        let units = units_for(&config, dir.path(), &[]).unwrap();
        let extras = units.iter().find(|u| u.module == "extras").unwrap();
        assert!(extras.source.contains("pub fn twist(self, amount: TreeFloat) -> Self {"));
    }

    #[test]
    fn hand_written_text_replaces_table_section() {
        let with_text = BASIC.replace("csg = \"receiver\"", "csg = \"receiver\"\ntext = \"free\"");
        let (dir, config) = setup(&with_text);
        std::fs::write(dir.path().join("stdlib.h"), format!("{HEADER}{TEXT_SECTION}")).unwrap();

        let units = units_for(&config, dir.path(), &[]).unwrap();
        let texts: Vec<_> = units.iter().filter(|u| u.module == "text").collect();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].convention, None);
        assert!(texts[0].source.contains("Result<Self, std::ffi::NulError>"));
    }

    #[test]
    fn text_section_not_checked_against_default_convention() {
        let with_default =
            BASIC.replace("index = true", "index = true\ndefault-convention = \"receiver\"");
        let (dir, config) = setup(&with_default);
        std::fs::write(dir.path().join("stdlib.h"), format!("{HEADER}{TEXT_SECTION}")).unwrap();

        let units = units_for(&config, dir.path(), &[]).unwrap();
        assert_eq!(module_names(&units), ["shapes", "csg", "extras", "text"]);
        assert_eq!(units[3].convention, None);
    }

    #[test]
    fn text_can_be_disabled() {
        let (dir, config) = setup(&BASIC.replace("index = true", "index = true\ntext = false"));
        let units = units_for(&config, dir.path(), &[]).unwrap();
        assert!(units.iter().all(|u| u.module != "text"));
    }

    #[test]
    fn selecting_text_only() {
        let (dir, config) = setup(BASIC);
        let units = units_for(&config, dir.path(), &["text"]).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].file_name(), "text.rs");
    }

    #[test]
    fn selecting_unknown_module_fails() {
        let (dir, config) = setup(BASIC);
        let err = units_for(&config, dir.path(), &["nope"]).unwrap_err();
        assert!(err.to_string().contains("'nope' not found"));

        let err = units_for(&config, dir.path(), &["extras"]).unwrap_err();
        assert!(err.to_string().contains("no calling convention"));
    }

    #[test]
    fn writes_units_and_index() {
        let (dir, config) = setup(BASIC);
        run(&config, dir.path(), None, &[], false).unwrap();

        let out = dir.path().join("out");
        let index = std::fs::read_to_string(out.join("mod.rs")).unwrap();
        assert!(index.contains("pub mod shapes;\npub mod csg;\npub mod text;\n"));

        let csg = std::fs::read_to_string(out.join("csg.rs")).unwrap();
        assert!(csg.contains("pub fn union(self, b: Tree) -> Self {"));
        assert!(csg.contains("It was last generated on"));

        let leftovers: Vec<_> = std::fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .filter(|n| !n.ends_with(".rs"))
            .collect();
        assert!(leftovers.is_empty(), "temporary files left behind: {leftovers:?}");
    }

    #[test]
    fn partial_generate_keeps_full_index() {
        let (dir, config) = setup(BASIC);
        run(&config, dir.path(), None, &[], false).unwrap();
        run(&config, dir.path(), None, &["csg".to_string()], false).unwrap();

        let out = dir.path().join("out");
        assert!(out.join("shapes.rs").is_file());
        let index = std::fs::read_to_string(out.join("mod.rs")).unwrap();
        assert!(index.contains("pub mod shapes;\npub mod csg;\npub mod text;\n"));
    }

    #[test]
    fn regenerate_overwrites() {
        let (dir, config) = setup(BASIC);
        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("shapes.rs"), "stale").unwrap();

        run(&config, dir.path(), None, &[], false).unwrap();
        let shapes = std::fs::read_to_string(out.join("shapes.rs")).unwrap();
        assert!(shapes.starts_with("//\n// Rust API for the libfive standard library's 'shapes'"));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let (dir, config) = setup(BASIC);
        run(&config, dir.path(), None, &[], true).unwrap();
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn table_module_cannot_name_a_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("stdlib.toml"),
            "[library]\nname = \"lib\"\n\n[[functions]]\nname = \"f\"\nmodule = \"../escaped\"\n",
        )
        .unwrap();
        let config = FivebindConfig::parse(
            "[source]\n\
             table = \"stdlib.toml\"\n\
             [output]\n\
             dir = \"out\"\n\
             default-convention = \"free\"\n",
        )
        .unwrap();

        let err = run(&config, dir.path(), None, &[], false).unwrap_err();
        assert!(format!("{err:#}").contains("not an identifier"));
        assert!(!dir.path().join("escaped.rs").exists());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn user_has_fallback() {
        assert!(!current_user().is_empty());
    }
}
