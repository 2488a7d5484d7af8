//! `fivebind init`: starter configuration.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::config::{FivebindConfig, CONFIG_FILE};

/// Write a starter `fivebind.toml` into `dir`.
pub fn run(dir: &Path, header: &str) -> Result<()> {
    write_config(dir, header)?;

    println!("Created {CONFIG_FILE}");
    println!("  source: {header}");
    println!("  edit [modules] to choose a calling convention per stdlib section");
    Ok(())
}

pub(crate) fn write_config(dir: &Path, header: &str) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        bail!("'{}' already exists", path.display());
    }
    fs::write(&path, FivebindConfig::template(header))
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), "include/stdlib.h").unwrap();

        let (config, base_dir) = FivebindConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(base_dir, dir.path());
        assert_eq!(config.source_label(), "include/stdlib.h");
        assert_eq!(config.output.import_root.as_deref(), Some("crate"));
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "# mine\n").unwrap();

        let err = run(dir.path(), "stdlib.h").unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap(), "# mine\n");
    }
}
