//! fivebind CLI: generates the Rust bindings for the libfive standard library.

mod commands;
mod config;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use config::FivebindConfig;

#[derive(Parser)]
#[command(name = "fivebind", version, about = "Rust binding generator for the libfive stdlib")]
struct Cli {
    /// Config file (default: search upward for fivebind.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter fivebind.toml in the current directory
    Init {
        /// stdlib header the config points at
        #[arg(long, default_value = "libfive/stdlib/stdlib.h")]
        header: String,
    },
    /// Generate one Rust source file per stdlib module
    Generate {
        /// Output directory (overrides [output] dir)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Only generate these modules (repeatable)
        #[arg(long = "module")]
        modules: Vec<String>,
        /// Print generated sources instead of writing them
        #[arg(long)]
        dry_run: bool,
    },
    /// List stdlib modules and the convention each is generated with
    List {
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Assemble every module without writing anything
    Check,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { header } => commands::init::run(&cwd, &header),

        Commands::Generate {
            output,
            modules,
            dry_run,
        } => {
            let (config, base_dir) = load_config(&cwd, cli.config.as_deref())?;
            let output = output.map(|dir| cwd.join(dir));
            commands::generate::run(&config, &base_dir, output.as_deref(), &modules, dry_run)
        }

        Commands::List { format } => {
            let (config, base_dir) = load_config(&cwd, cli.config.as_deref())?;
            commands::list::run(&config, &base_dir, &format)
        }

        Commands::Check => {
            let (config, base_dir) = load_config(&cwd, cli.config.as_deref())?;
            commands::check::run(&config, &base_dir)
        }
    }
}

/// Load the config named on the command line, or search for one.
fn load_config(cwd: &Path, explicit: Option<&Path>) -> anyhow::Result<(FivebindConfig, PathBuf)> {
    if let Some(path) = explicit {
        return FivebindConfig::load(&cwd.join(path));
    }
    match FivebindConfig::find_and_load(cwd)? {
        Some((config, dir)) => Ok((config, dir)),
        None => anyhow::bail!("no fivebind.toml found (run `fivebind init` first)"),
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    const HEADER: &str = "\
#pragma once
LIBFIVE_SECTION(shapes)
LIBFIVE_STDLIB circle(
    // A 2D circle with the given radius and optional center
    tfloat r, tvec2 center);
LIBFIVE_STDLIB polygon(tfloat r, int n, tvec2 center);

LIBFIVE_SECTION(csg)
LIBFIVE_STDLIB union(libfive_tree a, libfive_tree b);

LIBFIVE_SECTION(transforms)
LIBFIVE_STDLIB move(libfive_tree t, tvec3 offset);

LIBFIVE_SECTION(generators)
LIBFIVE_STDLIB array_x(libfive_tree shape, int nx, tfloat dx);
";

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stdlib.h"), HEADER).unwrap();
        commands::init::write_config(dir.path(), "stdlib.h").unwrap();
        dir
    }

    /// Full workflow: init -> check -> list -> generate.
    #[test]
    fn init_check_list_generate_workflow() {
        let dir = project();
        let (config, base_dir) = load_config(dir.path(), None).unwrap();
        assert_eq!(base_dir, dir.path());

        commands::check::run(&config, &base_dir).unwrap();
        commands::list::run(&config, &base_dir, "text").unwrap();
        commands::list::run(&config, &base_dir, "json").unwrap();
        commands::generate::run(&config, &base_dir, None, &[], false).unwrap();

        let out = dir.path().join("stdlib");
        for name in ["shapes.rs", "csg.rs", "transforms.rs", "generators.rs", "text.rs"] {
            assert!(out.join(name).is_file(), "{name} should be written");
        }

        let shapes = std::fs::read_to_string(out.join("shapes.rs")).unwrap();
        assert!(shapes.contains("/// A 2D circle with the given radius and optional center"));
        assert!(shapes.contains("pub fn circle(r: TreeFloat, center: TreeVec2) -> Self {"));
        assert!(shapes.contains("use crate::{sys, Tree, TreeFloat, TreeVec2};"));

        let transforms = std::fs::read_to_string(out.join("transforms.rs")).unwrap();
        assert!(transforms.contains("pub fn moveit(self, offset: TreeVec3) -> Self {"));
        assert!(transforms.contains("sys::libfivestd_move("));
    }

    #[test]
    fn explicit_config_path() {
        let dir = project();
        let nested = dir.path().join("elsewhere");
        std::fs::create_dir_all(&nested).unwrap();

        let (_, base_dir) = load_config(&nested, Some(Path::new("../fivebind.toml"))).unwrap();
        assert_eq!(base_dir, nested.join(".."));
    }

    #[test]
    fn missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path(), None).err().unwrap();
        assert!(err.to_string().contains("fivebind init"));
    }

    #[test]
    fn schema_error_fails_check_and_writes_nothing() {
        let dir = project();
        let broken = format!("{HEADER}LIBFIVE_STDLIB ring(libfive_tree t, double r);\n");
        std::fs::write(dir.path().join("stdlib.h"), broken).unwrap();

        let (config, base_dir) = load_config(dir.path(), None).unwrap();
        let err = commands::check::run(&config, &base_dir).unwrap_err();
        assert!(format!("{err:#}").contains("double"));

        assert!(commands::generate::run(&config, &base_dir, None, &[], false).is_err());
        assert!(!dir.path().join("stdlib").exists());
    }

    #[test]
    fn generate_selected_module_to_override_dir() {
        let dir = project();
        let (config, base_dir) = load_config(dir.path(), None).unwrap();
        let out = dir.path().join("custom");

        commands::generate::run(&config, &base_dir, Some(&out), &["csg".to_string()], false)
            .unwrap();
        assert!(out.join("csg.rs").is_file());
        assert!(!out.join("shapes.rs").exists());
        assert!(!out.join("text.rs").exists());
    }
}
