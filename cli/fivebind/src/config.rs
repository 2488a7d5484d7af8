//! `fivebind.toml` parsing and generator configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use fivebind_core::DescriptorTable;
use fivebind_emit::text::TEXT_MODULE_NAME;
use fivebind_emit::{CallingConvention, ConventionPlan, NamingPolicy};
use serde::{Deserialize, Serialize};

/// File name searched for by [`FivebindConfig::find_and_load`].
pub const CONFIG_FILE: &str = "fivebind.toml";

/// The top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FivebindConfig {
    /// Where descriptors come from (required).
    pub source: SourceConfig,
    /// Output placement.
    #[serde(default)]
    pub output: OutputConfig,
    /// Calling convention per module, in any order.
    #[serde(default)]
    pub modules: BTreeMap<String, CallingConvention>,
    /// Wrapper naming rules.
    #[serde(default)]
    pub naming: NamingPolicy,
}

/// Descriptor source section. Exactly one of `header` or `table` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourceConfig {
    /// stdlib header to parse.
    #[serde(default)]
    pub header: Option<PathBuf>,
    /// Explicit TOML descriptor table.
    #[serde(default)]
    pub table: Option<PathBuf>,
    /// Linkage prefix used with `header`.
    #[serde(default = "default_symbol_prefix")]
    pub symbol_prefix: String,
}

fn default_symbol_prefix() -> String {
    fivebind_core::DEFAULT_SYMBOL_PREFIX.to_string()
}

/// Output section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory generated units are written to.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Import path for `sys` and the wrapper types; no `use` line if unset.
    #[serde(default)]
    pub import_root: Option<String>,
    /// Emit the hand-written text module.
    #[serde(default = "default_true")]
    pub text: bool,
    /// Emit a `mod.rs` declaring every written unit.
    #[serde(default)]
    pub index: bool,
    /// Convention for modules missing from `[modules]`; such modules are
    /// skipped when unset.
    #[serde(default)]
    pub default_convention: Option<CallingConvention>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("generated")
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            import_root: None,
            text: true,
            index: false,
            default_convention: None,
        }
    }
}

impl FivebindConfig {
    /// Search upward from `start_dir` for a `fivebind.toml`, parse it, and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                return Self::load(&candidate).map(Some);
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Load an explicit config file; relative paths resolve against its directory.
    pub fn load(path: &Path) -> Result<(Self, PathBuf)> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok((config, dir))
    }

    /// Parse and validate a config from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        let config: FivebindConfig = toml::from_str(s)?;
        match (&config.source.header, &config.source.table) {
            (Some(_), Some(_)) => bail!("[source] sets both `header` and `table`; pick one"),
            (None, None) => bail!("[source] needs either `header` or `table`"),
            _ => {}
        }
        config.naming.validate()?;
        Ok(config)
    }

    /// Label for the descriptor source, as shown in banners.
    pub fn source_label(&self) -> String {
        self.source
            .header
            .as_ref()
            .or(self.source.table.as_ref())
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }

    /// Read the descriptor table named by `[source]`.
    pub fn load_table(&self, base_dir: &Path) -> Result<DescriptorTable> {
        if let Some(header) = &self.source.header {
            let path = base_dir.join(header);
            return fivebind_core::load_header(&path, &self.source.symbol_prefix)
                .with_context(|| format!("parsing header {}", path.display()));
        }
        if let Some(table) = &self.source.table {
            let path = base_dir.join(table);
            let file = fivebind_core::TableFile::load(&path)
                .with_context(|| format!("loading table {}", path.display()))?;
            return Ok(file.descriptors());
        }
        bail!("[source] needs either `header` or `table`")
    }

    /// The full convention plan. A table section named `text` is left out
    /// while the hand-written text unit is enabled.
    pub fn plan(&self) -> ConventionPlan {
        let plan = self
            .modules
            .iter()
            .fold(ConventionPlan::new(), |plan, (name, conv)| plan.with(name, *conv));
        let plan = match self.output.default_convention {
            Some(conv) => plan.with_fallback(conv),
            None => plan,
        };
        if self.output.text {
            plan.excluding(TEXT_MODULE_NAME)
        } else {
            plan
        }
    }

    /// A plan restricted to `selected` modules. Fails for a module that has
    /// no convention to use.
    pub fn plan_for(&self, selected: &[String]) -> Result<ConventionPlan> {
        let mut plan = ConventionPlan::new();
        for name in selected {
            match self.modules.get(name).copied().or(self.output.default_convention) {
                Some(conv) => plan = plan.with(name, conv),
                None => bail!("no calling convention configured for module '{name}'"),
            }
        }
        Ok(plan)
    }

    /// Default config written by `fivebind init`.
    pub fn template(header: &str) -> String {
        format!(
            r#"[source]
header = "{header}"
symbol-prefix = "libfivestd_"

[output]
dir = "stdlib"
import-root = "crate"
text = true

[modules]
csg = "receiver"
transforms = "receiver"
shapes = "free"
generators = "free"

[naming.renames]
move = "moveit"
"#
        )
    }
}
