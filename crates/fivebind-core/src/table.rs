//! TOML descriptor tables.
//!
//! An alternative to header parsing: the descriptor table is written out
//! explicitly, one `[[functions]]` entry per native entry point.

use serde::{Deserialize, Serialize};

use crate::descriptor::{is_identifier, DescriptorTable, FunctionDescriptor};
use crate::error::{CoreError, Result};

/// A complete descriptor table parsed from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableFile {
    /// Metadata about the native library.
    pub library: LibraryInfo,
    /// The native functions, in output order.
    #[serde(default)]
    pub functions: Vec<TableFunction>,
}

/// Metadata about the native library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryInfo {
    /// Library name (e.g., "libfive-stdlib").
    pub name: String,
    /// Prefix prepended to `name` when `raw-name` is omitted.
    #[serde(default, alias = "symbol-prefix")]
    pub symbol_prefix: String,
}

/// A single function entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableFunction {
    /// Public function name.
    pub name: String,
    /// Grouping key.
    pub module: String,
    /// Exact linkage symbol, if it does not follow the prefix convention.
    #[serde(default, alias = "raw-name")]
    pub raw_name: Option<String>,
    /// Documentation carried into the generated wrapper.
    #[serde(default)]
    pub doc: Option<String>,
    /// Ordered arguments.
    #[serde(default)]
    pub args: Vec<TableArg>,
    /// Whether this function is left out of generation.
    #[serde(default)]
    pub excluded: bool,
}

/// One argument entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableArg {
    pub name: String,
    #[serde(rename = "type")]
    pub c_type: String,
}

impl TableFile {
    /// Parse a table from a TOML string.
    pub fn parse(input: &str) -> Result<Self> {
        let table: TableFile = toml::from_str(input).map_err(CoreError::Toml)?;

        if table.library.name.is_empty() {
            return Err(CoreError::InvalidTable {
                detail: "library.name is required".to_string(),
            });
        }
        for func in &table.functions {
            if func.name.is_empty() || func.module.is_empty() {
                return Err(CoreError::InvalidTable {
                    detail: format!(
                        "function entry '{}' needs both a name and a module",
                        func.name
                    ),
                });
            }
            check_identifier("function name", &func.name, &func.name)?;
            check_identifier("module name", &func.module, &func.name)?;
            match &func.raw_name {
                Some(raw) => check_identifier("raw-name", raw, &func.name)?,
                None => check_identifier(
                    "linkage name",
                    &format!("{}{}", table.library.symbol_prefix, func.name),
                    &func.name,
                )?,
            }
            for arg in &func.args {
                check_identifier("argument name", &arg.name, &func.name)?;
            }
        }

        Ok(table)
    }

    /// Parse a table from a file path.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Return only the non-excluded functions.
    pub fn active_functions(&self) -> Vec<&TableFunction> {
        self.functions.iter().filter(|f| !f.excluded).collect()
    }

    /// Build the descriptor table from the active functions.
    pub fn descriptors(&self) -> DescriptorTable {
        self.active_functions()
            .into_iter()
            .map(|func| {
                let raw_name = func
                    .raw_name
                    .clone()
                    .unwrap_or_else(|| format!("{}{}", self.library.symbol_prefix, func.name));
                let mut descriptor = FunctionDescriptor::new(&func.name, &raw_name, &func.module);
                for arg in &func.args {
                    descriptor = descriptor.arg(&arg.name, &arg.c_type);
                }
                match &func.doc {
                    Some(doc) => descriptor.with_doc(doc),
                    None => descriptor,
                }
            })
            .collect()
    }
}

/// Names end up in file names, `mod` declarations and generated code.
fn check_identifier(what: &str, value: &str, function: &str) -> Result<()> {
    if is_identifier(value) {
        Ok(())
    } else {
        Err(CoreError::InvalidTable {
            detail: format!("{what} '{value}' of function '{function}' is not an identifier"),
        })
    }
}
