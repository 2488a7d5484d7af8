//! Module assembly: banner, imports, and one `impl Tree` block per module.
//!
//! Every wrapper of a module is emitted before any text is assembled, so a
//! schema error in one function leaves no partial unit behind.

use std::collections::{BTreeMap, BTreeSet};

use fivebind_core::descriptor::{DescriptorTable, Module};
use log::{debug, warn};

use crate::banner::{render_banner, Origin, Provenance};
use crate::convention::CallingConvention;
use crate::emit::emit;
use crate::error::Result;
use crate::naming::NamingPolicy;
use crate::translate::{wrapper_type, HANDLE_TYPE};

/// Settings shared by every module of a run.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Descriptor source named in the banner.
    pub source: String,
    /// Path the wrapper types and `sys` are imported from (e.g. `crate`).
    /// `None` emits no `use` line.
    pub import_root: Option<String>,
    /// Naming rules for wrapper names.
    pub naming: NamingPolicy,
    /// Banner provenance.
    pub provenance: Provenance,
}

impl AssembleOptions {
    pub fn new(source: &str, provenance: Provenance) -> Self {
        Self {
            source: source.to_string(),
            import_root: None,
            naming: NamingPolicy::default(),
            provenance,
        }
    }

    pub fn with_import_root(mut self, root: &str) -> Self {
        self.import_root = Some(root.to_string());
        self
    }

    pub fn with_naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }
}

/// Which convention each module is generated with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConventionPlan {
    conventions: BTreeMap<String, CallingConvention>,
    fallback: Option<CallingConvention>,
    excluded: BTreeSet<String>,
}

impl ConventionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a convention to a module.
    pub fn with(mut self, module: &str, convention: CallingConvention) -> Self {
        self.conventions.insert(module.to_string(), convention);
        self
    }

    /// Convention for modules with no explicit entry.
    pub fn with_fallback(mut self, convention: CallingConvention) -> Self {
        self.fallback = Some(convention);
        self
    }

    /// Never generate `module`, whatever its convention or the fallback.
    pub fn excluding(mut self, module: &str) -> Self {
        self.conventions.remove(module);
        self.excluded.insert(module.to_string());
        self
    }

    /// Whether `module` was removed with [`ConventionPlan::excluding`].
    pub fn is_excluded(&self, module: &str) -> bool {
        self.excluded.contains(module)
    }

    /// Resolve the convention for `module`, if it is to be generated.
    pub fn for_module(&self, module: &str) -> Option<CallingConvention> {
        if self.is_excluded(module) {
            return None;
        }
        self.conventions.get(module).copied().or(self.fallback)
    }

    /// Modules named explicitly in the plan.
    pub fn explicit_modules(&self) -> impl Iterator<Item = &str> {
        self.conventions.keys().map(String::as_str)
    }
}

/// One finished output unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledUnit {
    pub module: String,
    /// `None` for hand-authored units.
    pub convention: Option<CallingConvention>,
    pub function_count: usize,
    pub source: String,
}

impl AssembledUnit {
    /// File name the unit is conventionally written to.
    pub fn file_name(&self) -> String {
        format!("{}.rs", self.module)
    }
}

/// Assemble one module under `convention`.
pub fn assemble(
    module: &Module,
    convention: CallingConvention,
    options: &AssembleOptions,
) -> Result<String> {
    let mut wrappers = Vec::with_capacity(module.len());
    for descriptor in &module.functions {
        wrappers.push(emit(descriptor, convention, &options.naming)?);
    }
    debug!(
        "assembled module '{}' ({convention}, {} wrappers)",
        module.name,
        wrappers.len()
    );

    let mut out = render_banner(&module.name, Origin::Table(&options.source), &options.provenance);
    if let Some(root) = &options.import_root {
        out.push('\n');
        out.push_str(&use_line(root, &required_imports(module, convention)));
    }
    out.push('\n');
    out.push_str(&format!(
        "/// # {} <a name=\"{}\"></a>\n",
        title_case(&module.name),
        module.name
    ));
    out.push_str(&format!("impl {HANDLE_TYPE} {{\n"));
    for wrapper in &wrappers {
        out.push('\n');
        out.push_str(wrapper);
    }
    out.push_str("}\n");
    Ok(out)
}

/// Assemble every module of `table` that `plan` assigns a convention to.
///
/// Modules are visited in table order. The first failure aborts the whole
/// run; nothing is returned for modules assembled before it.
pub fn assemble_table(
    table: &DescriptorTable,
    plan: &ConventionPlan,
    options: &AssembleOptions,
) -> Result<Vec<AssembledUnit>> {
    options.naming.validate()?;

    for name in plan.explicit_modules() {
        if table.module(name).is_none() {
            warn!("module '{name}' is configured but not present in {}", options.source);
        }
    }

    let mut units = Vec::new();
    for module in table.modules() {
        if plan.is_excluded(&module.name) {
            debug!("module '{}' excluded from generation", module.name);
            continue;
        }
        let Some(convention) = plan.for_module(&module.name) else {
            warn!("skipping module '{}': no calling convention configured", module.name);
            continue;
        };
        units.push(AssembledUnit {
            module: module.name.clone(),
            convention: Some(convention),
            function_count: module.len(),
            source: assemble(module, convention, options)?,
        });
    }
    Ok(units)
}

/// Names a module's wrappers reference, in a stable order.
pub fn required_imports(module: &Module, convention: CallingConvention) -> Vec<&'static str> {
    let mut names = Vec::new();
    if !module.is_empty() {
        names.push("sys");
    }
    names.push(HANDLE_TYPE);

    for descriptor in &module.functions {
        for arg in &descriptor.args {
            if convention.uses_receiver() && arg.index == 0 {
                continue;
            }
            if let Some(ty) = arg.kind().and_then(wrapper_type) {
                if !names.contains(&ty) {
                    names.push(ty);
                }
            }
        }
    }
    names[1..].sort_unstable();
    names.dedup();
    names
}

pub(crate) fn use_line(root: &str, names: &[&str]) -> String {
    match names {
        [single] => format!("use {root}::{single};\n"),
        _ => format!("use {root}::{{{}}};\n", names.join(", ")),
    }
}

/// Capitalize the first letter of every alphabetic run, lowercase the rest.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_alpha = false;
    for c in name.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
