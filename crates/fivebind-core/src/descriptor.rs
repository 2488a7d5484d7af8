//! Descriptor model: the parsed shape of every native stdlib entry point.
//!
//! Descriptors are produced once by a source (header parser or TOML table)
//! and are read-only afterwards. Modules keep the insertion order of the
//! source so generated files stay stable and diffable.

use serde::Serialize;

/// The closed set of argument categories the generator knows how to marshal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgKind {
    /// Opaque tree handle (`libfive_tree`).
    Handle,
    /// Scalar expression (`tfloat`).
    Float,
    /// Two-component expression vector (`tvec2`).
    Vec2,
    /// Three-component expression vector (`tvec3`).
    Vec3,
    /// Native `int`, exposed as an unsigned count.
    UInt,
    /// Borrowed NUL-terminated string (`const char*`).
    Str,
}

impl ArgKind {
    /// Every supported kind, in declaration order.
    pub const ALL: [ArgKind; 6] = [
        ArgKind::Handle,
        ArgKind::Float,
        ArgKind::Vec2,
        ArgKind::Vec3,
        ArgKind::UInt,
        ArgKind::Str,
    ];

    /// Classify a declared C type. Returns `None` for anything outside the
    /// supported set.
    pub fn classify(c_type: &str) -> Option<Self> {
        match normalize_c_type(c_type).as_str() {
            "libfive_tree" => Some(Self::Handle),
            "tfloat" => Some(Self::Float),
            "tvec2" => Some(Self::Vec2),
            "tvec3" => Some(Self::Vec3),
            "int" => Some(Self::UInt),
            "const char*" => Some(Self::Str),
            _ => None,
        }
    }

    /// Canonical C spelling of this kind.
    pub fn c_name(&self) -> &'static str {
        match self {
            Self::Handle => "libfive_tree",
            Self::Float => "tfloat",
            Self::Vec2 => "tvec2",
            Self::Vec3 => "tvec3",
            Self::UInt => "int",
            Self::Str => "const char*",
        }
    }
}

impl std::fmt::Display for ArgKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.c_name())
    }
}

/// Collapse whitespace in a C type and glue pointer stars to the base type,
/// so `const  char *` and `const char*` compare equal.
pub fn normalize_c_type(c_type: &str) -> String {
    let mut out = String::with_capacity(c_type.len());
    for word in c_type.split_whitespace() {
        if !out.is_empty() && !word.starts_with('*') {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Whether `s` is a plain C/Rust identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// A single positional argument of a native function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    /// Parameter name as declared.
    pub name: String,
    /// Declared C type, whitespace-normalized.
    pub declared_type: String,
    /// Position within the owning function's argument list.
    pub index: usize,
}

impl Argument {
    /// Classify the declared type into the supported set.
    pub fn kind(&self) -> Option<ArgKind> {
        ArgKind::classify(&self.declared_type)
    }
}

/// One native stdlib entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDescriptor {
    /// Name exposed by the library (before any keyword renaming).
    pub public_name: String,
    /// Exact linkage symbol called through `sys`.
    pub raw_name: String,
    /// Ordered arguments; position 0 may become a receiver.
    pub args: Vec<Argument>,
    /// Grouping key.
    pub module: String,
    /// Free-form documentation carried over from the source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl FunctionDescriptor {
    /// Create a descriptor with no arguments.
    pub fn new(public_name: &str, raw_name: &str, module: &str) -> Self {
        Self {
            public_name: public_name.to_string(),
            raw_name: raw_name.to_string(),
            args: Vec::new(),
            module: module.to_string(),
            doc: None,
        }
    }

    /// Append an argument, assigning it the next position.
    pub fn arg(mut self, name: &str, declared_type: &str) -> Self {
        let index = self.args.len();
        self.args.push(Argument {
            name: name.to_string(),
            declared_type: normalize_c_type(declared_type),
            index,
        });
        self
    }

    /// Attach documentation text.
    pub fn with_doc(mut self, doc: &str) -> Self {
        let doc = doc.trim();
        self.doc = if doc.is_empty() { None } else { Some(doc.to_string()) };
        self
    }

    /// Number of declared arguments.
    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// A named, insertion-ordered group of descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    pub name: String,
    pub functions: Vec<FunctionDescriptor>,
}

impl Module {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            functions: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// The full descriptor table, grouped by module in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DescriptorTable {
    modules: Vec<Module>,
}

impl DescriptorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor to its module, creating the module on first use.
    pub fn push(&mut self, descriptor: FunctionDescriptor) {
        match self.modules.iter_mut().find(|m| m.name == descriptor.module) {
            Some(module) => module.functions.push(descriptor),
            None => {
                let mut module = Module::new(&descriptor.module);
                module.functions.push(descriptor);
                self.modules.push(module);
            }
        }
    }

    /// Register an empty module so it keeps its position even before any
    /// function is seen.
    pub fn ensure_module(&mut self, name: &str) {
        if self.module(name).is_none() {
            self.modules.push(Module::new(name));
        }
    }

    /// Look up a module by name.
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Iterate modules in table order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    /// Total number of descriptors across all modules.
    pub fn function_count(&self) -> usize {
        self.modules.iter().map(Module::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.function_count() == 0
    }
}

impl FromIterator<FunctionDescriptor> for DescriptorTable {
    fn from_iter<I: IntoIterator<Item = FunctionDescriptor>>(iter: I) -> Self {
        let mut table = DescriptorTable::new();
        for descriptor in iter {
            table.push(descriptor);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_supported_types() {
        assert_eq!(ArgKind::classify("libfive_tree"), Some(ArgKind::Handle));
        assert_eq!(ArgKind::classify("tfloat"), Some(ArgKind::Float));
        assert_eq!(ArgKind::classify("tvec2"), Some(ArgKind::Vec2));
        assert_eq!(ArgKind::classify("tvec3"), Some(ArgKind::Vec3));
        assert_eq!(ArgKind::classify("int"), Some(ArgKind::UInt));
        assert_eq!(ArgKind::classify("const char*"), Some(ArgKind::Str));
        assert_eq!(ArgKind::classify("const  char *"), Some(ArgKind::Str));
    }

    #[test]
    fn classify_rejects_unknown() {
        assert_eq!(ArgKind::classify("double"), None);
        assert_eq!(ArgKind::classify("float"), None);
        assert_eq!(ArgKind::classify("char*"), None);
        assert_eq!(ArgKind::classify(""), None);
    }

    #[test]
    fn c_names_round_trip_through_classify() {
        for kind in ArgKind::ALL {
            assert_eq!(ArgKind::classify(kind.c_name()), Some(kind));
        }
    }

    #[test]
    fn normalize_pointer_spacing() {
        assert_eq!(normalize_c_type("const char *"), "const char*");
        assert_eq!(normalize_c_type("  tvec2 "), "tvec2");
        assert_eq!(normalize_c_type("const char * *"), "const char**");
    }

    #[test]
    fn builder_assigns_positions() {
        let f = FunctionDescriptor::new("circle", "libfivestd_circle", "shapes")
            .arg("r", "tfloat")
            .arg("center", "tvec2");
        assert_eq!(f.arity(), 2);
        assert_eq!(f.args[0].index, 0);
        assert_eq!(f.args[1].index, 1);
        assert_eq!(f.args[1].kind(), Some(ArgKind::Vec2));
    }

    #[test]
    fn empty_doc_is_dropped() {
        let f = FunctionDescriptor::new("f", "f", "m").with_doc("   ");
        assert!(f.doc.is_none());
    }

    #[test]
    fn table_groups_in_first_seen_order() {
        let table: DescriptorTable = vec![
            FunctionDescriptor::new("circle", "c", "shapes"),
            FunctionDescriptor::new("union", "u", "csg"),
            FunctionDescriptor::new("sphere", "s", "shapes"),
        ]
        .into_iter()
        .collect();

        let names: Vec<_> = table.modules().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["shapes", "csg"]);

        let shapes = table.module("shapes").unwrap();
        let fns: Vec<_> = shapes.functions.iter().map(|f| f.public_name.as_str()).collect();
        assert_eq!(fns, ["circle", "sphere"]);
        assert_eq!(table.function_count(), 3);
    }

    #[test]
    fn ensure_module_keeps_position() {
        let mut table = DescriptorTable::new();
        table.ensure_module("generators");
        table.push(FunctionDescriptor::new("circle", "c", "shapes"));
        table.push(FunctionDescriptor::new("emptiness", "e", "generators"));

        let names: Vec<_> = table.modules().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["generators", "shapes"]);
        assert_eq!(table.module("generators").unwrap().len(), 1);
    }
}
