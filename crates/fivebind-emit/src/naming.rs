//! Identifier policy for emitted wrappers.
//!
//! Function names come from the C side and can collide with Rust keywords.
//! An explicit rename table is consulted first (by default only
//! `move -> moveit`); any keyword that survives is emitted as a raw
//! identifier.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EmitError, Result};

const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
    "where", "while", "async", "await", "dyn", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try",
];

/// Keywords that cannot be written as raw identifiers.
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

/// Project-level naming rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingPolicy {
    /// Exact-match renames applied to public function names.
    #[serde(default = "default_renames")]
    pub renames: BTreeMap<String, String>,
}

fn default_renames() -> BTreeMap<String, String> {
    BTreeMap::from([("move".to_string(), "moveit".to_string())])
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self {
            renames: default_renames(),
        }
    }
}

impl NamingPolicy {
    /// A policy with no renames; keywords are still escaped.
    pub fn without_renames() -> Self {
        Self {
            renames: BTreeMap::new(),
        }
    }

    /// Add or replace a rename rule.
    pub fn with_rename(mut self, from: &str, to: &str) -> Self {
        self.renames.insert(from.to_string(), to.to_string());
        self
    }

    /// Check that every rename target is a plain identifier.
    pub fn validate(&self) -> Result<()> {
        for (from, to) in &self.renames {
            if !is_plain_identifier(to) {
                return Err(EmitError::InvalidRename {
                    from: from.clone(),
                    to: to.clone(),
                });
            }
        }
        Ok(())
    }

    /// Resolve the Rust name for a wrapper.
    pub fn function_name(&self, public_name: &str) -> String {
        let name = self
            .renames
            .get(public_name)
            .map(String::as_str)
            .unwrap_or(public_name);
        escape_keyword(name)
    }
}

/// Escape an identifier that collides with a Rust keyword.
pub fn escape_keyword(name: &str) -> String {
    if NON_RAW_KEYWORDS.contains(&name) {
        format!("{name}_")
    } else if RUST_KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_renames_move() {
        let policy = NamingPolicy::default();
        assert_eq!(policy.function_name("move"), "moveit");
        assert_eq!(policy.function_name("circle"), "circle");
    }

    #[test]
    fn rename_is_exact_match() {
        let policy = NamingPolicy::default();
        assert_eq!(policy.function_name("remove"), "remove");
        assert_eq!(policy.function_name("move_xy"), "move_xy");
    }

    #[test]
    fn unrenamed_keywords_become_raw() {
        let policy = NamingPolicy::without_renames();
        assert_eq!(policy.function_name("move"), "r#move");
        assert_eq!(policy.function_name("box"), "r#box");
        assert_eq!(policy.function_name("union"), "union");
    }

    #[test]
    fn non_raw_keywords_get_suffix() {
        assert_eq!(escape_keyword("self"), "self_");
        assert_eq!(escape_keyword("crate"), "crate_");
        assert_eq!(escape_keyword("type"), "r#type");
    }

    #[test]
    fn custom_rename() {
        let policy = NamingPolicy::default().with_rename("box", "cuboid");
        assert_eq!(policy.function_name("box"), "cuboid");
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn invalid_rename_target() {
        let policy = NamingPolicy::default().with_rename("move", "move it");
        let err = policy.validate().unwrap_err();
        assert!(matches!(err, EmitError::InvalidRename { .. }));
        assert!(!err.is_schema_error());
    }
}
