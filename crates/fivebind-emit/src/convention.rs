//! Calling conventions for generated wrappers.

use serde::{Deserialize, Serialize};

/// How a wrapper exposes its first argument.
///
/// Selected once per module and passed unchanged to every wrapper emitted
/// for that module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallingConvention {
    /// Argument 0 becomes `self` (modifiers such as csg and transforms).
    #[serde(alias = "method", alias = "modifier")]
    Receiver,
    /// Every argument is an explicit parameter (shapes, generators).
    #[serde(alias = "function", alias = "generator")]
    Free,
}

impl CallingConvention {
    /// Parse a convention from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "receiver" | "method" | "modifier" => Some(Self::Receiver),
            "free" | "function" | "generator" => Some(Self::Free),
            _ => None,
        }
    }

    /// Whether argument 0 is taken as the implicit receiver.
    pub fn uses_receiver(&self) -> bool {
        matches!(self, Self::Receiver)
    }
}

impl std::fmt::Display for CallingConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Receiver => write!(f, "receiver"),
            Self::Free => write!(f, "free"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_conventions() {
        assert_eq!(CallingConvention::parse("receiver"), Some(CallingConvention::Receiver));
        assert_eq!(CallingConvention::parse("Modifier"), Some(CallingConvention::Receiver));
        assert_eq!(CallingConvention::parse("FREE"), Some(CallingConvention::Free));
        assert_eq!(CallingConvention::parse("generator"), Some(CallingConvention::Free));
        assert_eq!(CallingConvention::parse("static"), None);
    }

    #[test]
    fn receiver_flag() {
        assert!(CallingConvention::Receiver.uses_receiver());
        assert!(!CallingConvention::Free.uses_receiver());
    }

    #[test]
    fn display_matches_parse() {
        for conv in [CallingConvention::Receiver, CallingConvention::Free] {
            assert_eq!(CallingConvention::parse(&conv.to_string()), Some(conv));
        }
    }
}
