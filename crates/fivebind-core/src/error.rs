//! Descriptor-source error types.

/// Errors raised while building a descriptor table.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The stdlib header could not be parsed.
    #[error("invalid header (line {line}): {detail}")]
    InvalidHeader { line: usize, detail: String },

    /// A TOML descriptor table is structurally invalid.
    #[error("invalid descriptor table: {detail}")]
    InvalidTable { detail: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for descriptor-source operations.
pub type Result<T> = std::result::Result<T, CoreError>;
