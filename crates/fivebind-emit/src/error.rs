//! Emission error types.

/// Errors that abort wrapper generation for a module.
///
/// The first three variants are schema errors in the descriptor table: the
/// generator never guesses at a marshaling it does not know.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// An argument's declared type is outside the supported set.
    #[error("unsupported argument type '{c_type}' for argument `{argument}` of `{function}`")]
    UnsupportedType {
        function: String,
        argument: String,
        c_type: String,
    },

    /// A receiver-style function whose first argument is not a tree handle.
    #[error("receiver-style function `{function}` must take a libfive_tree first, found '{found}'")]
    ReceiverNotHandle { function: String, found: String },

    /// A receiver-style function with no arguments at all.
    #[error("receiver-style function `{function}` has no receiver argument")]
    MissingReceiver { function: String },

    /// A rename rule targets something that is not an identifier.
    #[error("invalid rename '{from}' -> '{to}': target is not a valid identifier")]
    InvalidRename { from: String, to: String },
}

impl EmitError {
    /// Whether this error stems from the descriptor table rather than from
    /// generator configuration.
    pub fn is_schema_error(&self) -> bool {
        !matches!(self, Self::InvalidRename { .. })
    }
}

/// Result type alias for emission.
pub type Result<T> = std::result::Result<T, EmitError>;
