use thiserror::Error;

/// Result type alias using [`MacroError`] as the error type.
pub type Result<T> = std::result::Result<T, MacroError>;

/// Errors that can occur while building macro definitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacroError {
    /// A macro was given an empty name
    #[error("macro requires a valid name")]
    InvalidName,
    /// A command-line macro spec could not be parsed
    #[error("malformed macro spec: {0}")]
    MalformedSpec(String),
}
