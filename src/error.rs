use thiserror::Error as ThisError;

/// Errors that can occur in aprmd5 operations.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// The input to an operation was invalid
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// A specialized Result type for aprmd5 operations.
pub type Result<T> = std::result::Result<T, Error>;
