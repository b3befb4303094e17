/// Unified error type returned by every fallible operation in the memoir
/// workspace. Subsystem crates may keep narrower internal error types but
/// must convert to this one at their public boundary.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("memory not found: {id}")]
    NotFound { id: String },

    #[error("id prefix '{prefix}' matches {count} memories, expected exactly one")]
    AmbiguousPrefix { prefix: String, count: usize },

    #[error("embedding provider unavailable: {reason}")]
    ProviderUnavailable { reason: String },

    #[error("embedding provider returned a malformed vector: {reason}")]
    ProviderDimMismatch { reason: String },

    #[error("semantic search requested but vectors are unavailable")]
    VectorsUnavailable,

    #[error("store integrity violated: {details}")]
    IntegrityError { details: String },

    #[error("I/O error: {message}")]
    IoError { message: String },
}

impl From<std::io::Error> for MemoryError {
    fn from(err: std::io::Error) -> Self {
        MemoryError::IoError {
            message: err.to_string(),
        }
    }
}

/// Convenience alias used across the workspace.
pub type MemoryResult<T> = Result<T, MemoryError>;
