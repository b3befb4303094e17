use memoir_core::errors::MemoryError;

/// Map a raw SQLite error into the unified error type. Callers that need a
/// more specific kind (NotFound, AmbiguousPrefix) construct it directly
/// instead of routing through here.
pub fn to_storage_err(message: impl Into<String>) -> MemoryError {
    MemoryError::IntegrityError {
        details: message.into(),
    }
}

/// Helper trait to make `query_row` return `Option` on not-found instead
/// of a `QueryReturnedNoRows` error.
pub trait OptionalRow<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalRow<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
