pub mod pragmas;
pub mod write_connection;

use std::path::Path;

use memoir_core::errors::MemoryResult;

pub use write_connection::WriteConnection;

/// Owns the writer connection. Named `ConnectionPool` for symmetry with
/// the wider ecosystem's connection-pool terminology even though this
/// store, per its single-process-writer concurrency model, needs only
/// one connection.
pub struct ConnectionPool {
    pub writer: WriteConnection,
}

impl ConnectionPool {
    pub fn open(path: &Path) -> MemoryResult<Self> {
        Ok(Self {
            writer: WriteConnection::open(path)?,
        })
    }

    pub fn open_in_memory() -> MemoryResult<Self> {
        Ok(Self {
            writer: WriteConnection::open_in_memory()?,
        })
    }
}
