use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use memoir_core::errors::MemoryResult;

use super::pragmas::apply_pragmas;
use crate::errors::to_storage_err;

/// The single writer connection. All writes — and, given this store's
/// single-process-writer concurrency model, all reads too — are
/// serialized through this mutex rather than through a separate read
/// pool. At this scale that's a simpler correct design than juggling a
/// multi-connection pool for a store with no concurrent writers.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path) -> MemoryResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> MemoryResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a closure with exclusive access to the connection.
    pub fn with_conn<F, T>(&self, f: F) -> MemoryResult<T>
    where
        F: FnOnce(&Connection) -> MemoryResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| to_storage_err(format!("writer lock poisoned: {e}")))?;
        f(&guard)
    }
}
