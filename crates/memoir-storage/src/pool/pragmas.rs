//! PRAGMA configuration applied to the writer connection.
//!
//! WAL mode so readers never block behind the writer, NORMAL sync for a
//! reasonable durability/throughput trade-off at this scale, and a
//! busy_timeout so a momentarily locked database doesn't surface as a
//! spurious failure.

use rusqlite::Connection;

use memoir_core::errors::MemoryResult;

use crate::errors::to_storage_err;

pub fn apply_pragmas(conn: &Connection) -> MemoryResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
