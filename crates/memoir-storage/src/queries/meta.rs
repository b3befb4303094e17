use rusqlite::{params, Connection};

use memoir_core::errors::MemoryResult;

use crate::errors::{to_storage_err, OptionalRow};

const EMBEDDING_DIM_KEY: &str = "embedding_dim";

pub fn get_embedding_dim(conn: &Connection) -> MemoryResult<Option<usize>> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM meta WHERE key = ?1",
            params![EMBEDDING_DIM_KEY],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(value.and_then(|v| v.parse::<usize>().ok()))
}

/// Pin the embedding dimension. Write-once in practice (callers only
/// invoke this the first time a vector is stored or on `rebuild_vectors`),
/// but the statement itself is a plain upsert.
pub fn set_embedding_dim(conn: &Connection, dim: usize) -> MemoryResult<()> {
    conn.execute(
        "INSERT INTO meta (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![EMBEDDING_DIM_KEY, dim.to_string()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
