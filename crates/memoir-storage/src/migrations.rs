//! Schema migrations. A single idempotent pass run on every `open()` —
//! this store is young enough that a full migration-version ladder would
//! be premature; each statement uses `IF NOT EXISTS` so re-running is
//! harmless.

use rusqlite::Connection;

use memoir_core::errors::MemoryResult;

use crate::errors::to_storage_err;

pub fn run_migrations(conn: &Connection) -> MemoryResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS memories (
            id TEXT PRIMARY KEY,
            project TEXT NOT NULL,
            title TEXT NOT NULL,
            what TEXT NOT NULL,
            why TEXT,
            impact TEXT,
            category TEXT NOT NULL,
            tags_json TEXT NOT NULL,
            related_files_json TEXT NOT NULL,
            source TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            updated_count INTEGER NOT NULL DEFAULT 0,
            file_path TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_memories_project ON memories(project);
        CREATE INDEX IF NOT EXISTS idx_memories_updated_at ON memories(updated_at);

        CREATE TABLE IF NOT EXISTS memory_details (
            memory_id TEXT PRIMARY KEY REFERENCES memories(id) ON DELETE CASCADE,
            body TEXT NOT NULL
        );

        CREATE VIRTUAL TABLE IF NOT EXISTS memories_fts USING fts5(
            id UNINDEXED,
            title,
            what,
            why,
            impact,
            tags,
            related_files,
            tokenize = 'porter'
        );

        CREATE TABLE IF NOT EXISTS memory_vectors (
            memory_id TEXT PRIMARY KEY REFERENCES memories(id) ON DELETE CASCADE,
            dimensions INTEGER NOT NULL,
            embedding BLOB NOT NULL
        );

        CREATE TABLE IF NOT EXISTS meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| to_storage_err(format!("migration failed: {e}")))?;
    Ok(())
}
