use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use memoir_core::errors::{MemoryError, MemoryResult};
use memoir_core::models::{Category, Memory, MemoryDetails};

use crate::errors::{to_storage_err, OptionalRow};
use crate::queries::vector::upsert_vector;

/// Insert a new memory row, its FTS row, and (if supplied) its vector row,
/// all inside one transaction.
pub fn insert_memory(conn: &Connection, memory: &Memory, embedding: Option<&[f32]>) -> MemoryResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("insert_memory begin: {e}")))?;

    insert_memory_inner(&tx, memory)?;
    if let Some(vec) = embedding {
        upsert_vector(&tx, &memory.id, vec)?;
    }

    tx.commit()
        .map_err(|e| to_storage_err(format!("insert_memory commit: {e}")))?;
    Ok(())
}

fn insert_memory_inner(conn: &Connection, memory: &Memory) -> MemoryResult<()> {
    let tags_json = serde_json::to_string(&memory.tags).map_err(|e| to_storage_err(e.to_string()))?;
    let files_json =
        serde_json::to_string(&memory.related_files).map_err(|e| to_storage_err(e.to_string()))?;

    let existing = conn
        .query_row("SELECT 1 FROM memories WHERE id = ?1", params![memory.id], |_| Ok(()))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    if existing.is_some() {
        return Err(MemoryError::IntegrityError {
            details: format!("memory {} already exists", memory.id),
        });
    }

    conn.execute(
        "INSERT INTO memories (
            id, project, title, what, why, impact, category, tags_json,
            related_files_json, source, created_at, updated_at, updated_count, file_path
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            memory.id,
            memory.project,
            memory.title,
            memory.what,
            memory.why,
            memory.impact,
            memory.category.as_str(),
            tags_json,
            files_json,
            memory.source,
            memory.created_at.to_rfc3339(),
            memory.updated_at.to_rfc3339(),
            memory.updated_count,
            memory.file_path,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    insert_fts_row(conn, memory)?;
    Ok(())
}

fn insert_fts_row(conn: &Connection, memory: &Memory) -> MemoryResult<()> {
    conn.execute(
        "INSERT INTO memories_fts (id, title, what, why, impact, tags, related_files)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            memory.id,
            memory.title,
            memory.what,
            memory.why.clone().unwrap_or_default(),
            memory.impact.clone().unwrap_or_default(),
            memory.tags.join(" "),
            memory.related_files.join(" "),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

fn delete_fts_row(conn: &Connection, id: &str) -> MemoryResult<()> {
    conn.execute("DELETE FROM memories_fts WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Replace an existing memory's mutable fields, bumping `updated_count`.
/// Fails with `NotFound` if the row does not exist.
pub fn update_memory(conn: &Connection, memory: &Memory, embedding: Option<&[f32]>) -> MemoryResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("update_memory begin: {e}")))?;

    update_memory_inner(&tx, memory)?;
    if let Some(vec) = embedding {
        upsert_vector(&tx, &memory.id, vec)?;
    }

    tx.commit()
        .map_err(|e| to_storage_err(format!("update_memory commit: {e}")))?;
    Ok(())
}

fn update_memory_inner(conn: &Connection, memory: &Memory) -> MemoryResult<()> {
    let tags_json = serde_json::to_string(&memory.tags).map_err(|e| to_storage_err(e.to_string()))?;
    let files_json =
        serde_json::to_string(&memory.related_files).map_err(|e| to_storage_err(e.to_string()))?;

    let rows = conn
        .execute(
            "UPDATE memories SET
                title = ?2, what = ?3, why = ?4, impact = ?5, category = ?6,
                tags_json = ?7, related_files_json = ?8, source = ?9,
                updated_at = ?10, updated_count = ?11
             WHERE id = ?1",
            params![
                memory.id,
                memory.title,
                memory.what,
                memory.why,
                memory.impact,
                memory.category.as_str(),
                tags_json,
                files_json,
                memory.source,
                memory.updated_at.to_rfc3339(),
                memory.updated_count,
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    if rows == 0 {
        return Err(MemoryError::NotFound {
            id: memory.id.clone(),
        });
    }

    delete_fts_row(conn, &memory.id)?;
    insert_fts_row(conn, memory)?;
    Ok(())
}

/// Resolve a full id or an unambiguous id prefix to exactly one id.
pub fn resolve_id(conn: &Connection, id_or_prefix: &str) -> MemoryResult<String> {
    let mut stmt = conn
        .prepare("SELECT id FROM memories WHERE id = ?1 OR id LIKE ?2 || '%'")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let ids: Vec<String> = stmt
        .query_map(params![id_or_prefix, id_or_prefix], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match ids.len() {
        0 => Err(MemoryError::NotFound {
            id: id_or_prefix.to_string(),
        }),
        1 => Ok(ids.into_iter().next().unwrap()),
        n => Err(MemoryError::AmbiguousPrefix {
            prefix: id_or_prefix.to_string(),
            count: n,
        }),
    }
}

/// Delete a memory (and its details/vector rows, via ON DELETE CASCADE)
/// by exact id.
pub fn delete_memory(conn: &Connection, id: &str) -> MemoryResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("delete_memory begin: {e}")))?;

    delete_fts_row(&tx, id)?;
    let rows = tx
        .execute("DELETE FROM memories WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))?;

    if rows == 0 {
        let _ = tx.rollback();
        return Err(MemoryError::NotFound { id: id.to_string() });
    }

    tx.commit()
        .map_err(|e| to_storage_err(format!("delete_memory commit: {e}")))?;
    Ok(())
}

const SELECT_COLUMNS: &str = "id, project, title, what, why, impact, category, tags_json,
            related_files_json, source, created_at, updated_at, updated_count, file_path";

pub fn get_memory(conn: &Connection, id: &str) -> MemoryResult<Option<Memory>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {SELECT_COLUMNS} FROM memories WHERE id = ?1"))
        .map_err(|e| to_storage_err(e.to_string()))?;

    stmt.query_row(params![id], |row| Ok(row_to_memory(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?
        .transpose()
}

pub fn get_details(conn: &Connection, id: &str) -> MemoryResult<Option<MemoryDetails>> {
    conn.query_row(
        "SELECT memory_id, body FROM memory_details WHERE memory_id = ?1",
        params![id],
        |row| {
            Ok(MemoryDetails {
                memory_id: row.get(0)?,
                body: row.get(1)?,
            })
        },
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn upsert_details(conn: &Connection, details: &MemoryDetails) -> MemoryResult<()> {
    conn.execute(
        "INSERT INTO memory_details (memory_id, body) VALUES (?1, ?2)
         ON CONFLICT(memory_id) DO UPDATE SET body = excluded.body",
        params![details.memory_id, details.body],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn count(conn: &Connection, project: Option<&str>) -> MemoryResult<usize> {
    let n: i64 = match project {
        Some(p) => conn
            .query_row(
                "SELECT COUNT(*) FROM memories WHERE project = ?1",
                params![p],
                |row| row.get(0),
            )
            .map_err(|e| to_storage_err(e.to_string()))?,
        None => conn
            .query_row("SELECT COUNT(*) FROM memories", [], |row| row.get(0))
            .map_err(|e| to_storage_err(e.to_string()))?,
    };
    Ok(n as usize)
}

pub fn recent(conn: &Connection, limit: usize, project: Option<&str>) -> MemoryResult<Vec<Memory>> {
    let sql = match project {
        Some(_) => format!("SELECT {SELECT_COLUMNS} FROM memories WHERE project = ?1 ORDER BY updated_at DESC, id ASC LIMIT ?2"),
        None => format!("SELECT {SELECT_COLUMNS} FROM memories ORDER BY updated_at DESC, id ASC LIMIT ?1"),
    };
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;

    fn row_mapper(row: &rusqlite::Row) -> rusqlite::Result<MemoryResult<Memory>> {
        Ok(row_to_memory(row))
    }

    let rows: Vec<MemoryResult<Memory>> = if let Some(p) = project {
        stmt.query_map(params![p, limit as i64], row_mapper)
            .and_then(|it| it.collect::<rusqlite::Result<Vec<_>>>())
    } else {
        stmt.query_map(params![limit as i64], row_mapper)
            .and_then(|it| it.collect::<rusqlite::Result<Vec<_>>>())
    }
    .map_err(|e| to_storage_err(e.to_string()))?;

    rows.into_iter().collect::<MemoryResult<Vec<_>>>()
}

pub fn list_all(conn: &Connection) -> MemoryResult<Vec<Memory>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {SELECT_COLUMNS} FROM memories ORDER BY id ASC"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| Ok(row_to_memory(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?
        .into_iter()
        .collect::<MemoryResult<Vec<_>>>()
}

fn row_to_memory(row: &rusqlite::Row<'_>) -> MemoryResult<Memory> {
    let category_str: String = row.get(6).map_err(|e| to_storage_err(e.to_string()))?;
    let tags_json: String = row.get(7).map_err(|e| to_storage_err(e.to_string()))?;
    let files_json: String = row.get(8).map_err(|e| to_storage_err(e.to_string()))?;
    let created_at_str: String = row.get(10).map_err(|e| to_storage_err(e.to_string()))?;
    let updated_at_str: String = row.get(11).map_err(|e| to_storage_err(e.to_string()))?;

    let parse_dt = |s: &str| -> MemoryResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
    };

    Ok(Memory {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        project: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        title: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        what: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        why: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        impact: row.get(5).map_err(|e| to_storage_err(e.to_string()))?,
        category: Category::parse_or_default(&category_str),
        tags: serde_json::from_str(&tags_json).map_err(|e| to_storage_err(e.to_string()))?,
        related_files: serde_json::from_str(&files_json).map_err(|e| to_storage_err(e.to_string()))?,
        source: row.get(9).map_err(|e| to_storage_err(e.to_string()))?,
        created_at: parse_dt(&created_at_str)?,
        updated_at: parse_dt(&updated_at_str)?,
        updated_count: row.get(12).map_err(|e| to_storage_err(e.to_string()))?,
        file_path: row.get(13).map_err(|e| to_storage_err(e.to_string()))?,
    })
}
