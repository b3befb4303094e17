use rusqlite::{params, Connection};

use memoir_core::errors::MemoryResult;

use crate::errors::to_storage_err;
use crate::queries::meta;

/// Store or replace a memory's embedding, pinning `embedding_dim` in the
/// meta table if this is the first vector ever written.
pub fn upsert_vector(conn: &Connection, memory_id: &str, embedding: &[f32]) -> MemoryResult<()> {
    let blob = f32_vec_to_bytes(embedding);
    conn.execute(
        "INSERT INTO memory_vectors (memory_id, dimensions, embedding) VALUES (?1, ?2, ?3)
         ON CONFLICT(memory_id) DO UPDATE SET dimensions = excluded.dimensions, embedding = excluded.embedding",
        params![memory_id, embedding.len() as i64, blob],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    if meta::get_embedding_dim(conn)?.is_none() {
        meta::set_embedding_dim(conn, embedding.len())?;
    }
    Ok(())
}

/// Brute-force cosine similarity scan over the vector table. This mirrors
/// the fallback search strategy used when no native vector index
/// extension is loaded: every row is scored in Rust rather than in SQL.
/// `project` and `source` are optional equality filters, AND-combined.
pub fn search_vector(
    conn: &Connection,
    query_embedding: &[f32],
    limit: usize,
    project: Option<&str>,
    source: Option<&str>,
) -> MemoryResult<Vec<(String, f64)>> {
    let query_norm_sq: f64 = query_embedding.iter().map(|x| (*x as f64) * (*x as f64)).sum();
    if query_norm_sq == 0.0 {
        return Ok(vec![]);
    }
    let query_len = query_embedding.len();

    let sql = match (project, source) {
        (Some(_), Some(_)) => {
            "SELECT mv.memory_id, mv.embedding, mv.dimensions
             FROM memory_vectors mv
             JOIN memories m ON m.id = mv.memory_id
             WHERE m.project = ?1 AND m.source = ?2"
        }
        (Some(_), None) => {
            "SELECT mv.memory_id, mv.embedding, mv.dimensions
             FROM memory_vectors mv
             JOIN memories m ON m.id = mv.memory_id
             WHERE m.project = ?1"
        }
        (None, Some(_)) => {
            "SELECT mv.memory_id, mv.embedding, mv.dimensions
             FROM memory_vectors mv
             JOIN memories m ON m.id = mv.memory_id
             WHERE m.source = ?1"
        }
        (None, None) => "SELECT memory_id, embedding, dimensions FROM memory_vectors",
    };
    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;

    fn row_mapper(row: &rusqlite::Row) -> rusqlite::Result<(String, Vec<u8>, i64)> {
        let id: String = row.get(0)?;
        let blob: Vec<u8> = row.get(1)?;
        let dims: i64 = row.get(2)?;
        Ok((id, blob, dims))
    }

    let rows: Vec<(String, Vec<u8>, i64)> = match (project, source) {
        (Some(p), Some(s)) => stmt
            .query_map(params![p, s], row_mapper)
            .and_then(|it| it.collect::<rusqlite::Result<Vec<_>>>()),
        (Some(p), None) => stmt
            .query_map(params![p], row_mapper)
            .and_then(|it| it.collect::<rusqlite::Result<Vec<_>>>()),
        (None, Some(s)) => stmt
            .query_map(params![s], row_mapper)
            .and_then(|it| it.collect::<rusqlite::Result<Vec<_>>>()),
        (None, None) => stmt
            .query_map([], row_mapper)
            .and_then(|it| it.collect::<rusqlite::Result<Vec<_>>>()),
    }
    .map_err(|e| to_storage_err(e.to_string()))?;

    let mut scored: Vec<(String, f64)> = Vec::new();
    for (id, blob, dims) in rows {
        if dims as usize != query_len {
            continue;
        }
        let stored = bytes_to_f32_vec(&blob);
        let sim = cosine_similarity(query_embedding, &stored);
        if sim > 0.0 {
            scored.push((id, sim));
        }
    }

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    Ok(scored)
}

pub fn has_vec_table(conn: &Connection) -> MemoryResult<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'memory_vectors'",
            [],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count > 0)
}

/// Delete every row in the vector table and repopulate it from the given
/// `(id, embedding)` pairs, pinning `embedding_dim` to the new length.
pub fn rebuild_vectors(conn: &Connection, pairs: &[(String, Vec<f32>)]) -> MemoryResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("rebuild_vectors begin: {e}")))?;

    tx.execute("DELETE FROM memory_vectors", [])
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut dim = None;
    for (id, embedding) in pairs {
        upsert_vector(&tx, id, embedding)?;
        dim.get_or_insert(embedding.len());
    }
    if let Some(d) = dim {
        meta::set_embedding_dim(&tx, d)?;
    }

    tx.commit()
        .map_err(|e| to_storage_err(format!("rebuild_vectors commit: {e}")))?;
    Ok(())
}

fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn bytes_to_f32_vec(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
