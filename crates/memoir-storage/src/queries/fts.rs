use rusqlite::{params, Connection};

use memoir_core::errors::MemoryResult;

use crate::errors::to_storage_err;

/// Lexical search against the FTS5 index. Returns `(id, score)` pairs,
/// higher is better, ordered descending. An empty or all-punctuation
/// query returns an empty list rather than erroring or dumping the table.
/// `project` and `source` are optional equality filters, AND-combined.
pub fn search(
    conn: &Connection,
    query: &str,
    limit: usize,
    project: Option<&str>,
    source: Option<&str>,
) -> MemoryResult<Vec<(String, f64)>> {
    let Some(match_expr) = build_match_expr(query) else {
        return Ok(vec![]);
    };

    let sql = match (project, source) {
        (Some(_), Some(_)) => {
            "SELECT f.id, bm25(memories_fts) AS score
             FROM memories_fts f
             JOIN memories m ON m.id = f.id
             WHERE memories_fts MATCH ?1 AND m.project = ?2 AND m.source = ?3
             ORDER BY score ASC
             LIMIT ?4"
        }
        (Some(_), None) => {
            "SELECT f.id, bm25(memories_fts) AS score
             FROM memories_fts f
             JOIN memories m ON m.id = f.id
             WHERE memories_fts MATCH ?1 AND m.project = ?2
             ORDER BY score ASC
             LIMIT ?3"
        }
        (None, Some(_)) => {
            "SELECT f.id, bm25(memories_fts) AS score
             FROM memories_fts f
             JOIN memories m ON m.id = f.id
             WHERE memories_fts MATCH ?1 AND m.source = ?2
             ORDER BY score ASC
             LIMIT ?3"
        }
        (None, None) => {
            "SELECT id, bm25(memories_fts) AS score
             FROM memories_fts
             WHERE memories_fts MATCH ?1
             ORDER BY score ASC
             LIMIT ?2"
        }
    };

    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;

    fn row_mapper(row: &rusqlite::Row) -> rusqlite::Result<(String, f64)> {
        let id: String = row.get(0)?;
        let raw_score: f64 = row.get(1)?;
        Ok((id, raw_score))
    }

    let rows: Vec<(String, f64)> = match (project, source) {
        (Some(p), Some(s)) => stmt
            .query_map(params![match_expr, p, s, limit as i64], row_mapper)
            .and_then(|it| it.collect::<rusqlite::Result<Vec<_>>>()),
        (Some(p), None) => stmt
            .query_map(params![match_expr, p, limit as i64], row_mapper)
            .and_then(|it| it.collect::<rusqlite::Result<Vec<_>>>()),
        (None, Some(s)) => stmt
            .query_map(params![match_expr, s, limit as i64], row_mapper)
            .and_then(|it| it.collect::<rusqlite::Result<Vec<_>>>()),
        (None, None) => stmt
            .query_map(params![match_expr, limit as i64], row_mapper)
            .and_then(|it| it.collect::<rusqlite::Result<Vec<_>>>()),
    }
    .map_err(|e| to_storage_err(e.to_string()))?;

    // bm25() is more-negative-is-better; flip the sign so callers always
    // deal with higher-is-better scores like the vector leg.
    Ok(rows.into_iter().map(|(id, raw)| (id, -raw)).collect())
}

/// Build a forgiving FTS5 MATCH expression: tokenize on whitespace/
/// punctuation, quote each token as a literal, OR them together. Returns
/// `None` if the query has no indexable tokens.
fn build_match_expr(query: &str) -> Option<String> {
    let tokens: Vec<String> = query
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty())
        .map(|t| format!("\"{}\"", t.replace('"', "")))
        .collect();

    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" OR "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_has_no_match_expr() {
        assert_eq!(build_match_expr(""), None);
        assert_eq!(build_match_expr("   ---   "), None);
    }

    #[test]
    fn tokenizes_into_ored_literals() {
        assert_eq!(build_match_expr("fastapi routes"), Some("\"fastapi\" OR \"routes\"".to_string()));
    }
}
