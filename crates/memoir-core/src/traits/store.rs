use crate::errors::MemoryResult;
use crate::models::{Memory, MemoryDetails, SearchFilters};

/// The embedded index's contract: everything the save coordinator, the
/// hybrid retriever, and the context selector need from the durable store.
///
/// Implementations own schema migration and dimension pinning; callers
/// never see SQL.
pub trait IndexStore: Send + Sync {
    /// Insert a brand-new memory row (plus FTS row and, if an embedding is
    /// supplied, a vector row). Fails with `IntegrityError` if the id
    /// already exists.
    fn insert(&self, memory: &Memory, embedding: Option<&[f32]>) -> MemoryResult<()>;

    /// Replace an existing memory's mutable fields in place. Fails with
    /// `NotFound` if the id does not exist.
    fn update(&self, memory: &Memory, embedding: Option<&[f32]>) -> MemoryResult<()>;

    /// Resolve a full id or an unambiguous id prefix to exactly one id.
    fn resolve_id(&self, id_or_prefix: &str) -> MemoryResult<String>;

    /// Delete a memory (and its details/vector rows) by exact id.
    fn delete(&self, id: &str) -> MemoryResult<()>;

    fn get(&self, id: &str) -> MemoryResult<Option<Memory>>;

    fn get_details(&self, id: &str) -> MemoryResult<Option<MemoryDetails>>;

    /// Insert or replace the details row for a memory.
    fn upsert_details(&self, details: &MemoryDetails) -> MemoryResult<()>;

    /// Lexical search. Returns `(id, fts_score)` pairs, higher is better,
    /// ordered descending.
    fn fts_search(
        &self,
        query: &str,
        limit: usize,
        filters: &SearchFilters,
    ) -> MemoryResult<Vec<(String, f64)>>;

    /// Vector search. Returns `(id, cosine_similarity)` pairs, ordered
    /// descending. Behavior is undefined if `get_embedding_dim` is `None`.
    fn vector_search(
        &self,
        embedding: &[f32],
        limit: usize,
        filters: &SearchFilters,
    ) -> MemoryResult<Vec<(String, f64)>>;

    fn has_vec_table(&self) -> MemoryResult<bool>;

    fn get_embedding_dim(&self) -> MemoryResult<Option<usize>>;

    /// Replace the entire vector table contents, pinning `embedding_dim`
    /// to the length of the supplied vectors.
    fn rebuild_vectors(&self, pairs: &[(String, Vec<f32>)]) -> MemoryResult<()>;

    /// Count memories matching the optional project filter.
    fn count(&self, project: Option<&str>) -> MemoryResult<usize>;

    /// Most recently updated memories first, optionally scoped to a
    /// project.
    fn recent(&self, limit: usize, project: Option<&str>) -> MemoryResult<Vec<Memory>>;

    /// Every memory in the store, for reindexing.
    fn list_all(&self) -> MemoryResult<Vec<Memory>>;
}
