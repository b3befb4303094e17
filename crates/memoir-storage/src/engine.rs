use std::path::Path;

use memoir_core::errors::MemoryResult;
use memoir_core::models::{Memory, MemoryDetails, SearchFilters};
use memoir_core::traits::IndexStore;

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries;

/// The SQLite-backed `IndexStore`. Owns the single writer connection and
/// runs schema migrations on open.
pub struct StorageEngine {
    pool: ConnectionPool,
}

impl StorageEngine {
    pub fn open(path: &Path) -> MemoryResult<Self> {
        let pool = ConnectionPool::open(path)?;
        let engine = Self { pool };
        engine.initialize()?;
        Ok(engine)
    }

    pub fn open_in_memory() -> MemoryResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        let engine = Self { pool };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> MemoryResult<()> {
        self.pool.writer.with_conn(migrations::run_migrations)
    }
}

impl IndexStore for StorageEngine {
    fn insert(&self, memory: &Memory, embedding: Option<&[f32]>) -> MemoryResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::memory_crud::insert_memory(conn, memory, embedding))
    }

    fn update(&self, memory: &Memory, embedding: Option<&[f32]>) -> MemoryResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::memory_crud::update_memory(conn, memory, embedding))
    }

    fn resolve_id(&self, id_or_prefix: &str) -> MemoryResult<String> {
        self.pool
            .writer
            .with_conn(|conn| queries::memory_crud::resolve_id(conn, id_or_prefix))
    }

    fn delete(&self, id: &str) -> MemoryResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::memory_crud::delete_memory(conn, id))
    }

    fn get(&self, id: &str) -> MemoryResult<Option<Memory>> {
        self.pool.writer.with_conn(|conn| queries::memory_crud::get_memory(conn, id))
    }

    fn get_details(&self, id: &str) -> MemoryResult<Option<MemoryDetails>> {
        self.pool
            .writer
            .with_conn(|conn| queries::memory_crud::get_details(conn, id))
    }

    fn upsert_details(&self, details: &MemoryDetails) -> MemoryResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::memory_crud::upsert_details(conn, details))
    }

    fn fts_search(
        &self,
        query: &str,
        limit: usize,
        filters: &SearchFilters,
    ) -> MemoryResult<Vec<(String, f64)>> {
        self.pool.writer.with_conn(|conn| {
            queries::fts::search(conn, query, limit, filters.project.as_deref(), filters.source.as_deref())
        })
    }

    fn vector_search(
        &self,
        embedding: &[f32],
        limit: usize,
        filters: &SearchFilters,
    ) -> MemoryResult<Vec<(String, f64)>> {
        self.pool.writer.with_conn(|conn| {
            queries::vector::search_vector(
                conn,
                embedding,
                limit,
                filters.project.as_deref(),
                filters.source.as_deref(),
            )
        })
    }

    fn has_vec_table(&self) -> MemoryResult<bool> {
        self.pool.writer.with_conn(queries::vector::has_vec_table)
    }

    fn get_embedding_dim(&self) -> MemoryResult<Option<usize>> {
        self.pool.writer.with_conn(queries::meta::get_embedding_dim)
    }

    fn rebuild_vectors(&self, pairs: &[(String, Vec<f32>)]) -> MemoryResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::vector::rebuild_vectors(conn, pairs))
    }

    fn count(&self, project: Option<&str>) -> MemoryResult<usize> {
        self.pool.writer.with_conn(|conn| queries::memory_crud::count(conn, project))
    }

    fn recent(&self, limit: usize, project: Option<&str>) -> MemoryResult<Vec<Memory>> {
        self.pool
            .writer
            .with_conn(|conn| queries::memory_crud::recent(conn, limit, project))
    }

    fn list_all(&self) -> MemoryResult<Vec<Memory>> {
        self.pool.writer.with_conn(queries::memory_crud::list_all)
    }
}
