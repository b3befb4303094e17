use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use memoir_core::constants::{FTS_CANDIDATE_MULTIPLIER, MAX_SEARCH_LIMIT};
use memoir_core::errors::{MemoryError, MemoryResult};
use memoir_core::models::{SearchFilters, SearchResult, SemanticMode};
use memoir_core::traits::{EmbeddingProvider, IndexStore};
use memoir_core::FusionConfig;
use tracing::{debug, warn};

use crate::fusion::fuse_scores;

/// Fuses lexical and vector search over the index into a single ranked
/// result list.
///
/// Vector availability is probed once and cached; a dimension mismatch
/// discovered mid-session permanently disables the vector leg for the
/// lifetime of this retriever rather than re-probing on every call.
pub struct HybridRetriever {
    store: Arc<dyn IndexStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    fusion: FusionConfig,
    vectors_available: AtomicBool,
    probed: AtomicBool,
}

impl HybridRetriever {
    pub fn new(store: Arc<dyn IndexStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            store,
            embedder,
            fusion: FusionConfig::default(),
            vectors_available: AtomicBool::new(false),
            probed: AtomicBool::new(false),
        }
    }

    pub fn with_fusion_config(mut self, fusion: FusionConfig) -> Self {
        self.fusion = fusion;
        self
    }

    fn vectors_available(&self) -> MemoryResult<bool> {
        if self.probed.load(Ordering::Acquire) {
            return Ok(self.vectors_available.load(Ordering::Acquire));
        }

        let has_table = self.store.has_vec_table()?;
        let available = match self.store.get_embedding_dim()? {
            Some(pinned) => has_table && pinned == self.embedder.dimensions(),
            None => false,
        };
        self.vectors_available.store(available, Ordering::Release);
        self.probed.store(true, Ordering::Release);
        Ok(available)
    }

    fn disable_vectors(&self) {
        self.vectors_available.store(false, Ordering::Release);
        self.probed.store(true, Ordering::Release);
    }

    /// Run a hybrid search for `query`, returning up to `limit` results.
    pub fn search(
        &self,
        query: &str,
        limit: usize,
        filters: &SearchFilters,
        mode: SemanticMode,
    ) -> MemoryResult<Vec<SearchResult>> {
        let limit = limit.clamp(1, MAX_SEARCH_LIMIT);
        let candidate_limit = limit * FTS_CANDIDATE_MULTIPLIER;

        let fts_hits = self.store.fts_search(query, candidate_limit, filters)?;
        let vectors_available = self.vectors_available()?;

        if mode == SemanticMode::Always && !vectors_available {
            return Err(MemoryError::VectorsUnavailable);
        }

        let vector_hits = if mode != SemanticMode::Never && vectors_available {
            self.embed_and_search_vectors(query, candidate_limit, filters, mode)?
        } else {
            Vec::new()
        };

        let fused = fuse_scores(&fts_hits, &vector_hits, self.fusion);

        let mut results = Vec::with_capacity(fused.len());
        for candidate in fused {
            let Some(memory) = self.store.get(&candidate.id)? else {
                continue;
            };
            let has_details = self.store.get_details(&candidate.id)?.is_some();
            results.push(SearchResult {
                memory,
                score: candidate.score,
                has_details,
                fts_only: candidate.fts_only,
            });
        }

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.memory.updated_at.cmp(&a.memory.updated_at))
                .then_with(|| a.memory.id.cmp(&b.memory.id))
        });
        results.truncate(limit);
        Ok(results)
    }

    fn embed_and_search_vectors(
        &self,
        query: &str,
        candidate_limit: usize,
        filters: &SearchFilters,
        mode: SemanticMode,
    ) -> MemoryResult<Vec<(String, f64)>> {
        let embedding = match self.embedder.embed(query) {
            Ok(v) => v,
            Err(e) if mode == SemanticMode::Always => return Err(e),
            Err(e) => {
                debug!(error = %e, "query embedding failed, degrading to lexical-only");
                return Ok(Vec::new());
            }
        };

        if embedding.len() != self.embedder.dimensions() {
            warn!("embedding provider returned an unexpected dimension, disabling vector search");
            self.disable_vectors();
            return if mode == SemanticMode::Always {
                Err(MemoryError::VectorsUnavailable)
            } else {
                Ok(Vec::new())
            };
        }

        match self.store.vector_search(&embedding, candidate_limit, filters) {
            Ok(hits) => Ok(hits),
            Err(MemoryError::ProviderDimMismatch { .. }) => {
                self.disable_vectors();
                if mode == SemanticMode::Always {
                    Err(MemoryError::VectorsUnavailable)
                } else {
                    Ok(Vec::new())
                }
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoir_embeddings::FakeEmbeddingProvider;
    use memoir_storage::StorageEngine;
    use memoir_core::models::{Category, Memory};
    use chrono::Utc;

    fn sample_memory(id: &str, title: &str, what: &str) -> Memory {
        let now = Utc::now();
        Memory {
            id: id.to_string(),
            project: "proj1".to_string(),
            title: title.to_string(),
            what: what.to_string(),
            why: None,
            impact: None,
            category: Category::Context,
            tags: vec![],
            related_files: vec![],
            source: None,
            created_at: now,
            updated_at: now,
            updated_count: 0,
            file_path: String::new(),
        }
    }

    #[test]
    fn degrades_to_lexical_only_when_candidate_has_no_embedding() {
        let store: Arc<dyn IndexStore> = Arc::new(StorageEngine::open_in_memory().unwrap());
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(FakeEmbeddingProvider::default());
        store
            .insert(&sample_memory("11111111-1111-1111-1111-111111111111", "FastAPI setup", "configured routes"), None)
            .unwrap();

        let retriever = HybridRetriever::new(store, embedder);
        let filters = SearchFilters::default();
        let results = retriever.search("FastAPI", 5, &filters, SemanticMode::Auto).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].fts_only);
    }

    #[test]
    fn always_mode_fails_when_vectors_unavailable() {
        let store: Arc<dyn IndexStore> = Arc::new(StorageEngine::open_in_memory().unwrap());
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(FakeEmbeddingProvider::default());
        let retriever = HybridRetriever::new(store, embedder);
        let filters = SearchFilters::default();
        let err = retriever.search("anything", 5, &filters, SemanticMode::Always).unwrap_err();
        assert!(matches!(err, MemoryError::VectorsUnavailable));
    }

    #[test]
    fn fused_results_are_scored_and_ranked() {
        let store: Arc<dyn IndexStore> = Arc::new(StorageEngine::open_in_memory().unwrap());
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(FakeEmbeddingProvider::default());

        let m1 = sample_memory("22222222-2222-2222-2222-222222222222", "FastAPI routing", "async routes in FastAPI");
        let m2 = sample_memory("33333333-3333-3333-3333-333333333333", "Unrelated note", "something else entirely");
        let v1 = embedder.embed(&m1.composite_text()).unwrap();
        let v2 = embedder.embed(&m2.composite_text()).unwrap();
        store.insert(&m1, Some(&v1)).unwrap();
        store.insert(&m2, Some(&v2)).unwrap();

        let retriever = HybridRetriever::new(store, embedder);
        let filters = SearchFilters::default();
        let results = retriever.search("FastAPI routes", 5, &filters, SemanticMode::Auto).unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].memory.id, m1.id);
    }
}
