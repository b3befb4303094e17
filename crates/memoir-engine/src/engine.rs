use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use memoir_core::errors::{MemoryError, MemoryResult};
use memoir_core::models::{
    Category, ContextPointer, Memory, MemoryDetails, RawMemory, SaveAction, SaveOutcome,
    SearchFilters, SearchResult, SemanticMode,
};
use memoir_core::traits::{EmbeddingProvider, IndexStore};
use memoir_core::{DedupConfig, FusionConfig};
use memoir_redact::Redactor;
use memoir_retrieval::HybridRetriever;
use memoir_storage::StorageEngine;
use memoir_vault::VaultWriter;
use tracing::info;
use uuid::Uuid;

use crate::context::{recent_pointers, to_pointer};
use crate::dedup::{
    dedup_preserve_order, quality_warnings, shares_title_token, tags_overlap, truncate_title,
    union_preserve_order,
};

/// The single public entry point other adapters build on: save, search,
/// context, details, delete, reindex.
pub struct MemoryEngine {
    store: Arc<dyn IndexStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    vault: VaultWriter,
    retriever: HybridRetriever,
    redactor: Redactor,
    dedup_config: DedupConfig,
}

impl MemoryEngine {
    /// Open (creating if needed) a durable engine rooted at `home`.
    pub fn open(home: impl Into<PathBuf>, embedder: Arc<dyn EmbeddingProvider>) -> MemoryResult<Self> {
        let home = home.into();
        let db_dir = home.join("db");
        std::fs::create_dir_all(&db_dir)?;
        let store: Arc<dyn IndexStore> = Arc::new(StorageEngine::open(&db_dir.join("index.sqlite"))?);
        Self::with_store(home, store, embedder)
    }

    /// Open an engine backed by an in-memory store, vault files still on
    /// disk under `home`. Used by tests that want a hermetic index without
    /// paying for a temp directory's worth of SQLite file I/O.
    pub fn open_in_memory(home: impl Into<PathBuf>, embedder: Arc<dyn EmbeddingProvider>) -> MemoryResult<Self> {
        let store: Arc<dyn IndexStore> = Arc::new(StorageEngine::open_in_memory()?);
        Self::with_store(home.into(), store, embedder)
    }

    fn with_store(
        home: PathBuf,
        store: Arc<dyn IndexStore>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> MemoryResult<Self> {
        let retriever = HybridRetriever::new(store.clone(), embedder.clone())
            .with_fusion_config(FusionConfig::default());
        Ok(Self {
            store,
            embedder,
            vault: VaultWriter::new(home),
            retriever,
            redactor: Redactor::new(),
            dedup_config: DedupConfig::default(),
        })
    }

    pub fn with_dedup_config(mut self, config: DedupConfig) -> Self {
        self.dedup_config = config;
        self
    }

    /// Normalize, redact, embed, run the dedup probe, then write the vault
    /// entry and index rows. See the component design for the exact
    /// ordering and failure-recovery rules.
    pub fn save(&self, raw: RawMemory, project: &str) -> MemoryResult<SaveOutcome> {
        if project.trim().is_empty() {
            return Err(MemoryError::InvalidInput {
                reason: "project must not be empty".to_string(),
            });
        }
        if raw.what.trim().is_empty() {
            return Err(MemoryError::InvalidInput {
                reason: "what must not be empty".to_string(),
            });
        }

        let title = truncate_title(&raw.title);
        let category = raw
            .category
            .as_deref()
            .map(Category::parse_or_default)
            .unwrap_or(Category::Context);
        let what = self.redactor.redact(raw.what.trim());
        let why = raw.why.as_deref().map(|s| self.redactor.redact(s.trim()));
        let impact = raw.impact.as_deref().map(|s| self.redactor.redact(s.trim()));
        let details = raw.details.as_deref().map(|s| self.redactor.redact(s.trim()));
        let tags = dedup_preserve_order(&raw.tags);
        let related_files = dedup_preserve_order(&raw.related_files);

        let now = Utc::now();
        let candidate = Memory {
            id: Uuid::new_v4().to_string(),
            project: project.to_string(),
            title,
            what,
            why,
            impact,
            category,
            tags,
            related_files,
            source: raw.source.clone(),
            created_at: now,
            updated_at: now,
            updated_count: 0,
            file_path: String::new(),
        };

        let embedding = match self.embedder.embed(&candidate.composite_text()) {
            Ok(v) => Some(v),
            Err(MemoryError::ProviderUnavailable { .. }) => None,
            Err(e) => return Err(e),
        };

        let duplicate = match &embedding {
            Some(v) => self.find_duplicate(v, project, candidate.category, &candidate.title, &candidate.tags)?,
            None => None,
        };

        let (action, mut memory) = match duplicate {
            Some(mut existing) => {
                existing.what = candidate.what.clone();
                existing.why = candidate.why.clone();
                existing.impact = candidate.impact.clone();
                existing.tags = union_preserve_order(&existing.tags, &candidate.tags);
                existing.related_files = union_preserve_order(&existing.related_files, &candidate.related_files);
                existing.updated_at = now;
                existing.updated_count += 1;
                (SaveAction::Updated, existing)
            }
            None => (SaveAction::Created, candidate),
        };

        let file_path = self.vault.append(&memory, details.as_deref(), action)?;
        memory.file_path = file_path.clone();

        match action {
            SaveAction::Created => self.store.insert(&memory, embedding.as_deref())?,
            SaveAction::Updated => self.store.update(&memory, embedding.as_deref())?,
        }

        if let Some(body) = &details {
            if !body.is_empty() {
                self.store.upsert_details(&MemoryDetails {
                    memory_id: memory.id.clone(),
                    body: body.clone(),
                })?;
            }
        }

        let warnings = quality_warnings(category, details.as_deref());
        info!(id = %memory.id, action = action.as_str(), "saved memory");

        Ok(SaveOutcome {
            action,
            id: memory.id,
            file_path,
            warnings,
        })
    }

    fn find_duplicate(
        &self,
        embedding: &[f32],
        project: &str,
        category: Category,
        title: &str,
        tags: &[String],
    ) -> MemoryResult<Option<Memory>> {
        let filters = SearchFilters {
            project: Some(project.to_string()),
            source: None,
        };
        let hits = self.store.vector_search(embedding, 1, &filters)?;
        let Some((id, cosine)) = hits.into_iter().next() else {
            return Ok(None);
        };
        if cosine < self.dedup_config.cosine_threshold {
            return Ok(None);
        }

        let Some(candidate) = self.store.get(&id)? else {
            return Ok(None);
        };
        if candidate.category != category {
            return Ok(None);
        }
        if self.dedup_config.require_structural_match {
            let structural = shares_title_token(&candidate.title, title) || tags_overlap(&candidate.tags, tags);
            if !structural {
                return Ok(None);
            }
        }
        Ok(Some(candidate))
    }

    pub fn search(
        &self,
        query: &str,
        limit: usize,
        project: Option<&str>,
        source: Option<&str>,
        mode: SemanticMode,
    ) -> MemoryResult<Vec<SearchResult>> {
        let filters = SearchFilters {
            project: project.map(str::to_string),
            source: source.map(str::to_string),
        };
        self.retriever.search(query, limit, &filters, mode)
    }

    pub fn get_context(
        &self,
        limit: usize,
        project: Option<&str>,
        mode: SemanticMode,
        query: Option<&str>,
        topup_recent: bool,
    ) -> MemoryResult<(Vec<ContextPointer>, usize)> {
        let total = self.store.count(project)?;
        let filters = SearchFilters {
            project: project.map(str::to_string),
            source: None,
        };

        let mut pointers = match query.filter(|q| !q.trim().is_empty()) {
            Some(q) if mode != SemanticMode::Never => self
                .retriever
                .search(q, limit, &filters, mode)?
                .into_iter()
                .map(|r| to_pointer(r.memory, r.has_details))
                .collect(),
            _ => recent_pointers(self.store.as_ref(), limit, project)?,
        };

        if topup_recent && pointers.len() < limit {
            let seen: std::collections::HashSet<String> = pointers.iter().map(|p| p.id.clone()).collect();
            for memory in self.store.recent(limit, project)? {
                if pointers.len() >= limit {
                    break;
                }
                if seen.contains(&memory.id) {
                    continue;
                }
                let has_details = self.store.get_details(&memory.id)?.is_some();
                pointers.push(to_pointer(memory, has_details));
            }
        }

        Ok((pointers, total))
    }

    pub fn get_details(&self, id: &str) -> MemoryResult<Option<MemoryDetails>> {
        self.store.get_details(id)
    }

    /// Resolve `id_or_prefix` and delete the matching memory.
    pub fn delete(&self, id_or_prefix: &str) -> MemoryResult<()> {
        let id = self.store.resolve_id(id_or_prefix)?;
        self.store.delete(&id)
    }

    /// Re-embed every memory with the current provider and rebuild the
    /// vector table. Returns `(count, dimension)`.
    pub fn reindex(&self) -> MemoryResult<(usize, usize)> {
        let memories = self.store.list_all()?;
        let mut pairs = Vec::with_capacity(memories.len());
        for memory in &memories {
            let embedding = self.embedder.embed(&memory.composite_text())?;
            pairs.push((memory.id.clone(), embedding));
        }
        let dim = pairs.first().map(|(_, v)| v.len()).unwrap_or(0);
        self.store.rebuild_vectors(&pairs)?;
        info!(count = pairs.len(), dim, "reindex complete");
        Ok((pairs.len(), dim))
    }

    /// Releases no resources beyond what `Drop` already handles; present
    /// for parity with the adapter-facing interface contract.
    pub fn close(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoir_embeddings::FakeEmbeddingProvider;
    use tempfile::tempdir;

    fn engine(home: &std::path::Path) -> MemoryEngine {
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(FakeEmbeddingProvider::default());
        MemoryEngine::open_in_memory(home, embedder).unwrap()
    }

    fn raw(title: &str, what: &str) -> RawMemory {
        RawMemory {
            title: title.to_string(),
            what: what.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn save_rejects_empty_project() {
        let dir = tempdir().unwrap();
        let engine = engine(dir.path());
        let err = engine.save(raw("t", "w"), "").unwrap_err();
        assert!(matches!(err, MemoryError::InvalidInput { .. }));
    }

    #[test]
    fn save_then_search_finds_the_new_memory() {
        let dir = tempdir().unwrap();
        let engine = engine(dir.path());
        let outcome = engine
            .save(raw("Python FastAPI Setup", "Configured FastAPI with async routes"), "proj1")
            .unwrap();
        assert_eq!(outcome.action, SaveAction::Created);

        let results = engine.search("FastAPI", 5, Some("proj1"), None, SemanticMode::Auto).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].memory.id, outcome.id);
    }

    #[test]
    fn second_save_of_near_duplicate_updates_in_place() {
        let dir = tempdir().unwrap();
        let engine = engine(dir.path());

        let mut first = raw("Fixed auth session expiry", "Session defaulted to 60min");
        first.category = Some("bug".to_string());
        first.tags = vec!["auth".to_string(), "session".to_string()];
        let first_outcome = engine.save(first, "proj1").unwrap();

        let mut second = raw("Fixed auth session expiry", "Both refresh calls now pass 7-day duration");
        second.category = Some("bug".to_string());
        second.tags = vec!["auth".to_string(), "stytch".to_string()];
        let second_outcome = engine.save(second, "proj1").unwrap();

        assert_eq!(second_outcome.action, SaveAction::Updated);
        assert_eq!(second_outcome.id, first_outcome.id);

        let memory = engine.store.get(&first_outcome.id).unwrap().unwrap();
        assert_eq!(memory.what, "Both refresh calls now pass 7-day duration");
        assert_eq!(memory.tags, vec!["auth", "session", "stytch"]);
        assert_eq!(memory.updated_count, 1);
    }

    #[test]
    fn identical_titles_in_different_projects_both_create() {
        let dir = tempdir().unwrap();
        let engine = engine(dir.path());

        let mut a = raw("Database migration", "Added users table");
        a.category = Some("decision".to_string());
        a.details = Some("Context: needed a users table.".to_string());
        let outcome_a = engine.save(a, "project-a").unwrap();

        let mut b = raw("Database migration", "Added users table");
        b.category = Some("decision".to_string());
        b.details = Some("Context: needed a users table.".to_string());
        let outcome_b = engine.save(b, "project-b").unwrap();

        assert_eq!(outcome_a.action, SaveAction::Created);
        assert_eq!(outcome_b.action, SaveAction::Created);
        assert_ne!(outcome_a.id, outcome_b.id);
    }

    #[test]
    fn secret_in_what_is_redacted_before_persistence() {
        let dir = tempdir().unwrap();
        let engine = engine(dir.path());
        let outcome = engine
            .save(raw("Payment setup", "Using API key sk_live_abc123xyz for payment"), "proj1")
            .unwrap();

        let memory = engine.store.get(&outcome.id).unwrap().unwrap();
        assert!(memory.what.contains("[REDACTED]"));
        assert!(!memory.what.contains("sk_live_abc123xyz"));
    }
}
