use std::sync::Arc;

use memoir_core::errors::MemoryError;
use memoir_core::models::{RawMemory, SaveAction, SemanticMode};
use memoir_core::traits::EmbeddingProvider;
use memoir_embeddings::FakeEmbeddingProvider;
use memoir_engine::MemoryEngine;
use tempfile::TempDir;

fn open_engine() -> (TempDir, MemoryEngine) {
    let dir = TempDir::new().unwrap();
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(FakeEmbeddingProvider::default());
    let engine = MemoryEngine::open(dir.path(), embedder).unwrap();
    (dir, engine)
}

fn raw(title: &str, what: &str) -> RawMemory {
    RawMemory {
        title: title.to_string(),
        what: what.to_string(),
        ..Default::default()
    }
}

#[test]
fn create_then_search_returns_the_new_memory() {
    let (_dir, engine) = open_engine();
    engine
        .save(raw("Python FastAPI Setup", "Configured FastAPI with async routes"), "proj1")
        .unwrap();

    let results = engine.search("FastAPI", 5, Some("proj1"), None, SemanticMode::Auto).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].memory.title, "Python FastAPI Setup");
}

#[test]
fn dedup_update_merges_tags_and_replaces_body() {
    let (_dir, engine) = open_engine();

    let mut first = raw("Fixed auth session expiry", "Session defaulted to 60min");
    first.category = Some("bug".to_string());
    first.tags = vec!["auth".to_string(), "session".to_string()];
    let first_outcome = engine.save(first, "proj1").unwrap();
    assert_eq!(first_outcome.action, SaveAction::Created);

    let mut second = raw("Fixed auth session expiry", "Both refresh calls now pass 7-day duration");
    second.category = Some("bug".to_string());
    second.tags = vec!["auth".to_string(), "stytch".to_string()];
    let second_outcome = engine.save(second, "proj1").unwrap();

    assert_eq!(second_outcome.action, SaveAction::Updated);
    assert_eq!(second_outcome.id, first_outcome.id);

    let memory = engine.get_details(&second_outcome.id); // sanity: call doesn't error on no details
    assert!(memory.unwrap().is_none());

    let results = engine.search("auth", 5, Some("proj1"), None, SemanticMode::Never).unwrap();
    let updated = results.iter().find(|r| r.memory.id == first_outcome.id).unwrap();
    assert_eq!(updated.memory.what, "Both refresh calls now pass 7-day duration");
    assert_eq!(updated.memory.tags, vec!["auth", "session", "stytch"]);
    assert_eq!(updated.memory.updated_count, 1);
}

#[test]
fn project_isolation_creates_two_distinct_memories() {
    let (_dir, engine) = open_engine();

    let mut a = raw("Database migration", "Added users table");
    a.category = Some("decision".to_string());
    let outcome_a = engine.save(a, "project-a").unwrap();

    let mut b = raw("Database migration", "Added users table");
    b.category = Some("decision".to_string());
    let outcome_b = engine.save(b, "project-b").unwrap();

    assert_eq!(outcome_a.action, SaveAction::Created);
    assert_eq!(outcome_b.action, SaveAction::Created);
    assert_ne!(outcome_a.id, outcome_b.id);
}

#[test]
fn secret_pattern_is_redacted_from_the_index() {
    let (_dir, engine) = open_engine();
    let outcome = engine
        .save(
            raw("Payment integration", "Using API key sk_live_abc123xyz for payment"),
            "proj1",
        )
        .unwrap();

    let results = engine.search("payment", 5, Some("proj1"), None, SemanticMode::Never).unwrap();
    let found = results.iter().find(|r| r.memory.id == outcome.id).unwrap();
    assert!(found.memory.what.contains("[REDACTED]"));
    assert!(!found.memory.what.contains("sk_live_abc123xyz"));
}

#[test]
fn explicit_redaction_markers_strip_details_body() {
    let (_dir, engine) = open_engine();
    let mut memory = raw("Local database config", "Documented local setup");
    memory.details = Some(
        "Database config: <redacted>host=secret.db password=pass123</redacted> works now".to_string(),
    );
    let outcome = engine.save(memory, "proj1").unwrap();

    let details = engine.get_details(&outcome.id).unwrap().unwrap();
    assert!(details.body.contains("[REDACTED]"));
    assert!(!details.body.contains("<redacted>"));
    assert!(!details.body.contains("secret.db"));
    assert!(!details.body.contains("pass123"));
}

#[test]
fn search_degrades_gracefully_without_an_embedding() {
    let (_dir, engine) = open_engine();
    engine.save(raw("First keyword memory", "alpha beta gamma"), "proj1").unwrap();
    engine.save(raw("Second keyword memory", "delta epsilon zeta"), "proj1").unwrap();

    let results = engine.search("keyword", 5, Some("proj1"), None, SemanticMode::Never).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.fts_only));
}

#[test]
fn title_longer_than_max_is_truncated() {
    let (_dir, engine) = open_engine();
    let long_title = "x".repeat(120);
    let outcome = engine.save(raw(&long_title, "some body text"), "proj1").unwrap();

    let results = engine.search("body", 5, Some("proj1"), None, SemanticMode::Never).unwrap();
    let found = results.iter().find(|r| r.memory.id == outcome.id).unwrap();
    assert_eq!(found.memory.title.chars().count(), 60);
}

#[test]
fn unknown_category_coerces_to_context() {
    let (_dir, engine) = open_engine();
    let mut memory = raw("Odd category test", "body text here");
    memory.category = Some("sonnet".to_string());
    let outcome = engine.save(memory, "proj1").unwrap();

    let results = engine.search("odd", 5, Some("proj1"), None, SemanticMode::Never).unwrap();
    let found = results.iter().find(|r| r.memory.id == outcome.id).unwrap();
    assert_eq!(found.memory.category.as_str(), "context");
}

#[test]
fn empty_query_returns_no_results_without_error() {
    let (_dir, engine) = open_engine();
    engine.save(raw("Anything at all", "some body"), "proj1").unwrap();

    let results = engine.search("", 5, Some("proj1"), None, SemanticMode::Never).unwrap();
    assert!(results.is_empty());
}

#[test]
fn always_semantic_mode_fails_before_any_memory_is_embedded() {
    let (_dir, engine) = open_engine();
    let err = engine
        .search("anything", 5, Some("proj1"), None, SemanticMode::Always)
        .unwrap_err();
    assert!(matches!(err, MemoryError::VectorsUnavailable));
}

#[test]
fn context_returns_recent_pointers_with_total_count() {
    let (_dir, engine) = open_engine();
    engine.save(raw("First note", "first body"), "proj1").unwrap();
    engine.save(raw("Second note", "second body"), "proj1").unwrap();

    let (pointers, total) = engine.get_context(10, Some("proj1"), SemanticMode::Never, None, false).unwrap();
    assert_eq!(total, 2);
    assert_eq!(pointers.len(), 2);
}

#[test]
fn reindex_reports_count_and_dimension() {
    let (_dir, engine) = open_engine();
    engine.save(raw("First note", "first body"), "proj1").unwrap();
    engine.save(raw("Second note", "second body"), "proj1").unwrap();

    let (count, dim) = engine.reindex().unwrap();
    assert_eq!(count, 2);
    assert_eq!(dim, FakeEmbeddingProvider::default_dimensions());
}

#[test]
fn delete_removes_memory_from_search_results() {
    let (_dir, engine) = open_engine();
    let outcome = engine.save(raw("Disposable note", "to be removed"), "proj1").unwrap();

    engine.delete(&outcome.id).unwrap();

    let results = engine.search("disposable", 5, Some("proj1"), None, SemanticMode::Never).unwrap();
    assert!(results.is_empty());
}
