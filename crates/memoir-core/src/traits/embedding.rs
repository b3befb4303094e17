use crate::errors::MemoryResult;

/// A source of dense vector embeddings for text. Implementations must be
/// stable: repeated calls with the same text should be (approximately)
/// idempotent, and the reported dimension must never change for a given
/// instance.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single piece of text.
    fn embed(&self, text: &str) -> MemoryResult<Vec<f32>>;

    /// Embed a batch of texts. Implementations without native batching
    /// may embed sequentially.
    fn embed_batch(&self, texts: &[String]) -> MemoryResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// The fixed dimension of vectors this provider produces.
    fn dimensions(&self) -> usize;

    /// A short identifier for logs and diagnostics.
    fn name(&self) -> &str;

    /// Whether the provider is currently reachable. A best-effort check;
    /// callers must still handle `embed` failing even when this is true.
    fn is_available(&self) -> bool;
}
