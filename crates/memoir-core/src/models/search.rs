use super::memory::Memory;

/// Equality filters applied to both the lexical and vector legs of a
/// hybrid search.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub project: Option<String>,
    pub source: Option<String>,
}

/// A single ranked hit returned by the hybrid retriever.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub memory: Memory,
    pub score: f64,
    pub has_details: bool,
    /// True when this result had no vector-search contribution, either
    /// because vectors are unavailable or the candidate only matched
    /// lexically.
    pub fts_only: bool,
}
