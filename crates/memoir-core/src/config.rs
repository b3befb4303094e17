use crate::constants::{DEDUP_COSINE_THRESHOLD, FUSION_WEIGHT_LEXICAL, FUSION_WEIGHT_VECTOR};

/// Tunables for the near-duplicate dedup probe run on every save.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DedupConfig {
    /// Minimum cosine similarity for a candidate to qualify as a duplicate.
    pub cosine_threshold: f64,
    /// Whether the structural check (shared title token or overlapping
    /// tags) is required in addition to the cosine threshold.
    pub require_structural_match: bool,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            cosine_threshold: DEDUP_COSINE_THRESHOLD,
            require_structural_match: true,
        }
    }
}

/// Weights used to fuse the lexical and vector scores into a single
/// ranking score during hybrid search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionConfig {
    pub lexical_weight: f64,
    pub vector_weight: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            lexical_weight: FUSION_WEIGHT_LEXICAL,
            vector_weight: FUSION_WEIGHT_VECTOR,
        }
    }
}
