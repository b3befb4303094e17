use std::collections::HashMap;

use memoir_core::FusionConfig;

/// A fused candidate before the memory row has been fetched.
#[derive(Debug, Clone)]
pub struct FusedCandidate {
    pub id: String,
    pub score: f64,
    /// True when the candidate only matched lexically, either because
    /// vector search was skipped or it did not appear in the vector pool.
    pub fts_only: bool,
}

/// Combine lexical and vector candidate pools into one ranked-by-id map.
///
/// FTS scores are normalized against the max score in this query's pool
/// before weighting, since `bm25` magnitudes are not comparable across
/// queries. Vector scores are cosine similarities and already live in
/// `[-1, 1]`, so only negative values are clamped to zero before weighting.
pub fn fuse_scores(
    fts_hits: &[(String, f64)],
    vector_hits: &[(String, f64)],
    fusion: FusionConfig,
) -> Vec<FusedCandidate> {
    let fts_max = fts_hits.iter().map(|(_, s)| *s).fold(0.0_f64, f64::max);

    let mut fused: HashMap<String, FusedCandidate> = HashMap::new();

    for (id, score) in fts_hits {
        let normalized = if fts_max > 0.0 { (score / fts_max).max(0.0) } else { 0.0 };
        fused.insert(
            id.clone(),
            FusedCandidate {
                id: id.clone(),
                score: fusion.lexical_weight * normalized,
                fts_only: true,
            },
        );
    }

    for (id, score) in vector_hits {
        let contribution = fusion.vector_weight * score.max(0.0);
        fused
            .entry(id.clone())
            .and_modify(|c| {
                c.score += contribution;
                c.fts_only = false;
            })
            .or_insert(FusedCandidate {
                id: id.clone(),
                score: contribution,
                fts_only: false,
            });
    }

    fused.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fusion() -> FusionConfig {
        FusionConfig::default()
    }

    #[test]
    fn lexical_only_candidate_is_normalized_against_pool_max() {
        let fts = vec![("a".to_string(), 10.0), ("b".to_string(), 5.0)];
        let fused = fuse_scores(&fts, &[], fusion());

        let a = fused.iter().find(|c| c.id == "a").unwrap();
        let b = fused.iter().find(|c| c.id == "b").unwrap();
        assert!((a.score - fusion().lexical_weight).abs() < 1e-9);
        assert!((b.score - fusion().lexical_weight * 0.5).abs() < 1e-9);
        assert!(a.fts_only && b.fts_only);
    }

    #[test]
    fn candidate_present_in_both_pools_sums_weighted_contributions() {
        let fts = vec![("a".to_string(), 8.0)];
        let vec = vec![("a".to_string(), 0.9)];
        let fused = fuse_scores(&fts, &vec, fusion());

        let a = &fused[0];
        let expected = fusion().lexical_weight * 1.0 + fusion().vector_weight * 0.9;
        assert!((a.score - expected).abs() < 1e-9);
        assert!(!a.fts_only);
    }

    #[test]
    fn negative_cosine_similarity_is_clamped_to_zero_contribution() {
        let vec = vec![("a".to_string(), -0.5)];
        let fused = fuse_scores(&[], &vec, fusion());
        assert_eq!(fused[0].score, 0.0);
    }

    #[test]
    fn empty_pools_fuse_to_empty() {
        assert!(fuse_scores(&[], &[], fusion()).is_empty());
    }
}
