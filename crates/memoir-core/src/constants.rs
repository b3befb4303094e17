/// memoir system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of results returned by a search.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Maximum number of results a caller may request from a search.
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Default number of pointers returned by a context request.
pub const DEFAULT_CONTEXT_LIMIT: usize = 10;

/// Multiplier applied to the requested limit when pulling FTS candidates,
/// so the fusion step has enough of the lexical pool to rank against the
/// vector pool before truncating to the caller's limit.
pub const FTS_CANDIDATE_MULTIPLIER: usize = 4;

/// Weight of the normalized lexical score in the fused ranking score.
pub const FUSION_WEIGHT_LEXICAL: f64 = 0.4;

/// Weight of the cosine similarity score in the fused ranking score.
pub const FUSION_WEIGHT_VECTOR: f64 = 0.6;

/// Cosine similarity at or above which a candidate qualifies for the
/// near-duplicate dedup path during save. Configurable via `DedupConfig`;
/// see DESIGN.md for why the default differs from the source heuristic.
pub const DEDUP_COSINE_THRESHOLD: f64 = 0.45;

/// Maximum length, in characters, retained for a memory title.
pub const MAX_TITLE_LEN: usize = 60;

/// Details shorter than this are flagged as a "brief" quality warning.
pub const MIN_DETAILS_LEN: usize = 120;

/// Timeout applied to a single embedding provider call.
pub const EMBEDDING_TIMEOUT_SECS: u64 = 10;

/// Headings a thorough `details` write-up is expected to contain at least
/// one of, used for the "missing recommended sections" quality warning.
pub const RECOMMENDED_DETAIL_HEADINGS: &[&str] = &[
    "Context:",
    "Options considered:",
    "Decision:",
    "Tradeoffs:",
    "Follow-up:",
];
