//! # memoir-retrieval
//!
//! Hybrid lexical + vector search over the index, fusing both score
//! pools into a single ranked result list.

mod fusion;
mod retriever;

pub use fusion::{fuse_scores, FusedCandidate};
pub use retriever::HybridRetriever;
