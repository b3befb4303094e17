//! # memoir-core
//!
//! Foundation crate for the memoir memory system.
//! Defines the shared types, traits, errors, and constants that every
//! other crate in the workspace depends on.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

pub use config::{DedupConfig, FusionConfig};
pub use errors::{MemoryError, MemoryResult};
pub use models::{
    Category, ContextPointer, Memory, MemoryDetails, RawMemory, SaveAction, SaveOutcome,
    SearchFilters, SearchResult, SemanticMode,
};
pub use traits::{EmbeddingProvider, IndexStore};
