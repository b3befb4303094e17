//! # memoir-embeddings
//!
//! `EmbeddingProvider` implementations: a remote HTTP-backed provider for
//! real use and a deterministic in-memory fallback for tests and
//! air-gapped environments.

pub mod providers;

pub use providers::{FakeEmbeddingProvider, RemoteEmbeddingProvider};
