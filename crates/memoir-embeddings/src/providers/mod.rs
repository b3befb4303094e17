pub mod fake;
pub mod remote;

pub use fake::FakeEmbeddingProvider;
pub use remote::RemoteEmbeddingProvider;
