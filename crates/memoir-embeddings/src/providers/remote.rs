use std::sync::Mutex;
use std::time::Duration;

use memoir_core::errors::{MemoryError, MemoryResult};
use memoir_core::traits::EmbeddingProvider;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    #[serde(alias = "embedding", alias = "vector")]
    embedding: Vec<f32>,
}

/// Embedding provider backed by a remote HTTP embedding service (e.g. a
/// local Ollama instance). Never retries internally: a transport or
/// protocol failure surfaces immediately as `ProviderUnavailable` so the
/// save coordinator can decide whether to degrade.
pub struct RemoteEmbeddingProvider {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
    /// Cached dimension, learned from the first successful embed.
    dimensions: Mutex<Option<usize>>,
}

impl RemoteEmbeddingProvider {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> MemoryResult<Self> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(memoir_core::constants::EMBEDDING_TIMEOUT_SECS));
        if let Some(key) = &api_key {
            let mut headers = reqwest::header::HeaderMap::new();
            let value = reqwest::header::HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| MemoryError::InvalidInput {
                    reason: format!("invalid api key header: {e}"),
                })?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }
        let client = builder
            .build()
            .map_err(|e| MemoryError::ProviderUnavailable {
                reason: format!("failed to build http client: {e}"),
            })?;
        Ok(Self {
            base_url: base_url.into(),
            model: model.into(),
            client,
            dimensions: Mutex::new(None),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/embeddings", self.base_url.trim_end_matches('/'))
    }
}

impl EmbeddingProvider for RemoteEmbeddingProvider {
    fn embed(&self, text: &str) -> MemoryResult<Vec<f32>> {
        let body = EmbedRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .map_err(|e| {
                warn!(error = %e, model = %self.model, "embedding provider unreachable");
                MemoryError::ProviderUnavailable {
                    reason: e.to_string(),
                }
            })?;

        if !response.status().is_success() {
            return Err(MemoryError::ProviderUnavailable {
                reason: format!("embedding provider returned status {}", response.status()),
            });
        }

        let parsed: EmbedResponse = response.json().map_err(|e| MemoryError::ProviderUnavailable {
            reason: format!("failed to parse embedding response: {e}"),
        })?;

        if parsed.embedding.is_empty() {
            return Err(MemoryError::ProviderDimMismatch {
                reason: "provider returned an empty vector".to_string(),
            });
        }

        let mut cached = self.dimensions.lock().expect("dimensions mutex poisoned");
        *cached = Some(parsed.embedding.len());
        debug!(dims = parsed.embedding.len(), model = %self.model, "embedded text");

        Ok(parsed.embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions.lock().expect("dimensions mutex poisoned").unwrap_or(0)
    }

    fn name(&self) -> &str {
        "remote-http"
    }

    fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/", self.base_url.trim_end_matches('/')))
            .timeout(Duration::from_secs(2))
            .send()
            .is_ok()
    }
}
