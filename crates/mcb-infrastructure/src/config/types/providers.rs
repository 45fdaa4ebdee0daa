//! Embedder and vector-store provider selection.
//!
//! These sections carry just enough to construct the concrete
//! `mcb-providers` adapter at the composition root (provider name, model,
//! credentials, collection defaults) — the embedding model and vector
//! store backend themselves stay out of scope, per the platform's own
//! non-goals.

use serde::{Deserialize, Serialize};

/// Embedding provider selection and credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingProviderConfig {
    /// Provider name: `"openai"` or `"null"`.
    pub provider: String,
    /// Model name passed to the provider (e.g. `"text-embedding-3-small"`).
    pub model: String,
    /// API key, when the provider requires one.
    pub api_key: Option<String>,
    /// Override base URL (e.g. for an OpenAI-compatible gateway).
    pub base_url: Option<String>,
}

impl Default for EmbeddingProviderConfig {
    fn default() -> Self {
        Self {
            provider: "null".to_string(),
            model: "text-embedding-3-small".to_string(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Vector store provider selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreProviderConfig {
    /// Provider name: `"in-memory"` or `"null"`.
    pub provider: String,
    /// Default collection name used when none is specified by the caller.
    pub collection: String,
}

impl Default for VectorStoreProviderConfig {
    fn default() -> Self {
        Self {
            provider: "in-memory".to_string(),
            collection: "default".to_string(),
        }
    }
}
