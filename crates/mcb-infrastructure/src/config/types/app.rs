//! Main application configuration.

use serde::{Deserialize, Serialize};

pub use super::limits::LimitsConfig;
pub use super::logging::LoggingConfig;
pub use super::providers::{EmbeddingProviderConfig, VectorStoreProviderConfig};
use crate::retry::RetryConfig;

/// Provider selection for the embedder and vector store collaborators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Embedding provider configuration.
    #[serde(default)]
    pub embedding: EmbeddingProviderConfig,
    /// Vector store provider configuration.
    #[serde(default)]
    pub vector_store: VectorStoreProviderConfig,
}

/// Top-level configuration for the retrieval platform: logging, provider
/// selection, and indexing/evaluation concurrency limits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Embedder and vector-store provider selection.
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Indexing and evaluation concurrency/size limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Retry/backoff policy for transient embedder and vector-store failures.
    #[serde(default)]
    pub retry: RetryConfig,
}
