//! Embedding provider port
//!
//! Contract for the external embedder collaborator: text in, fixed-dimension
//! vectors out. The core treats the embedder as a remote oracle and does not
//! assume determinism across model versions.

use crate::error::Result;
use crate::value_objects::Embedding;
use async_trait::async_trait;

/// Text embedding generation service.
///
/// # Example
///
/// ```ignore
/// use mcb_domain::ports::EmbeddingProvider;
///
/// let embeddings = provider.embed_batch(&["fn main() {}".to_string()]).await?;
/// assert_eq!(embeddings[0].dimensions, provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts in a single call, preserving input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>>;

    /// Embed a single text. Default implementation defers to [`Self::embed_batch`].
    async fn embed(&self, text: &str) -> Result<Embedding> {
        let mut embeddings = self.embed_batch(std::slice::from_ref(&text.to_string())).await?;
        embeddings
            .pop()
            .ok_or_else(|| crate::error::Error::embedding("embedder returned no vector"))
    }

    /// Fixed output dimensionality for this provider/model.
    fn dimensions(&self) -> usize;

    /// Name of the embedding model, pinned into a collection's metadata so
    /// a model change can be detected and caches invalidated.
    fn model_name(&self) -> &str;
}
