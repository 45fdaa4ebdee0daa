//! Null embedding provider for testing and development
//!
//! Provides deterministic, hash-based embeddings. No external dependencies,
//! always works offline.

use async_trait::async_trait;

use mcb_domain::error::Result;
use mcb_domain::ports::EmbeddingProvider;
use mcb_domain::value_objects::Embedding;

use crate::constants::EMBEDDING_DIMENSION_NULL;

/// Deterministic, hash-based embedding provider.
///
/// Returns fixed-size vectors derived from a text's character-sum hash.
/// Useful for unit tests and development without a real embedding service.
///
/// # Example
///
/// ```rust
/// use mcb_providers::embedding::NullEmbeddingProvider;
/// use mcb_domain::ports::EmbeddingProvider;
///
/// let provider = NullEmbeddingProvider::new();
/// assert_eq!(provider.dimensions(), 384);
/// assert_eq!(provider.model_name(), "null");
/// ```
#[derive(Debug, Default)]
pub struct NullEmbeddingProvider;

impl NullEmbeddingProvider {
    /// Create a new null embedding provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmbeddingProvider for NullEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        let embeddings = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let hash = text.chars().map(|c| c as u32).sum::<u32>();
                let base_value = (hash % 1000) as f32 / 1000.0;

                let vector = (0..EMBEDDING_DIMENSION_NULL)
                    .map(|j| {
                        let variation = ((i as f32 + j as f32) * 0.01).sin();
                        (base_value + variation * 0.1).clamp(0.0, 1.0)
                    })
                    .collect();

                Embedding {
                    vector,
                    model: "null".to_string(),
                    dimensions: EMBEDDING_DIMENSION_NULL,
                }
            })
            .collect();

        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        EMBEDDING_DIMENSION_NULL
    }

    fn model_name(&self) -> &str {
        "null"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_text_yields_the_same_vector() {
        let provider = NullEmbeddingProvider::new();
        let a = provider.embed_batch(&["hello world".to_string()]).await.unwrap();
        let b = provider.embed_batch(&["hello world".to_string()]).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn vectors_have_the_advertised_dimension() {
        let provider = NullEmbeddingProvider::new();
        let vectors = provider
            .embed_batch(&["a".to_string(), "bb".to_string()])
            .await
            .unwrap();
        for v in &vectors {
            assert_eq!(v.dimensions, EMBEDDING_DIMENSION_NULL);
            assert_eq!(v.vector.len(), EMBEDDING_DIMENSION_NULL);
        }
    }

    #[tokio::test]
    async fn empty_batch_yields_empty_result() {
        let provider = NullEmbeddingProvider::new();
        assert!(provider.embed_batch(&[]).await.unwrap().is_empty());
    }
}
