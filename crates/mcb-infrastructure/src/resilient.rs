//! Port decorators that wrap an embedder or vector-store adapter with
//! [`crate::retry`]'s exponential backoff, so the composition root can opt a
//! collaborator into retrying without touching the adapter itself.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;

use mcb_domain::entities::Chunk;
use mcb_domain::error::Result;
use mcb_domain::ports::{EmbeddingProvider, VectorStoreAdapter};
use mcb_domain::value_objects::{Embedding, SearchResult};

use crate::retry::{is_transient, retry_with_backoff, RetryConfig};

/// Wraps an [`EmbeddingProvider`], retrying `embed_batch` with backoff when
/// it fails with [`mcb_domain::error::Error::EmbedderUnavailable`].
pub struct ResilientEmbeddingProvider {
    inner: Arc<dyn EmbeddingProvider>,
    config: RetryConfig,
}

impl ResilientEmbeddingProvider {
    /// Wrap `inner` with the given retry policy.
    pub fn new(inner: Arc<dyn EmbeddingProvider>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl EmbeddingProvider for ResilientEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        retry_with_backoff(&self.config, is_transient, || self.inner.embed_batch(texts)).await
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

/// Wraps a [`VectorStoreAdapter`], retrying operations that can surface
/// [`mcb_domain::error::Error::VectorStoreUnavailable`] with backoff.
pub struct ResilientVectorStore {
    inner: Arc<dyn VectorStoreAdapter>,
    config: RetryConfig,
}

impl ResilientVectorStore {
    /// Wrap `inner` with the given retry policy.
    pub fn new(inner: Arc<dyn VectorStoreAdapter>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl VectorStoreAdapter for ResilientVectorStore {
    async fn ensure_collection(&self, name: &str, dim: usize) -> Result<()> {
        retry_with_backoff(&self.config, is_transient, || {
            self.inner.ensure_collection(name, dim)
        })
        .await
    }

    async fn upsert(&self, name: &str, chunks: &[(Chunk, Vec<f32>)]) -> Result<usize> {
        retry_with_backoff(&self.config, is_transient, || self.inner.upsert(name, chunks)).await
    }

    async fn delete_by_filter(
        &self,
        name: &str,
        filter: &HashMap<String, String>,
    ) -> Result<usize> {
        retry_with_backoff(&self.config, is_transient, || {
            self.inner.delete_by_filter(name, filter)
        })
        .await
    }

    async fn search(
        &self,
        name: &str,
        query_vector: &[f32],
        limit: usize,
        filter: Option<&HashMap<String, String>>,
    ) -> Result<Vec<SearchResult>> {
        retry_with_backoff(&self.config, is_transient, || {
            self.inner.search(name, query_vector, limit, filter)
        })
        .await
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        self.inner.collection_exists(name).await
    }

    async fn existing_ids(&self, name: &str, ids: &[String]) -> Result<HashSet<String>> {
        self.inner.existing_ids(name, ids).await
    }

    async fn scroll(&self, name: &str) -> Result<Vec<Chunk>> {
        self.inner.scroll(name).await
    }
}
