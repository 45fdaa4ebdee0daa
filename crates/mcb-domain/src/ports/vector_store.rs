//! Vector store adapter port
//!
//! Contract for the external vector store collaborator: upsert, delete by
//! filter, ANN search over a named collection. Dimension `D` is fixed per
//! collection at creation time.

use crate::entities::Chunk;
use crate::error::Result;
use crate::value_objects::SearchResult;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

/// Vector index adapter (C3).
///
/// Implementations (`mcb_providers::vector_store::VectorStoreAdapterImpl`)
/// are responsible for the two invariants the raw collaborator may not
/// enforce itself: re-checking `dim` on every upsert, and rescaling cosine
/// similarity from `[-1, 1]` to `[0, 1]`.
///
/// # Example
///
/// ```ignore
/// use mcb_domain::ports::VectorStoreAdapter;
///
/// adapter.ensure_collection("my-project", 1536).await?;
/// let count = adapter.upsert("my-project", vectors).await?;
/// let hits = adapter.search("my-project", &query_vector, 10, None).await?;
/// ```
#[async_trait]
pub trait VectorStoreAdapter: Send + Sync {
    /// Create the named collection with the given dimension if it does not
    /// already exist. Idempotent: calling again with the same dimension is a
    /// no-op; a mismatched dimension on an existing collection fails fast.
    async fn ensure_collection(&self, name: &str, dim: usize) -> Result<()>;

    /// Upsert chunks (with their embedding vectors) into a collection.
    /// Returns the number of points written.
    async fn upsert(&self, name: &str, chunks: &[(Chunk, Vec<f32>)]) -> Result<usize>;

    /// Delete all points whose payload matches every `(field, value)` pair
    /// in `filter`. Returns the number of points removed.
    async fn delete_by_filter(
        &self,
        name: &str,
        filter: &HashMap<String, String>,
    ) -> Result<usize>;

    /// Search for the `limit` nearest neighbors of `query_vector`, optionally
    /// restricted by an equality filter on payload fields. Scores returned
    /// are cosine similarity rescaled to `[0, 1]`.
    async fn search(
        &self,
        name: &str,
        query_vector: &[f32],
        limit: usize,
        filter: Option<&HashMap<String, String>>,
    ) -> Result<Vec<SearchResult>>;

    /// Whether the named collection currently exists.
    async fn collection_exists(&self, name: &str) -> Result<bool>;

    /// The subset of `ids` already present in the collection. Used by the
    /// indexer to implement `index_file`'s idempotency law when
    /// `force_update` is false, without needing a dedicated point-lookup
    /// endpoint on the raw collaborator.
    async fn existing_ids(&self, name: &str, ids: &[String]) -> Result<HashSet<String>>;

    /// Every chunk payload currently stored in the collection, in no
    /// particular order. Used to rebuild the BM25 index from the vector
    /// store on cold start (`rebuild_bm25`).
    async fn scroll(&self, name: &str) -> Result<Vec<Chunk>>;
}
