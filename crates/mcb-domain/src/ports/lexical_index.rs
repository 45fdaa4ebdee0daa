//! Lexical (BM25) index port
//!
//! Contract for the in-memory Okapi BM25 inverted index (C4). Kept in
//! lockstep with the vector index per collection by the indexer (C5).

use crate::entities::Chunk;
use crate::error::Result;
use crate::value_objects::SearchResult;
use async_trait::async_trait;

/// Lexical index adapter.
///
/// Implementations (`mcb_providers::bm25::Bm25Index`) own one
/// reader-writer-locked posting list per collection. Tokenization (including
/// the choice of case folding) is internal to the implementation so that
/// callers only ever deal in [`Chunk`] payloads and pre-tokenized queries.
#[async_trait]
pub trait LexicalIndex: Send + Sync {
    /// Insert or replace a batch of chunks in one collection-wide write
    /// lock acquisition (no torn reads for concurrent queries).
    async fn add_batch(&self, collection: &str, chunks: &[Chunk]) -> Result<()>;

    /// Remove a single document by chunk id. Returns whether it was present.
    async fn remove(&self, collection: &str, doc_id: &str) -> Result<bool>;

    /// Remove every document whose payload's `file_path` matches. Returns
    /// the number of documents removed.
    async fn remove_by_file(&self, collection: &str, file_path: &str) -> Result<usize>;

    /// Okapi BM25 search over already-tokenized query terms. Scores are raw
    /// (not normalized); the retriever normalizes when fusing.
    async fn search(
        &self,
        collection: &str,
        query_tokens: &[String],
        k: usize,
    ) -> Result<Vec<SearchResult>>;

    /// Replace a collection's entire index from a fresh set of chunk
    /// payloads (cold-start rebuild from the vector store). Returns the
    /// number of documents loaded.
    async fn rebuild(&self, collection: &str, chunks: Vec<Chunk>) -> Result<usize>;

    /// Number of documents currently indexed for a collection.
    async fn doc_count(&self, collection: &str) -> Result<usize>;
}
