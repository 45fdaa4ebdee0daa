//! Indexer (C5): parse, embed, dual-write.
//!
//! Orchestrates the parser, embedder, vector store and BM25 index behind
//! their ports. Holds no provider-specific knowledge; every collaborator is
//! an `Arc<dyn Trait>` supplied at construction (explicit constructor
//! injection, no registry).

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use mcb_domain::entities::Chunk;
use mcb_domain::error::{Error, Result};
use mcb_domain::ports::{ChunkParser, EmbeddingProvider, LexicalIndex, VectorStoreAdapter};
use tokio::sync::Mutex as AsyncMutex;

/// Options for a single `index_file` call.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexFileOptions {
    /// Delete any existing chunks for this file before writing, bypassing
    /// the idempotency skip.
    pub force_update: bool,
}

/// Options for a batch of files.
#[derive(Debug, Clone, Copy)]
pub struct IndexBatchOptions {
    /// Forwarded to every file's `index_file` call.
    pub force_update: bool,
    /// Maximum number of files processed concurrently.
    pub parallelism: usize,
}

impl Default for IndexBatchOptions {
    fn default() -> Self {
        Self {
            force_update: false,
            parallelism: mcb_domain::constants::DEFAULT_INDEXING_CONCURRENCY,
        }
    }
}

/// Outcome of indexing a single file.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexOutcome {
    /// Chunks were written.
    Indexed {
        /// Number of chunks written.
        chunks_written: usize,
        /// Ids of the written chunks.
        ids: Vec<String>,
    },
    /// `force_update` was false and the file's chunks already existed; no
    /// writes were performed.
    NoChange,
}

/// Result of a single file within a batch.
#[derive(Debug, Clone)]
pub struct PerFileResult {
    /// Path that was processed.
    pub path: String,
    /// `Ok` outcome, or the stringified error.
    pub outcome: std::result::Result<IndexOutcome, String>,
}

/// Aggregated result of `index_batch`.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// Number of files submitted.
    pub total: usize,
    /// Number of files that succeeded (indexed or no-change).
    pub succeeded: usize,
    /// Number of files that failed.
    pub failed: usize,
    /// Per-file results, in completion order.
    pub per_file: Vec<PerFileResult>,
    /// `(path, message)` pairs for every failed file.
    pub errors: Vec<(String, String)>,
}

/// Result of `unindex_file`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnindexResult {
    /// Number of chunks removed across both indexes.
    pub chunks_removed: usize,
}

/// Result of `rebuild_bm25`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildResult {
    /// Number of documents loaded from the vector store into the BM25 index.
    pub docs_loaded: usize,
}

type FileLock = Arc<AsyncMutex<()>>;

/// Parse -> embed -> dual-write use case.
pub struct Indexer {
    parser: Arc<dyn ChunkParser>,
    embedder: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStoreAdapter>,
    lexical_index: Arc<dyn LexicalIndex>,
    file_locks: DashMap<(String, String), FileLock>,
}

impl Indexer {
    /// Construct an indexer from its four collaborators.
    pub fn new(
        parser: Arc<dyn ChunkParser>,
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStoreAdapter>,
        lexical_index: Arc<dyn LexicalIndex>,
    ) -> Self {
        Self {
            parser,
            embedder,
            vector_store,
            lexical_index,
            file_locks: DashMap::new(),
        }
    }

    fn file_lock(&self, collection: &str, path: &str) -> FileLock {
        self.file_locks
            .entry((collection.to_string(), path.to_string()))
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Index a single file: read, parse, embed, dual-write.
    ///
    /// Serialized per `(collection, path)` via a keyed mutex so two
    /// concurrent calls for the same file observe each other's writes in
    /// order.
    pub async fn index_file(
        &self,
        collection: &str,
        path: &str,
        options: IndexFileOptions,
    ) -> Result<IndexOutcome> {
        let lock = self.file_lock(collection, path);
        let _guard = lock.lock().await;

        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::not_found(path));
            }
            Err(err) => return Err(Error::io_with_source(format!("reading {path}"), err)),
        };

        let (parsed, warnings) = self.parser.parse(path, &content)?;
        for warning in &warnings {
            tracing::warn!(file_path = %warning.file_path, message = %warning.message, "parse warning");
        }

        // The parser is collection-agnostic (a pure function of file
        // content); stamp the real collection in and recompute the
        // deterministic id, which is keyed on it.
        let chunks: Vec<Chunk> = parsed
            .into_iter()
            .map(|mut chunk| {
                chunk.id = Chunk::deterministic_id(
                    collection,
                    &chunk.file_path,
                    chunk.kind,
                    &chunk.qualified_name,
                    chunk.line_start,
                );
                chunk.collection = collection.to_string();
                chunk
            })
            .collect();

        if chunks.is_empty() {
            return Ok(IndexOutcome::Indexed {
                chunks_written: 0,
                ids: Vec::new(),
            });
        }

        if options.force_update {
            let mut filter = HashMap::new();
            filter.insert("file_path".to_string(), path.to_string());
            self.vector_store
                .delete_by_filter(collection, &filter)
                .await?;
            self.lexical_index.remove_by_file(collection, path).await?;
        } else {
            let ids: Vec<String> = chunks.iter().map(|c| c.id.clone()).collect();
            let existing = self.vector_store.existing_ids(collection, &ids).await?;
            if !existing.is_empty() {
                return Ok(IndexOutcome::NoChange);
            }
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(Error::embedding(format!(
                "embedder returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let dim = embeddings[0].dimensions;
        self.vector_store.ensure_collection(collection, dim).await?;

        let pairs: Vec<(Chunk, Vec<f32>)> = chunks
            .iter()
            .cloned()
            .zip(embeddings.into_iter().map(|e| e.vector))
            .collect();
        self.vector_store.upsert(collection, &pairs).await?;

        if let Err(err) = self.lexical_index.add_batch(collection, &chunks).await {
            let mut filter = HashMap::new();
            filter.insert("file_path".to_string(), path.to_string());
            match self.vector_store.delete_by_filter(collection, &filter).await {
                Ok(_) => {
                    return Err(Error::partially_indexed(
                        path,
                        format!(
                            "bm25 write failed ({err}); compensating vector delete succeeded, retry with force_update"
                        ),
                    ));
                }
                Err(compensate_err) => {
                    return Err(Error::partially_indexed(
                        path,
                        format!(
                            "bm25 write failed ({err}) and compensating vector delete also failed ({compensate_err}); retry with force_update"
                        ),
                    ));
                }
            }
        }

        let ids: Vec<String> = chunks.into_iter().map(|c| c.id).collect();
        Ok(IndexOutcome::Indexed {
            chunks_written: ids.len(),
            ids,
        })
    }

    /// Index many files with bounded concurrency. Per-file failures are
    /// collected; the batch never aborts on the first error.
    pub async fn index_batch(
        &self,
        collection: &str,
        paths: &[String],
        options: IndexBatchOptions,
    ) -> BatchResult {
        use futures::stream::{self, StreamExt};

        let file_options = IndexFileOptions {
            force_update: options.force_update,
        };
        let parallelism = options.parallelism.max(1);

        let per_file: Vec<PerFileResult> = stream::iter(paths.iter().cloned())
            .map(|path| {
                let collection = collection.to_string();
                async move {
                    let outcome = self
                        .index_file(&collection, &path, file_options)
                        .await
                        .map_err(|e| e.to_string());
                    PerFileResult { path, outcome }
                }
            })
            .buffer_unordered(parallelism)
            .collect()
            .await;

        let mut result = BatchResult {
            total: per_file.len(),
            ..Default::default()
        };
        for entry in &per_file {
            match &entry.outcome {
                Ok(_) => result.succeeded += 1,
                Err(message) => {
                    result.failed += 1;
                    result.errors.push((entry.path.clone(), message.clone()));
                }
            }
        }
        result.per_file = per_file;
        result
    }

    /// Remove every chunk belonging to `path` from both indexes.
    pub async fn unindex_file(&self, collection: &str, path: &str) -> Result<UnindexResult> {
        let lock = self.file_lock(collection, path);
        let _guard = lock.lock().await;

        let mut filter = HashMap::new();
        filter.insert("file_path".to_string(), path.to_string());
        let vector_removed = self.vector_store.delete_by_filter(collection, &filter).await?;
        self.lexical_index.remove_by_file(collection, path).await?;

        Ok(UnindexResult {
            chunks_removed: vector_removed,
        })
    }

    /// Rebuild the BM25 index for `collection` from the vector store's
    /// payloads (cold-start recovery).
    pub async fn rebuild_bm25(&self, collection: &str) -> Result<RebuildResult> {
        let chunks = self.vector_store.scroll(collection).await?;
        let docs_loaded = self.lexical_index.rebuild(collection, chunks).await?;
        Ok(RebuildResult { docs_loaded })
    }
}
