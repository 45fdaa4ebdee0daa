//! Per-collection Okapi BM25 inverted index.
//!
//! A mutable inverted index that supports incremental add/remove instead
//! of a from-scratch rebuild per query, scoped per collection with one
//! reader-writer lock each as required by the retrieval platform's
//! concurrency model.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::RwLock;

use mcb_application::domain_services::Tokenizer;
use mcb_domain::constants::{BM25_B, BM25_K1};
use mcb_domain::entities::Chunk;
use mcb_domain::error::Result;
use mcb_domain::ports::LexicalIndex;
use mcb_domain::value_objects::SearchResult;

/// One document's indexed state: its term-frequency map and length, kept
/// so removal can decrement `df` for exactly the terms this document
/// contributed without rescanning its content.
struct Document {
    term_freq: HashMap<String, usize>,
    len: usize,
    payload: Chunk,
}

/// Inverted index for a single collection.
#[derive(Default)]
struct CollectionIndex {
    df: HashMap<String, usize>,
    docs: HashMap<String, Document>,
    total_len: usize,
}

impl CollectionIndex {
    fn avgdl(&self) -> f64 {
        if self.docs.is_empty() {
            0.0
        } else {
            self.total_len as f64 / self.docs.len() as f64
        }
    }

    /// Remove `doc_id` if present, adjusting `df` and `total_len`. Returns
    /// whether a document was actually removed.
    fn remove_doc(&mut self, doc_id: &str) -> bool {
        let Some(doc) = self.docs.remove(doc_id) else {
            return false;
        };
        self.total_len -= doc.len;
        for term in doc.term_freq.keys() {
            if let Some(count) = self.df.get_mut(term) {
                *count -= 1;
                if *count == 0 {
                    self.df.remove(term);
                }
            }
        }
        true
    }

    /// Insert or replace `doc_id`. Re-indexing an existing id is
    /// remove-then-add.
    fn put_doc(&mut self, doc_id: String, tokens: &[String], payload: Chunk) {
        self.remove_doc(&doc_id);

        let mut term_freq: HashMap<String, usize> = HashMap::new();
        for term in tokens {
            *term_freq.entry(term.clone()).or_insert(0) += 1;
        }
        for term in term_freq.keys() {
            *self.df.entry(term.clone()).or_insert(0) += 1;
        }

        let len = tokens.len();
        self.total_len += len;
        self.docs.insert(
            doc_id,
            Document {
                term_freq,
                len,
                payload,
            },
        );
    }

    fn score(&self, doc_id: &str, query_tokens: &[String]) -> f64 {
        let Some(doc) = self.docs.get(doc_id) else {
            return 0.0;
        };
        let n = self.docs.len() as f64;
        let avgdl = self.avgdl();
        let doc_len = doc.len as f64;

        let mut score = 0.0;
        for term in query_tokens {
            let tf = *doc.term_freq.get(term).unwrap_or(&0) as f64;
            if tf == 0.0 {
                continue;
            }
            let df = *self.df.get(term).unwrap_or(&0) as f64;
            let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
            let denom = tf + BM25_K1 * (1.0 - BM25_B + BM25_B * doc_len / avgdl.max(1e-9));
            score += idf * (tf * (BM25_K1 + 1.0)) / denom;
        }
        score
    }

    fn search(&self, query_tokens: &[String], k: usize) -> Vec<SearchResult> {
        let mut scored: Vec<(String, f64)> = self
            .docs
            .keys()
            .map(|id| (id.clone(), self.score(id, query_tokens)))
            .filter(|(_, score)| *score > 0.0)
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(id, score)| {
                let payload = self.docs[&id].payload.clone();
                SearchResult {
                    id,
                    score,
                    payload,
                }
            })
            .collect()
    }
}

/// Okapi BM25 lexical index (C4): one reader-writer-locked inverted index
/// per collection, behind a concurrent map keyed by collection name.
///
/// Batch writes take the collection's write lock for the whole batch so
/// queries never observe a torn write (the index-parity invariant).
pub struct Bm25Index {
    collections: DashMap<String, Arc<RwLock<CollectionIndex>>>,
    tokenizer: Tokenizer,
}

impl Bm25Index {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            collections: DashMap::new(),
            tokenizer: Tokenizer::new(),
        }
    }

    fn collection(&self, name: &str) -> Arc<RwLock<CollectionIndex>> {
        self.collections
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(CollectionIndex::default())))
            .clone()
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokenizer.tokenize(text, false)
    }
}

impl Default for Bm25Index {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LexicalIndex for Bm25Index {
    async fn add_batch(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let index = self.collection(collection);
        let mut guard = index.write().await;
        for chunk in chunks {
            let tokens = self.tokenize(&chunk.content);
            guard.put_doc(chunk.id.clone(), &tokens, chunk.clone());
        }
        Ok(())
    }

    async fn remove(&self, collection: &str, doc_id: &str) -> Result<bool> {
        let index = self.collection(collection);
        let mut guard = index.write().await;
        Ok(guard.remove_doc(doc_id))
    }

    async fn remove_by_file(&self, collection: &str, file_path: &str) -> Result<usize> {
        let index = self.collection(collection);
        let mut guard = index.write().await;
        let ids: Vec<String> = guard
            .docs
            .iter()
            .filter(|(_, doc)| doc.payload.file_path == file_path)
            .map(|(id, _)| id.clone())
            .collect();
        let mut removed = 0;
        for id in ids {
            if guard.remove_doc(&id) {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn search(
        &self,
        collection: &str,
        query_tokens: &[String],
        k: usize,
    ) -> Result<Vec<SearchResult>> {
        let index = self.collection(collection);
        let guard = index.read().await;
        Ok(guard.search(query_tokens, k))
    }

    async fn rebuild(&self, collection: &str, chunks: Vec<Chunk>) -> Result<usize> {
        let index = self.collection(collection);
        let mut guard = index.write().await;
        *guard = CollectionIndex::default();
        let count = chunks.len();
        for chunk in chunks {
            let tokens = self.tokenize(&chunk.content);
            guard.put_doc(chunk.id.clone(), &tokens, chunk);
        }
        Ok(count)
    }

    async fn doc_count(&self, collection: &str) -> Result<usize> {
        let index = self.collection(collection);
        let guard = index.read().await;
        Ok(guard.docs.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcb_domain::entities::ChunkKind;
    use mcb_domain::value_objects::Language;

    fn chunk(id: &str, file_path: &str, content: &str) -> Chunk {
        Chunk {
            id: id.to_string(),
            collection: "proj".to_string(),
            file_path: file_path.to_string(),
            language: Language::Java,
            kind: ChunkKind::Method,
            qualified_name: format!("com.x.Foo.{id}"),
            content: content.to_string(),
            line_start: 1,
            line_end: 10,
            parents: vec![],
            keywords: vec![],
            imports: vec![],
            indexed_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn search_ranks_higher_term_frequency_first() {
        let index = Bm25Index::new();
        index
            .add_batch(
                "proj",
                &[
                    chunk("a", "A.java", "book book book library"),
                    chunk("b", "B.java", "book library catalog"),
                ],
            )
            .await
            .unwrap();

        let hits = index
            .search("proj", &["book".to_string()], 10)
            .await
            .unwrap();
        assert_eq!(hits[0].id, "a");
        assert!(hits[0].score > hits[1].score);
    }

    #[tokio::test]
    async fn remove_drops_document_from_results() {
        let index = Bm25Index::new();
        index
            .add_batch("proj", &[chunk("a", "A.java", "book library")])
            .await
            .unwrap();
        assert!(index.remove("proj", "a").await.unwrap());
        assert!(!index.remove("proj", "a").await.unwrap());

        let hits = index
            .search("proj", &["book".to_string()], 10)
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn remove_by_file_removes_every_chunk_for_that_file() {
        let index = Bm25Index::new();
        index
            .add_batch(
                "proj",
                &[
                    chunk("a", "A.java", "book library"),
                    chunk("b", "A.java", "catalog shelf"),
                    chunk("c", "B.java", "book shelf"),
                ],
            )
            .await
            .unwrap();

        let removed = index.remove_by_file("proj", "A.java").await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(index.doc_count("proj").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn re_adding_same_id_replaces_instead_of_duplicating() {
        let index = Bm25Index::new();
        index
            .add_batch("proj", &[chunk("a", "A.java", "book library")])
            .await
            .unwrap();
        index
            .add_batch("proj", &[chunk("a", "A.java", "catalog shelf")])
            .await
            .unwrap();

        assert_eq!(index.doc_count("proj").await.unwrap(), 1);
        let hits = index
            .search("proj", &["book".to_string()], 10)
            .await
            .unwrap();
        assert!(hits.is_empty());
        let hits = index
            .search("proj", &["catalog".to_string()], 10)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn rebuild_replaces_entire_collection() {
        let index = Bm25Index::new();
        index
            .add_batch("proj", &[chunk("a", "A.java", "book library")])
            .await
            .unwrap();

        let loaded = index
            .rebuild("proj", vec![chunk("x", "X.java", "catalog shelf")])
            .await
            .unwrap();
        assert_eq!(loaded, 1);
        assert_eq!(index.doc_count("proj").await.unwrap(), 1);
        assert!(index.remove("proj", "a").await.is_ok());
        assert!(!index.remove("proj", "a").await.unwrap());
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let index = Bm25Index::new();
        index
            .add_batch("proj-a", &[chunk("a", "A.java", "book library")])
            .await
            .unwrap();

        assert_eq!(index.doc_count("proj-b").await.unwrap(), 0);
        let hits = index
            .search("proj-b", &["book".to_string()], 10)
            .await
            .unwrap();
        assert!(hits.is_empty());
    }
}
