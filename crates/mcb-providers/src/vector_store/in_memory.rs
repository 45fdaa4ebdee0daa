//! In-memory vector index adapter (C3).
//!
//! Heap-based top-k selection and cosine-similarity rescaling to `[0, 1]`,
//! implementing the [`VectorStoreAdapter`] port: per-collection dimension
//! pinning, `existing_ids`/`scroll` for the indexer's idempotency and
//! cold-start rebuild, and `delete_by_filter` over typed [`Chunk`] fields.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use mcb_domain::entities::Chunk;
use mcb_domain::error::{Error, Result};
use mcb_domain::ports::VectorStoreAdapter;
use mcb_domain::value_objects::SearchResult;

struct Point {
    vector: Vec<f32>,
    payload: Chunk,
}

struct Collection {
    dim: usize,
    points: HashMap<String, Point>,
}

/// In-memory vector store.
///
/// Stores vectors and chunk payloads in a `RwLock`-guarded map per
/// collection. Data is not persisted and is lost on restart.
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryVectorStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStoreAdapter for InMemoryVectorStore {
    async fn ensure_collection(&self, name: &str, dim: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        match collections.get(name) {
            Some(existing) if existing.dim != dim => Err(Error::vector_db(format!(
                "collection '{name}' already exists with dimension {}, cannot use {dim}",
                existing.dim
            ))),
            Some(_) => Ok(()),
            None => {
                collections.insert(
                    name.to_string(),
                    Collection {
                        dim,
                        points: HashMap::new(),
                    },
                );
                Ok(())
            }
        }
    }

    async fn upsert(&self, name: &str, chunks: &[(Chunk, Vec<f32>)]) -> Result<usize> {
        let mut collections = self.collections.write().await;
        let collection = collections
            .get_mut(name)
            .ok_or_else(|| Error::vector_db(format!("collection '{name}' does not exist")))?;

        for (chunk, vector) in chunks {
            if vector.len() != collection.dim {
                return Err(Error::vector_db(format!(
                    "vector for chunk '{}' has dimension {}, collection '{name}' expects {}",
                    chunk.id,
                    vector.len(),
                    collection.dim
                )));
            }
        }

        for (chunk, vector) in chunks {
            collection.points.insert(
                chunk.id.clone(),
                Point {
                    vector: vector.clone(),
                    payload: chunk.clone(),
                },
            );
        }
        Ok(chunks.len())
    }

    async fn delete_by_filter(
        &self,
        name: &str,
        filter: &HashMap<String, String>,
    ) -> Result<usize> {
        let mut collections = self.collections.write().await;
        let Some(collection) = collections.get_mut(name) else {
            return Ok(0);
        };

        let ids: Vec<String> = collection
            .points
            .iter()
            .filter(|(_, point)| matches_filter(&point.payload, filter))
            .map(|(id, _)| id.clone())
            .collect();

        for id in &ids {
            collection.points.remove(id);
        }
        Ok(ids.len())
    }

    async fn search(
        &self,
        name: &str,
        query_vector: &[f32],
        limit: usize,
        filter: Option<&HashMap<String, String>>,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read().await;
        let Some(collection) = collections.get(name) else {
            return Ok(Vec::new());
        };

        let query_norm = l2_norm(query_vector);
        let mut scored: Vec<(f32, &str)> = collection
            .points
            .iter()
            .filter(|(_, point)| filter.is_none_or(|f| matches_filter(&point.payload, f)))
            .map(|(id, point)| {
                let score = cosine_rescaled(query_vector, &point.vector, query_norm);
                (score, id.as_str())
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.truncate(limit);

        Ok(scored
            .into_iter()
            .map(|(score, id)| SearchResult {
                id: id.to_string(),
                score: score as f64,
                payload: collection.points[id].payload.clone(),
            })
            .collect())
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        Ok(self.collections.read().await.contains_key(name))
    }

    async fn existing_ids(&self, name: &str, ids: &[String]) -> Result<HashSet<String>> {
        let collections = self.collections.read().await;
        let Some(collection) = collections.get(name) else {
            return Ok(HashSet::new());
        };
        Ok(ids
            .iter()
            .filter(|id| collection.points.contains_key(id.as_str()))
            .cloned()
            .collect())
    }

    async fn scroll(&self, name: &str) -> Result<Vec<Chunk>> {
        let collections = self.collections.read().await;
        let Some(collection) = collections.get(name) else {
            return Ok(Vec::new());
        };
        Ok(collection
            .points
            .values()
            .map(|point| point.payload.clone())
            .collect())
    }
}

fn matches_filter(chunk: &Chunk, filter: &HashMap<String, String>) -> bool {
    filter.iter().all(|(field, value)| match field.as_str() {
        "file_path" => &chunk.file_path == value,
        "collection" => &chunk.collection == value,
        "qualified_name" => &chunk.qualified_name == value,
        "kind" => chunk.kind.as_str() == value,
        "language" => chunk.language.to_string() == *value,
        _ => false,
    })
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity rescaled from `[-1, 1]` to `[0, 1]` by `(s + 1) / 2`,
/// per the adapter's score-normalization invariant.
fn cosine_rescaled(a: &[f32], b: &[f32], norm_a: f32) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        0.5
    } else {
        ((dot / (norm_a * norm_b)) + 1.0) / 2.0
    }
}
