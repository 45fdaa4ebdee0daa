//! Null vector index adapter for testing and as a disabled-feature default.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use mcb_domain::entities::Chunk;
use mcb_domain::error::Result;
use mcb_domain::ports::VectorStoreAdapter;
use mcb_domain::value_objects::SearchResult;

/// No-op vector store: accepts writes and reports them as applied, but
/// never actually retains anything and always reports empty collections.
#[derive(Debug, Default)]
pub struct NullVectorStore;

impl NullVectorStore {
    /// Construct a null vector store.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl VectorStoreAdapter for NullVectorStore {
    async fn ensure_collection(&self, _name: &str, _dim: usize) -> Result<()> {
        Ok(())
    }

    async fn upsert(&self, _name: &str, chunks: &[(Chunk, Vec<f32>)]) -> Result<usize> {
        Ok(chunks.len())
    }

    async fn delete_by_filter(
        &self,
        _name: &str,
        _filter: &HashMap<String, String>,
    ) -> Result<usize> {
        Ok(0)
    }

    async fn search(
        &self,
        _name: &str,
        _query_vector: &[f32],
        _limit: usize,
        _filter: Option<&HashMap<String, String>>,
    ) -> Result<Vec<SearchResult>> {
        Ok(Vec::new())
    }

    async fn collection_exists(&self, _name: &str) -> Result<bool> {
        Ok(false)
    }

    async fn existing_ids(&self, _name: &str, _ids: &[String]) -> Result<HashSet<String>> {
        Ok(HashSet::new())
    }

    async fn scroll(&self, _name: &str) -> Result<Vec<Chunk>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_reports_success_without_retaining_anything() {
        let store = NullVectorStore::new();
        store.ensure_collection("proj", 4).await.unwrap();
        let n = store
            .upsert(
                "proj",
                &[(
                    Chunk {
                        id: "a".into(),
                        collection: "proj".into(),
                        file_path: "A.java".into(),
                        language: mcb_domain::value_objects::Language::Java,
                        kind: mcb_domain::entities::ChunkKind::Method,
                        qualified_name: "com.x.Foo.a".into(),
                        content: String::new(),
                        line_start: 1,
                        line_end: 2,
                        parents: vec![],
                        keywords: vec![],
                        imports: vec![],
                        indexed_at: chrono::Utc::now(),
                    },
                    vec![0.0; 4],
                )],
            )
            .await
            .unwrap();
        assert_eq!(n, 1);
        assert!(store.scroll("proj").await.unwrap().is_empty());
    }
}
