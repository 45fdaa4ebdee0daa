//! Hybrid retriever (C6): parallel vector + BM25 query, score fusion.
//!
//! Launches the vector and BM25 branches concurrently and fuses their
//! result lists under a caller-chosen strategy. A branch that times out in
//! `hybrid` mode degrades gracefully to the other branch's ranking rather
//! than failing the query.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use mcb_domain::constants::{HYBRID_DEFAULT_TIMEOUT_MS, HYBRID_OVER_FETCH_FLOOR, RRF_DEFAULT_K};
use mcb_domain::entities::{Chunk, SearchHit};
use mcb_domain::error::{Error, Result};
use mcb_domain::ports::{EmbeddingProvider, LexicalIndex, VectorStoreAdapter};
use mcb_domain::value_objects::SearchResult;

use crate::domain_services::Tokenizer;

/// Which branch(es) to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Vector branch only.
    Vector,
    /// BM25 branch only.
    Bm25,
    /// Both branches, fused.
    Hybrid,
}

/// Score fusion strategy for `hybrid` mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FusionStrategy {
    /// Reciprocal Rank Fusion.
    Rrf,
    /// Weighted sum of min-max normalized scores.
    Weighted,
}

/// Branch weights for `weighted` fusion. Must sum to `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionWeights {
    /// Weight applied to the vector branch.
    pub vector: f64,
    /// Weight applied to the BM25 branch.
    pub bm25: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            vector: mcb_domain::constants::HYBRID_DEFAULT_VECTOR_WEIGHT,
            bm25: mcb_domain::constants::HYBRID_DEFAULT_BM25_WEIGHT,
        }
    }
}

/// Options controlling a single `search` call.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Which branch(es) to query.
    pub mode: SearchMode,
    /// Fusion strategy for `hybrid` mode.
    pub fusion: FusionStrategy,
    /// Branch weights for `weighted` fusion.
    pub weights: FusionWeights,
    /// RRF smoothing constant.
    pub rrf_k: f64,
    /// Results pulled from each branch before fusion. `None` defaults to
    /// `max(2k, 20)`.
    pub over_fetch: Option<usize>,
    /// Equality filters on payload fields, applied to both branches.
    pub filters: HashMap<String, String>,
    /// Total deadline in milliseconds covering both branches.
    pub timeout_ms: u64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            mode: SearchMode::Hybrid,
            fusion: FusionStrategy::Rrf,
            weights: FusionWeights::default(),
            rrf_k: RRF_DEFAULT_K,
            over_fetch: None,
            filters: HashMap::new(),
            timeout_ms: HYBRID_DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Response envelope: the fused, ranked hits plus a degraded flag.
#[derive(Debug, Clone, Default)]
pub struct SearchResponse {
    /// Ranked hits, truncated to `k`.
    pub hits: Vec<SearchHit>,
    /// `true` if a hybrid query fell back to a single branch because the
    /// other timed out or failed.
    pub degraded: bool,
}

/// Parallel vector + BM25 query and score fusion use case.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStoreAdapter>,
    lexical_index: Arc<dyn LexicalIndex>,
    tokenizer: Tokenizer,
}

impl Retriever {
    /// Construct a retriever from its four collaborators.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStoreAdapter>,
        lexical_index: Arc<dyn LexicalIndex>,
        tokenizer: Tokenizer,
    ) -> Self {
        Self {
            embedder,
            vector_store,
            lexical_index,
            tokenizer,
        }
    }

    fn validate(k: usize, options: &SearchOptions) -> Result<()> {
        if k == 0 {
            return Err(Error::invalid_options("k must be greater than zero"));
        }
        if let Some(over_fetch) = options.over_fetch {
            if over_fetch < k {
                return Err(Error::invalid_options("over_fetch must be >= k"));
            }
        }
        if options.fusion == FusionStrategy::Weighted {
            let sum = options.weights.vector + options.weights.bm25;
            if (sum - 1.0).abs() > 1e-6 {
                return Err(Error::invalid_options(format!(
                    "weighted fusion weights must sum to 1.0, got {sum}"
                )));
            }
        }
        Ok(())
    }

    /// Run a query against `collection` and return the fused, ranked hits.
    pub async fn search(
        &self,
        collection: &str,
        query_text: &str,
        k: usize,
        options: &SearchOptions,
    ) -> Result<SearchResponse> {
        Self::validate(k, options)?;

        if !self.vector_store.collection_exists(collection).await? {
            return Err(Error::not_found(collection));
        }

        let over_fetch = options
            .over_fetch
            .unwrap_or_else(|| (2 * k).max(HYBRID_OVER_FETCH_FLOOR));
        let deadline = Duration::from_millis(options.timeout_ms);
        let want_vector = matches!(options.mode, SearchMode::Vector | SearchMode::Hybrid);
        let want_bm25 = matches!(options.mode, SearchMode::Bm25 | SearchMode::Hybrid);

        let vector_filter = if options.filters.is_empty() {
            None
        } else {
            Some(options.filters.clone())
        };

        let vector_fut = async {
            if !want_vector {
                return Ok(None);
            }
            let embedding = self.embedder.embed(query_text).await?;
            let hits = self
                .vector_store
                .search(
                    collection,
                    &embedding.vector,
                    over_fetch,
                    vector_filter.as_ref(),
                )
                .await?;
            Ok::<_, Error>(Some(hits))
        };

        let bm25_fut = async {
            if !want_bm25 {
                return Ok(None);
            }
            let tokens = self.tokenizer.tokenize(query_text, false);
            let hits = self
                .lexical_index
                .search(collection, &tokens, over_fetch)
                .await?;
            let filtered: Vec<SearchResult> = hits
                .into_iter()
                .filter(|hit| chunk_matches_filter(&hit.payload, &options.filters))
                .collect();
            Ok::<_, Error>(Some(filtered))
        };

        let (vector_outcome, bm25_outcome) = tokio::join!(
            tokio::time::timeout(deadline, vector_fut),
            tokio::time::timeout(deadline, bm25_fut),
        );

        match options.mode {
            SearchMode::Vector => {
                let hits = unwrap_branch(vector_outcome, "vector_search", options.timeout_ms)??
                    .unwrap_or_default();
                Ok(SearchResponse {
                    hits: single_branch_hits(hits, k, true),
                    degraded: false,
                })
            }
            SearchMode::Bm25 => {
                let hits = unwrap_branch(bm25_outcome, "bm25_search", options.timeout_ms)??
                    .unwrap_or_default();
                Ok(SearchResponse {
                    hits: single_branch_hits(hits, k, false),
                    degraded: false,
                })
            }
            SearchMode::Hybrid => {
                let vector_result = unwrap_branch(vector_outcome, "vector_search", options.timeout_ms);
                let bm25_result = unwrap_branch(bm25_outcome, "bm25_search", options.timeout_ms);

                match (vector_result, bm25_result) {
                    (Ok(Ok(v)), Ok(Ok(b))) => {
                        let vector_hits = v.unwrap_or_default();
                        let bm25_hits = b.unwrap_or_default();
                        let hits = fuse(&vector_hits, &bm25_hits, k, options);
                        Ok(SearchResponse {
                            hits,
                            degraded: false,
                        })
                    }
                    (Ok(Ok(v)), _) => Ok(SearchResponse {
                        hits: single_branch_hits(v.unwrap_or_default(), k, true),
                        degraded: true,
                    }),
                    (_, Ok(Ok(b))) => Ok(SearchResponse {
                        hits: single_branch_hits(b.unwrap_or_default(), k, false),
                        degraded: true,
                    }),
                    _ => Err(Error::retrieval(
                        "both vector and bm25 branches failed or timed out",
                    )),
                }
            }
        }
    }
}

fn chunk_matches_filter(chunk: &Chunk, filters: &HashMap<String, String>) -> bool {
    filters.iter().all(|(field, value)| match field.as_str() {
        "file_path" => &chunk.file_path == value,
        "collection" => &chunk.collection == value,
        "qualified_name" => &chunk.qualified_name == value,
        "kind" => chunk.kind.as_str() == value,
        "language" => chunk.language.to_string() == *value,
        _ => false,
    })
}

/// Unwrap a `timeout(branch_future)` result into a single `Result`,
/// mapping an elapsed deadline onto `Error::Timeout`.
fn unwrap_branch(
    outcome: std::result::Result<Result<Option<Vec<SearchResult>>>, tokio::time::error::Elapsed>,
    operation: &str,
    timeout_ms: u64,
) -> Result<Result<Option<Vec<SearchResult>>>> {
    match outcome {
        Ok(inner) => Ok(inner),
        Err(_) => Err(Error::timeout(operation, timeout_ms)),
    }
}

fn single_branch_hits(hits: Vec<SearchResult>, k: usize, is_vector: bool) -> Vec<SearchHit> {
    let mut hits = hits;
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    hits.truncate(k);
    hits.into_iter()
        .enumerate()
        .map(|(i, hit)| SearchHit {
            chunk_id: hit.id,
            score_vec: if is_vector { Some(hit.score) } else { None },
            score_bm25: if is_vector { None } else { Some(hit.score) },
            score_fused: hit.score,
            rank: (i + 1) as u32,
            payload: hit.payload,
        })
        .collect()
}

struct FusionEntry {
    score_vec: Option<f64>,
    score_bm25: Option<f64>,
    rank_vec: Option<usize>,
    rank_bm25: Option<usize>,
    payload: Chunk,
}

fn fuse(
    vector_hits: &[SearchResult],
    bm25_hits: &[SearchResult],
    k: usize,
    options: &SearchOptions,
) -> Vec<SearchHit> {
    let mut entries: HashMap<String, FusionEntry> = HashMap::new();

    for (i, hit) in vector_hits.iter().enumerate() {
        entries
            .entry(hit.id.clone())
            .or_insert_with(|| FusionEntry {
                score_vec: None,
                score_bm25: None,
                rank_vec: None,
                rank_bm25: None,
                payload: hit.payload.clone(),
            });
        let entry = entries.get_mut(&hit.id).unwrap();
        entry.score_vec = Some(hit.score);
        entry.rank_vec = Some(i + 1);
    }
    for (i, hit) in bm25_hits.iter().enumerate() {
        entries
            .entry(hit.id.clone())
            .or_insert_with(|| FusionEntry {
                score_vec: None,
                score_bm25: None,
                rank_vec: None,
                rank_bm25: None,
                payload: hit.payload.clone(),
            });
        let entry = entries.get_mut(&hit.id).unwrap();
        entry.score_bm25 = Some(hit.score);
        entry.rank_bm25 = Some(i + 1);
    }

    let fused_scores: HashMap<String, f64> = match options.fusion {
        FusionStrategy::Rrf => entries
            .iter()
            .map(|(id, e)| {
                let mut score = 0.0;
                if let Some(r) = e.rank_vec {
                    score += 1.0 / (options.rrf_k + r as f64);
                }
                if let Some(r) = e.rank_bm25 {
                    score += 1.0 / (options.rrf_k + r as f64);
                }
                (id.clone(), score)
            })
            .collect(),
        FusionStrategy::Weighted => {
            let vec_norm = min_max_normalize(vector_hits);
            let bm25_norm = min_max_normalize(bm25_hits);
            entries
                .keys()
                .map(|id| {
                    let v = vec_norm.get(id).copied().unwrap_or(0.0);
                    let b = bm25_norm.get(id).copied().unwrap_or(0.0);
                    (
                        id.clone(),
                        options.weights.vector * v + options.weights.bm25 * b,
                    )
                })
                .collect()
        }
    };

    let mut ranked: Vec<(String, FusionEntry)> = entries.into_iter().collect();
    ranked.sort_by(|(id_a, a), (id_b, b)| {
        let score_a = fused_scores[id_a];
        let score_b = fused_scores[id_b];
        score_b
            .partial_cmp(&score_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                let in_both_a = a.rank_vec.is_some() && a.rank_bm25.is_some();
                let in_both_b = b.rank_vec.is_some() && b.rank_bm25.is_some();
                in_both_b.cmp(&in_both_a)
            })
            .then_with(|| {
                let v_a = a.score_vec.unwrap_or(f64::MIN);
                let v_b = b.score_vec.unwrap_or(f64::MIN);
                v_b.partial_cmp(&v_a).unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| id_a.cmp(id_b))
    });
    ranked.truncate(k);

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, (id, entry))| SearchHit {
            score_fused: fused_scores[&id],
            chunk_id: id,
            score_vec: entry.score_vec,
            score_bm25: entry.score_bm25,
            rank: (i + 1) as u32,
            payload: entry.payload,
        })
        .collect()
}

fn min_max_normalize(hits: &[SearchResult]) -> HashMap<String, f64> {
    if hits.is_empty() {
        return HashMap::new();
    }
    let min = hits.iter().map(|h| h.score).fold(f64::INFINITY, f64::min);
    let max = hits
        .iter()
        .map(|h| h.score)
        .fold(f64::NEG_INFINITY, f64::max);
    hits.iter()
        .map(|h| {
            let normalized = if (max - min).abs() < f64::EPSILON {
                1.0
            } else {
                (h.score - min) / (max - min)
            };
            (h.id.clone(), normalized)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mcb_domain::entities::ChunkKind;
    use mcb_domain::value_objects::{Embedding, Language};
    use std::collections::HashSet;

    fn chunk(id: &str) -> Chunk {
        Chunk {
            id: id.to_string(),
            collection: "test".to_string(),
            file_path: format!("{id}.java"),
            language: Language::Java,
            kind: ChunkKind::Class,
            qualified_name: id.to_string(),
            content: String::new(),
            line_start: 1,
            line_end: 1,
            parents: Vec::new(),
            keywords: Vec::new(),
            imports: Vec::new(),
            indexed_at: chrono::Utc::now(),
        }
    }

    struct StubEmbedder;
    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
            Ok(texts
                .iter()
                .map(|_| Embedding {
                    vector: vec![1.0, 0.0],
                    model: "stub".to_string(),
                    dimensions: 2,
                })
                .collect())
        }
        fn dimensions(&self) -> usize {
            2
        }
        fn model_name(&self) -> &str {
            "stub"
        }
    }

    struct StubVectorStore {
        hits: Vec<SearchResult>,
        exists: bool,
    }
    #[async_trait]
    impl VectorStoreAdapter for StubVectorStore {
        async fn ensure_collection(&self, _name: &str, _dim: usize) -> Result<()> {
            Ok(())
        }
        async fn upsert(&self, _name: &str, _chunks: &[(Chunk, Vec<f32>)]) -> Result<usize> {
            Ok(0)
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
            Ok(self.hits.clone())
        }
        async fn collection_exists(&self, _name: &str) -> Result<bool> {
            Ok(self.exists)
        }
        async fn existing_ids(&self, _name: &str, _ids: &[String]) -> Result<HashSet<String>> {
            Ok(HashSet::new())
        }
        async fn scroll(&self, _name: &str) -> Result<Vec<Chunk>> {
            Ok(Vec::new())
        }
    }

    struct StubLexicalIndex {
        hits: Vec<SearchResult>,
    }
    #[async_trait]
    impl LexicalIndex for StubLexicalIndex {
        async fn add_batch(&self, _collection: &str, _chunks: &[Chunk]) -> Result<()> {
            Ok(())
        }
        async fn remove(&self, _collection: &str, _doc_id: &str) -> Result<bool> {
            Ok(false)
        }
        async fn remove_by_file(&self, _collection: &str, _file_path: &str) -> Result<usize> {
            Ok(0)
        }
        async fn search(
            &self,
            _collection: &str,
            _query_tokens: &[String],
            _k: usize,
        ) -> Result<Vec<SearchResult>> {
            Ok(self.hits.clone())
        }
        async fn rebuild(&self, _collection: &str, _chunks: Vec<Chunk>) -> Result<usize> {
            Ok(0)
        }
        async fn doc_count(&self, _collection: &str) -> Result<usize> {
            Ok(self.hits.len())
        }
    }

    fn retriever(vector_hits: Vec<SearchResult>, bm25_hits: Vec<SearchResult>) -> Retriever {
        Retriever::new(
            Arc::new(StubEmbedder),
            Arc::new(StubVectorStore {
                hits: vector_hits,
                exists: true,
            }),
            Arc::new(StubLexicalIndex { hits: bm25_hits }),
            Tokenizer::new(),
        )
    }

    #[tokio::test]
    async fn k_zero_is_invalid_options() {
        let r = retriever(Vec::new(), Vec::new());
        let err = r
            .search("test", "query", 0, &SearchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOptions { .. }));
    }

    #[tokio::test]
    async fn unknown_collection_is_not_found() {
        let r = Retriever::new(
            Arc::new(StubEmbedder),
            Arc::new(StubVectorStore {
                hits: Vec::new(),
                exists: false,
            }),
            Arc::new(StubLexicalIndex { hits: Vec::new() }),
            Tokenizer::new(),
        );
        let err = r
            .search("missing", "query", 5, &SearchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn rrf_fuses_both_branches() {
        let a = SearchResult {
            id: "A".to_string(),
            score: 0.9,
            payload: chunk("A"),
        };
        let b = SearchResult {
            id: "B".to_string(),
            score: 0.8,
            payload: chunk("B"),
        };
        let r = retriever(vec![a.clone()], vec![b.clone()]);
        let response = r
            .search("test", "query", 10, &SearchOptions::default())
            .await
            .unwrap();
        assert!(!response.degraded);
        assert_eq!(response.hits.len(), 2);
        let expected = 1.0 / (RRF_DEFAULT_K + 1.0);
        assert!((response.hits[0].score_fused - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_branch_falls_back_to_the_other_without_error() {
        let a = SearchResult {
            id: "A".to_string(),
            score: 0.9,
            payload: chunk("A"),
        };
        let r = retriever(vec![a], Vec::new());
        let response = r
            .search("test", "query", 10, &SearchOptions::default())
            .await
            .unwrap();
        assert_eq!(response.hits.len(), 1);
        assert!(!response.degraded);
    }

    #[tokio::test]
    async fn weighted_fusion_requires_weights_summing_to_one() {
        let r = retriever(Vec::new(), Vec::new());
        let options = SearchOptions {
            fusion: FusionStrategy::Weighted,
            weights: FusionWeights {
                vector: 0.7,
                bm25: 0.7,
            },
            ..SearchOptions::default()
        };
        let err = r
            .search("test", "query", 5, &options)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOptions { .. }));
    }
}
