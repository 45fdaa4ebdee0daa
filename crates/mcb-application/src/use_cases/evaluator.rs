//! Evaluator (C8): dataset-driven retrieval quality scoring.
//!
//! Runs every query in an [`EvaluationDataset`] against a [`Retriever`],
//! normalizes hit and ground-truth identifiers through the classpath
//! normalizer (C7), and aggregates Recall@K/Precision@K/Hit@K/NDCG@K/MRR.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;

use mcb_domain::entities::{ClasspathNormalizerOptions, EvalOptions, EvalQuery, EvaluationDataset};
use mcb_domain::error::{Error, Result};
use mcb_domain::value_objects::Language;

use crate::domain_services::ClasspathNormalizer;
use crate::use_cases::retriever::{Retriever, SearchOptions};

/// Per-query metric values, one entry per configured K plus MRR.
#[derive(Debug, Clone, Default)]
pub struct QueryMetrics {
    /// Dataset-local query id.
    pub query_id: String,
    /// Recall@K for each configured K.
    pub recall: BTreeMap<usize, f64>,
    /// Precision@K for each configured K.
    pub precision: BTreeMap<usize, f64>,
    /// Hit@K (0 or 1) for each configured K.
    pub hit: BTreeMap<usize, f64>,
    /// NDCG@K for each configured K.
    pub ndcg: BTreeMap<usize, f64>,
    /// Reciprocal rank of the first relevant hit in the full returned list.
    pub mrr: f64,
    /// Wall time of this query's retrieval call.
    pub latency_ms: u64,
}

/// A query that could not be scored; counted as zero on every metric.
#[derive(Debug, Clone)]
pub struct EvalFailure {
    /// Dataset-local query id.
    pub query_id: String,
    /// Stringified failure reason.
    pub message: String,
}

/// Aggregated metrics for one difficulty bucket.
#[derive(Debug, Clone, Default)]
pub struct DifficultyBreakdown {
    /// Difficulty label, as given in the dataset.
    pub difficulty: String,
    /// Number of queries in this bucket.
    pub query_count: usize,
    /// Mean Recall@K per K.
    pub recall: BTreeMap<usize, f64>,
    /// Mean Precision@K per K.
    pub precision: BTreeMap<usize, f64>,
    /// Mean Hit@K per K.
    pub hit: BTreeMap<usize, f64>,
    /// Mean NDCG@K per K.
    pub ndcg: BTreeMap<usize, f64>,
    /// Mean MRR.
    pub mrr: f64,
}

/// Full report for one evaluation run.
#[derive(Debug, Clone, Default)]
pub struct EvaluationReport {
    /// Dataset name.
    pub dataset_name: String,
    /// Number of queries attempted.
    pub query_count: usize,
    /// Mean Recall@K per K, across all queries.
    pub recall: BTreeMap<usize, f64>,
    /// Mean Precision@K per K, across all queries.
    pub precision: BTreeMap<usize, f64>,
    /// Mean Hit@K per K, across all queries.
    pub hit: BTreeMap<usize, f64>,
    /// Mean NDCG@K per K, across all queries.
    pub ndcg: BTreeMap<usize, f64>,
    /// Mean MRR across all queries.
    pub mrr: f64,
    /// Breakdown by dataset-supplied difficulty label.
    pub per_difficulty: Vec<DifficultyBreakdown>,
    /// Queries that errored; scored as zero, not silently dropped.
    pub failures: Vec<EvalFailure>,
    /// Total wall time for the run.
    pub total_wall_time_ms: u64,
    /// Mean per-query latency.
    pub avg_query_latency_ms: f64,
}

/// Dataset-driven retrieval quality evaluator.
pub struct Evaluator {
    retriever: Arc<Retriever>,
    normalizer: ClasspathNormalizer,
}

impl Evaluator {
    /// Construct an evaluator from a retriever and a classpath normalizer.
    pub fn new(retriever: Arc<Retriever>, normalizer: ClasspathNormalizer) -> Self {
        Self {
            retriever,
            normalizer,
        }
    }

    /// Run every query in `dataset` against `collection` and aggregate
    /// metrics per `dataset.options`.
    pub async fn evaluate(&self, collection: &str, dataset: &EvaluationDataset) -> EvaluationReport {
        use futures::stream::{self, StreamExt};

        let run_started = Instant::now();
        let k_values = &dataset.options.k_values;
        let k_max = *k_values.iter().max().unwrap_or(&1);
        let concurrency = dataset.options.concurrency.max(1);

        let outcomes: Vec<(String, String, std::result::Result<QueryMetrics, String>)> =
            stream::iter(dataset.queries.iter().cloned())
                .map(|query| {
                    let collection = collection.to_string();
                    async move {
                        let query_id = query.id.clone();
                        let difficulty = query.difficulty.clone();
                        let result = self
                            .run_query(&collection, &query, k_values, k_max, &dataset.options.normalizer)
                            .await;
                        (query_id, difficulty, result)
                    }
                })
                .buffer_unordered(concurrency)
                .collect()
                .await;

        let mut per_query = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        let mut by_difficulty: BTreeMap<String, Vec<QueryMetrics>> = BTreeMap::new();

        for (query_id, difficulty, result) in outcomes {
            let metrics = match result {
                Ok(metrics) => metrics,
                Err(message) => {
                    failures.push(EvalFailure {
                        query_id: query_id.clone(),
                        message,
                    });
                    zero_metrics(&query_id, k_values)
                }
            };
            by_difficulty
                .entry(difficulty)
                .or_default()
                .push(metrics.clone());
            per_query.push(metrics);
        }

        let per_difficulty = by_difficulty
            .into_iter()
            .map(|(difficulty, metrics)| aggregate_bucket(difficulty, &metrics, k_values))
            .collect();

        let overall = aggregate_bucket(String::new(), &per_query, k_values);
        let avg_latency = if per_query.is_empty() {
            0.0
        } else {
            per_query.iter().map(|m| m.latency_ms as f64).sum::<f64>() / per_query.len() as f64
        };

        EvaluationReport {
            dataset_name: dataset.name.clone(),
            query_count: dataset.queries.len(),
            recall: overall.recall,
            precision: overall.precision,
            hit: overall.hit,
            ndcg: overall.ndcg,
            mrr: overall.mrr,
            per_difficulty,
            failures,
            total_wall_time_ms: run_started.elapsed().as_millis() as u64,
            avg_query_latency_ms: avg_latency,
        }
    }

    async fn run_query(
        &self,
        collection: &str,
        query: &EvalQuery,
        k_values: &[usize],
        k_max: usize,
        normalizer_options: &mcb_domain::entities::ClasspathNormalizerOptions,
    ) -> std::result::Result<QueryMetrics, String> {
        let started = Instant::now();
        let response = self
            .retriever
            .search(collection, &query.text, k_max, &SearchOptions::default())
            .await
            .map_err(|e| e.to_string())?;
        let latency = started.elapsed();

        let ground_truth: HashSet<String> = query
            .ground_truth
            .iter()
            .map(|g| self.normalizer.normalize(g, normalizer_options))
            .collect();
        let relevant_total = ground_truth.len();

        let relevance: Vec<bool> = response
            .hits
            .iter()
            .map(|hit| {
                let identifier = if hit.payload.language == Language::Java {
                    &hit.payload.qualified_name
                } else {
                    &hit.payload.file_path
                };
                let normalized = self.normalizer.normalize(identifier, normalizer_options);
                ground_truth.contains(&normalized)
            })
            .collect();

        let mut metrics = QueryMetrics {
            query_id: query.id.clone(),
            latency_ms: latency.as_millis() as u64,
            ..Default::default()
        };

        for &k in k_values {
            let top_k = &relevance[..relevance.len().min(k)];
            let relevant_in_top_k = top_k.iter().filter(|r| **r).count();

            let recall = if relevant_total == 0 {
                0.0
            } else {
                relevant_in_top_k as f64 / relevant_total as f64
            };
            let precision = relevant_in_top_k as f64 / k as f64;
            let hit = if relevant_in_top_k > 0 { 1.0 } else { 0.0 };
            let ndcg = ndcg_at_k(top_k, relevant_total);

            metrics.recall.insert(k, recall);
            metrics.precision.insert(k, precision);
            metrics.hit.insert(k, hit);
            metrics.ndcg.insert(k, ndcg);
        }

        metrics.mrr = relevance
            .iter()
            .position(|r| *r)
            .map(|pos| 1.0 / (pos + 1) as f64)
            .unwrap_or(0.0);

        Ok(metrics)
    }
}

/// On-disk shape of a dataset's `metadata.json`.
#[derive(Debug, Clone, Deserialize)]
struct DatasetMetadata {
    name: String,
    #[serde(default)]
    evaluation_options: Option<DatasetEvalOptions>,
}

#[derive(Debug, Clone, Deserialize)]
struct DatasetEvalOptions {
    #[serde(default)]
    k_values: Option<Vec<usize>>,
    #[serde(default)]
    normalizer: Option<ClasspathNormalizerOptions>,
    #[serde(default)]
    concurrency: Option<usize>,
}

/// `answer` is either a single ground-truth identifier or a list of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum DatasetAnswer {
    Single(String),
    Multiple(Vec<String>),
}

impl DatasetAnswer {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::Single(id) => vec![id],
            Self::Multiple(ids) => ids,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct DatasetQueryRecord {
    difficulty: String,
    question: String,
    answer: DatasetAnswer,
}

/// Loads an [`EvaluationDataset`] from a directory laid out as `metadata.json`
/// plus one of `queries.jsonl` (newline-delimited JSON objects) or
/// `questions.json` (a JSON array); each query record is
/// `{difficulty, question, answer}`. Evaluation options declared under
/// `metadata.json`'s `evaluation_options` override the corresponding
/// [`EvalOptions`] defaults; fields it omits keep their default.
pub async fn load_dataset(dir: &Path) -> Result<EvaluationDataset> {
    let metadata_path = dir.join("metadata.json");
    let metadata_raw = tokio::fs::read_to_string(&metadata_path)
        .await
        .map_err(|_| Error::not_found(format!("dataset metadata at {}", metadata_path.display())))?;
    let metadata: DatasetMetadata = serde_json::from_str(&metadata_raw)?;

    let records = load_query_records(dir).await?;
    let queries = records
        .into_iter()
        .enumerate()
        .map(|(i, record)| EvalQuery {
            id: format!("q{i}"),
            text: record.question,
            ground_truth: record.answer.into_vec(),
            difficulty: record.difficulty,
        })
        .collect();

    let mut options = EvalOptions::default();
    if let Some(overrides) = metadata.evaluation_options {
        if let Some(k_values) = overrides.k_values {
            options.k_values = k_values;
        }
        if let Some(normalizer) = overrides.normalizer {
            options.normalizer = normalizer;
        }
        if let Some(concurrency) = overrides.concurrency {
            options.concurrency = concurrency;
        }
    }

    Ok(EvaluationDataset {
        name: metadata.name,
        queries,
        options,
    })
}

async fn load_query_records(dir: &Path) -> Result<Vec<DatasetQueryRecord>> {
    let jsonl_path = dir.join("queries.jsonl");
    if tokio::fs::try_exists(&jsonl_path).await.unwrap_or(false) {
        let content = tokio::fs::read_to_string(&jsonl_path)
            .await
            .map_err(|e| Error::io_with_source(format!("reading {}", jsonl_path.display()), e))?;
        return content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| Ok(serde_json::from_str(line)?))
            .collect();
    }

    let json_path = dir.join("questions.json");
    if tokio::fs::try_exists(&json_path).await.unwrap_or(false) {
        let content = tokio::fs::read_to_string(&json_path)
            .await
            .map_err(|e| Error::io_with_source(format!("reading {}", json_path.display()), e))?;
        return Ok(serde_json::from_str(&content)?);
    }

    Err(Error::not_found(format!(
        "queries.jsonl or questions.json under {}",
        dir.display()
    )))
}

fn ndcg_at_k(relevance: &[bool], relevant_total: usize) -> f64 {
    let dcg: f64 = relevance
        .iter()
        .enumerate()
        .filter(|(_, r)| **r)
        .map(|(i, _)| 1.0 / ((i as f64 + 2.0).log2()))
        .sum();

    let ideal_ones = relevant_total.min(relevance.len());
    let idcg: f64 = (0..ideal_ones).map(|i| 1.0 / ((i as f64 + 2.0).log2())).sum();

    if idcg > 0.0 { dcg / idcg } else { 0.0 }
}

fn zero_metrics(query_id: &str, k_values: &[usize]) -> QueryMetrics {
    let mut metrics = QueryMetrics {
        query_id: query_id.to_string(),
        ..Default::default()
    };
    for &k in k_values {
        metrics.recall.insert(k, 0.0);
        metrics.precision.insert(k, 0.0);
        metrics.hit.insert(k, 0.0);
        metrics.ndcg.insert(k, 0.0);
    }
    metrics
}

fn aggregate_bucket(
    difficulty: String,
    metrics: &[QueryMetrics],
    k_values: &[usize],
) -> DifficultyBreakdown {
    let mut bucket = DifficultyBreakdown {
        difficulty,
        query_count: metrics.len(),
        ..Default::default()
    };
    if metrics.is_empty() {
        for &k in k_values {
            bucket.recall.insert(k, 0.0);
            bucket.precision.insert(k, 0.0);
            bucket.hit.insert(k, 0.0);
            bucket.ndcg.insert(k, 0.0);
        }
        return bucket;
    }
    let n = metrics.len() as f64;
    for &k in k_values {
        bucket.recall.insert(
            k,
            metrics.iter().filter_map(|m| m.recall.get(&k)).sum::<f64>() / n,
        );
        bucket.precision.insert(
            k,
            metrics.iter().filter_map(|m| m.precision.get(&k)).sum::<f64>() / n,
        );
        bucket
            .hit
            .insert(k, metrics.iter().filter_map(|m| m.hit.get(&k)).sum::<f64>() / n);
        bucket
            .ndcg
            .insert(k, metrics.iter().filter_map(|m| m.ndcg.get(&k)).sum::<f64>() / n);
    }
    bucket.mrr = metrics.iter().map(|m| m.mrr).sum::<f64>() / n;
    bucket
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mcb_domain::entities::{Chunk, ChunkKind};
    use mcb_domain::error::Result;
    use mcb_domain::ports::{EmbeddingProvider, LexicalIndex, VectorStoreAdapter};
    use mcb_domain::value_objects::{Embedding, SearchResult};
    use std::collections::HashMap;

    fn chunk_with_qualified_name(id: &str, qualified_name: &str) -> Chunk {
        Chunk {
            id: id.to_string(),
            collection: "test".to_string(),
            file_path: format!("{id}.java"),
            language: Language::Java,
            kind: ChunkKind::Method,
            qualified_name: qualified_name.to_string(),
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
                    vector: vec![1.0],
                    model: "stub".to_string(),
                    dimensions: 1,
                })
                .collect())
        }
        fn dimensions(&self) -> usize {
            1
        }
        fn model_name(&self) -> &str {
            "stub"
        }
    }

    struct StubVectorStore {
        hits: Vec<SearchResult>,
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
            Ok(true)
        }
        async fn existing_ids(
            &self,
            _name: &str,
            _ids: &[String],
        ) -> Result<std::collections::HashSet<String>> {
            Ok(std::collections::HashSet::new())
        }
        async fn scroll(&self, _name: &str) -> Result<Vec<Chunk>> {
            Ok(Vec::new())
        }
    }

    struct EmptyLexicalIndex;
    #[async_trait]
    impl LexicalIndex for EmptyLexicalIndex {
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
            Ok(Vec::new())
        }
        async fn rebuild(&self, _collection: &str, _chunks: Vec<Chunk>) -> Result<usize> {
            Ok(0)
        }
        async fn doc_count(&self, _collection: &str) -> Result<usize> {
            Ok(0)
        }
    }

    fn evaluator_with_ranks(ranks: &[(String, String)]) -> Evaluator {
        let hits: Vec<SearchResult> = ranks
            .iter()
            .enumerate()
            .map(|(i, (id, qn))| SearchResult {
                id: id.clone(),
                score: 1.0 - (i as f64 * 0.01),
                payload: chunk_with_qualified_name(id, qn),
            })
            .collect();
        let retriever = Retriever::new(
            Arc::new(StubEmbedder),
            Arc::new(StubVectorStore { hits }),
            Arc::new(EmptyLexicalIndex),
            crate::domain_services::Tokenizer::new(),
        );
        Evaluator::new(Arc::new(retriever), ClasspathNormalizer::new())
    }

    /// Builds a 10-position ranking where the three ground-truth hits sit at
    /// 1-based ranks 1, 4 and 9; every other position is noise.
    fn worked_example_ranks() -> Vec<(String, String)> {
        let noise = |id: &str| (id.to_string(), format!("com.x.Noise{id}"));
        vec![
            ("hit1".to_string(), "com.x.First".to_string()),
            noise("a"),
            noise("b"),
            ("hit4".to_string(), "com.x.Second".to_string()),
            noise("c"),
            noise("d"),
            noise("e"),
            noise("f"),
            ("hit9".to_string(), "com.x.Third".to_string()),
            noise("g"),
        ]
    }

    #[tokio::test]
    async fn multi_answer_ground_truth_matches_worked_example() {
        let ranks = worked_example_ranks();
        let evaluator = evaluator_with_ranks(&ranks);
        let dataset = EvaluationDataset {
            name: "worked-example".to_string(),
            queries: vec![EvalQuery {
                id: "q1".to_string(),
                text: "find things".to_string(),
                ground_truth: vec![
                    "com.x.First".to_string(),
                    "com.x.Second".to_string(),
                    "com.x.Third".to_string(),
                ],
                difficulty: "medium".to_string(),
            }],
            options: mcb_domain::entities::EvalOptions {
                k_values: vec![1, 3, 5, 10],
                ..Default::default()
            },
        };

        let report = evaluator.evaluate("test", &dataset).await;
        assert!((report.recall[&1] - 1.0 / 3.0).abs() < 1e-9);
        assert!((report.recall[&3] - 1.0 / 3.0).abs() < 1e-9);
        assert!((report.recall[&5] - 2.0 / 3.0).abs() < 1e-9);
        assert!((report.recall[&10] - 1.0).abs() < 1e-9);
        assert!((report.mrr - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn failing_query_is_scored_zero_and_reported() {
        let retriever = Retriever::new(
            Arc::new(StubEmbedder),
            Arc::new(StubVectorStore { hits: Vec::new() }),
            Arc::new(EmptyLexicalIndex),
            crate::domain_services::Tokenizer::new(),
        );
        let evaluator = Evaluator::new(Arc::new(retriever), ClasspathNormalizer::new());
        let dataset = EvaluationDataset {
            name: "ds".to_string(),
            queries: vec![EvalQuery {
                id: "q1".to_string(),
                text: "x".to_string(),
                ground_truth: vec!["com.x.Foo".to_string()],
                difficulty: "easy".to_string(),
            }],
            options: mcb_domain::entities::EvalOptions {
                k_values: vec![0],
                ..Default::default()
            },
        };
        let report = evaluator.evaluate("test", &dataset).await;
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].query_id, "q1");
    }

    #[tokio::test]
    async fn load_dataset_reads_jsonl_queries_and_metadata_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("metadata.json"),
            r#"{"name": "smoke", "query_count": 2, "evaluation_options": {"k_values": [1, 5]}}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("queries.jsonl"),
            "{\"difficulty\": \"easy\", \"question\": \"find Foo\", \"answer\": \"com.x.Foo\"}\n\
             {\"difficulty\": \"hard\", \"question\": \"find Bar\", \"answer\": [\"com.x.Bar\", \"com.x.Baz\"]}\n",
        )
        .unwrap();

        let dataset = load_dataset(dir.path()).await.unwrap();
        assert_eq!(dataset.name, "smoke");
        assert_eq!(dataset.options.k_values, vec![1, 5]);
        assert_eq!(dataset.queries.len(), 2);
        assert_eq!(dataset.queries[0].ground_truth, vec!["com.x.Foo".to_string()]);
        assert_eq!(
            dataset.queries[1].ground_truth,
            vec!["com.x.Bar".to_string(), "com.x.Baz".to_string()]
        );
        assert_eq!(dataset.queries[1].difficulty, "hard");
    }

    #[tokio::test]
    async fn load_dataset_reads_questions_json_array() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("metadata.json"),
            r#"{"name": "array-style", "query_count": 1}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("questions.json"),
            r#"[{"difficulty": "medium", "question": "find Qux", "answer": "com.x.Qux"}]"#,
        )
        .unwrap();

        let dataset = load_dataset(dir.path()).await.unwrap();
        assert_eq!(dataset.queries.len(), 1);
        assert_eq!(dataset.queries[0].text, "find Qux");
    }

    #[tokio::test]
    async fn load_dataset_missing_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
