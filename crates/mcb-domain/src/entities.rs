//! Core domain entities: chunks, vector points, search hits and evaluation data.

use crate::value_objects::Language;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The structural role a [`Chunk`] plays within its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkKind {
    /// The whole file, used only when no finer structure can be recovered.
    File,
    /// A class or interface summary: header, fields, stripped method signatures.
    Class,
    /// A method, constructor, or initializer, full source slice.
    Method,
    /// A top-level function (non-Java languages).
    Function,
    /// A chunk produced by splitting an oversize chunk on blank-line boundaries.
    Block,
    /// A run of contiguous comments with no attached code.
    CommentGroup,
}

impl ChunkKind {
    /// Stable lowercase/kebab-case string used in the chunk id hash and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Class => "class",
            Self::Method => "method",
            Self::Function => "function",
            Self::Block => "block",
            Self::CommentGroup => "comment-group",
        }
    }
}

impl std::fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A semantically coherent slice of source code with structural metadata,
/// the unit of indexing and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Deterministic hash of `(collection, file_path, kind, qualified_name, line_start)`.
    pub id: String,
    /// Namespace that all storage for this chunk lives under.
    pub collection: String,
    /// Original path as provided to the parser.
    pub file_path: String,
    /// Source language.
    pub language: Language,
    /// Structural role within the file.
    pub kind: ChunkKind,
    /// For Java: `pkg.Class` or `pkg.Class.method`. Otherwise best-effort.
    pub qualified_name: String,
    /// The verbatim code slice used for embedding.
    pub content: String,
    /// 1-based inclusive start line.
    pub line_start: u32,
    /// 1-based inclusive end line.
    pub line_end: u32,
    /// Ordered list of enclosing `qualified_name` values, outer to inner.
    pub parents: Vec<String>,
    /// Deduplicated set of salient identifiers (class names, method names, imported types).
    pub keywords: Vec<String>,
    /// For Java: the list of referenced external types. Empty for other languages.
    pub imports: Vec<String>,
    /// When this chunk was written by the indexer.
    pub indexed_at: chrono::DateTime<chrono::Utc>,
}

impl Chunk {
    /// Compute the deterministic chunk id.
    ///
    /// `hex(sha256(collection ‖ "\0" ‖ file_path ‖ "\0" ‖ kind ‖ "\0" ‖
    /// qualified_name ‖ "\0" ‖ line_start))[:32]`. Stable across runs: the
    /// same key tuple always hashes to the same id, regardless of content.
    pub fn deterministic_id(
        collection: &str,
        file_path: &str,
        kind: ChunkKind,
        qualified_name: &str,
        line_start: u32,
    ) -> String {
        let mut hasher = Sha256::new();
        hasher.update(collection.as_bytes());
        hasher.update(b"\0");
        hasher.update(file_path.as_bytes());
        hasher.update(b"\0");
        hasher.update(kind.as_str().as_bytes());
        hasher.update(b"\0");
        hasher.update(qualified_name.as_bytes());
        hasher.update(b"\0");
        hasher.update(line_start.to_string().as_bytes());
        let digest = hasher.finalize();
        hex::encode(digest)[..32].to_string()
    }
}

/// Carries the "best-effort chunks plus a warning" result the parser
/// contract returns when a file is recoverable but not cleanly parseable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseWarning {
    /// File the warning applies to.
    pub file_path: String,
    /// Human-readable description of what could not be recovered.
    pub message: String,
}

/// Opaque-to-the-core record stored in the vector index: `{id, vector, payload}`.
/// Dimension `D` (`vector.len()`) is a per-collection constant fixed at
/// collection creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorPoint {
    /// Same id as the source [`Chunk`].
    pub id: String,
    /// Dense embedding vector.
    pub vector: Vec<f32>,
    /// The chunk this vector represents.
    pub payload: Chunk,
}

/// A single ranked result surfaced by the hybrid retriever. Fused score and
/// rank are what downstream consumers see; the per-branch scores are kept
/// for debugging and for weighted-fusion recomputation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    /// Id of the matched chunk.
    pub chunk_id: String,
    /// Cosine-similarity score from the vector branch, rescaled to `[0, 1]`.
    pub score_vec: Option<f64>,
    /// Raw Okapi BM25 score from the lexical branch.
    pub score_bm25: Option<f64>,
    /// Combined score after fusion.
    pub score_fused: f64,
    /// 1-based position in the final, truncated result list.
    pub rank: u32,
    /// The matched chunk.
    pub payload: Chunk,
}

/// A single labeled query in an [`EvaluationDataset`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvalQuery {
    /// Dataset-local query identifier.
    pub id: String,
    /// Natural-language query text.
    pub text: String,
    /// Ground-truth identifiers: Java FQNs (possibly `.method`-suffixed) or file paths.
    pub ground_truth: Vec<String>,
    /// Dataset-supplied difficulty label, used for the per-difficulty breakdown.
    pub difficulty: String,
}

/// Configuration consumed by the classpath normalizer (C7) and threaded
/// through [`EvalOptions`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClasspathNormalizerOptions {
    /// Java source root, e.g. `"src/main/java"`, stripped from file paths before dotting.
    pub java_source_root: String,
    /// When true, `"com.x.Foo.method"` normalizes to `"com.x.Foo"`.
    pub ignore_method_names: bool,
    /// When true, comparisons fold case.
    pub case_sensitive: bool,
}

impl Default for ClasspathNormalizerOptions {
    fn default() -> Self {
        Self {
            java_source_root: "src/main/java".to_string(),
            ignore_method_names: false,
            case_sensitive: true,
        }
    }
}

/// Options controlling a single evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvalOptions {
    /// Set of K values metrics are reported at.
    pub k_values: Vec<usize>,
    /// Classpath normalization configuration applied to hits and ground truth.
    pub normalizer: ClasspathNormalizerOptions,
    /// Maximum number of queries evaluated concurrently.
    pub concurrency: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            k_values: vec![1, 3, 5, 10],
            normalizer: ClasspathNormalizerOptions::default(),
            concurrency: crate::constants::DEFAULT_EVALUATOR_CONCURRENCY,
        }
    }
}

/// A labeled retrieval-quality dataset: `metadata.json` + query records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationDataset {
    /// Dataset name, from `metadata.json`.
    pub name: String,
    /// The queries to run.
    pub queries: Vec<EvalQuery>,
    /// Evaluation options, merged from `metadata.json` and caller overrides.
    pub options: EvalOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_id_is_stable_across_calls() {
        let a = Chunk::deterministic_id("proj", "Foo.java", ChunkKind::Class, "com.x.Foo", 10);
        let b = Chunk::deterministic_id("proj", "Foo.java", ChunkKind::Class, "com.x.Foo", 10);
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn deterministic_id_depends_on_every_key_field() {
        let base = Chunk::deterministic_id("proj", "Foo.java", ChunkKind::Class, "com.x.Foo", 10);
        assert_ne!(
            base,
            Chunk::deterministic_id("other", "Foo.java", ChunkKind::Class, "com.x.Foo", 10)
        );
        assert_ne!(
            base,
            Chunk::deterministic_id("proj", "Bar.java", ChunkKind::Class, "com.x.Foo", 10)
        );
        assert_ne!(
            base,
            Chunk::deterministic_id("proj", "Foo.java", ChunkKind::Method, "com.x.Foo", 10)
        );
        assert_ne!(
            base,
            Chunk::deterministic_id("proj", "Foo.java", ChunkKind::Class, "com.x.Bar", 10)
        );
        assert_ne!(
            base,
            Chunk::deterministic_id("proj", "Foo.java", ChunkKind::Class, "com.x.Foo", 11)
        );
    }
}
