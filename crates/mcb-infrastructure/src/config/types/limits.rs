//! Indexing and evaluation concurrency/size limits.

use serde::{Deserialize, Serialize};

/// Bounded-concurrency and chunk-size limits applied by the indexer and
/// evaluator use cases. Defaults come straight from the domain's own
/// tuning constants rather than inventing new generic resource limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum number of files indexed concurrently within a batch.
    pub indexing_concurrency: usize,
    /// Maximum number of evaluation queries executed concurrently.
    pub evaluator_concurrency: usize,
    /// Maximum character length of a single chunk before it is split further.
    pub chunk_max_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            indexing_concurrency: mcb_domain::constants::DEFAULT_INDEXING_CONCURRENCY,
            evaluator_concurrency: mcb_domain::constants::DEFAULT_EVALUATOR_CONCURRENCY,
            chunk_max_chars: mcb_domain::constants::CHUNK_MAX_CHARS,
        }
    }
}
