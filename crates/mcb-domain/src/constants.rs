//! Domain layer constants
//!
//! Contains constants that are part of the domain logic and are used by
//! the application layer. Infrastructure-specific constants remain in
//! `infrastructure/constants.rs`.

// ============================================================================
// INDEXING DOMAIN CONSTANTS
// ============================================================================

/// Maximum character length of a single chunk before it is split further
pub const CHUNK_MAX_CHARS: usize = 4000;

// ============================================================================
// BM25 SCORING CONSTANTS
// ============================================================================

/// Okapi BM25 term frequency saturation parameter
pub const BM25_K1: f64 = 1.2;

/// Okapi BM25 document length normalization parameter
pub const BM25_B: f64 = 0.75;

// ============================================================================
// HYBRID RETRIEVAL CONSTANTS
// ============================================================================

/// Default Reciprocal Rank Fusion smoothing constant
pub const RRF_DEFAULT_K: f64 = 60.0;

/// Default weight applied to the vector branch in weighted fusion
pub const HYBRID_DEFAULT_VECTOR_WEIGHT: f64 = 0.5;

/// Default weight applied to the BM25 branch in weighted fusion
pub const HYBRID_DEFAULT_BM25_WEIGHT: f64 = 0.5;

/// Default total deadline, in milliseconds, a hybrid query allows both branches together
pub const HYBRID_DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Floor applied to the default `over_fetch` size (`max(2k, 20)`)
pub const HYBRID_OVER_FETCH_FLOOR: usize = 20;

// ============================================================================
// CONCURRENCY CONSTANTS
// ============================================================================

/// Default number of files indexed concurrently within a batch
pub const DEFAULT_INDEXING_CONCURRENCY: usize = 4;

/// Default number of evaluation queries executed concurrently
pub const DEFAULT_EVALUATOR_CONCURRENCY: usize = 4;
