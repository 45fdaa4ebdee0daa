//! Search-Related Value Objects
//!
//! Value objects representing the raw result of a single-index query, before
//! hybrid fusion assembles a [`crate::entities::SearchHit`].

use crate::entities::Chunk;
use serde::{Deserialize, Serialize};

/// A single raw hit returned by one branch (vector or BM25) of a query,
/// before fusion. `score` is branch-native: cosine similarity rescaled to
/// `[0, 1]` for the vector branch, raw Okapi BM25 for the lexical branch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// Id of the matched chunk.
    pub id: String,
    /// Branch-native relevance score.
    pub score: f64,
    /// The matched chunk.
    pub payload: Chunk,
}
