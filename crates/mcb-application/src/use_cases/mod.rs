//! Use cases: orchestrate domain services and ports, no concrete provider dependency.

/// Retrieval-quality evaluator, dataset-driven (C8).
pub mod evaluator;
/// Parse, embed, dual-write indexer (C5).
pub mod indexer;
/// Parallel vector + BM25 retriever with score fusion (C6).
pub mod retriever;

pub use evaluator::{load_dataset, Evaluator};
pub use indexer::Indexer;
pub use retriever::Retriever;
