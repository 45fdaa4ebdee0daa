//! Domain Port Interfaces
//!
//! Defines the boundary contracts between the domain/application layers and
//! the concrete adapters in `mcb-providers`. Ports are passed as
//! `Arc<dyn Trait>` to use-case constructors (explicit dependency injection,
//! no service locator, no global registry).

/// Embedding provider contract.
pub mod embedding;
/// Lexical (BM25) index contract.
pub mod lexical_index;
/// Source parser contract.
pub mod parser;
/// Vector store adapter contract.
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use lexical_index::LexicalIndex;
pub use parser::ChunkParser;
pub use vector_store::VectorStoreAdapter;
