//! # Code-aware retrieval platform — provider implementations
//!
//! Concrete adapters for the ports defined in `mcb-domain`: a Java-aware
//! parser (C1), an Okapi BM25 lexical index (C4), an in-memory vector
//! store adapter (C3), and embedding providers (the external embedder
//! collaborator).
//!
//! | Port | Implementations |
//! |------|------------------|
//! | `ChunkParser` | `parser::Parser` (tree-sitter Java + regex/indentation fallback) |
//! | `LexicalIndex` | `bm25::Bm25Index` |
//! | `VectorStoreAdapter` | `vector_store::InMemoryVectorStore`, `vector_store::NullVectorStore` |
//! | `EmbeddingProvider` | `embedding::OpenAIEmbeddingProvider`, `embedding::NullEmbeddingProvider` |

pub use mcb_domain::error::{Error, Result};

/// Provider-specific constants (embedding dimensions, tree-sitter node kinds).
pub mod constants;

/// Shared utilities for provider implementations (HTTP response handling).
pub mod utils;

/// Embedding provider implementations.
pub mod embedding;

/// Vector store adapter implementations (C3).
pub mod vector_store;

/// Okapi BM25 lexical index (C4).
pub mod bm25;

/// Source parser (C1): Java AST walk plus a fallback for other languages.
pub mod parser;
