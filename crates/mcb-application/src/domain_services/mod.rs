//! Pure domain services: no I/O, no provider dependency, shared by multiple use cases.

/// Java classpath / fully-qualified-name normalization (C7).
pub mod classpath;
/// Text tokenization for BM25 indexing, keyword extraction and query processing (C2).
pub mod tokenizer;

pub use classpath::ClasspathNormalizer;
pub use tokenizer::Tokenizer;
