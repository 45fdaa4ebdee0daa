//! In-memory Okapi BM25 lexical index (C4).

mod index;

pub use index::Bm25Index;
