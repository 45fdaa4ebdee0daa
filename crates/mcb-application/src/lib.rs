//! Application layer - code-aware retrieval platform
//!
//! This crate contains the use cases and pure domain services that
//! orchestrate `mcb-domain` entities and ports according to Clean
//! Architecture principles. It has no dependency on any concrete provider:
//! every collaborator (parser, embedder, vector store, BM25 index) is taken
//! as a constructor argument behind a trait object.
//!
//! ## Domain services (pure, no I/O)
//!
//! - [`domain_services::tokenizer`] — text to normalized token multiset (C2).
//! - [`domain_services::classpath`] — Java file path / FQN normalization (C7).
//!
//! ## Use cases
//!
//! - [`use_cases::indexer`] — parse, embed, dual-write (C5).
//! - [`use_cases::retriever`] — parallel vector + BM25 query and fusion (C6).
//! - [`use_cases::evaluator`] — dataset-driven retrieval quality scoring (C8).

/// Pure domain services shared across use cases.
pub mod domain_services;
/// Use cases that orchestrate domain services and ports.
pub mod use_cases;
