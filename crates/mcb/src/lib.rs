//! # Code-aware retrieval platform
//!
//! Composition root for a Java-aware chunking, dual vector+BM25 indexing
//! and hybrid retrieval platform. This crate owns no business logic of its
//! own: it wires concrete `mcb-providers` adapters and `mcb-infrastructure`
//! config/logging into the `mcb-application` use cases by explicit
//! constructor injection. There is no service locator and no DI container —
//! every collaborator is an `Arc<dyn Trait>` passed to a `::new()` call.
//!
//! ## Architecture
//!
//! - `domain` - entities, port traits, value objects, the error enum.
//! - `application` - pure domain services (C2 tokenizer, C7 classpath
//!   normalizer) and use cases (C5 indexer, C6 retriever, C8 evaluator).
//! - `providers` - concrete adapters: parser (C1), BM25 index (C4), vector
//!   store (C3), embedder.
//! - `infrastructure` - config loading, structured logging, retry.
//!
//! [`Platform::from_config`] builds a fully wired instance from a loaded
//! [`mcb_infrastructure::config::AppConfig`]; callers that only need one
//! collaborator (e.g. a standalone parser) can reach for the re-exported
//! crates directly instead.

use std::sync::Arc;
use std::time::Duration;

use mcb_application::domain_services::{ClasspathNormalizer, Tokenizer};
use mcb_application::use_cases::{Evaluator, Indexer, Retriever};
use mcb_domain::error::{Error, Result};
use mcb_domain::ports::{ChunkParser, EmbeddingProvider, LexicalIndex, VectorStoreAdapter};
use mcb_infrastructure::config::AppConfig;
use mcb_infrastructure::resilient::{ResilientEmbeddingProvider, ResilientVectorStore};
use mcb_providers::bm25::Bm25Index;
use mcb_providers::embedding::{NullEmbeddingProvider, OpenAIEmbeddingProvider};
use mcb_providers::parser::Parser;
use mcb_providers::vector_store::{InMemoryVectorStore, NullVectorStore};

/// Domain layer - entities, ports, value objects, errors.
pub mod domain {
    pub use mcb_domain::*;
}

/// Application layer - domain services and use cases.
pub mod application {
    pub use mcb_application::*;
}

/// Provider adapters - parser, BM25 index, vector store, embedder.
pub mod providers {
    pub use mcb_providers::*;
}

/// Infrastructure layer - config, logging, retry.
pub mod infrastructure {
    pub use mcb_infrastructure::*;
}

/// A fully wired platform: the C5 indexer, C6 retriever and C8 evaluator,
/// built from a loaded [`AppConfig`] via explicit constructor injection.
///
/// The C1 parser is exposed directly since callers sometimes want to parse
/// without indexing (e.g. to preview chunking).
pub struct Platform {
    /// Source parser (C1).
    pub parser: Arc<Parser>,
    /// Parse/embed/dual-write use case (C5).
    pub indexer: Arc<Indexer>,
    /// Hybrid vector+BM25 retriever (C6).
    pub retriever: Arc<Retriever>,
    /// Dataset-driven retrieval-quality evaluator (C8).
    pub evaluator: Arc<Evaluator>,
}

impl Platform {
    /// Build a [`Platform`] from a loaded application configuration.
    ///
    /// Selects the embedder and vector store adapters named by
    /// `config.providers`, wraps both with [`ResilientEmbeddingProvider`] /
    /// [`ResilientVectorStore`] using `config.retry`, and threads the
    /// resulting ports into the indexer, retriever and evaluator.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let parser = Arc::new(Parser::new());
        let embedder = build_embedder(config)?;
        let vector_store = build_vector_store(config);
        let lexical_index: Arc<dyn LexicalIndex> = Arc::new(Bm25Index::new());

        let indexer = Arc::new(Indexer::new(
            parser.clone() as Arc<dyn ChunkParser>,
            embedder.clone(),
            vector_store.clone(),
            lexical_index.clone(),
        ));

        let retriever = Arc::new(Retriever::new(
            embedder,
            vector_store,
            lexical_index,
            Tokenizer::new(),
        ));

        let evaluator = Arc::new(Evaluator::new(retriever.clone(), ClasspathNormalizer::new()));

        Ok(Self {
            parser,
            indexer,
            retriever,
            evaluator,
        })
    }

    /// Default collection name configured for the vector store / BM25 index.
    pub fn default_collection(config: &AppConfig) -> &str {
        &config.providers.vector_store.collection
    }
}

fn build_embedder(config: &AppConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let embedding_config = &config.providers.embedding;
    let provider: Arc<dyn EmbeddingProvider> = match embedding_config.provider.as_str() {
        "openai" => {
            let api_key = embedding_config
                .api_key
                .clone()
                .ok_or_else(|| Error::config("openai embedding provider requires an api_key"))?;
            let timeout = Duration::from_secs(30);
            let http_client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;
            Arc::new(OpenAIEmbeddingProvider::new(
                api_key,
                embedding_config.base_url.clone(),
                embedding_config.model.clone(),
                timeout,
                http_client,
            ))
        }
        "null" => Arc::new(NullEmbeddingProvider::new()),
        other => {
            return Err(Error::config(format!(
                "unknown embedding provider {other:?}, expected \"openai\" or \"null\""
            )))
        }
    };
    Ok(Arc::new(ResilientEmbeddingProvider::new(
        provider,
        config.retry.clone(),
    )))
}

fn build_vector_store(config: &AppConfig) -> Arc<dyn VectorStoreAdapter> {
    let inner: Arc<dyn VectorStoreAdapter> = match config.providers.vector_store.provider.as_str()
    {
        "null" => Arc::new(NullVectorStore::new()),
        _ => Arc::new(InMemoryVectorStore::new()),
    };
    Arc::new(ResilientVectorStore::new(inner, config.retry.clone()))
}
