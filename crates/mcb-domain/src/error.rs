//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the retrieval platform
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (with context)
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Options passed to an operation were internally inconsistent (e.g. k == 0)
    #[error("Invalid options: {message}")]
    InvalidOptions {
        /// Description of the invalid options
        message: String,
    },

    /// A source file could not be parsed into chunks
    #[error("Parse error in {file_path}: {message}")]
    ParseError {
        /// File that failed to parse
        file_path: String,
        /// Description of the parse failure
        message: String,
    },

    /// A dual-write index operation partially succeeded
    #[error("Partially indexed {file_path}: {message}")]
    PartiallyIndexed {
        /// File the partial index failure applies to
        file_path: String,
        /// Description of what succeeded and what failed
        message: String,
    },

    /// Retrieval (search/fusion) operation failed
    #[error("Retrieval error: {message}")]
    RetrievalError {
        /// Description of the retrieval failure
        message: String,
    },

    /// A branch of a hybrid operation exceeded its allotted time
    #[error("Timeout after {elapsed_ms}ms: {operation}")]
    Timeout {
        /// Operation that timed out
        operation: String,
        /// Elapsed time in milliseconds before the timeout fired
        elapsed_ms: u64,
    },

    /// Vector database operation error
    #[error("Vector store error: {message}")]
    VectorDb {
        /// Description of the vector database error
        message: String,
    },

    /// Vector store is unavailable (connection refused, not configured, etc.)
    #[error("Vector store unavailable: {message}")]
    VectorStoreUnavailable {
        /// Description of why the vector store is unavailable
        message: String,
    },

    /// Embedding provider operation error
    #[error("Embedding provider error: {message}")]
    Embedding {
        /// Description of the embedding provider error
        message: String,
    },

    /// Embedder is unavailable (connection refused, rate limited, etc.)
    #[error("Embedder unavailable: {message}")]
    EmbedderUnavailable {
        /// Description of why the embedder is unavailable
        message: String,
    },

    /// Configuration-related error (simple form)
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },

    /// Configuration-related error (with source)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Network-related error
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Basic error creation methods
impl Error {
    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an invalid options error
    pub fn invalid_options<S: Into<String>>(message: S) -> Self {
        Self::InvalidOptions {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse_error<S: Into<String>, M: Into<String>>(file_path: S, message: M) -> Self {
        Self::ParseError {
            file_path: file_path.into(),
            message: message.into(),
        }
    }

    /// Create a partially-indexed error
    pub fn partially_indexed<S: Into<String>, M: Into<String>>(file_path: S, message: M) -> Self {
        Self::PartiallyIndexed {
            file_path: file_path.into(),
            message: message.into(),
        }
    }

    /// Create a retrieval error
    pub fn retrieval<S: Into<String>>(message: S) -> Self {
        Self::RetrievalError {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S, elapsed_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_ms,
        }
    }

    /// Create a vector database error
    pub fn vector_db<S: Into<String>>(message: S) -> Self {
        Self::VectorDb {
            message: message.into(),
        }
    }

    /// Create a vector-store-unavailable error
    pub fn vector_store_unavailable<S: Into<String>>(message: S) -> Self {
        Self::VectorStoreUnavailable {
            message: message.into(),
        }
    }

    /// Create an embedding provider error
    pub fn embedding<S: Into<String>>(message: S) -> Self {
        Self::Embedding {
            message: message.into(),
        }
    }

    /// Create an embedder-unavailable error
    pub fn embedder_unavailable<S: Into<String>>(message: S) -> Self {
        Self::EmbedderUnavailable {
            message: message.into(),
        }
    }
}

// I/O error creation methods
impl Error {
    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Configuration error creation methods
impl Error {
    /// Create a configuration error (simple)
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Network error creation methods
impl Error {
    /// Create a network error with source
    pub fn network_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Internal error creation methods
impl Error {
    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

