//! Provider Constants
//!
//! Constants specific to provider implementations. These are separated from
//! domain constants (which live in `mcb-domain`, the single source of truth
//! for anything the retriever or indexer also reasons about, e.g. BM25 and
//! hybrid-fusion tuning).

// ============================================================================
// EMBEDDING PROVIDER CONSTANTS
// ============================================================================

/// Null embedding provider dimension (for testing)
pub const EMBEDDING_DIMENSION_NULL: usize = 384;

/// OpenAI text-embedding-3-small dimension
pub const EMBEDDING_DIMENSION_OPENAI_SMALL: usize = 1536;

/// OpenAI text-embedding-3-large dimension
pub const EMBEDDING_DIMENSION_OPENAI_LARGE: usize = 3072;

/// OpenAI text-embedding-ada-002 dimension
pub const EMBEDDING_DIMENSION_OPENAI_ADA: usize = 1536;

// ============================================================================
// HTTP CONSTANTS
// ============================================================================

/// JSON content type
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// HTTP request timeout error message template
pub const ERROR_MSG_REQUEST_TIMEOUT: &str = "Request timed out after {:?}";

// ============================================================================
// TREE-SITTER / FALLBACK PARSER NODE TYPE CONSTANTS
// ============================================================================

/// Tree-sitter node type: class declaration
pub const TS_NODE_CLASS_DECLARATION: &str = "class_declaration";

/// Tree-sitter node type: interface declaration
pub const TS_NODE_INTERFACE_DECLARATION: &str = "interface_declaration";

/// Tree-sitter node type: enum declaration
pub const TS_NODE_ENUM_DECLARATION: &str = "enum_declaration";

/// Tree-sitter node type: record declaration (Java 16+)
pub const TS_NODE_RECORD_DECLARATION: &str = "record_declaration";

/// Tree-sitter node type: method declaration
pub const TS_NODE_METHOD_DECLARATION: &str = "method_declaration";

/// Tree-sitter node type: constructor declaration
pub const TS_NODE_CONSTRUCTOR_DECLARATION: &str = "constructor_declaration";

/// Tree-sitter node type: static/instance initializer block
pub const TS_NODE_STATIC_INITIALIZER: &str = "static_initializer";

/// Tree-sitter node type: import declaration
pub const TS_NODE_IMPORT_DECLARATION: &str = "import_declaration";
