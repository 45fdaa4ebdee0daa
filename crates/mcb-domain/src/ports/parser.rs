//! Source parser port
//!
//! Contract for turning a file's raw content into [`Chunk`] records (C1).
//! Parsing is CPU-bound and does not suspend, so the contract is
//! synchronous even though most other ports in this crate are async.

use crate::entities::{Chunk, ParseWarning};
use crate::error::Result;

/// File-to-chunks parser.
///
/// Implementations (`mcb_providers::parser::Parser`) dispatch on detected
/// language: a tree-sitter walk for Java, a regex/indentation heuristic for
/// everything else. Fails with `ParseError` only when no structure at all
/// can be recovered; otherwise returns best-effort chunks plus warnings.
pub trait ChunkParser: Send + Sync {
    /// Parse `content` (the file at `file_path`) into chunks.
    fn parse(&self, file_path: &str, content: &str) -> Result<(Vec<Chunk>, Vec<ParseWarning>)>;
}
