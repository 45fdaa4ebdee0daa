//! Source parser (C1): dispatches on detected language, then applies the
//! qualified-name canonicalization, overload-disambiguation, and
//! oversize-chunk splitting rules uniformly regardless of which concrete
//! parser produced the chunks.

mod fallback;
mod java;

use std::collections::HashMap;
use std::path::Path;

use mcb_domain::constants::CHUNK_MAX_CHARS;
use mcb_domain::entities::{Chunk, ChunkKind, ParseWarning};
use mcb_domain::error::Result;
use mcb_domain::ports::ChunkParser;
use mcb_domain::value_objects::Language;

/// Language-dispatching chunk parser: tree-sitter for Java, a regex/
/// indentation fallback for everything else.
#[derive(Debug, Default)]
pub struct Parser;

impl Parser {
    /// Construct a new parser facade.
    pub fn new() -> Self {
        Self
    }
}

impl ChunkParser for Parser {
    fn parse(&self, file_path: &str, content: &str) -> Result<(Vec<Chunk>, Vec<ParseWarning>)> {
        let extension = Path::new(file_path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        let language = Language::from_extension(extension);

        let (mut chunks, warnings) = if language == Language::Java {
            java::parse_java(file_path, content)?
        } else {
            fallback::parse_fallback(file_path, content, language)
        };

        canonicalize_qualified_names(&mut chunks);
        disambiguate_overloads(&mut chunks);
        let chunks = chunks.into_iter().flat_map(split_oversize).collect();

        Ok((chunks, warnings))
    }
}

fn canonicalize_qualified_names(chunks: &mut [Chunk]) {
    for chunk in chunks.iter_mut() {
        chunk.qualified_name = canonicalize(&chunk.qualified_name);
        for parent in chunk.parents.iter_mut() {
            *parent = canonicalize(parent);
        }
    }
}

fn canonicalize(name: &str) -> String {
    strip_generics(name).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strips generic type argument lists, e.g. `List<String>` -> `List`.
fn strip_generics(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut depth = 0u32;
    for c in name.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => result.push(c),
            _ => {}
        }
    }
    result
}

/// Overloads collide on `qualified_name` within a single parse; disambiguate
/// every colliding method chunk by appending its `line_start`.
fn disambiguate_overloads(chunks: &mut [Chunk]) {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for chunk in chunks.iter().filter(|c| c.kind == ChunkKind::Method) {
        *counts.entry(chunk.qualified_name.clone()).or_insert(0) += 1;
    }

    for chunk in chunks.iter_mut() {
        if chunk.kind != ChunkKind::Method {
            continue;
        }
        if *counts.get(&chunk.qualified_name).unwrap_or(&0) > 1 {
            chunk.qualified_name = format!("{}#{}", chunk.qualified_name, chunk.line_start);
        }
    }
}

/// Splits a chunk exceeding `CHUNK_MAX_CHARS` on blank-line boundaries into
/// `Block`-kind sub-chunks. Leaves the chunk untouched if it has no blank
/// lines to split on.
fn split_oversize(chunk: Chunk) -> Vec<Chunk> {
    if chunk.content.len() <= CHUNK_MAX_CHARS {
        return vec![chunk];
    }

    let blocks: Vec<&str> = chunk.content.split("\n\n").filter(|b| !b.is_empty()).collect();
    if blocks.len() <= 1 {
        return vec![chunk];
    }

    let mut parents = chunk.parents.clone();
    parents.push(chunk.qualified_name.clone());

    let mut line_cursor = chunk.line_start;
    blocks
        .into_iter()
        .enumerate()
        .map(|(i, block)| {
            let block_lines = block.lines().count().max(1) as u32;
            let line_start = line_cursor;
            let line_end = line_start + block_lines - 1;
            line_cursor = line_end + 2; // +1 for the stripped blank separator line

            let qualified_name = format!("{}~block{i}", chunk.qualified_name);
            Chunk {
                id: Chunk::deterministic_id(
                    "",
                    &chunk.file_path,
                    ChunkKind::Block,
                    &qualified_name,
                    line_start,
                ),
                collection: chunk.collection.clone(),
                file_path: chunk.file_path.clone(),
                language: chunk.language,
                kind: ChunkKind::Block,
                qualified_name,
                content: block.to_string(),
                line_start,
                line_end,
                parents: parents.clone(),
                keywords: chunk.keywords.clone(),
                imports: chunk.imports.clone(),
                indexed_at: chunk.indexed_at,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn base_chunk(content: &str) -> Chunk {
        Chunk {
            id: "placeholder".to_string(),
            collection: String::new(),
            file_path: "Big.java".to_string(),
            language: Language::Java,
            kind: ChunkKind::Class,
            qualified_name: "Big".to_string(),
            content: content.to_string(),
            line_start: 1,
            line_end: content.lines().count() as u32,
            parents: vec![],
            keywords: vec![],
            imports: vec![],
            indexed_at: Utc::now(),
        }
    }

    #[test]
    fn oversize_chunk_splits_on_blank_lines() {
        let block = "x".repeat(100);
        let content = std::iter::repeat(block).take(50).collect::<Vec<_>>().join("\n\n");
        assert!(content.len() > CHUNK_MAX_CHARS);

        let chunks = split_oversize(base_chunk(&content));
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.kind == ChunkKind::Block));
        assert!(chunks.iter().all(|c| c.parents.contains(&"Big".to_string())));
    }

    #[test]
    fn undersize_chunk_is_untouched() {
        let chunks = split_oversize(base_chunk("short"));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].kind, ChunkKind::Class);
    }

    #[test]
    fn strip_generics_removes_type_arguments() {
        assert_eq!(canonicalize("List<String>"), "List");
        assert_eq!(canonicalize("Map<String,  List<Integer>>"), "Map");
    }

    #[test]
    fn canonicalize_collapses_whitespace() {
        assert_eq!(canonicalize("com.example  .  Foo"), "com.example . Foo");
    }

    #[test]
    fn overload_collision_appends_line_start() {
        let mut chunks = vec![
            Chunk {
                kind: ChunkKind::Method,
                qualified_name: "Foo.bar".to_string(),
                line_start: 10,
                ..base_chunk("a")
            },
            Chunk {
                kind: ChunkKind::Method,
                qualified_name: "Foo.bar".to_string(),
                line_start: 20,
                ..base_chunk("b")
            },
        ];
        disambiguate_overloads(&mut chunks);
        assert_eq!(chunks[0].qualified_name, "Foo.bar#10");
        assert_eq!(chunks[1].qualified_name, "Foo.bar#20");
    }

    #[test]
    fn unique_method_name_is_left_alone() {
        let mut chunks = vec![Chunk {
            kind: ChunkKind::Method,
            qualified_name: "Foo.bar".to_string(),
            ..base_chunk("a")
        }];
        disambiguate_overloads(&mut chunks);
        assert_eq!(chunks[0].qualified_name, "Foo.bar");
    }
}
