//! Fallback parser for any file that isn't first-class Java.
//!
//! An indentation + identifier-regex heuristic splitter for non-Java
//! source: no AST, no imports, one `function`-kind chunk per recognized
//! top-level definition, falling back to a single whole-file chunk when
//! nothing is recognized at all.

use chrono::Utc;
use regex::Regex;
use std::sync::OnceLock;

use mcb_domain::entities::{Chunk, ChunkKind, ParseWarning};
use mcb_domain::value_objects::Language;

/// Matches a plausible top-level function/class/method header: an
/// identifier at the start of a non-indented (or lightly indented) line,
/// followed eventually by `(` or `:` or `{`.
fn definition_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]{0,4}(?:export\s+|public\s+|private\s+|async\s+|def\s+|function\s+|class\s+|fn\s+)*([A-Za-z_][A-Za-z0-9_]*)\s*[:(]").unwrap()
    })
}

fn file_stem(file_path: &str) -> String {
    std::path::Path::new(file_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_path)
        .to_string()
}

/// Split `content` into function/class-shaped units by indentation and
/// identifier regex. Returns one chunk per recognized definition; if none
/// are recognized, the whole file becomes a single `File`-kind chunk.
pub fn parse_fallback(
    file_path: &str,
    content: &str,
    language: Language,
) -> (Vec<Chunk>, Vec<ParseWarning>) {
    let stem = file_stem(file_path);
    let lines: Vec<&str> = content.lines().collect();
    let re = definition_pattern();

    let mut starts: Vec<(usize, String)> = Vec::new();
    for caps in re.captures_iter(content) {
        let whole_match = caps.get(0).unwrap();
        let name = caps.get(1).unwrap().as_str().to_string();
        let line_idx = content[..whole_match.start()].matches('\n').count();
        starts.push((line_idx, name));
    }

    if starts.is_empty() {
        if content.trim().is_empty() {
            return (Vec::new(), Vec::new());
        }
        let chunk = whole_file_chunk(file_path, content, &stem, language, lines.len());
        return (vec![chunk], Vec::new());
    }

    let mut chunks = Vec::with_capacity(starts.len());
    for (i, (line_idx, name)) in starts.iter().enumerate() {
        let end_idx = starts
            .get(i + 1)
            .map(|(next, _)| next.saturating_sub(1))
            .unwrap_or(lines.len().saturating_sub(1));
        let end_idx = end_idx.max(*line_idx);

        let slice = lines[*line_idx..=end_idx].join("\n");
        let qualified_name = format!("{stem}.{name}");
        let line_start = (*line_idx + 1) as u32;
        let line_end = (end_idx + 1) as u32;

        chunks.push(Chunk {
            id: Chunk::deterministic_id(
                "",
                file_path,
                ChunkKind::Function,
                &qualified_name,
                line_start,
            ),
            collection: String::new(),
            file_path: file_path.to_string(),
            language,
            kind: ChunkKind::Function,
            qualified_name,
            content: slice,
            line_start,
            line_end,
            parents: Vec::new(),
            keywords: vec![name.clone()],
            imports: Vec::new(),
            indexed_at: Utc::now(),
        });
    }

    (chunks, Vec::new())
}

fn whole_file_chunk(
    file_path: &str,
    content: &str,
    stem: &str,
    language: Language,
    line_count: usize,
) -> Chunk {
    Chunk {
        id: Chunk::deterministic_id("", file_path, ChunkKind::File, stem, 1),
        collection: String::new(),
        file_path: file_path.to_string(),
        language,
        kind: ChunkKind::File,
        qualified_name: stem.to_string(),
        content: content.to_string(),
        line_start: 1,
        line_end: line_count.max(1) as u32,
        parents: Vec::new(),
        keywords: Vec::new(),
        imports: Vec::new(),
        indexed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_python_style_definitions() {
        let content = "def foo():\n    return 1\n\ndef bar():\n    return 2\n";
        let (chunks, warnings) = parse_fallback("mod.py", content, Language::Python);
        assert!(warnings.is_empty());
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].qualified_name, "mod.foo");
        assert_eq!(chunks[1].qualified_name, "mod.bar");
        assert!(chunks.iter().all(|c| c.imports.is_empty()));
    }

    #[test]
    fn falls_back_to_whole_file_when_nothing_recognized() {
        let content = "   \n  some data  \n  42\n";
        let (chunks, _) = parse_fallback("data.txt", content, Language::Other);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].kind, ChunkKind::File);
        assert_eq!(chunks[0].qualified_name, "data");
    }

    #[test]
    fn empty_file_yields_no_chunks() {
        let (chunks, warnings) = parse_fallback("empty.py", "", Language::Python);
        assert!(chunks.is_empty());
        assert!(warnings.is_empty());
    }
}
