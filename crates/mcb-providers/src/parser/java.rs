//! Java AST parser built on a tree-sitter grammar walk.
//!
//! Emits one `class`-kind chunk per top-level and nested type (header,
//! field declarations, stripped method signatures — a summary, not a
//! duplicate of the method bodies) and one `method`-kind chunk per
//! method/constructor/initializer (full source slice). `imports` are
//! collected once from the compilation unit and attached to every chunk
//! produced from this file.

use chrono::Utc;
use tree_sitter::{Node, Parser as TsParser};

use mcb_domain::entities::{Chunk, ChunkKind, ParseWarning};
use mcb_domain::error::{Error, Result};
use mcb_domain::value_objects::Language;

use crate::constants::{
    TS_NODE_CLASS_DECLARATION, TS_NODE_CONSTRUCTOR_DECLARATION, TS_NODE_ENUM_DECLARATION,
    TS_NODE_IMPORT_DECLARATION, TS_NODE_INTERFACE_DECLARATION, TS_NODE_METHOD_DECLARATION,
    TS_NODE_RECORD_DECLARATION, TS_NODE_STATIC_INITIALIZER,
};

const TYPE_DECLARATION_KINDS: &[&str] = &[
    TS_NODE_CLASS_DECLARATION,
    TS_NODE_INTERFACE_DECLARATION,
    TS_NODE_ENUM_DECLARATION,
    TS_NODE_RECORD_DECLARATION,
];

const MEMBER_DECLARATION_KINDS: &[&str] = &[
    TS_NODE_METHOD_DECLARATION,
    TS_NODE_CONSTRUCTOR_DECLARATION,
    TS_NODE_STATIC_INITIALIZER,
];

/// Parse Java source into chunks via a tree-sitter AST walk.
pub fn parse_java(file_path: &str, content: &str) -> Result<(Vec<Chunk>, Vec<ParseWarning>)> {
    let mut parser = TsParser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .map_err(|e| Error::parse_error(file_path, format!("failed to load Java grammar: {e}")))?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| Error::parse_error(file_path, "tree-sitter produced no parse tree"))?;

    let root = tree.root_node();
    let source = content.as_bytes();
    let imports = collect_imports(root, source);
    let mut warnings = Vec::new();
    if root.has_error() {
        warnings.push(ParseWarning {
            file_path: file_path.to_string(),
            message: "parse tree contains syntax errors; chunks are best-effort".to_string(),
        });
    }

    let mut chunks = Vec::new();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if TYPE_DECLARATION_KINDS.contains(&child.kind()) {
            walk_type(child, source, file_path, &imports, &[], &mut chunks);
        }
    }

    if chunks.is_empty() {
        if root.has_error() {
            return Err(Error::parse_error(file_path, "no recoverable structure found"));
        }
        warnings.push(ParseWarning {
            file_path: file_path.to_string(),
            message: "no top-level type declarations found".to_string(),
        });
    }

    Ok((chunks, warnings))
}

fn collect_imports(root: Node, source: &[u8]) -> Vec<String> {
    let mut imports = Vec::new();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() == TS_NODE_IMPORT_DECLARATION {
            if let Ok(text) = child.utf8_text(source) {
                let cleaned = text
                    .trim_start_matches("import")
                    .trim_start()
                    .trim_start_matches("static")
                    .trim()
                    .trim_end_matches(';')
                    .trim()
                    .to_string();
                if !cleaned.is_empty() {
                    imports.push(cleaned);
                }
            }
        }
    }
    imports
}

fn node_text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

fn type_name(node: Node, source: &[u8]) -> String {
    node.child_by_field_name("name")
        .map(|n| node_text(n, source).to_string())
        .unwrap_or_else(|| "Anonymous".to_string())
}

/// Recursively emits a `class`-kind chunk for `node`, a `method`-kind chunk
/// for each of its members, and recurses into nested type declarations.
fn walk_type(
    node: Node,
    source: &[u8],
    file_path: &str,
    imports: &[String],
    parents: &[String],
    chunks: &mut Vec<Chunk>,
) {
    let name = type_name(node, source);
    let qualified_name = if parents.is_empty() {
        name.clone()
    } else {
        format!("{}.{}", parents.join("."), name)
    };

    let body = node.child_by_field_name("body");
    let (summary, nested_types, members) = build_class_summary(node, body, source);

    let line_start = (node.start_position().row + 1) as u32;
    let line_end = (node.end_position().row + 1) as u32;

    chunks.push(Chunk {
        id: Chunk::deterministic_id("", file_path, ChunkKind::Class, &qualified_name, line_start),
        collection: String::new(),
        file_path: file_path.to_string(),
        language: Language::Java,
        kind: ChunkKind::Class,
        qualified_name: qualified_name.clone(),
        content: summary,
        line_start,
        line_end,
        parents: parents.to_vec(),
        keywords: vec![name],
        imports: imports.to_vec(),
        indexed_at: Utc::now(),
    });

    let mut child_parents = parents.to_vec();
    child_parents.push(qualified_name.clone());

    for member in &members {
        let member_line_start = (member.start_position().row + 1) as u32;
        let member_line_end = (member.end_position().row + 1) as u32;
        let method_name = member
            .child_by_field_name("name")
            .map(|n| node_text(n, source).to_string())
            .unwrap_or_else(|| "<init>".to_string());
        let method_qualified_name = format!("{qualified_name}.{method_name}");

        chunks.push(Chunk {
            id: Chunk::deterministic_id(
                "",
                file_path,
                ChunkKind::Method,
                &method_qualified_name,
                member_line_start,
            ),
            collection: String::new(),
            file_path: file_path.to_string(),
            language: Language::Java,
            kind: ChunkKind::Method,
            qualified_name: method_qualified_name,
            content: node_text(*member, source).to_string(),
            line_start: member_line_start,
            line_end: member_line_end,
            parents: child_parents.clone(),
            keywords: vec![method_name],
            imports: imports.to_vec(),
            indexed_at: Utc::now(),
        });
    }

    for nested in nested_types {
        walk_type(nested, source, file_path, imports, &child_parents, chunks);
    }
}

/// Builds the class-summary content (header, field declarations, stripped
/// method signatures), plus the nested type and member nodes to recurse
/// into separately.
fn build_class_summary<'a>(
    type_node: Node<'a>,
    body: Option<Node<'a>>,
    source: &[u8],
) -> (String, Vec<Node<'a>>, Vec<Node<'a>>) {
    let header_end = body.map(|b| b.start_byte()).unwrap_or(type_node.end_byte());
    let header = String::from_utf8_lossy(&source[type_node.start_byte()..header_end]).to_string();

    let mut nested_types = Vec::new();
    let mut members = Vec::new();
    let mut field_lines = Vec::new();
    let mut method_signatures = Vec::new();

    if let Some(body) = body {
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            let kind = child.kind();
            if TYPE_DECLARATION_KINDS.contains(&kind) {
                nested_types.push(child);
            } else if MEMBER_DECLARATION_KINDS.contains(&kind) {
                if kind != TS_NODE_STATIC_INITIALIZER {
                    method_signatures.push(signature_of(child, source));
                }
                members.push(child);
            } else if kind == "field_declaration" {
                field_lines.push(node_text(child, source).trim().to_string());
            }
        }
    }

    let mut summary = String::new();
    summary.push_str(header.trim());
    summary.push_str(" { ... }\n");
    for field in field_lines {
        summary.push_str(&field);
        summary.push('\n');
    }
    for sig in method_signatures {
        summary.push_str(&sig);
        summary.push_str(";\n");
    }

    (summary, nested_types, members)
}

/// Everything up to the method/constructor body block, i.e. just the
/// signature (and any preceding Javadoc/annotations the node covers).
fn signature_of(member: Node, source: &[u8]) -> String {
    let end = member
        .child_by_field_name("body")
        .map(|b| b.start_byte())
        .unwrap_or(member.end_byte());
    String::from_utf8_lossy(&source[member.start_byte()..end])
        .trim()
        .to_string()
}
