use chrono::Utc;
use mcb_domain::entities::{Chunk, ChunkKind, EvalOptions};
use mcb_domain::value_objects::Language;

fn sample_chunk(qualified_name: &str, line_start: u32) -> Chunk {
    Chunk {
        id: Chunk::deterministic_id(
            "demo",
            "Book.java",
            ChunkKind::Method,
            qualified_name,
            line_start,
        ),
        collection: "demo".to_string(),
        file_path: "Book.java".to_string(),
        language: Language::Java,
        kind: ChunkKind::Method,
        qualified_name: qualified_name.to_string(),
        content: "void foo() {}".to_string(),
        line_start,
        line_end: line_start + 2,
        parents: vec!["com.x.Book".to_string()],
        keywords: vec!["foo".to_string()],
        imports: vec![],
        indexed_at: Utc::now(),
    }
}

#[test]
fn chunk_ids_are_deterministic_across_reparse() {
    let a = sample_chunk("com.x.Book.foo", 10);
    let b = sample_chunk("com.x.Book.foo", 10);
    assert_eq!(a.id, b.id);
}

#[test]
fn chunk_id_changes_with_line_start_collision_suffix() {
    let a = sample_chunk("com.x.Book.foo", 10);
    let b = sample_chunk("com.x.Book.foo#20", 20);
    assert_ne!(a.id, b.id);
}

#[test]
fn eval_options_defaults_match_spec() {
    let opts = EvalOptions::default();
    assert_eq!(opts.k_values, vec![1, 3, 5, 10]);
    assert_eq!(opts.concurrency, 4);
}
