//! Benchmarks the BM25 index's add/search path under a moderate corpus
//! size, benching the scorer directly rather than through the full
//! retrieval stack.

use chrono::Utc;
use criterion::{Criterion, criterion_group, criterion_main};
use tokio::runtime::Runtime;

use mcb_domain::entities::{Chunk, ChunkKind};
use mcb_domain::ports::LexicalIndex;
use mcb_domain::value_objects::Language;
use mcb_providers::bm25::Bm25Index;

fn sample_chunk(i: usize) -> Chunk {
    Chunk {
        id: format!("chunk-{i}"),
        collection: "bench".to_string(),
        file_path: format!("src/File{i}.java"),
        language: Language::Java,
        kind: ChunkKind::Method,
        qualified_name: format!("com.example.File{i}.method{i}"),
        content: format!(
            "public void method{i}() {{ processRequest(connection, buffer, timeout); }}"
        ),
        line_start: 1,
        line_end: 3,
        parents: vec![format!("com.example.File{i}")],
        keywords: vec!["processRequest".to_string()],
        imports: vec!["java.net.Socket".to_string()],
        indexed_at: Utc::now(),
    }
}

fn bench_add_and_search(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let chunks: Vec<Chunk> = (0..2000).map(sample_chunk).collect();

    c.bench_function("bm25_add_batch_2000_docs", |b| {
        b.iter(|| {
            rt.block_on(async {
                let index = Bm25Index::new();
                index.add_batch("bench", &chunks).await.unwrap();
            })
        })
    });

    let index = rt.block_on(async {
        let index = Bm25Index::new();
        index.add_batch("bench", &chunks).await.unwrap();
        index
    });

    c.bench_function("bm25_search_2000_docs", |b| {
        b.iter(|| {
            rt.block_on(async {
                index
                    .search("bench", &["processRequest".to_string()], 10)
                    .await
                    .unwrap()
            })
        })
    });
}

criterion_group!(benches, bench_add_and_search);
criterion_main!(benches);
