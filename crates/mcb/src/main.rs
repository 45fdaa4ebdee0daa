//! Minimal example binary.
//!
//! Loads configuration, initializes logging, wires a [`mcb::Platform`], and
//! — when a directory is given as the first argument — indexes every `.java`
//! file under it and runs one sample hybrid search. With no argument it
//! just confirms configuration and logging came up cleanly.

use std::path::{Path, PathBuf};

use mcb::infrastructure::config::ConfigLoader;
use mcb::infrastructure::logging::init_logging;
use mcb::providers::Result;
use mcb::Platform;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::new().load()?;
    init_logging(config.logging.clone())?;

    let platform = Platform::from_config(&config)?;
    let collection = Platform::default_collection(&config).to_string();

    let Some(target_dir) = std::env::args().nth(1) else {
        info!("configuration and logging initialized; pass a directory of .java sources to index and search it");
        return Ok(());
    };

    let files = collect_java_files(Path::new(&target_dir))?;
    info!(count = files.len(), dir = %target_dir, "indexing files");

    for path in &files {
        let path_str = path.to_string_lossy().to_string();
        match platform
            .indexer
            .index_file(&collection, &path_str, Default::default())
            .await
        {
            Ok(outcome) => info!(?outcome, path = %path_str, "indexed"),
            Err(err) => tracing::error!(path = %path_str, error = %err, "failed to index"),
        }
    }

    let response = platform
        .retriever
        .search(
            &collection,
            "main entry point",
            5,
            &mcb::application::use_cases::retriever::SearchOptions::default(),
        )
        .await?;
    for hit in &response.hits {
        info!(
            rank = hit.rank,
            chunk_id = %hit.chunk_id,
            score = hit.score_fused,
            "hit"
        );
    }

    Ok(())
}

fn collect_java_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        let entries = std::fs::read_dir(&current)
            .map_err(|e| mcb::domain::error::Error::io_with_source(format!("reading {}", current.display()), e))?;
        for entry in entries {
            let entry = entry
                .map_err(|e| mcb::domain::error::Error::io_with_source("reading directory entry", e))?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().is_some_and(|ext| ext == "java") {
                files.push(path);
            }
        }
    }
    Ok(files)
}
