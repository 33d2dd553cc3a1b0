// Corpus runner: load and match every document, then build the tables.
//
// Documents are independent, so they are matched in parallel: each one is
// loaded and matched on the blocking pool, and results are drained into the
// collector sequentially. A document that fails to load is recorded and
// skipped; it never aborts the run.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use super::collector::{CorpusResult, MatchCollector};
use super::document::{process_document, DocumentMatches};
use crate::loader;
use crate::matching::fuzzy::Bands;
use crate::matching::models::Document;
use crate::matching::topic::CompiledTopic;

/// Match a set of in-memory documents, one after another.
pub fn match_documents(
    documents: &[Document],
    topic: &CompiledTopic,
    bands: &Bands,
) -> CorpusResult {
    let mut collector = MatchCollector::new();
    for document in documents {
        collector.record(process_document(topic, document, bands));
    }
    collector.finish()
}

/// Load and match every document file, `concurrency` documents at a time.
pub async fn run(
    paths: Vec<PathBuf>,
    topic: Arc<CompiledTopic>,
    bands: Bands,
    concurrency: usize,
) -> Result<CorpusResult> {
    info!(
        documents = paths.len(),
        concurrency,
        "Identifying mentions"
    );

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Matching [{bar:30}] {pos}/{len} documents ({eta})")?,
    );

    let results: Vec<(String, Result<DocumentMatches>)> =
        stream::iter(paths.into_iter().map(move |path| {
            let topic = Arc::clone(&topic);
            async move {
                let work_id = loader::work_id_for(&path);
                let joined = tokio::task::spawn_blocking(move || -> Result<DocumentMatches> {
                    let document = loader::read_document(&path)?;
                    Ok(process_document(&topic, &document, &bands))
                })
                .await;
                let result = match joined {
                    Ok(result) => result,
                    Err(e) => Err(anyhow::anyhow!("matching task failed: {e}")),
                };
                (work_id, result)
            }
        }))
        .buffer_unordered(concurrency.max(1))
        .inspect(|_| pb.inc(1))
        .collect()
        .await;
    pb.finish_and_clear();

    // Drain into the collector sequentially
    let mut collector = MatchCollector::new();
    for (work_id, result) in results {
        match result {
            Ok(matches) => collector.record(matches),
            Err(e) => collector.record_failure(work_id, format!("{e:#}")),
        }
    }

    Ok(collector.finish())
}
