// JSON run report.
//
// A plain serde_json dump of the run: both tables, the counts, per-document
// outcomes and the parameters used. The storage collaborator decides how to
// persist things for real; this file is for inspection and tuning.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::matching::fuzzy::Bands;
use crate::matching::topic::Topic;
use crate::pipeline::collector::CorpusResult;

#[derive(Serialize)]
struct Report<'a> {
    generated_at: String,
    topic: &'a Topic,
    bands: &'a Bands,
    #[serde(flatten)]
    result: &'a CorpusResult,
}

/// Serialize a run to pretty JSON.
pub fn render_report(result: &CorpusResult, topic: &Topic, bands: &Bands) -> Result<String> {
    let report = Report {
        generated_at: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        topic,
        bands,
        result,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Write the run report to `output_path`, creating parent directories.
/// Returns the path written, for display.
pub fn write_report(
    result: &CorpusResult,
    topic: &Topic,
    bands: &Bands,
    output_path: &Path,
) -> Result<String> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let json = render_report(result, topic, bands)?;
    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    Ok(output_path.display().to_string())
}
