// Segmented document loading.
//
// The segmentation step upstream writes one text file per work, one sentence
// per line. The file stem is the work id. Lines are trimmed but blank lines
// are kept, so a sentence's position always matches its line number.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{TaggerError, TaggerResult};
use crate::matching::models::Document;

/// List the document files in `dir`, sorted by path. Hidden files are skipped.
pub fn list_documents(dir: &Path) -> TaggerResult<Vec<PathBuf>> {
    let read_err = |source| TaggerError::DocumentRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if path.is_file() && !hidden {
            paths.push(path);
        }
    }
    paths.sort();

    info!(dir = %dir.display(), documents = paths.len(), "Listed segmented documents");
    Ok(paths)
}

/// Parse segmented text into sentences.
pub fn parse_sentences(text: &str) -> Vec<String> {
    text.lines().map(|line| line.trim().to_string()).collect()
}

/// Work id for a document file: its file stem.
pub fn work_id_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read one segmented document from disk.
pub fn read_document(path: &Path) -> TaggerResult<Document> {
    let text = std::fs::read_to_string(path).map_err(|source| TaggerError::DocumentRead {
        path: path.to_path_buf(),
        source,
    })?;

    let document = Document::new(work_id_for(path), parse_sentences(&text));
    debug!(
        work_id = %document.work_id,
        sentences = document.sentences.len(),
        "Loaded document"
    );
    Ok(document)
}
