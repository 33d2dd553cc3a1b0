// Append-only accumulation of per-document results.
//
// The caller owns a MatchCollector and hands each finished document to it.
// Nothing corpus-wide (dedup, stats) happens until `finish`, which sees every
// document at once.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::document::DocumentMatches;
use crate::matching::models::MatchCandidate;
use crate::mentions::dedup::{self, CanonicalMention};
use crate::mentions::stats::{self, DocumentCounts, MatchStats};

/// How a single document fared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    Matched { candidates: usize },
    NoMatches,
    Empty,
    Failed { reason: String },
}

/// One line of per-document bookkeeping in the run result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub work_id: String,
    pub sentence_count: usize,
    pub outcome: DocumentOutcome,
    /// Document-level signal for the secondary review stage
    pub needs_broader_review: bool,
}

/// The finished run: both tables plus bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusResult {
    pub documents: Vec<DocumentSummary>,
    /// Every candidate from every tier, before deduplication
    pub raw_matches: Vec<MatchCandidate>,
    /// One row per mention location at its strongest tier
    pub mentions: Vec<CanonicalMention>,
    pub stats: MatchStats,
}

impl CorpusResult {
    /// Work ids carrying the document-level broader-review signal.
    pub fn broader_review_documents(&self) -> Vec<&str> {
        self.documents
            .iter()
            .filter(|d| d.needs_broader_review)
            .map(|d| d.work_id.as_str())
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct MatchCollector {
    matched: Vec<DocumentMatches>,
    failures: Vec<(String, String)>,
}

impl MatchCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, matches: DocumentMatches) {
        self.matched.push(matches);
    }

    /// Record a document that could not be processed. It contributes no candidates.
    pub fn record_failure(&mut self, work_id: impl Into<String>, reason: impl Into<String>) {
        let work_id = work_id.into();
        let reason = reason.into();
        warn!(work_id = %work_id, error = %reason, "Document failed, skipping");
        self.failures.push((work_id, reason));
    }

    fn len(&self) -> usize {
        self.matched.len() + self.failures.len()
    }

    /// Build the raw and canonical tables and the statistics.
    ///
    /// Documents are ordered by work id first, so the result does not depend
    /// on the order in which documents were recorded.
    pub fn finish(mut self) -> CorpusResult {
        self.matched.sort_by(|a, b| a.work_id.cmp(&b.work_id));
        self.failures.sort();

        let raw_matches: Vec<MatchCandidate> = self
            .matched
            .iter()
            .flat_map(|m| m.candidates().cloned())
            .collect();
        let mentions = dedup::deduplicate(&raw_matches);

        let mut counts = DocumentCounts {
            failed: self.failures.len(),
            ..DocumentCounts::default()
        };
        let mut documents = Vec::with_capacity(self.len());

        for m in &self.matched {
            counts.processed += 1;
            counts.flagged_candidates += m.flagged_count();
            if m.needs_broader_review {
                counts.needing_broader_review += 1;
            }

            let outcome = if m.sentence_count == 0 {
                counts.empty += 1;
                DocumentOutcome::Empty
            } else if m.candidate_count() == 0 {
                counts.without_matches += 1;
                DocumentOutcome::NoMatches
            } else {
                counts.with_matches += 1;
                DocumentOutcome::Matched {
                    candidates: m.candidate_count(),
                }
            };

            documents.push(DocumentSummary {
                work_id: m.work_id.clone(),
                sentence_count: m.sentence_count,
                outcome,
                needs_broader_review: m.needs_broader_review,
            });
        }

        for (work_id, reason) in self.failures {
            documents.push(DocumentSummary {
                work_id,
                sentence_count: 0,
                outcome: DocumentOutcome::Failed { reason },
                needs_broader_review: false,
            });
        }
        documents.sort_by(|a, b| a.work_id.cmp(&b.work_id));

        let stats = MatchStats {
            levels: stats::compare_counts(&raw_matches, &mentions),
            documents: counts,
        };

        info!(
            documents = documents.len(),
            raw = raw_matches.len(),
            mentions = mentions.len(),
            failed = stats.documents.failed,
            "Corpus matching complete"
        );

        CorpusResult {
            documents,
            raw_matches,
            mentions,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::fuzzy::Bands;
    use crate::matching::models::Document;
    use crate::matching::topic::Topic;
    use crate::pipeline::document::process_document;

    #[test]
    fn test_order_independent() {
        let topic = Topic::SurfaceForms(vec!["ACS".to_string()]).compile().unwrap();
        let bands = Bands::default();
        let a = Document::new("A", vec!["ACS here.".to_string()]);
        let b = Document::new("B", vec!["ACS there.".to_string()]);

        let mut forward = MatchCollector::new();
        forward.record(process_document(&topic, &a, &bands));
        forward.record(process_document(&topic, &b, &bands));

        let mut backward = MatchCollector::new();
        backward.record(process_document(&topic, &b, &bands));
        backward.record(process_document(&topic, &a, &bands));

        assert_eq!(forward.finish(), backward.finish());
    }

    #[test]
    fn test_failures_are_counted_not_fatal() {
        let topic = Topic::SurfaceForms(vec!["ACS".to_string()]).compile().unwrap();
        let mut collector = MatchCollector::new();
        collector.record(process_document(
            &topic,
            &Document::new("A", vec!["ACS".to_string()]),
            &Bands::default(),
        ));
        collector.record_failure("B", "unreadable");

        let result = collector.finish();
        assert_eq!(result.stats.documents.failed, 1);
        assert_eq!(result.stats.documents.processed, 1);
        assert_eq!(result.documents.len(), 2);
        assert_eq!(
            result.documents[1].outcome,
            DocumentOutcome::Failed {
                reason: "unreadable".to_string()
            }
        );
        assert!(result.mentions.iter().all(|m| m.mention.work_id == "A"));
    }

    #[test]
    fn test_empty_and_unmatched_are_distinguished() {
        let topic = Topic::SurfaceForms(vec!["ACS".to_string()]).compile().unwrap();
        let bands = Bands::default();
        let mut collector = MatchCollector::new();
        collector.record(process_document(&topic, &Document::new("E", vec![]), &bands));
        collector.record(process_document(
            &topic,
            &Document::new("N", vec!["Unrelated prose only.".to_string()]),
            &bands,
        ));

        let result = collector.finish();
        assert_eq!(result.stats.documents.empty, 1);
        assert_eq!(result.stats.documents.without_matches, 1);
        assert_eq!(result.broader_review_documents(), vec!["E", "N"]);
        assert_eq!(result.stats.documents.needing_broader_review, 2);
    }
}
