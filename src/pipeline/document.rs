// Per-document matching pipeline: exact -> strong (+resolve) -> weak (+resolve).
//
// Each stage is a pure function that consumes the previous stage's value, so
// the weak tier can only ever see exact and strong results that were actually
// computed for the same document.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::exact;
use crate::matching::fuzzy::{self, Bands};
use crate::matching::models::{Document, MatchCandidate, TierMatches};
use crate::matching::redundancy::{self, Resolution};
use crate::matching::topic::CompiledTopic;

/// Output of the exact stage.
#[derive(Debug, Clone)]
pub struct ExactStage {
    pub exact: TierMatches,
}

/// Output of the strong stage, flags already applied.
#[derive(Debug, Clone)]
pub struct StrongStage {
    pub exact: TierMatches,
    pub strong: TierMatches,
    pub strong_resolution: Resolution,
}

/// Everything the three tiers found in one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMatches {
    pub work_id: String,
    pub sentence_count: usize,
    pub exact: TierMatches,
    pub strong: TierMatches,
    pub weak: TierMatches,
    /// Strong tier found nothing and there was no exact match either
    pub needs_broader_review: bool,
}

impl DocumentMatches {
    /// All raw candidates, exact tier first.
    pub fn candidates(&self) -> impl Iterator<Item = &MatchCandidate> {
        self.exact
            .candidates
            .iter()
            .chain(&self.strong.candidates)
            .chain(&self.weak.candidates)
    }

    pub fn candidate_count(&self) -> usize {
        self.exact.len() + self.strong.len() + self.weak.len()
    }

    pub fn flagged_count(&self) -> usize {
        self.candidates()
            .filter(|c| c.flag_for_secondary_review)
            .count()
    }
}

pub fn tag_exact(topic: &CompiledTopic, document: &Document) -> ExactStage {
    ExactStage {
        exact: exact::tag_exact(topic, document),
    }
}

pub fn tag_strong(
    topic: &CompiledTopic,
    document: &Document,
    bands: &Bands,
    stage: ExactStage,
) -> StrongStage {
    let mut strong = fuzzy::tag_fuzzy(topic, document, &bands.strong);
    let strong_resolution = redundancy::resolve_strong(&stage.exact, &strong);
    redundancy::apply_flags(&mut strong, &strong_resolution.flags);

    StrongStage {
        exact: stage.exact,
        strong,
        strong_resolution,
    }
}

pub fn tag_weak(
    topic: &CompiledTopic,
    document: &Document,
    bands: &Bands,
    stage: StrongStage,
) -> DocumentMatches {
    let mut weak = fuzzy::tag_fuzzy(topic, document, &bands.weak);
    let weak_resolution = redundancy::resolve_weak(&stage.exact, &stage.strong, &weak);
    redundancy::apply_flags(&mut weak, &weak_resolution.flags);

    DocumentMatches {
        work_id: document.work_id.clone(),
        sentence_count: document.sentences.len(),
        exact: stage.exact,
        strong: stage.strong,
        weak,
        needs_broader_review: stage.strong_resolution.needs_broader_review,
    }
}

/// Run all three tiers over one document.
///
/// A document with no sentences goes through the same stages. It yields no
/// candidates, so it carries the broader-review signal like any other
/// document where nothing was found.
pub fn process_document(
    topic: &CompiledTopic,
    document: &Document,
    bands: &Bands,
) -> DocumentMatches {
    let exact = tag_exact(topic, document);
    let strong = tag_strong(topic, document, bands, exact);
    let matches = tag_weak(topic, document, bands, strong);

    debug!(
        work_id = %matches.work_id,
        exact = matches.exact.len(),
        strong = matches.strong.len(),
        weak = matches.weak.len(),
        needs_broader_review = matches.needs_broader_review,
        "Document matched"
    );

    matches
}
