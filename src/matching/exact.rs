// Exact tier: verbatim matches of the topic regex in each sentence.

use super::models::{Document, MatchCandidate, Strength, Tagger, TierMatches};
use super::topic::CompiledTopic;

/// Find every non-overlapping match of the topic in every sentence.
///
/// Each match becomes one candidate; a sentence with two matches yields two
/// candidates sharing a `section_id`. Sentences without a match contribute
/// nothing.
pub fn tag_exact(topic: &CompiledTopic, document: &Document) -> TierMatches {
    let mut candidates = Vec::new();

    for (index, sentence) in document.sentences.iter().enumerate() {
        for m in topic.regex.find_iter(sentence) {
            // Zero-width hits only come from degenerate user patterns
            if m.as_str().is_empty() {
                continue;
            }
            candidates.push(MatchCandidate {
                work_id: document.work_id.clone(),
                section_id: index + 1,
                tag: m.as_str().to_string(),
                score: None,
                snippet: sentence.clone(),
                tagger: Tagger::Exact,
                strength: Strength::Exact,
                flag_for_secondary_review: false,
            });
        }
    }

    TierMatches::new(candidates)
}
