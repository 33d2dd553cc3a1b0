// mention-tagger: rule-based topic mention detection over segmented documents
//
// This is the library root. Matching runs in three tiers (exact, strong
// fuzzy, weak fuzzy) per document; the corpus-wide tables are deduplicated
// and summarised once every document has been matched.

pub mod config;
pub mod error;
pub mod loader;
pub mod matching;
pub mod mentions;
pub mod output;
pub mod pipeline;
