// Raw vs. deduplicated match counts, per tier.
//
// A tier that loses most of its raw rows to deduplication is mostly finding
// locations a stronger tier already found, which suggests its thresholds are
// too permissive. This is the tuning signal for the fuzzy bands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::dedup::CanonicalMention;
use crate::matching::models::{MatchCandidate, Strength};

/// Which slice of the table a count row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    All,
    #[serde(untagged)]
    Tier(Strength),
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::All => write!(f, "all"),
            Level::Tier(strength) => write!(f, "{strength}"),
        }
    }
}

/// One row of the count comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelCount {
    pub level: Level,
    pub raw: usize,
    pub deduplicated: usize,
    /// `(1 - deduplicated / raw) * 100`, or `None` when there were no raw rows
    pub percentage_lost: Option<f64>,
}

impl LevelCount {
    fn new(level: Level, raw: usize, deduplicated: usize) -> Self {
        let percentage_lost = if raw == 0 {
            None
        } else {
            Some((1.0 - deduplicated as f64 / raw as f64) * 100.0)
        };
        Self {
            level,
            raw,
            deduplicated,
            percentage_lost,
        }
    }
}

fn count_by_strength(strengths: impl Iterator<Item = Strength>) -> BTreeMap<Strength, usize> {
    let mut counts = BTreeMap::new();
    for strength in strengths {
        *counts.entry(strength).or_insert(0) += 1;
    }
    counts
}

/// Compare the raw table with the canonical one.
///
/// The first row is always `all`; one row follows for each tier present in
/// the raw table, strongest first.
pub fn compare_counts(raw: &[MatchCandidate], deduplicated: &[CanonicalMention]) -> Vec<LevelCount> {
    let raw_counts = count_by_strength(raw.iter().map(|r| r.strength));
    let dedup_counts = count_by_strength(deduplicated.iter().map(|m| m.mention.strength));

    let mut rows = vec![LevelCount::new(Level::All, raw.len(), deduplicated.len())];
    for strength in Strength::ALL {
        if let Some(&raw_count) = raw_counts.get(&strength) {
            let dedup_count = dedup_counts.get(&strength).copied().unwrap_or(0);
            rows.push(LevelCount::new(Level::Tier(strength), raw_count, dedup_count));
        }
    }
    rows
}

/// Per-document bookkeeping for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCounts {
    /// Documents successfully matched (including empty ones)
    pub processed: usize,
    /// Documents with at least one raw candidate
    pub with_matches: usize,
    /// Documents with sentences but no candidates at any tier
    pub without_matches: usize,
    /// Documents with zero sentences
    pub empty: usize,
    /// Documents that could not be loaded or processed
    pub failed: usize,
    /// Documents carrying the document-level broader-review signal
    pub needing_broader_review: usize,
    /// Raw candidates flagged for secondary review
    pub flagged_candidates: usize,
}

/// Everything the stats reporter produces for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub levels: Vec<LevelCount>,
    pub documents: DocumentCounts,
}
