// Rank-based deduplication of raw match evidence.
//
// The same location (work, sentence, tag) is often found by several tiers:
// "Census Data" matches exactly, and partial ratio also scores it 100 for the
// strong tier. Only the strongest tier's rows survive for each location.
// Rows tied at the strongest rank are all kept; only strictly weaker ones go.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::matching::models::{MatchCandidate, Strength, Tagger};

/// Provenance label attached to every canonical row.
pub const RULE_BASED_MODEL: &str = "rule_based";

/// A surviving row of the canonical mention table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMention {
    #[serde(flatten)]
    pub mention: MatchCandidate,
    pub model: String,
}

type LocationKey<'a> = (&'a str, usize, &'a str);

/// Everything that makes two rows "fully identical".
type RowIdentity<'a> = (
    LocationKey<'a>,
    Option<u64>,
    &'a str,
    Tagger,
    Strength,
    bool,
);

fn row_identity(row: &MatchCandidate) -> RowIdentity<'_> {
    (
        row.dedup_key(),
        row.score.map(f64::to_bits),
        row.snippet.as_str(),
        row.tagger,
        row.strength,
        row.flag_for_secondary_review,
    )
}

/// Rows that could corrupt the canonical table: blank tag or a 0 section id.
fn is_valid(row: &MatchCandidate) -> bool {
    !row.tag.trim().is_empty() && row.section_id >= 1
}

/// Keep only the strongest-rank rows for each location, then drop exact duplicates.
///
/// Output preserves input order. Running it on its own output is a no-op.
pub fn collapse(rows: &[MatchCandidate]) -> Vec<MatchCandidate> {
    let valid: Vec<&MatchCandidate> = rows.iter().filter(|r| is_valid(r)).collect();
    if valid.len() < rows.len() {
        warn!(
            dropped = rows.len() - valid.len(),
            "Dropped invalid rows before deduplication"
        );
    }

    // Grouping index: location -> strongest rank seen there
    let mut min_rank: HashMap<LocationKey<'_>, u8> = HashMap::new();
    for &row in &valid {
        let rank = row.strength.rank();
        min_rank
            .entry(row.dedup_key())
            .and_modify(|r| *r = (*r).min(rank))
            .or_insert(rank);
    }

    let mut seen: HashSet<RowIdentity<'_>> = HashSet::new();
    let collapsed: Vec<MatchCandidate> = valid
        .into_iter()
        .filter(|&row| min_rank.get(&row.dedup_key()) == Some(&row.strength.rank()))
        .filter(|&row| seen.insert(row_identity(row)))
        .cloned()
        .collect();

    debug!(
        input = rows.len(),
        locations = min_rank.len(),
        output = collapsed.len(),
        "Collapsed match rows"
    );

    collapsed
}

/// Collapse raw rows into the canonical, provenance-tagged mention table.
pub fn deduplicate(rows: &[MatchCandidate]) -> Vec<CanonicalMention> {
    collapse(rows)
        .into_iter()
        .map(|mention| CanonicalMention {
            mention,
            model: RULE_BASED_MODEL.to_string(),
        })
        .collect()
}
