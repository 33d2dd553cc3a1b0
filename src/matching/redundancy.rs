// Cross-tier redundancy detection.
//
// A fuzzy match whose tag extends a stronger match found in the same document
// (exact "Census Data" vs. strong "1-year Census Data") is not independent
// evidence. It might be the more specific mention, or partial-ratio scoring may
// have inflated it. Either way it is routed to secondary review instead of
// being trusted or dropped.
//
// The control set for a tier holds everything found by the stronger tiers:
//   strong tier -> exact matches
//   weak tier   -> exact + strong matches (a "mixed" aggregate when both exist)

use serde::{Deserialize, Serialize};

use super::models::{MatchCandidate, Strength, TierMatches};

/// Stronger-tier evidence that a weaker tier is compared against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSet {
    pub strength: Strength,
    pub tags: Vec<String>,
    pub section_ids: Vec<usize>,
    pub snippets: Vec<String>,
}

impl ControlSet {
    fn from_tier(strength: Strength, tier: &TierMatches) -> Self {
        Self {
            strength,
            tags: tier.candidates.iter().map(|c| c.tag.clone()).collect(),
            section_ids: tier.section_ids(),
            snippets: tier.candidates.iter().map(|c| c.snippet.clone()).collect(),
        }
    }

    /// Concatenate two control sets into a synthetic `mixed` aggregate.
    fn merged(first: ControlSet, second: ControlSet) -> Self {
        Self {
            strength: Strength::Mixed,
            tags: first.tags.into_iter().chain(second.tags).collect(),
            section_ids: first.section_ids.into_iter().chain(second.section_ids).collect(),
            snippets: first.snippets.into_iter().chain(second.snippets).collect(),
        }
    }
}

/// Control set for the strong tier: the document's exact matches, if any.
pub fn control_for_strong(exact: &TierMatches) -> Option<ControlSet> {
    if exact.is_empty() {
        None
    } else {
        Some(ControlSet::from_tier(Strength::Exact, exact))
    }
}

/// Control set for the weak tier: exact and strong matches combined.
pub fn control_for_weak(exact: &TierMatches, strong: &TierMatches) -> Option<ControlSet> {
    match (exact.is_empty(), strong.is_empty()) {
        (true, true) => None,
        (false, true) => Some(ControlSet::from_tier(Strength::Exact, exact)),
        (true, false) => Some(ControlSet::from_tier(Strength::Strong, strong)),
        (false, false) => Some(ControlSet::merged(
            ControlSet::from_tier(Strength::Exact, exact),
            ControlSet::from_tier(Strength::Strong, strong),
        )),
    }
}

/// Flag each candidate whose tag contains any control tag (case-sensitive).
///
/// Returns one flag per candidate, in candidate order.
pub fn flag_redundant(control: Option<&ControlSet>, candidates: &[MatchCandidate]) -> Vec<bool> {
    let mut flags = vec![false; candidates.len()];

    let Some(control) = control else {
        return flags;
    };

    for control_tag in &control.tags {
        for (flag, candidate) in flags.iter_mut().zip(candidates) {
            if candidate.tag.contains(control_tag.as_str()) {
                *flag = true;
            }
        }
    }

    flags
}

/// Outcome of resolving one fuzzy tier against its control set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// One flag per candidate of the resolved tier
    pub flags: Vec<bool>,
    /// Document-level signal: nothing concrete was found at the strong tier
    /// or above, so the document as a whole needs broader review
    pub needs_broader_review: bool,
}

/// Resolve the strong tier against the exact tier.
pub fn resolve_strong(exact: &TierMatches, strong: &TierMatches) -> Resolution {
    let control = control_for_strong(exact);
    let flags = flag_redundant(control.as_ref(), &strong.candidates);

    Resolution {
        flags,
        needs_broader_review: strong.is_empty() && exact.is_empty(),
    }
}

/// Resolve the weak tier. Weak matches are never trusted on their own, so
/// every weak candidate ends up flagged regardless of overlap.
pub fn resolve_weak(exact: &TierMatches, strong: &TierMatches, weak: &TierMatches) -> Resolution {
    let control = control_for_weak(exact, strong);
    let mut flags = flag_redundant(control.as_ref(), &weak.candidates);

    if !weak.is_empty() {
        flags.iter_mut().for_each(|f| *f = true);
    }

    Resolution {
        flags,
        needs_broader_review: false,
    }
}

/// Write a resolution's flags back onto the tier's candidates.
pub fn apply_flags(tier: &mut TierMatches, flags: &[bool]) {
    for (candidate, &flag) in tier.candidates.iter_mut().zip(flags) {
        candidate.flag_for_secondary_review = flag;
    }
}
