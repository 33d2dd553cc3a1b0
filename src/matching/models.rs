// Data models for match evidence.
//
// A MatchCandidate is one raw piece of evidence: a tag found in one sentence
// of one document by one tier. Tiers are ordered by strength so that the
// deduplicator can keep only the strongest evidence for a location.

use serde::{Deserialize, Serialize};

/// A segmented document: an identifier plus its sentences in original order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub work_id: String,
    pub sentences: Vec<String>,
}

impl Document {
    pub fn new(work_id: impl Into<String>, sentences: Vec<String>) -> Self {
        Self {
            work_id: work_id.into(),
            sentences,
        }
    }
}

/// Which matcher produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tagger {
    Exact,
    Fuzzy,
}

impl Tagger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tagger::Exact => "exact",
            Tagger::Fuzzy => "fuzzy",
        }
    }
}

impl std::fmt::Display for Tagger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strength tier of a match. `Mixed` only appears on synthetic control sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Exact,
    Strong,
    Weak,
    Mixed,
}

impl Strength {
    /// Tiers in rank order, strongest first.
    pub const ALL: [Strength; 4] = [
        Strength::Exact,
        Strength::Strong,
        Strength::Weak,
        Strength::Mixed,
    ];

    /// Numeric rank: lower is stronger evidence.
    pub fn rank(&self) -> u8 {
        match self {
            Strength::Exact => 1,
            Strength::Strong => 2,
            Strength::Weak => 3,
            Strength::Mixed => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strength::Exact => "exact",
            Strength::Strong => "strong",
            Strength::Weak => "weak",
            Strength::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One raw piece of match evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub work_id: String,
    /// 1-based index of the sentence in the original document
    pub section_id: usize,
    /// The matched text (exact tier) or the surface form that matched (fuzzy tiers)
    pub tag: String,
    /// Reserved for a confidence value; always `None` for rule-based matches
    pub score: Option<f64>,
    /// The full original-case sentence containing the match
    pub snippet: String,
    pub tagger: Tagger,
    pub strength: Strength,
    pub flag_for_secondary_review: bool,
}

impl MatchCandidate {
    /// The (work_id, section_id, tag) key identifying a mention location.
    pub fn dedup_key(&self) -> (&str, usize, &str) {
        (&self.work_id, self.section_id, &self.tag)
    }
}

/// All candidates one tier found in one document, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierMatches {
    pub candidates: Vec<MatchCandidate>,
}

impl TierMatches {
    pub fn new(candidates: Vec<MatchCandidate>) -> Self {
        Self { candidates }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Sentence positions of each candidate, aligned with `tags()`.
    pub fn section_ids(&self) -> Vec<usize> {
        self.candidates.iter().map(|c| c.section_id).collect()
    }

    pub fn tags(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.tag.as_str()).collect()
    }
}
