// Fuzzy tiers: partial-ratio similarity between sentences and surface forms.
//
// Partial ratio slides the shorter string across the longer one and keeps the
// best normalised Indel similarity of any alignment window:
//
//   ratio(a, b) = 200 * LCS(a, b) / (|a| + |b|)
//
// Windows include the prefixes and suffixes of the longer string that are
// shorter than the needle, so a surface form cut off at the start or end of a
// sentence still scores well. Scores live in [0, 100].

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::models::{Document, MatchCandidate, Strength, Tagger, TierMatches};
use super::topic::CompiledTopic;
use crate::error::{TaggerError, TaggerResult};

/// A half-open score band `(lower, upper]` mapped to a strength tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub strength: Strength,
    pub lower: f64,
    pub upper: f64,
}

impl Band {
    pub fn new(strength: Strength, lower: f64, upper: f64) -> TaggerResult<Self> {
        let invalid = |reason: &str| TaggerError::InvalidBand {
            name: strength.to_string(),
            lower,
            upper,
            reason: reason.to_string(),
        };

        if !matches!(strength, Strength::Strong | Strength::Weak) {
            return Err(invalid("only strong and weak tiers have score bands"));
        }
        if !lower.is_finite() || !upper.is_finite() {
            return Err(invalid("bounds must be finite numbers"));
        }
        if !(0.0..=100.0).contains(&lower) || !(0.0..=100.0).contains(&upper) {
            return Err(invalid("bounds must lie within 0-100"));
        }
        if lower >= upper {
            return Err(invalid("lower bound must be below upper bound"));
        }
        Ok(Self {
            strength,
            lower,
            upper,
        })
    }

    /// Low end exclusive, high end inclusive: 87.5 is weak, 100 is strong.
    pub fn contains(&self, score: f64) -> bool {
        score > self.lower && score <= self.upper
    }

    /// Two half-open bands share a score unless one ends where the other starts.
    fn overlaps(&self, other: &Band) -> bool {
        self.lower < other.upper && other.lower < self.upper
    }
}

/// The two fuzzy bands used for a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bands {
    pub strong: Band,
    pub weak: Band,
}

impl Default for Bands {
    fn default() -> Self {
        Self {
            strong: Band {
                strength: Strength::Strong,
                lower: 87.5,
                upper: 100.0,
            },
            weak: Band {
                strength: Strength::Weak,
                lower: 80.0,
                upper: 87.5,
            },
        }
    }
}

/// Where a score lands relative to the configured bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Band(Strength),
    Outside,
}

impl Bands {
    /// Validate both bands. They may touch but not overlap, so a score is
    /// never emitted at both fuzzy tiers.
    pub fn new(strong: (f64, f64), weak: (f64, f64)) -> TaggerResult<Self> {
        let strong = Band::new(Strength::Strong, strong.0, strong.1)?;
        let weak = Band::new(Strength::Weak, weak.0, weak.1)?;
        if strong.overlaps(&weak) {
            return Err(TaggerError::InvalidBand {
                name: weak.strength.to_string(),
                lower: weak.lower,
                upper: weak.upper,
                reason: format!("overlaps the strong band ({}, {}]", strong.lower, strong.upper),
            });
        }
        Ok(Self { strong, weak })
    }

    pub fn classify(&self, score: f64) -> Partition {
        if self.strong.contains(score) {
            Partition::Band(Strength::Strong)
        } else if self.weak.contains(score) {
            Partition::Band(Strength::Weak)
        } else {
            Partition::Outside
        }
    }
}

/// Partial-ratio similarity of two strings, or `None` when either is empty.
pub fn partial_ratio(a: &str, b: &str) -> Option<f64> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() || b.is_empty() {
        return None;
    }

    let (needle, haystack) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let mut best = best_window_ratio(needle, haystack);

    // Equal lengths: the alignment is ambiguous, so try both directions
    if needle.len() == haystack.len() && best < 100.0 {
        best = best.max(best_window_ratio(haystack, needle));
    }

    Some(best)
}

fn best_window_ratio(needle: &[char], haystack: &[char]) -> f64 {
    let m = needle.len();
    let n = haystack.len();
    let mut best = 0.0_f64;

    // Prefixes shorter than the needle, full-length windows, then short suffixes.
    let windows = (1..m)
        .map(|end| (0, end))
        .chain((0..=n - m).map(|start| (start, start + m)))
        .chain((n - m + 1..n).map(|start| (start, n)));

    for (start, end) in windows {
        let score = indel_ratio(needle, &haystack[start..end]);
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }

    best
}

/// Normalised Indel similarity in [0, 100].
fn indel_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * longest_common_subsequence(a, b) as f64 / total as f64
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Emit a candidate for every (sentence, surface form) pair scoring inside `band`.
///
/// Comparison is case-insensitive, but tags and snippets keep their original
/// case. Pairs are emitted sentence-major, surface-form-minor, with no
/// deduplication: the same sentence can match several surface forms.
pub fn tag_fuzzy(topic: &CompiledTopic, document: &Document, band: &Band) -> TierMatches {
    let mut candidates = Vec::new();

    for (index, sentence) in document.sentences.iter().enumerate() {
        let sentence_lower = sentence.to_lowercase();

        for (form, form_lower) in topic.surface_forms.iter().zip(&topic.surface_forms_lower) {
            let score = match partial_ratio(&sentence_lower, form_lower) {
                Some(score) => score,
                None => {
                    trace!(
                        work_id = %document.work_id,
                        section_id = index + 1,
                        "Unscorable pair (empty text), treating as 0"
                    );
                    0.0
                }
            };

            if band.contains(score) {
                candidates.push(MatchCandidate {
                    work_id: document.work_id.clone(),
                    section_id: index + 1,
                    tag: form.clone(),
                    score: None,
                    snippet: sentence.clone(),
                    tagger: Tagger::Fuzzy,
                    strength: band.strength,
                    flag_for_secondary_review: false,
                });
            }
        }
    }

    TierMatches::new(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::topic::Topic;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.01,
            "Expected ~{expected}, got {actual}"
        );
    }

    #[test]
    fn test_substring_scores_100() {
        let score = partial_ratio("we used census data from 2020.", "census data").unwrap();
        assert_close(score, 100.0);
    }

    #[test]
    fn test_argument_order_does_not_matter() {
        let a = partial_ratio("the labour survey", "labor survey").unwrap();
        let b = partial_ratio("labor survey", "the labour survey").unwrap();
        assert_close(a, b);
    }

    #[test]
    fn test_one_substitution_in_short_needle() {
        // "censos data" vs "census data": best window LCS is 10 of 11 chars
        let score = partial_ratio("the censos data", "census data").unwrap();
        assert_close(score, 200.0 * 10.0 / 22.0);
    }

    #[test]
    fn test_truncated_at_sentence_end() {
        // Only "census" survives at the end; suffix window "census" vs 11-char needle
        let score = partial_ratio("we cite census", "census data").unwrap();
        assert_close(score, 200.0 * 6.0 / 17.0);
    }

    #[test]
    fn test_empty_is_unscorable() {
        assert!(partial_ratio("", "census").is_none());
        assert!(partial_ratio("census", "").is_none());
    }

    #[test]
    fn test_unrelated_text_scores_low() {
        let score = partial_ratio("no topic mentioned here.", "census data").unwrap();
        assert!(score < 80.0, "Unrelated text should stay out of both bands, got {score}");
    }

    #[test]
    fn test_band_boundaries() {
        let bands = Bands::default();
        assert!(!bands.strong.contains(87.5));
        assert!(bands.weak.contains(87.5));
        assert!(bands.strong.contains(100.0));
        assert!(!bands.weak.contains(80.0));
        assert!(bands.weak.contains(80.01));

        assert_eq!(bands.classify(87.5), Partition::Band(Strength::Weak));
        assert_eq!(bands.classify(100.0), Partition::Band(Strength::Strong));
        assert_eq!(bands.classify(80.0), Partition::Outside);
    }

    #[test]
    fn test_invalid_bands() {
        assert!(Bands::new((90.0, 90.0), (80.0, 87.5)).is_err());
        assert!(Bands::new((87.5, 100.0), (80.0, 120.0)).is_err());
        assert!(Band::new(Strength::Exact, 0.0, 10.0).is_err());
        assert!(Bands::new((87.5, 100.0), (80.0, 87.5)).is_ok());
    }

    #[test]
    fn test_overlapping_bands_rejected() {
        let err = Bands::new((85.0, 100.0), (80.0, 90.0)).unwrap_err();
        assert!(matches!(err, TaggerError::InvalidBand { ref name, .. } if name == "weak"));
        // Weak above strong is fine as long as they do not share a score
        assert!(Bands::new((80.0, 87.5), (87.5, 100.0)).is_ok());
        assert!(Bands::new((90.0, 100.0), (70.0, 80.0)).is_ok());
    }

    #[test]
    fn test_tag_fuzzy_keeps_original_case() {
        let topic = Topic::SurfaceForms(vec!["Census Data".to_string()])
            .compile()
            .unwrap();
        let doc = Document::new("W9", vec!["We used CENSUS DATA.".to_string()]);
        let matches = tag_fuzzy(&topic, &doc, &Bands::default().strong);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches.candidates[0].tag, "Census Data");
        assert_eq!(matches.candidates[0].snippet, "We used CENSUS DATA.");
        assert_eq!(matches.candidates[0].strength, Strength::Strong);
        assert_eq!(matches.candidates[0].tagger, Tagger::Fuzzy);
        assert!(matches.candidates[0].score.is_none());
    }

    #[test]
    fn test_blank_sentence_is_skipped() {
        let topic = Topic::SurfaceForms(vec!["ACS".to_string()]).compile().unwrap();
        let doc = Document::new("W9", vec![String::new(), "ACS".to_string()]);
        let matches = tag_fuzzy(&topic, &doc, &Bands::default().strong);
        assert_eq!(matches.section_ids(), vec![2]);
    }
}
