//! Score composition and explanations.

use std::collections::BTreeSet;

use mood::{top_aligned_dimensions, MoodVector};

use crate::penalty::PenaltyOutcome;
use crate::types::ScoringFactor;

/// Weight of the tag Jaccard score in the total.
pub const TAG_WEIGHT: f64 = 0.55;
/// Weight of the mood cosine score in the total.
pub const VECTOR_WEIGHT: f64 = 0.35;
/// Share of the weighted vector score attributed to one aligned dimension.
pub const ALIGNMENT_ATTRIBUTION: f64 = 0.3;
/// Minimum per-dimension similarity for a "strong alignment" factor.
pub const STRONG_ALIGNMENT_THRESHOLD: f64 = 0.8;
/// How many best-aligned dimensions are considered for explanation.
pub const ALIGNMENT_CANDIDATES: usize = 2;
/// Tags listed in the shared-tags factor.
pub const MAX_SHARED_TAGS: usize = 3;
/// Factors kept on a [`crate::MatchResult`].
pub const MAX_FACTORS: usize = 3;

/// Component similarity scores of one pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentScores {
    pub tag: f64,
    pub vector: f64,
}

/// Weighted total of the components plus the penalty.
pub fn combine(scores: ComponentScores, penalty_total: f64) -> f64 {
    scores.tag * TAG_WEIGHT + scores.vector * VECTOR_WEIGHT + penalty_total
}

/// Build the ranked explanation list for one pair.
///
/// Candidates are, in order: the shared-tags factor, up to two strong
/// dimension alignments, then every penalty. The list is stably sorted by
/// descending absolute contribution and truncated to [`MAX_FACTORS`], so
/// small penalties can be crowded out by larger positive factors.
pub fn compose(
    book_tags: &[String],
    shared: &BTreeSet<String>,
    book_vector: &MoodVector,
    derived: &MoodVector,
    scores: ComponentScores,
    penalties: &PenaltyOutcome,
) -> Vec<ScoringFactor> {
    let mut factors = Vec::with_capacity(1 + ALIGNMENT_CANDIDATES + penalties.factors.len());

    if !shared.is_empty() {
        let listed = shared_in_book_order(book_tags, shared);
        factors.push(ScoringFactor::new(
            format!("shared tags: {}", listed.join(", ")),
            scores.tag * TAG_WEIGHT,
        ));
    }

    let attribution = scores.vector * VECTOR_WEIGHT * ALIGNMENT_ATTRIBUTION;
    for alignment in top_aligned_dimensions(book_vector, derived, ALIGNMENT_CANDIDATES) {
        if alignment.similarity > STRONG_ALIGNMENT_THRESHOLD {
            factors.push(ScoringFactor::new(
                format!("strong {} alignment", alignment.dimension),
                attribution,
            ));
        }
    }

    factors.extend(penalties.factors.iter().cloned());

    factors.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));
    factors.truncate(MAX_FACTORS);
    factors
}

/// Up to [`MAX_SHARED_TAGS`] of the book's tags that are in `shared`, in the
/// book's order and spelling, without repeats.
fn shared_in_book_order<'a>(book_tags: &'a [String], shared: &BTreeSet<String>) -> Vec<&'a str> {
    let mut seen = BTreeSet::new();
    book_tags
        .iter()
        .filter(|tag| {
            let key = tag.to_lowercase();
            shared.contains(&key) && seen.insert(key)
        })
        .map(String::as_str)
        .take(MAX_SHARED_TAGS)
        .collect()
}
