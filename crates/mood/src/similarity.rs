//! Tag-set and mood-vector similarity.
//!
//! All functions are pure and total: degenerate inputs (empty tag sets,
//! zero vectors) have a defined score of `0.0` instead of an error or NaN.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::vector::{MoodDimension, MoodVector};

/// Lower-cased, de-duplicated form of a tag list.
pub fn tag_set<S: AsRef<str>>(tags: &[S]) -> BTreeSet<String> {
    tags.iter().map(|t| t.as_ref().to_lowercase()).collect()
}

/// Case-insensitive Jaccard index of two tag lists.
///
/// Duplicates collapse. Returns `0.0` when both inputs are empty.
pub fn jaccard<A, B>(a: &[A], b: &[B]) -> f64
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    jaccard_sets(&tag_set(a), &tag_set(b))
}

/// [`jaccard`] over sets already built with [`tag_set`].
pub fn jaccard_sets(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Case-insensitive intersection of two tag lists, in lower-cased form.
pub fn overlap<A, B>(a: &[A], b: &[B]) -> BTreeSet<String>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    overlap_sets(&tag_set(a), &tag_set(b))
}

/// [`overlap`] over sets already built with [`tag_set`].
pub fn overlap_sets(a: &BTreeSet<String>, b: &BTreeSet<String>) -> BTreeSet<String> {
    a.intersection(b).cloned().collect()
}

/// Cosine similarity over the fixed mood dimensions.
///
/// Returns `0.0` if either vector has zero norm. Each vector is divided by
/// its largest absolute component first, so very large or very small
/// finite values neither overflow nor underflow the norms.
pub fn cosine(a: &MoodVector, b: &MoodVector) -> f64 {
    let (Some(a), Some(b)) = (peak_scaled(a), peak_scaled(b)) else {
        return 0.0;
    };
    a.dot(&b) / (a.norm() * b.norm())
}

fn peak_scaled(v: &MoodVector) -> Option<MoodVector> {
    let peak = v.max_abs();
    if peak == 0.0 {
        return None;
    }
    Some(MoodVector::from_array(v.to_array().map(|x| x / peak)))
}

/// Per-dimension agreement between two mood vectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionAlignment {
    pub dimension: MoodDimension,
    pub value_a: f64,
    pub value_b: f64,
    /// `1 - |value_a - value_b|`.
    pub similarity: f64,
}

/// The `n` best-aligned dimensions, most similar first.
///
/// Ties keep canonical dimension order.
pub fn top_aligned_dimensions(a: &MoodVector, b: &MoodVector, n: usize) -> Vec<DimensionAlignment> {
    let mut alignments: Vec<DimensionAlignment> = MoodDimension::ALL
        .iter()
        .map(|&dimension| {
            let value_a = a.get(dimension);
            let value_b = b.get(dimension);
            DimensionAlignment {
                dimension,
                value_a,
                value_b,
                similarity: 1.0 - (value_a - value_b).abs(),
            }
        })
        .collect();

    // slice::sort_by is stable.
    alignments.sort_by(|x, y| y.similarity.total_cmp(&x.similarity));
    alignments.truncate(n);
    alignments
}
