//! Mismatch penalties.
//!
//! A [`PenaltyTable`] is an ordered, immutable list of rules owned by the
//! matcher's configuration. Each rule compares one book mood dimension with
//! one signal from the candidate song (a raw audio feature or a derived mood
//! dimension). Every rule whose guard holds contributes its constant; rules
//! are evaluated independently and their contributions sum.

use mood::{AudioFeature, AudioFeatures, MoodDimension, MoodVector};
use serde::{Deserialize, Serialize};

use crate::types::{MatchError, ScoringFactor};

/// The song-side value a rule inspects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "source", content = "name", rename_all = "lowercase")]
pub enum Signal {
    /// A raw audio feature, before derivation.
    Audio(AudioFeature),
    /// A dimension of the derived mood vector.
    Derived(MoodDimension),
}

impl Signal {
    fn read(self, derived: &MoodVector, audio: &AudioFeatures) -> f64 {
        match self {
            Signal::Audio(feature) => audio.get(feature),
            Signal::Derived(dim) => derived.get(dim),
        }
    }
}

/// Strict comparison applied to a [`Signal`].
///
/// Serialized as `{ op: above, value: 0.7 }` so JSON and YAML read it the
/// same way.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", content = "value", rename_all = "lowercase")]
pub enum Bound {
    Above(f64),
    Below(f64),
}

impl Bound {
    fn holds(self, value: f64) -> bool {
        match self {
            Bound::Above(threshold) => value > threshold,
            Bound::Below(threshold) => value < threshold,
        }
    }

    fn threshold(self) -> f64 {
        match self {
            Bound::Above(t) | Bound::Below(t) => t,
        }
    }
}

/// Fires when `book[book_dimension] > book_above` and the song signal
/// satisfies `bound`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PenaltyRule {
    pub label: String,
    /// Contribution when the rule fires; non-positive.
    pub penalty: f64,
    pub book_dimension: MoodDimension,
    pub book_above: f64,
    pub signal: Signal,
    pub bound: Bound,
}

impl PenaltyRule {
    pub fn new(
        label: impl Into<String>,
        penalty: f64,
        book_dimension: MoodDimension,
        book_above: f64,
        signal: Signal,
        bound: Bound,
    ) -> Self {
        Self {
            label: label.into(),
            penalty,
            book_dimension,
            book_above,
            signal,
            bound,
        }
    }

    pub fn fires(&self, book: &MoodVector, derived: &MoodVector, audio: &AudioFeatures) -> bool {
        book.get(self.book_dimension) > self.book_above
            && self.bound.holds(self.signal.read(derived, audio))
    }

    fn validate(&self) -> Result<(), MatchError> {
        if self.label.trim().is_empty() {
            return Err(MatchError::InvalidConfig(
                "penalty rule label must not be empty".into(),
            ));
        }
        if !self.penalty.is_finite() || self.penalty > 0.0 {
            return Err(MatchError::InvalidConfig(format!(
                "penalty for rule '{}' must be a finite value <= 0.0 (got {})",
                self.label, self.penalty
            )));
        }
        if !self.book_above.is_finite() || !self.bound.threshold().is_finite() {
            return Err(MatchError::InvalidConfig(format!(
                "thresholds for rule '{}' must be finite",
                self.label
            )));
        }
        Ok(())
    }
}

/// Result of evaluating a [`PenaltyTable`] against one pair.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PenaltyOutcome {
    /// Sum of the contributions of every rule that fired.
    pub total: f64,
    /// One factor per fired rule, in table order.
    pub factors: Vec<ScoringFactor>,
}

/// Ordered list of [`PenaltyRule`]s.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PenaltyTable {
    rules: Vec<PenaltyRule>,
}

impl PenaltyTable {
    /// The five book/song mismatch rules used by default.
    pub fn standard() -> Self {
        Self::from_rules(vec![
            PenaltyRule::new(
                "song too upbeat for melancholic book",
                -0.10,
                MoodDimension::Melancholy,
                0.7,
                Signal::Audio(AudioFeature::Valence),
                Bound::Above(0.7),
            ),
            PenaltyRule::new(
                "song too mellow for high-tension book",
                -0.05,
                MoodDimension::Tension,
                0.7,
                Signal::Audio(AudioFeature::Energy),
                Bound::Below(0.3),
            ),
            PenaltyRule::new(
                "song too warm for eerie book",
                -0.08,
                MoodDimension::Eeriness,
                0.7,
                Signal::Derived(MoodDimension::Warmth),
                Bound::Above(0.7),
            ),
            PenaltyRule::new(
                "song too sad for hopeful book",
                -0.07,
                MoodDimension::Hope,
                0.7,
                Signal::Audio(AudioFeature::Valence),
                Bound::Below(0.2),
            ),
            PenaltyRule::new(
                "song too mellow for intense book",
                -0.05,
                MoodDimension::Intensity,
                0.8,
                Signal::Audio(AudioFeature::Energy),
                Bound::Below(0.25),
            ),
        ])
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn from_rules(rules: Vec<PenaltyRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[PenaltyRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule against a pair and collect the fired ones.
    pub fn evaluate(
        &self,
        book: &MoodVector,
        derived: &MoodVector,
        audio: &AudioFeatures,
    ) -> PenaltyOutcome {
        let mut outcome = PenaltyOutcome::default();
        for rule in self.fired(book, derived, audio) {
            outcome.total += rule.penalty;
            outcome
                .factors
                .push(ScoringFactor::new(rule.label.clone(), rule.penalty));
        }
        outcome
    }

    /// Same sum as [`PenaltyTable::evaluate`], without building factors.
    pub fn total(&self, book: &MoodVector, derived: &MoodVector, audio: &AudioFeatures) -> f64 {
        let mut total = 0.0;
        for rule in self.fired(book, derived, audio) {
            total += rule.penalty;
        }
        total
    }

    fn fired<'a>(
        &'a self,
        book: &'a MoodVector,
        derived: &'a MoodVector,
        audio: &'a AudioFeatures,
    ) -> impl Iterator<Item = &'a PenaltyRule> + 'a {
        self.rules
            .iter()
            .filter(move |rule| rule.fires(book, derived, audio))
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        self.rules.iter().try_for_each(PenaltyRule::validate)
    }
}

impl Default for PenaltyTable {
    fn default() -> Self {
        Self::standard()
    }
}
