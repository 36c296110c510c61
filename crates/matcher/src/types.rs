use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::Song;
use crate::penalty::PenaltyTable;

/// How the engine treats mood or audio values outside `[0, 1]`.
///
/// Non-finite values are always rejected as malformed; this policy only
/// covers finite values that fall outside the nominal range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Score with the values exactly as given.
    #[default]
    PassThrough,
    /// Clamp authored book vectors and song audio features into `[0, 1]`.
    Clamp,
    /// Fail the pair with [`MatchError::OutOfRange`].
    Reject,
}

/// Configuration for a [`crate::Matcher`].
///
/// The scoring weights are fixed constants (see [`crate::compose`]); what is
/// configurable is input handling, the penalty rule table, and its ceiling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Configuration schema version.
    pub version: u32,
    /// Treatment of out-of-range inputs.
    #[serde(default)]
    pub range_policy: RangePolicy,
    /// Lower bound for the summed penalty of one pair. `None` leaves the sum
    /// uncapped, so several rules firing together can exceed any nominal
    /// ceiling.
    #[serde(default)]
    pub penalty_floor: Option<f64>,
    /// Ordered mismatch rules.
    #[serde(default)]
    pub penalties: PenaltyTable,
    /// Score the (book, song) cross product on the rayon pool during
    /// unique assignment. Commit order is unaffected.
    #[serde(default)]
    pub use_parallel: bool,
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range_policy(mut self, policy: RangePolicy) -> Self {
        self.range_policy = policy;
        self
    }

    pub fn with_penalty_floor(mut self, floor: Option<f64>) -> Self {
        self.penalty_floor = floor;
        self
    }

    pub fn with_penalties(mut self, penalties: PenaltyTable) -> Self {
        self.penalties = penalties;
        self
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.version < 1 {
            return Err(MatchError::InvalidConfig(format!(
                "version must be >= 1 (got {})",
                self.version
            )));
        }
        if let Some(floor) = self.penalty_floor {
            if !floor.is_finite() || floor > 0.0 {
                return Err(MatchError::InvalidConfig(format!(
                    "penalty_floor must be a finite value <= 0.0 (got {floor})"
                )));
            }
        }
        self.penalties.validate()
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            version: 1,
            range_policy: RangePolicy::PassThrough,
            penalty_floor: None,
            penalties: PenaltyTable::standard(),
            use_parallel: false,
        }
    }
}

/// Sign class of a [`ScoringFactor`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FactorKind {
    Positive,
    Negative,
    Neutral,
}

impl FactorKind {
    pub fn of(contribution: f64) -> Self {
        if contribution > 0.0 {
            FactorKind::Positive
        } else if contribution < 0.0 {
            FactorKind::Negative
        } else {
            FactorKind::Neutral
        }
    }
}

/// One human-readable reason behind a score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringFactor {
    pub description: String,
    /// Signed share of the total score attributed to this reason.
    pub contribution: f64,
    pub kind: FactorKind,
}

impl ScoringFactor {
    pub fn new(description: impl Into<String>, contribution: f64) -> Self {
        Self {
            description: description.into(),
            contribution,
            kind: FactorKind::of(contribution),
        }
    }
}

/// Score and explanation for one (book, song) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    pub song: Song,
    /// `tag_score * 0.55 + vector_score * 0.35 + penalty_score`.
    pub score: f64,
    /// Case-insensitive Jaccard index of the tag sets.
    pub tag_score: f64,
    /// Cosine similarity of the book vector and the derived song vector.
    pub vector_score: f64,
    /// Summed (and optionally floored) mismatch penalties, `<= 0`.
    pub penalty_score: f64,
    /// At most three factors, largest absolute contribution first.
    pub factors: Vec<ScoringFactor>,
}

/// Engine entry point, used to label metrics observations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchOperation {
    ScorePair,
    BestMatch,
    TopMatches,
    ScoreAssigned,
}

/// Errors produced by the matching engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    /// A best-match search was given no songs.
    #[error("no candidate songs supplied for book {book_id}")]
    NoCandidates { book_id: String },
    /// A required field is empty or not a finite number.
    #[error("malformed entity {id}: {reason}")]
    MalformedEntity { id: String, reason: String },
    /// A value fell outside `[0, 1]` under [`RangePolicy::Reject`].
    #[error("entity {id}: {field} is outside [0, 1] (got {value})")]
    OutOfRange {
        id: String,
        field: &'static str,
        value: f64,
    },
    /// Invalid configuration.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    /// A stored assignment points at a song that is not in the candidate list.
    #[error("assignment for book {book_id} names unknown song {song_id}")]
    UnknownSong { book_id: String, song_id: String },
}
