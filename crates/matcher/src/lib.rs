//! # vibematch Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` pairs books with songs. It sits on top of the mood space
//! (`mood`): books carry an authored mood vector, songs carry audio features
//! that are projected into the same space, and both carry free-form tags.
//! Every (book, song) pair gets one score plus a short list of human-readable
//! reasons for it.
//!
//! ## Scoring
//!
//! ```text
//! score = jaccard(tags) * 0.55 + cosine(book, derive(song)) * 0.35 + penalties
//! ```
//!
//! Penalties come from an ordered [`PenaltyTable`] owned by the
//! [`MatchConfig`]; by default the five standard mismatch rules apply and
//! their sum is uncapped. Explanations ([`ScoringFactor`]) are ranked by
//! absolute contribution and capped at three.
//!
//! ## Core Types
//!
//! - [`Book`], [`Song`]: the two sides of a match ([`TaggedEntity`]).
//! - [`MatchConfig`]: range policy, penalty table, optional penalty floor,
//!   and whether the assignment cross product is scored in parallel.
//! - [`MatchResult`]: total, component scores, and explanations for a pair.
//! - [`Matcher`]: the engine. `score_pair`, `find_best_match`,
//!   `find_top_matches`, `assign_unique`, and `score_assigned`.
//! - [`Assignment`] / [`AssignmentTable`]: unique assignment results and
//!   their persistable book-id to song-id form.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{Book, Matcher, Song};
//! use mood::{AudioFeatures, MoodVector};
//!
//! let book = Book::new(
//!     "b-1",
//!     MoodVector::from_array([0.9, 0.7, 0.3, 0.2, 0.4, 0.6, 0.8, 0.5, 0.2]),
//! )
//! .with_tags(["grief", "snow"]);
//!
//! let quiet = Song::new(
//!     "s-quiet",
//!     AudioFeatures {
//!         energy: 0.2,
//!         valence: 0.15,
//!         tempo: 0.3,
//!         acousticness: 0.9,
//!         danceability: 0.2,
//!     },
//! )
//! .with_tags(["snow", "piano"]);
//! let loud = Song::new(
//!     "s-loud",
//!     AudioFeatures {
//!         energy: 0.9,
//!         valence: 0.95,
//!         tempo: 0.9,
//!         acousticness: 0.1,
//!         danceability: 0.95,
//!     },
//! );
//!
//! let matcher = Matcher::default();
//! let best = matcher.find_best_match(&book, &[loud, quiet]).expect("valid inputs");
//! assert_eq!(best.song.id, "s-quiet");
//! for factor in &best.factors {
//!     println!("{:+.3} {}", factor.contribution, factor.description);
//! }
//! ```
//!
//! ## Unique Assignment
//!
//! [`Matcher::assign_unique`] gives each book a different song with a greedy
//! pass over the globally sorted (book, song) scores. It is deterministic
//! and fast, not optimal: committing the single best pair early can lower the
//! corpus total.
//!
//! ## Observability
//!
//! Install a [`MatchMetrics`] implementation via [`set_match_metrics`] to record
//! per-call latency and candidate counts. `assign_unique` also runs inside a
//! `matcher.assign_unique` tracing span.

pub mod assignment;
pub mod compose;
pub mod engine;
pub mod entity;
pub mod metrics;
pub mod penalty;
pub mod types;

pub use crate::assignment::{Assignment, AssignmentTable};
pub use crate::compose::{ComponentScores, MAX_FACTORS, TAG_WEIGHT, VECTOR_WEIGHT};
pub use crate::engine::Matcher;
pub use crate::entity::{Book, Song, TaggedEntity};
pub use crate::metrics::{set_match_metrics, MatchMetrics};
pub use crate::penalty::{Bound, PenaltyOutcome, PenaltyRule, PenaltyTable, Signal};
pub use crate::types::{
    FactorKind, MatchConfig, MatchError, MatchOperation, MatchResult, RangePolicy, ScoringFactor,
};
