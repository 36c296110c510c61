//! # vibematch mood space
//!
//! Value types and pure math shared by everything that compares books with
//! songs.
//!
//! ## Contract
//!
//! - Books carry an authored [`MoodVector`]; songs carry [`AudioFeatures`]
//!   that [`derive_vector`] projects into the same 9-dimensional space.
//! - [`jaccard`] and [`overlap`] compare tag lists case-insensitively.
//! - [`cosine`] and [`top_aligned_dimensions`] compare two mood vectors over
//!   the fixed dimension order in [`MoodDimension::ALL`].
//! - Nothing here performs I/O, allocates global state, or validates ranges
//!   implicitly. Range checks are explicit ([`MoodVector::check_range`]).
//!
//! Invariant: every function is a pure function of its arguments, so equal
//! inputs give bit-identical outputs.
//!
//! ## Example Usage
//!
//! ```
//! use mood::{cosine, derive_vector, jaccard, AudioFeatures};
//!
//! let song = AudioFeatures {
//!     energy: 0.2,
//!     valence: 0.1,
//!     tempo: 0.3,
//!     acousticness: 0.9,
//!     danceability: 0.2,
//! };
//! let derived = derive_vector(&song);
//! assert!(derived.melancholy > 0.8);
//!
//! assert_eq!(jaccard(&["Rain", "grief"], &["rain", "GRIEF"]), 1.0);
//! assert!((cosine(&derived, &derived) - 1.0).abs() < 1e-9);
//! ```

pub mod derive;
pub mod similarity;
pub mod vector;

pub use crate::derive::derive_vector;
pub use crate::similarity::{
    cosine, jaccard, jaccard_sets, overlap, overlap_sets, tag_set, top_aligned_dimensions,
    DimensionAlignment,
};
pub use crate::vector::{
    AudioFeature, AudioFeatures, MoodDimension, MoodError, MoodVector, MOOD_DIMENSIONS,
};
