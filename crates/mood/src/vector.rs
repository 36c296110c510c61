//! Mood-space and audio-feature value types.
//!
//! Both types are plain `Copy` structs with one named field per dimension.
//! Everything that compares two vectors walks [`MoodDimension::ALL`], so the
//! dimension order is fixed in exactly one place.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of dimensions in the shared mood space.
pub const MOOD_DIMENSIONS: usize = 9;

/// One axis of the mood space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodDimension {
    Melancholy,
    Intimacy,
    Intensity,
    Hope,
    Tension,
    Warmth,
    Nostalgia,
    Eeriness,
    Pace,
}

impl MoodDimension {
    /// Canonical iteration order, shared by authored and derived vectors.
    pub const ALL: [MoodDimension; MOOD_DIMENSIONS] = [
        MoodDimension::Melancholy,
        MoodDimension::Intimacy,
        MoodDimension::Intensity,
        MoodDimension::Hope,
        MoodDimension::Tension,
        MoodDimension::Warmth,
        MoodDimension::Nostalgia,
        MoodDimension::Eeriness,
        MoodDimension::Pace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MoodDimension::Melancholy => "melancholy",
            MoodDimension::Intimacy => "intimacy",
            MoodDimension::Intensity => "intensity",
            MoodDimension::Hope => "hope",
            MoodDimension::Tension => "tension",
            MoodDimension::Warmth => "warmth",
            MoodDimension::Nostalgia => "nostalgia",
            MoodDimension::Eeriness => "eeriness",
            MoodDimension::Pace => "pace",
        }
    }
}

impl fmt::Display for MoodDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point in the 9-dimensional mood space.
///
/// Components are nominally in `[0, 1]`. Nothing here enforces that; callers
/// decide through [`MoodVector::check_range`] or [`MoodVector::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodVector {
    pub melancholy: f64,
    pub intimacy: f64,
    pub intensity: f64,
    pub hope: f64,
    pub tension: f64,
    pub warmth: f64,
    pub nostalgia: f64,
    pub eeriness: f64,
    pub pace: f64,
}

impl MoodVector {
    /// Vector with every component set to `value`.
    pub fn splat(value: f64) -> Self {
        Self::from_array([value; MOOD_DIMENSIONS])
    }

    /// Build from components in [`MoodDimension::ALL`] order.
    pub fn from_array(values: [f64; MOOD_DIMENSIONS]) -> Self {
        let [melancholy, intimacy, intensity, hope, tension, warmth, nostalgia, eeriness, pace] =
            values;
        Self {
            melancholy,
            intimacy,
            intensity,
            hope,
            tension,
            warmth,
            nostalgia,
            eeriness,
            pace,
        }
    }

    /// Components in [`MoodDimension::ALL`] order.
    pub fn to_array(&self) -> [f64; MOOD_DIMENSIONS] {
        MoodDimension::ALL.map(|dim| self.get(dim))
    }

    pub fn get(&self, dim: MoodDimension) -> f64 {
        match dim {
            MoodDimension::Melancholy => self.melancholy,
            MoodDimension::Intimacy => self.intimacy,
            MoodDimension::Intensity => self.intensity,
            MoodDimension::Hope => self.hope,
            MoodDimension::Tension => self.tension,
            MoodDimension::Warmth => self.warmth,
            MoodDimension::Nostalgia => self.nostalgia,
            MoodDimension::Eeriness => self.eeriness,
            MoodDimension::Pace => self.pace,
        }
    }

    /// `(dimension, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (MoodDimension, f64)> + '_ {
        MoodDimension::ALL.into_iter().map(|dim| (dim, self.get(dim)))
    }

    pub fn dot(&self, other: &MoodVector) -> f64 {
        MoodDimension::ALL
            .iter()
            .map(|&dim| self.get(dim) * other.get(dim))
            .sum()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Largest absolute component.
    pub fn max_abs(&self) -> f64 {
        self.iter().fold(0.0_f64, |peak, (_, v)| peak.max(v.abs()))
    }

    /// Copy with every component clamped into `[0, 1]`.
    pub fn clamped(&self) -> Self {
        Self::from_array(self.to_array().map(|v| v.clamp(0.0, 1.0)))
    }

    /// Fails on the first NaN or infinite component.
    pub fn check_finite(&self) -> Result<(), MoodError> {
        for (dim, value) in self.iter() {
            if !value.is_finite() {
                return Err(MoodError::NonFinite {
                    field: dim.as_str(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Fails on the first component outside `[0, 1]`.
    pub fn check_range(&self) -> Result<(), MoodError> {
        for (dim, value) in self.iter() {
            if !(0.0..=1.0).contains(&value) {
                return Err(MoodError::OutOfRange {
                    field: dim.as_str(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Raw audio feature, as reported by the song catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFeature {
    Energy,
    Valence,
    Tempo,
    Acousticness,
    Danceability,
}

impl AudioFeature {
    pub const ALL: [AudioFeature; 5] = [
        AudioFeature::Energy,
        AudioFeature::Valence,
        AudioFeature::Tempo,
        AudioFeature::Acousticness,
        AudioFeature::Danceability,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AudioFeature::Energy => "energy",
            AudioFeature::Valence => "valence",
            AudioFeature::Tempo => "tempo",
            AudioFeature::Acousticness => "acousticness",
            AudioFeature::Danceability => "danceability",
        }
    }
}

impl fmt::Display for AudioFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio-style features of a song, each nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub energy: f64,
    pub valence: f64,
    pub tempo: f64,
    pub acousticness: f64,
    pub danceability: f64,
}

impl AudioFeatures {
    pub fn get(&self, feature: AudioFeature) -> f64 {
        match feature {
            AudioFeature::Energy => self.energy,
            AudioFeature::Valence => self.valence,
            AudioFeature::Tempo => self.tempo,
            AudioFeature::Acousticness => self.acousticness,
            AudioFeature::Danceability => self.danceability,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AudioFeature, f64)> + '_ {
        AudioFeature::ALL.into_iter().map(|f| (f, self.get(f)))
    }

    pub fn clamped(&self) -> Self {
        Self {
            energy: self.energy.clamp(0.0, 1.0),
            valence: self.valence.clamp(0.0, 1.0),
            tempo: self.tempo.clamp(0.0, 1.0),
            acousticness: self.acousticness.clamp(0.0, 1.0),
            danceability: self.danceability.clamp(0.0, 1.0),
        }
    }

    pub fn check_finite(&self) -> Result<(), MoodError> {
        for (feature, value) in self.iter() {
            if !value.is_finite() {
                return Err(MoodError::NonFinite {
                    field: feature.as_str(),
                    value,
                });
            }
        }
        Ok(())
    }

    pub fn check_range(&self) -> Result<(), MoodError> {
        for (feature, value) in self.iter() {
            if !(0.0..=1.0).contains(&value) {
                return Err(MoodError::OutOfRange {
                    field: feature.as_str(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Validation failures for mood vectors and audio features.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MoodError {
    #[error("{field} is not a finite number (got {value})")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} is outside [0, 1] (got {value})")]
    OutOfRange { field: &'static str, value: f64 },
}

impl MoodError {
    pub fn field(&self) -> &'static str {
        match self {
            MoodError::NonFinite { field, .. } | MoodError::OutOfRange { field, .. } => field,
        }
    }
}
