//! Projection of raw audio features into the mood space.

use crate::vector::{AudioFeatures, MoodVector};

/// Derive a song's mood vector from its audio features.
///
/// Every dimension is a fixed linear combination of the inputs. Inputs are
/// not clamped, so out-of-range features produce out-of-range components.
pub fn derive_vector(features: &AudioFeatures) -> MoodVector {
    let AudioFeatures {
        energy,
        valence,
        tempo,
        acousticness,
        danceability,
    } = *features;

    // eeriness depends on warmth; compute it once.
    let warmth = 0.5 * acousticness + 0.3 * valence + 0.2 * (1.0 - energy);

    MoodVector {
        melancholy: 1.0 - valence,
        intimacy: 0.6 * acousticness + 0.4 * (1.0 - energy),
        intensity: energy,
        hope: 0.7 * valence + 0.3 * energy,
        tension: 0.5 * energy + 0.5 * (1.0 - valence),
        warmth,
        nostalgia: 0.4 * acousticness + 0.3 * (1.0 - tempo) + 0.3 * (1.0 - energy),
        eeriness: 0.5 * (1.0 - valence) + 0.3 * (1.0 - danceability) + 0.2 * (1.0 - warmth),
        pace: 0.6 * tempo + 0.4 * energy,
    }
}
