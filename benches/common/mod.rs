//! Common utilities for vibematch benchmarks
//!
//! Deterministic synthetic corpora so runs are comparable across machines.

#![allow(dead_code)]

use vibematch::{AudioFeatures, Book, MoodVector, Song};

/// Tag vocabulary shared by generated books and songs.
pub const TAG_VOCAB: &[&str] = &[
    "rain", "sea", "grief", "night", "city", "love", "war", "snow", "summer", "jazz", "home",
    "journey", "gothic", "romance", "neon", "folk",
];

fn unit(seed: usize, k: usize) -> f64 {
    (((seed as u64).wrapping_mul(2_654_435_761) ^ (k as u64 * 40_503)) % 1000) as f64 / 999.0
}

fn tags(seed: usize, count: usize) -> Vec<String> {
    (0..count)
        .map(|k| TAG_VOCAB[(seed * 7 + k * 5) % TAG_VOCAB.len()].to_string())
        .collect()
}

pub fn generate_books(count: usize) -> Vec<Book> {
    (0..count)
        .map(|i| {
            let vibe = MoodVector::from_array(std::array::from_fn(|k| unit(i, k)));
            Book::new(format!("book-{i:05}"), vibe).with_tags(tags(i, 4))
        })
        .collect()
}

pub fn generate_songs(count: usize) -> Vec<Song> {
    (0..count)
        .map(|j| {
            let seed = j + 100_003;
            let audio = AudioFeatures {
                energy: unit(seed, 0),
                valence: unit(seed, 1),
                tempo: unit(seed, 2),
                acousticness: unit(seed, 3),
                danceability: unit(seed, 4),
            };
            Song::new(format!("song-{j:05}"), audio).with_tags(tags(seed, 3))
        })
        .collect()
}
