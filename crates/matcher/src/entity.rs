//! Books, songs, and the capability they share.

use mood::{derive_vector, AudioFeatures, MoodVector};
use serde::{Deserialize, Serialize};

/// Anything that can sit on one side of a match: an identifier, a tag list,
/// and a position in the mood space.
pub trait TaggedEntity {
    fn id(&self) -> &str;

    /// Tags as authored. Comparisons lower-case them; display keeps the case.
    fn tags(&self) -> &[String];

    /// Mood vector, authored or derived.
    fn mood(&self) -> MoodVector;
}

/// A book with an authored mood profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub vibe: MoodVector,
}

impl Book {
    pub fn new(id: impl Into<String>, vibe: MoodVector) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            author: String::new(),
            tags: Vec::new(),
            vibe,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

impl TaggedEntity for Book {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn mood(&self) -> MoodVector {
        self.vibe
    }
}

/// A song described by raw audio features; its mood vector is derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub audio: AudioFeatures,
}

impl Song {
    pub fn new(id: impl Into<String>, audio: AudioFeatures) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            artist: String::new(),
            tags: Vec::new(),
            audio,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

impl TaggedEntity for Song {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn mood(&self) -> MoodVector {
        derive_vector(&self.audio)
    }
}
