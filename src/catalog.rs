//! Book and song corpora loaded from JSON or YAML.
//!
//! ```yaml
//! books:
//!   - id: b-rebecca
//!     title: Rebecca
//!     tags: [gothic, mystery, sea]
//!     vibe: { melancholy: 0.8, intimacy: 0.6, intensity: 0.5, hope: 0.2,
//!             tension: 0.8, warmth: 0.3, nostalgia: 0.7, eeriness: 0.9, pace: 0.4 }
//! songs:
//!   - id: s-1
//!     title: Fog Horn
//!     tags: [sea, ambient]
//!     audio: { energy: 0.2, valence: 0.2, tempo: 0.3, acousticness: 0.8, danceability: 0.1 }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use matcher::{Book, Song};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or querying a [`Catalog`].
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse JSON catalog: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("failed to parse YAML catalog: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("unsupported catalog format: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),

    #[error("{kind} at position {index} has an empty id")]
    EmptyId { kind: &'static str, index: usize },

    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("unknown book id: {0}")]
    UnknownBook(String),
}

/// The two corpora a matcher works over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub songs: Vec<Song>,
}

impl Catalog {
    pub fn new(books: Vec<Book>, songs: Vec<Song>) -> Self {
        Self { books, songs }
    }

    /// Load a catalog, picking the parser from the file extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let content = fs::read_to_string(path)?;
        match extension.as_str() {
            "json" => Self::from_json_str(&content),
            "yaml" | "yml" => Self::from_yaml_str(&content),
            _ => Err(CatalogError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_yaml::from_str(yaml)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Ids must be non-empty and unique within each corpus.
    ///
    /// Numeric ranges are left to the matcher's range policy.
    pub fn validate(&self) -> Result<(), CatalogError> {
        check_ids("book", self.books.iter().map(|b| b.id.as_str()))?;
        check_ids("song", self.songs.iter().map(|s| s.id.as_str()))
    }

    pub fn book(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn song(&self, id: &str) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == id)
    }

    /// Like [`Catalog::book`], failing with [`CatalogError::UnknownBook`].
    pub fn require_book(&self, id: &str) -> Result<&Book, CatalogError> {
        self.book(id)
            .ok_or_else(|| CatalogError::UnknownBook(id.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty() && self.songs.is_empty()
    }
}

fn check_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for (index, id) in ids.enumerate() {
        if id.trim().is_empty() {
            return Err(CatalogError::EmptyId { kind, index });
        }
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    const YAML: &str = r#"
books:
  - id: b-1
    title: Rebecca
    tags: [gothic, Sea]
    vibe: { melancholy: 0.8, intimacy: 0.6, intensity: 0.5, hope: 0.2, tension: 0.8, warmth: 0.3, nostalgia: 0.7, eeriness: 0.9, pace: 0.4 }
songs:
  - id: s-1
    tags: [sea]
    audio: { energy: 0.2, valence: 0.2, tempo: 0.3, acousticness: 0.8, danceability: 0.1 }
  - id: s-2
    audio: { energy: 0.9, valence: 0.9, tempo: 0.8, acousticness: 0.1, danceability: 0.9 }
"#;

    #[test]
    fn yaml_catalog_loads_with_defaults() {
        let catalog = Catalog::from_yaml_str(YAML).unwrap();
        assert_eq!(catalog.books.len(), 1);
        assert_eq!(catalog.songs.len(), 2);
        assert_eq!(catalog.book("b-1").map(|b| b.title.as_str()), Some("Rebecca"));
        assert!(catalog.song("s-2").is_some_and(|s| s.tags.is_empty()));
        assert!(catalog.book("missing").is_none());
    }

    #[test]
    fn duplicate_song_ids_rejected() {
        let yaml = YAML.replace("id: s-2", "id: s-1");
        let err = Catalog::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DuplicateId { kind: "song", ref id } if id == "s-1"
        ));
    }

    #[test]
    fn empty_book_id_rejected() {
        let yaml = YAML.replace("id: b-1", "id: \"\"");
        assert!(matches!(
            Catalog::from_yaml_str(&yaml),
            Err(CatalogError::EmptyId { kind: "book", index: 0 })
        ));
    }

    #[test]
    fn missing_vibe_is_a_parse_error() {
        let json = r#"{"books": [{"id": "b-1", "tags": []}], "songs": []}"#;
        assert!(matches!(
            Catalog::from_json_str(json),
            Err(CatalogError::JsonParse(_))
        ));
    }

    #[test]
    fn require_book_reports_unknown_id() {
        let catalog = Catalog::from_yaml_str(YAML).unwrap();
        let err = catalog.require_book("b-404").unwrap_err();
        assert_eq!(err.to_string(), "unknown book id: b-404");
    }

    #[test]
    fn from_file_dispatches_on_extension() {
        let catalog = Catalog::from_yaml_str(YAML).unwrap();
        let json = serde_json::to_string_pretty(&catalog).unwrap();

        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        assert_eq!(Catalog::from_file(file.path()).unwrap(), catalog);

        let mut file = Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        assert!(matches!(
            Catalog::from_file(file.path()),
            Err(CatalogError::UnsupportedFormat(_))
        ));
    }
}
