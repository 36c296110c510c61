//! Results of corpus-wide unique assignment.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::MatchResult;

/// Book id → uniquely assigned [`MatchResult`].
///
/// Produced by [`crate::Matcher::assign_unique`]. No song id appears in more
/// than one entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    entries: BTreeMap<String, MatchResult>,
}

impl Assignment {
    pub(crate) fn commit(&mut self, book_id: String, result: MatchResult) {
        self.entries.insert(book_id, result);
    }

    pub fn get(&self, book_id: &str) -> Option<&MatchResult> {
        self.entries.get(book_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by book id.
    pub fn iter(&self) -> btree_map::Iter<'_, String, MatchResult> {
        self.entries.iter()
    }

    /// Assigned song ids, ordered by book id.
    pub fn song_ids(&self) -> Vec<&str> {
        self.entries.values().map(|r| r.song.id.as_str()).collect()
    }

    /// Sum of the assigned scores.
    pub fn total_score(&self) -> f64 {
        self.entries.values().map(|r| r.score).sum()
    }

    /// Strip the results down to a persistable id table.
    pub fn to_table(&self) -> AssignmentTable {
        self.entries
            .iter()
            .map(|(book, result)| (book.clone(), result.song.id.clone()))
            .collect()
    }

    pub fn into_inner(self) -> BTreeMap<String, MatchResult> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Assignment {
    type Item = (&'a String, &'a MatchResult);
    type IntoIter = btree_map::Iter<'a, String, MatchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Book id → song id, the persisted form of an [`Assignment`].
///
/// Feed it back through [`crate::Matcher::score_assigned`] to rebuild one
/// explained pair without rerunning the whole assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentTable {
    pairs: BTreeMap<String, String>,
}

impl AssignmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, book_id: impl Into<String>, song_id: impl Into<String>) {
        self.pairs.insert(book_id.into(), song_id.into());
    }

    pub fn song_for(&self, book_id: &str) -> Option<&str> {
        self.pairs.get(book_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.pairs.iter()
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<K, V> FromIterator<(K, V)> for AssignmentTable
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_parses_plain_json_object() {
        let table = AssignmentTable::from_json_str(r#"{"dune": "s-12", "emma": "s-3"}"#).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.song_for("dune"), Some("s-12"));
        assert_eq!(table.song_for("ulysses"), None);
    }

    #[test]
    fn table_collects_from_pairs() {
        let table: AssignmentTable = [("b1", "s1"), ("b2", "s2")].into_iter().collect();
        let json = table.to_json_pretty().unwrap();
        assert!(json.contains("\"b1\": \"s1\""));
    }
}
