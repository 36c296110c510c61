//! Workspace umbrella crate for vibematch.
//!
//! This crate stitches the mood space (`mood`) and the matching engine
//! (`matcher`) together with catalog loading and YAML configuration, so
//! callers can go from files on disk to explained book/song pairs with a
//! single API entry point.

pub mod catalog;
pub mod config;

pub use catalog::{Catalog, CatalogError};
pub use config::{ConfigLoadError, MatcherYamlConfig, OutputYamlConfig, VibeConfig};
pub use matcher::{
    Assignment, AssignmentTable, Book, Bound, FactorKind, MatchConfig, MatchError, MatchMetrics,
    MatchOperation, MatchResult, Matcher, PenaltyRule, PenaltyTable, RangePolicy, ScoringFactor,
    Signal, Song, TaggedEntity, set_match_metrics,
};
pub use mood::{
    AudioFeature, AudioFeatures, DimensionAlignment, MoodDimension, MoodError, MoodVector,
    cosine, derive_vector, jaccard, overlap, top_aligned_dimensions,
};

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use tracing::info;

/// Errors that can occur while running a catalog through the matcher.
#[derive(Debug)]
pub enum VibeError {
    Config(ConfigLoadError),
    Catalog(CatalogError),
    Match(MatchError),
}

impl fmt::Display for VibeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VibeError::Config(err) => write!(f, "configuration failure: {err}"),
            VibeError::Catalog(err) => write!(f, "catalog failure: {err}"),
            VibeError::Match(err) => write!(f, "matching failure: {err}"),
        }
    }
}

impl Error for VibeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            VibeError::Config(err) => Some(err),
            VibeError::Catalog(err) => Some(err),
            VibeError::Match(err) => Some(err),
        }
    }
}

impl From<ConfigLoadError> for VibeError {
    fn from(value: ConfigLoadError) -> Self {
        VibeError::Config(value)
    }
}

impl From<CatalogError> for VibeError {
    fn from(value: CatalogError) -> Self {
        VibeError::Catalog(value)
    }
}

impl From<MatchError> for VibeError {
    fn from(value: MatchError) -> Self {
        VibeError::Match(value)
    }
}

/// Construct the matcher described by a loaded configuration.
pub fn build_matcher(cfg: &VibeConfig) -> Result<Matcher, VibeError> {
    Ok(Matcher::new(cfg.matcher.to_match_config())?)
}

/// Uniquely assign songs to every book in the catalog.
pub fn assign_catalog(catalog: &Catalog, matcher: &Matcher) -> Result<Assignment, VibeError> {
    catalog.validate()?;
    let assignment = matcher.assign_unique(&catalog.books, &catalog.songs)?;
    info!(
        books = catalog.books.len(),
        songs = catalog.songs.len(),
        assigned = assignment.len(),
        total_score = assignment.total_score(),
        "catalog_assigned"
    );
    Ok(assignment)
}

/// The `n` best songs for one book of the catalog, highest first.
pub fn recommend(
    catalog: &Catalog,
    matcher: &Matcher,
    book_id: &str,
    n: usize,
) -> Result<Vec<MatchResult>, VibeError> {
    let book = catalog.require_book(book_id)?;
    Ok(matcher.find_top_matches(book, &catalog.songs, n)?)
}

/// Rebuild explained results for every pair of a stored assignment table.
///
/// Fails on the first book or song the catalog no longer contains.
pub fn rescore_table(
    catalog: &Catalog,
    matcher: &Matcher,
    table: &AssignmentTable,
) -> Result<BTreeMap<String, MatchResult>, VibeError> {
    let mut rescored = BTreeMap::new();
    for (book_id, _) in table.iter() {
        let book = catalog.require_book(book_id)?;
        if let Some(result) = matcher.score_assigned(book, table, &catalog.songs)? {
            rescored.insert(book_id.clone(), result);
        }
    }
    Ok(rescored)
}

/// The bundled five-book, six-song sample catalog.
/// Useful for demos and integration smoke tests.
pub fn demo_catalog() -> Result<Catalog, CatalogError> {
    const DEMO: &str = include_str!("../data/demo_catalog.yaml");
    Catalog::from_yaml_str(DEMO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_catalog_loads() {
        let catalog = demo_catalog().expect("bundled catalog should parse");
        assert_eq!(catalog.books.len(), 5);
        assert_eq!(catalog.songs.len(), 6);
    }

    #[test]
    fn demo_assignment_pairs_obvious_matches() {
        let catalog = demo_catalog().unwrap();
        let matcher = Matcher::default();

        let assignment = assign_catalog(&catalog, &matcher).expect("assignment should succeed");
        assert_eq!(assignment.len(), 5);

        let song_of = |book: &str| assignment.get(book).map(|r| r.song.id.as_str());
        assert_eq!(song_of("b-rebecca"), Some("s-foghorn"));
        assert_eq!(song_of("b-pride"), Some("s-waltz"));
        assert_eq!(song_of("b-road"), Some("s-ashes"));
        assert_eq!(song_of("b-gatsby"), Some("s-charleston"));
        assert_eq!(song_of("b-hobbit"), Some("s-hearth"));
    }

    #[test]
    fn recommend_unknown_book_fails() {
        let catalog = demo_catalog().unwrap();
        let err = recommend(&catalog, &Matcher::default(), "b-missing", 3).unwrap_err();
        assert!(matches!(
            err,
            VibeError::Catalog(CatalogError::UnknownBook(ref id)) if id == "b-missing"
        ));
        assert!(err.source().is_some());
    }

    #[test]
    fn recommend_lists_requested_count() {
        let catalog = demo_catalog().unwrap();
        let top = recommend(&catalog, &Matcher::default(), "b-road", 3).unwrap();
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].song.id, "s-ashes");
    }

    #[test]
    fn rescore_table_matches_assignment() {
        let catalog = demo_catalog().unwrap();
        let matcher = Matcher::default();
        let assignment = assign_catalog(&catalog, &matcher).unwrap();

        let rescored = rescore_table(&catalog, &matcher, &assignment.to_table()).unwrap();
        assert_eq!(rescored, assignment.into_inner());
    }

    #[test]
    fn rescore_table_rejects_unknown_book() {
        let catalog = demo_catalog().unwrap();
        let mut table = AssignmentTable::new();
        table.insert("b-gone", "s-waltz");

        let err = rescore_table(&catalog, &Matcher::default(), &table).unwrap_err();
        assert!(matches!(err, VibeError::Catalog(CatalogError::UnknownBook(_))));
    }

    #[test]
    fn build_matcher_uses_yaml_policy() {
        let cfg = VibeConfig::from_yaml("version: \"1.0\"\nmatcher:\n  range_policy: clamp\n")
            .unwrap();
        let matcher = build_matcher(&cfg).unwrap();
        assert_eq!(matcher.config().range_policy, RangePolicy::Clamp);
    }
}
