use std::collections::{BTreeSet, HashSet};
use std::time::{Duration, Instant};

use mood::{
    cosine, derive_vector, jaccard_sets, overlap_sets, tag_set, AudioFeatures, MoodError,
    MoodVector,
};
use rayon::prelude::*;
use tracing::{debug, info, warn, Level};

use crate::assignment::{Assignment, AssignmentTable};
use crate::compose::{combine, compose, ComponentScores};
use crate::entity::{Book, Song, TaggedEntity};
use crate::metrics::metrics_recorder;
use crate::penalty::PenaltyOutcome;
use crate::types::{MatchConfig, MatchError, MatchOperation, MatchResult, RangePolicy};


/// A book that passed validation, with the vector the policy says to score.
struct PreparedBook<'a> {
    book: &'a Book,
    vector: MoodVector,
    tags: BTreeSet<String>,
}

/// A song that passed validation, with its derived vector.
struct PreparedSong<'a> {
    song: &'a Song,
    audio: AudioFeatures,
    derived: MoodVector,
    tags: BTreeSet<String>,
}

/// Score of one cell of the (book, song) cross product.
#[derive(Debug, Clone, Copy)]
struct PairScore {
    book: usize,
    song: usize,
    score: f64,
}

/// Book-to-song scoring and assignment engine.
///
/// A `Matcher` owns its configuration (range policy, penalty table) and has
/// no other state; every operation is a pure function of its arguments and
/// can be called concurrently from several threads.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    cfg: MatchConfig,
}

impl Matcher {
    /// Construct a matcher after validating `cfg`.
    pub fn new(cfg: MatchConfig) -> Result<Self, MatchError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Score one (book, song) pair with full explanation.
    pub fn score_pair(&self, book: &Book, song: &Song) -> Result<MatchResult, MatchError> {
        let start = Instant::now();
        let result = self.score_pair_inner(book, song);
        observe(MatchOperation::ScorePair, 1, start.elapsed());
        result
    }

    /// Highest-scoring song for `book`.
    ///
    /// Only a strictly greater score displaces the current best, so the
    /// first of several equal scores wins.
    pub fn find_best_match(&self, book: &Book, songs: &[Song]) -> Result<MatchResult, MatchError> {
        let start = Instant::now();
        let result = self.best_match_inner(book, songs);
        observe(MatchOperation::BestMatch, songs.len(), start.elapsed());

        if let Ok(best) = &result {
            debug!(
                book_id = %book.id,
                candidates = songs.len(),
                song_id = %best.song.id,
                score = best.score,
                "best_match_found"
            );
        }
        result
    }

    /// The `n` best songs for `book`, highest first.
    ///
    /// Equal scores keep the order of `songs`.
    pub fn find_top_matches(
        &self,
        book: &Book,
        songs: &[Song],
        n: usize,
    ) -> Result<Vec<MatchResult>, MatchError> {
        let start = Instant::now();
        let result = self.top_matches_inner(book, songs, n);
        observe(MatchOperation::TopMatches, songs.len(), start.elapsed());
        result
    }

    /// Greedy one-to-one assignment of songs to books.
    ///
    /// Every (book, song) pair is scored, the pairs are sorted by descending
    /// score with book-major enumeration order as the tiebreak, and the list
    /// is walked once, committing each pair whose book and song are both
    /// still free. This approximates maximum-weight bipartite matching; it is
    /// deterministic but not optimal.
    pub fn assign_unique(&self, books: &[Book], songs: &[Song]) -> Result<Assignment, MatchError> {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "matcher.assign_unique",
            books = books.len(),
            songs = songs.len(),
            parallel = self.cfg.use_parallel
        );
        let _guard = span.enter();

        let result = self.assign_inner(books, songs);
        let latency = start.elapsed();
        let elapsed_micros = latency.as_micros();

        match &result {
            Ok(assignment) => {
                info!(
                    committed = assignment.len(),
                    elapsed_micros, "assign_unique_success"
                );
                if let Some(recorder) = metrics_recorder() {
                    recorder.record_assignment(books.len(), songs.len(), assignment.len(), latency);
                }
            }
            Err(err) => {
                warn!(error = %err, elapsed_micros, "assign_unique_failure");
            }
        }
        result
    }

    /// Rebuild the explained result for `book` from a stored assignment.
    ///
    /// Returns `Ok(None)` when the table has no entry for the book, and
    /// [`MatchError::UnknownSong`] when the entry names a song missing from
    /// `songs`.
    pub fn score_assigned(
        &self,
        book: &Book,
        table: &AssignmentTable,
        songs: &[Song],
    ) -> Result<Option<MatchResult>, MatchError> {
        let start = Instant::now();
        let result = self.score_assigned_inner(book, table, songs);
        observe(MatchOperation::ScoreAssigned, songs.len(), start.elapsed());
        result
    }

    fn score_pair_inner(&self, book: &Book, song: &Song) -> Result<MatchResult, MatchError> {
        let book = self.prepare_book(book)?;
        let song = self.prepare_song(song)?;
        Ok(self.score_prepared(&book, &song))
    }

    fn best_match_inner(&self, book: &Book, songs: &[Song]) -> Result<MatchResult, MatchError> {
        let no_candidates = || MatchError::NoCandidates {
            book_id: book.id.clone(),
        };
        if songs.is_empty() {
            return Err(no_candidates());
        }

        let prepared = self.prepare_book(book)?;
        let mut best: Option<MatchResult> = None;
        for song in songs {
            let candidate = self.score_prepared(&prepared, &self.prepare_song(song)?);
            match &best {
                Some(current) if candidate.score <= current.score => {}
                _ => best = Some(candidate),
            }
        }
        best.ok_or_else(no_candidates)
    }

    fn top_matches_inner(
        &self,
        book: &Book,
        songs: &[Song],
        n: usize,
    ) -> Result<Vec<MatchResult>, MatchError> {
        let prepared = self.prepare_book(book)?;
        let mut results = songs
            .iter()
            .map(|song| Ok(self.score_prepared(&prepared, &self.prepare_song(song)?)))
            .collect::<Result<Vec<_>, MatchError>>()?;

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(n);
        Ok(results)
    }

    fn assign_inner(&self, books: &[Book], songs: &[Song]) -> Result<Assignment, MatchError> {
        let books = books
            .iter()
            .map(|book| self.prepare_book(book))
            .collect::<Result<Vec<_>, _>>()?;
        let songs = songs
            .iter()
            .map(|song| self.prepare_song(song))
            .collect::<Result<Vec<_>, _>>()?;

        let mut assignment = Assignment::default();
        if books.is_empty() || songs.is_empty() {
            return Ok(assignment);
        }

        // Duplicate identifiers collapse, so the reachable size is bounded by
        // distinct ids on both sides.
        let distinct_books: HashSet<&str> = books.iter().map(|b| b.book.id.as_str()).collect();
        let distinct_songs: HashSet<&str> = songs.iter().map(|s| s.song.id.as_str()).collect();
        let target = distinct_books.len().min(distinct_songs.len());

        let mut used_books: HashSet<&str> = HashSet::with_capacity(target);
        let mut used_songs: HashSet<&str> = HashSet::with_capacity(target);

        for pair in self.ranked_pairs(&books, &songs) {
            if assignment.len() == target {
                break;
            }
            let book = &books[pair.book];
            let song = &songs[pair.song];
            let (book_id, song_id) = (book.book.id.as_str(), song.song.id.as_str());
            if used_books.contains(book_id) || used_songs.contains(song_id) {
                continue;
            }
            used_books.insert(book_id);
            used_songs.insert(song_id);

            debug!(book_id, song_id, score = pair.score, "assign_unique_commit");
            assignment.commit(book.book.id.clone(), self.score_prepared(book, song));
        }

        Ok(assignment)
    }

    fn score_assigned_inner(
        &self,
        book: &Book,
        table: &AssignmentTable,
        songs: &[Song],
    ) -> Result<Option<MatchResult>, MatchError> {
        let Some(song_id) = table.song_for(&book.id) else {
            return Ok(None);
        };
        let song = songs
            .iter()
            .find(|song| song.id == song_id)
            .ok_or_else(|| MatchError::UnknownSong {
                book_id: book.id.clone(),
                song_id: song_id.to_string(),
            })?;
        self.score_pair_inner(book, song).map(Some)
    }

    /// Score the full cross product and sort it for the greedy walk.
    fn ranked_pairs(
        &self,
        books: &[PreparedBook<'_>],
        songs: &[PreparedSong<'_>],
    ) -> Vec<PairScore> {
        let width = songs.len();
        let cells = books.len() * width;
        let score_cell = |index: usize| {
            let (b, s) = (index / width, index % width);
            PairScore {
                book: b,
                song: s,
                score: self.score_only(&books[b], &songs[s]),
            }
        };

        // Both branches yield cells in enumeration order.
        let mut pairs: Vec<PairScore> = if self.cfg.use_parallel {
            (0..cells).into_par_iter().map(score_cell).collect()
        } else {
            (0..cells).map(score_cell).collect()
        };

        pairs.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| (a.book, a.song).cmp(&(b.book, b.song)))
        });
        pairs
    }

    fn prepare_book<'a>(&self, book: &'a Book) -> Result<PreparedBook<'a>, MatchError> {
        let id = require_id(book.id())?;
        let vibe = book.mood();
        vibe.check_finite().map_err(|err| malformed(id, &err))?;

        let vector = match self.cfg.range_policy {
            RangePolicy::PassThrough => vibe,
            RangePolicy::Clamp => vibe.clamped(),
            RangePolicy::Reject => {
                vibe.check_range().map_err(|err| out_of_range(id, err))?;
                vibe
            }
        };

        Ok(PreparedBook {
            book,
            vector,
            tags: tag_set(book.tags()),
        })
    }

    fn prepare_song<'a>(&self, song: &'a Song) -> Result<PreparedSong<'a>, MatchError> {
        let id = require_id(song.id())?;
        song.audio
            .check_finite()
            .map_err(|err| malformed(id, &err))?;

        let (audio, derived) = match self.cfg.range_policy {
            RangePolicy::PassThrough => (song.audio, song.mood()),
            RangePolicy::Clamp => {
                let audio = song.audio.clamped();
                (audio, derive_vector(&audio))
            }
            RangePolicy::Reject => {
                song.audio
                    .check_range()
                    .map_err(|err| out_of_range(id, err))?;
                (song.audio, song.mood())
            }
        };

        Ok(PreparedSong {
            song,
            audio,
            derived,
            tags: tag_set(song.tags()),
        })
    }

    fn components(&self, book: &PreparedBook<'_>, song: &PreparedSong<'_>) -> ComponentScores {
        ComponentScores {
            tag: jaccard_sets(&book.tags, &song.tags),
            vector: cosine(&book.vector, &song.derived),
        }
    }

    fn apply_floor(&self, total: f64) -> f64 {
        match self.cfg.penalty_floor {
            Some(floor) => total.max(floor),
            None => total,
        }
    }

    /// Total score only; must agree bit-for-bit with `score_prepared`.
    fn score_only(&self, book: &PreparedBook<'_>, song: &PreparedSong<'_>) -> f64 {
        let penalty = self
            .cfg
            .penalties
            .total(&book.vector, &song.derived, &song.audio);
        combine(self.components(book, song), self.apply_floor(penalty))
    }

    fn score_prepared(&self, book: &PreparedBook<'_>, song: &PreparedSong<'_>) -> MatchResult {
        let scores = self.components(book, song);
        let evaluated = self
            .cfg
            .penalties
            .evaluate(&book.vector, &song.derived, &song.audio);
        let penalties = PenaltyOutcome {
            total: self.apply_floor(evaluated.total),
            factors: evaluated.factors,
        };

        let shared = overlap_sets(&book.tags, &song.tags);
        let factors = compose(
            &book.book.tags,
            &shared,
            &book.vector,
            &song.derived,
            scores,
            &penalties,
        );

        MatchResult {
            song: song.song.clone(),
            score: combine(scores, penalties.total),
            tag_score: scores.tag,
            vector_score: scores.vector,
            penalty_score: penalties.total,
            factors,
        }
    }
}

fn observe(operation: MatchOperation, candidates: usize, latency: Duration) {
    if let Some(recorder) = metrics_recorder() {
        recorder.record_match(operation, candidates, latency);
    }
}

fn require_id(id: &str) -> Result<&str, MatchError> {
    if id.trim().is_empty() {
        return Err(MatchError::MalformedEntity {
            id: id.to_string(),
            reason: "identifier must not be empty".into(),
        });
    }
    Ok(id)
}

fn malformed(id: &str, err: &MoodError) -> MatchError {
    MatchError::MalformedEntity {
        id: id.to_string(),
        reason: err.to_string(),
    }
}

fn out_of_range(id: &str, err: MoodError) -> MatchError {
    match err {
        MoodError::OutOfRange { field, value } => MatchError::OutOfRange {
            id: id.to_string(),
            field,
            value,
        },
        other => malformed(id, &other),
    }
}
