use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use vibematch::{MatchConfig, Matcher, derive_vector};

mod common;
use common::{generate_books, generate_songs};

/// Benchmark single-pair scoring, including derivation and explanations
fn bench_score_pair(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_pair");
    let matcher = Matcher::default();
    let book = &generate_books(1)[0];
    let song = &generate_songs(1)[0];

    group.bench_function("derive_vector", |b| {
        b.iter(|| derive_vector(black_box(&song.audio)));
    });
    group.bench_function("explained", |b| {
        b.iter(|| {
            matcher
                .score_pair(black_box(book), black_box(song))
                .expect("score should succeed")
        });
    });

    group.finish();
}

/// Benchmark best-match search with different candidate counts
fn bench_best_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("best_match");
    let matcher = Matcher::default();
    let book = &generate_books(1)[0];

    for &size in [100, 1_000, 10_000].iter() {
        let songs = generate_songs(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &songs, |b, songs| {
            b.iter(|| {
                matcher
                    .find_best_match(black_box(book), black_box(songs))
                    .expect("match should succeed")
            });
        });
    }

    group.finish();
}

/// Benchmark corpus-wide unique assignment, sequential and parallel
fn bench_assign_unique(c: &mut Criterion) {
    let mut group = c.benchmark_group("assign_unique");
    group.sample_size(20);

    let sequential = Matcher::default();
    let parallel = Matcher::new(MatchConfig::new().with_parallel(true)).expect("valid config");

    for &(books, songs) in [(50, 100), (200, 400), (500, 1_000)].iter() {
        let book_list = generate_books(books);
        let song_list = generate_songs(songs);
        group.throughput(Throughput::Elements((books * songs) as u64));

        for (label, matcher) in [("sequential", &sequential), ("parallel", &parallel)] {
            group.bench_function(BenchmarkId::new(label, format!("{books}x{songs}")), |b| {
                b.iter(|| {
                    matcher
                        .assign_unique(black_box(&book_list), black_box(&song_list))
                        .expect("assignment should succeed")
                });
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_score_pair,
    bench_best_match,
    bench_assign_unique
);
criterion_main!(benches);
