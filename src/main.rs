//! `vibematch` command-line entry point.
//!
//! Prints the unique book-to-song assignment for a catalog as JSON, or the
//! ranked candidates for one book with `--book`.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use vibematch::{
    AssignmentTable, Catalog, VibeConfig, assign_catalog, build_matcher, demo_catalog, recommend,
    rescore_table,
};

/// Command-line arguments for vibematch
#[derive(Parser, Debug)]
#[command(name = "vibematch")]
#[command(about = "Match books to songs by mood and tags")]
#[command(version)]
struct Args {
    /// Catalog of books and songs (.json, .yaml or .yml)
    #[arg(short, long, env = "VIBEMATCH_CATALOG")]
    catalog: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long, env = "VIBEMATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Use the bundled sample catalog
    #[arg(long, conflicts_with = "catalog")]
    demo: bool,

    /// Rank candidates for a single book instead of assigning the catalog
    #[arg(short, long)]
    book: Option<String>,

    /// Number of candidates to list with --book (overrides output.top)
    #[arg(short = 'n', long, requires = "book")]
    top: Option<usize>,

    /// Re-explain a stored assignment table instead of recomputing it
    #[arg(long, conflicts_with = "book")]
    table: Option<PathBuf>,

    /// Write the computed assignment as a book-id to song-id table
    #[arg(long, conflicts_with_all = ["book", "table"])]
    save_table: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => VibeConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => VibeConfig::default(),
    };

    let catalog = load_catalog(&args, &config)?;
    info!(
        books = catalog.books.len(),
        songs = catalog.songs.len(),
        "catalog_loaded"
    );

    let matcher = build_matcher(&config)?;
    let pretty = config.output.pretty;

    if let Some(book_id) = &args.book {
        let n = args.top.unwrap_or(config.output.top);
        let ranked = recommend(&catalog, &matcher, book_id, n)?;
        return emit(&ranked, pretty);
    }

    if let Some(path) = &args.table {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read table {}", path.display()))?;
        let table = AssignmentTable::from_json_str(&raw)
            .with_context(|| format!("failed to parse table {}", path.display()))?;
        let rescored = rescore_table(&catalog, &matcher, &table)?;
        return emit(&rescored, pretty);
    }

    let assignment = assign_catalog(&catalog, &matcher)?;
    if let Some(path) = &args.save_table {
        let json = assignment.to_table().to_json_pretty()?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), entries = assignment.len(), "table_saved");
    }
    emit(&assignment, pretty)
}

fn load_catalog(args: &Args, config: &VibeConfig) -> Result<Catalog> {
    if args.demo {
        return Ok(demo_catalog()?);
    }
    let Some(path) = args.catalog.as_ref().or(config.catalog.as_ref()) else {
        bail!("no catalog given; pass --catalog, set `catalog` in the config, or use --demo");
    };
    Catalog::from_file(path).with_context(|| format!("failed to load catalog {}", path.display()))
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
