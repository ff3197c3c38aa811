//! Cinematch command-line tool
//!
//! Semantic recommendations over a SQLite movie catalog and batch
//! assignment of poster images from a folder.

mod sqlite;

use std::path::PathBuf;

use anyhow::{Context, Result};
use cinematch_core::reconcile::{AssetIndex, IMAGE_EXTENSIONS, Reconciler};
use cinematch_core::{CatalogStore, sync_images};
use cinematch_embed::{EmbeddingConfig, EmbeddingMatcher, MatchError, OpenAiEmbeddings};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::sqlite::{DEFAULT_IMAGE_COLUMN, DEFAULT_TABLE, SqliteCatalog};

/// CLI arguments
#[derive(Parser)]
#[command(name = "cinematch")]
#[command(about = "Semantic movie search and poster reconciliation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite catalog database
    #[arg(short, long, env = "CINEMATCH_DB", default_value = "db.sqlite3")]
    db: PathBuf,

    /// Catalog table name
    #[arg(short, long, env = "CINEMATCH_TABLE", default_value = DEFAULT_TABLE)]
    table: String,

    /// Column holding the image path
    #[arg(long, env = "CINEMATCH_IMAGE_COLUMN", default_value = DEFAULT_IMAGE_COLUMN)]
    image_column: String,
}

impl Cli {
    fn open_catalog(&self) -> Result<SqliteCatalog> {
        SqliteCatalog::open(&self.db, &self.table)
            .and_then(|store| store.with_image_column(&self.image_column))
            .with_context(|| format!("Failed to open catalog {}", self.db.display()))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend the movies closest to a free-text description
    Recommend {
        /// Description of the movie you want
        query: String,

        /// Number of results to print
        #[arg(short = 'n', long, default_value_t = 1)]
        limit: usize,

        /// Embedding config file (JSON)
        #[arg(short, long, env = "CINEMATCH_EMBEDDING_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Assign images from a folder to catalog entries (tolerant matching)
    AssignImages {
        /// Folder holding the image files
        #[arg(short = 'D', long, default_value = "media/movie/images")]
        dir: PathBuf,

        /// Path prefix stored with each image
        #[arg(short, long, default_value = "movie/images")]
        path_prefix: String,
    },
    /// Show the canonical token and name variants for a title
    Variants {
        /// Movie title
        title: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Recommend {
            query,
            limit,
            config,
        } => {
            let store = cli.open_catalog()?;
            recommend(&store, query, *limit, config.clone())
        }
        Commands::AssignImages { dir, path_prefix } => {
            let mut store = cli.open_catalog()?;
            assign_images(&mut store, dir, path_prefix)
        }
        Commands::Variants { title } => {
            let reconciler = Reconciler::with_defaults()?;
            for (i, variant) in reconciler.variants(title).iter().enumerate() {
                let marker = if i == 0 { "*" } else { " " };
                println!("{marker} {variant}");
            }
            Ok(())
        }
    }
}

fn recommend(
    store: &SqliteCatalog,
    query: &str,
    limit: usize,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = EmbeddingConfig::load(config_path.as_deref())
        .context("Failed to load embedding configuration")?;
    let dimensions = config.dimensions;
    let provider = OpenAiEmbeddings::new(config).context("Failed to create embedding client")?;
    let matcher = EmbeddingMatcher::new(provider, dimensions);

    let catalog = store.entries().context("Failed to read catalog")?;
    info!(entries = catalog.len(), "catalog loaded");

    let ranked = match matcher.rank(query, &catalog, limit.max(1)) {
        Ok(ranked) => ranked,
        Err(MatchError::Provider(err)) if err.is_retryable() => {
            anyhow::bail!("Embedding provider unavailable, try again later: {err}");
        }
        Err(err) => return Err(err).context("Recommendation failed"),
    };

    if ranked.is_empty() {
        println!("No match found.");
        return Ok(());
    }

    for m in ranked {
        println!("{} (similarity {:.4})", m.entry, m.score);
    }
    Ok(())
}

fn assign_images(
    store: &mut SqliteCatalog,
    dir: &std::path::Path,
    path_prefix: &str,
) -> Result<()> {
    let index = AssetIndex::from_dir(dir, IMAGE_EXTENSIONS)
        .with_context(|| format!("Cannot index images in {}", dir.display()))?;
    info!("Found {} image files in folder", index.len());

    let reconciler = Reconciler::with_defaults()?;
    let report = sync_images(store, &index, &reconciler, path_prefix)
        .context("Image assignment failed")?;

    println!(
        "Finished updating {} of {} movies ({} without image).",
        report.updated,
        report.total,
        report.unresolved.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_recommend_with_defaults() {
        let cli = Cli::try_parse_from(["cinematch", "recommend", "a heist in Los Angeles"]).unwrap();
        assert_eq!(cli.table, "movie_movie");
        assert_eq!(cli.image_column, "images");
        match cli.command {
            Commands::Recommend { query, limit, .. } => {
                assert_eq!(query, "a heist in Los Angeles");
                assert_eq!(limit, 1);
            }
            _ => panic!("expected recommend"),
        }
    }

    #[test]
    fn assign_images_updates_sqlite_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        std::fs::create_dir(&images).unwrap();
        std::fs::write(images.join("m_Matrix.jpg"), b"").unwrap();

        let mut store = SqliteCatalog::open(&dir.path().join("db.sqlite3"), DEFAULT_TABLE).unwrap();
        store.ensure_table().unwrap();
        store
            .upsert(&cinematch_core::CatalogEntry::new(1, "The Matrix"))
            .unwrap();
        store
            .upsert(&cinematch_core::CatalogEntry::new(2, "Zodiac"))
            .unwrap();

        assign_images(&mut store, &images, "movie/images").unwrap();

        assert_eq!(
            store.get(1).unwrap().unwrap().image.as_deref(),
            Some("movie/images/m_Matrix.jpg")
        );
        assert_eq!(store.get(2).unwrap().unwrap().image, None);
    }

    #[test]
    fn open_catalog_rejects_bad_image_column() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("db.sqlite3");
        let cli = Cli::try_parse_from([
            "cinematch",
            "--db",
            db.to_str().unwrap(),
            "--image-column",
            "images;",
            "variants",
            "Heat",
        ])
        .unwrap();
        assert!(cli.open_catalog().is_err());
    }

    #[test]
    fn assign_images_missing_folder_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SqliteCatalog::open(&dir.path().join("db.sqlite3"), DEFAULT_TABLE).unwrap();
        store.ensure_table().unwrap();
        assert!(assign_images(&mut store, &dir.path().join("nope"), "movie/images").is_err());
    }
}
