//! amr-enrich - MusicBrainz artist enrichment
//!
//! Reads a JSON array of artist records, fills in missing fields from
//! MusicBrainz and writes the updated array to stdout. Logs go to stderr.

use std::io::Read;
use std::path::{Path, PathBuf};

use amr_common::config::{load_config, LoggingConfig};
use amr_enrich::config::{client_settings, country_table};
use amr_enrich::{escape_lucene, ArtistEnricher, LocalArtistRecord, MusicBrainzClient, QueryBuilder};
use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for amr-enrich
#[derive(Parser, Debug)]
#[command(name = "amr-enrich")]
#[command(about = "Enrich artist records with MusicBrainz metadata")]
#[command(version)]
struct Args {
    /// JSON file with an array of artist records ("-" for stdin)
    input: PathBuf,

    /// Config file (overrides AMR_CONFIG and the platform default)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Let MusicBrainz values replace non-empty local values
    #[arg(long)]
    overwrite: bool,

    /// Print the search query per artist without contacting MusicBrainz
    #[arg(long)]
    query_only: bool,

    /// Candidates requested per search (defaults to the configured limit)
    #[arg(short, long)]
    limit: Option<u32>,

    /// Escape Lucene special characters in artist names
    #[arg(long)]
    escape_names: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Warnings raised while loading config go through a bootstrap subscriber
    let bootstrap = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::WARN)
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, || {
        load_config(args.config.as_deref())
    })
    .context("Failed to load configuration")?;

    init_tracing(&config.logging);

    info!("Starting amr-enrich {}", env!("CARGO_PKG_VERSION"));

    let mut artists = read_artists(&args.input)?;
    info!("Loaded {} artist records", artists.len());

    let mut query_builder = QueryBuilder::new(country_table(&config));
    if args.escape_names {
        query_builder = query_builder.with_escaper(escape_lucene);
    }

    if args.query_only {
        let queries: Vec<_> = artists
            .iter()
            .map(|artist| match query_builder.build(artist) {
                Ok(query) => json!({ "name": artist.name, "query": query }),
                Err(e) => json!({ "name": artist.name, "error": e.to_string() }),
            })
            .collect();
        serde_json::to_writer_pretty(std::io::stdout().lock(), &queries)?;
        println!();
        return Ok(());
    }

    let client = MusicBrainzClient::setup(client_settings(&config))
        .context("Failed to set up MusicBrainz client")?;

    let enricher = ArtistEnricher::new(client, query_builder)
        .with_overwrite(args.overwrite)
        .with_search_limit(args.limit.unwrap_or(config.musicbrainz.search_limit));

    let results = enricher.enrich_all(&mut artists).await;
    let enriched = results.iter().filter(|r| r.is_ok()).count();
    info!(
        enriched,
        skipped = results.len() - enriched,
        "Enrichment complete"
    );

    serde_json::to_writer_pretty(std::io::stdout().lock(), &artists)
        .context("Failed to write artist records")?;
    println!();

    Ok(())
}

/// Install the stderr fmt subscriber; RUST_LOG wins over the configured level
fn init_tracing(logging: &LoggingConfig) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&logging.level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_artists(input: &Path) -> Result<Vec<LocalArtistRecord>> {
    let content = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read artists from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?
    };

    serde_json::from_str(&content)
        .context("Input must be a JSON array of artist records with string or null field values")
}
