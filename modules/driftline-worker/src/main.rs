use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sqlx::PgPool;
use tracing::info;
use tracing_subscriber::EnvFilter;

use driftline_common::{Config, NoOpEmbedder, TextEmbedder};
use driftline_ingest::{IngestDispatcher, LogMetricsSink};
use driftline_store::{ContentDb, UserDb};
use embed_client::Embedder;

/// Process one batch of content discovery messages.
///
/// In production the queue host hands batches to `IngestDispatcher` directly;
/// this binary runs the same pipeline against a file — local runs and replay
/// of dead-lettered batches. Exits non-zero on a critical failure so the
/// caller can apply its retry policy.
#[derive(Parser)]
#[command(name = "driftline-worker")]
struct Args {
    /// Newline-delimited JSON file: one discovery message body per line.
    batch_file: PathBuf,

    /// Skip embedding enrichment (content is stored without vectors).
    #[arg(long)]
    no_embed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("driftline=info".parse()?))
        .init();

    info!("Driftline ingest worker starting...");

    let args = Args::parse();
    let config = Config::from_env();

    let pool = PgPool::connect(&config.database_url)
        .await
        .context("connecting to Postgres")?;

    let embedder: Arc<dyn TextEmbedder> = if args.no_embed {
        Arc::new(NoOpEmbedder)
    } else {
        Arc::new(Embedder::new(
            &config.embedding_api_key,
            &config.embedding_base_url,
            &config.embedding_model,
        ))
    };

    let dispatcher = IngestDispatcher::new(
        Arc::new(ContentDb::new(pool.clone())),
        Arc::new(UserDb::new(pool)),
        embedder,
        Arc::new(LogMetricsSink),
    );

    let raw = std::fs::read_to_string(&args.batch_file)
        .with_context(|| format!("reading {}", args.batch_file.display()))?;
    let bodies: Vec<String> = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();

    info!(messages = bodies.len(), "processing batch");

    let stats = dispatcher.handle_batch(&bodies).await?;
    println!("{stats}");

    Ok(())
}
